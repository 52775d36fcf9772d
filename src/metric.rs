//! Distance functions a tree can be built over.
//!
//! Every variant must be a true metric. Search pruning relies on the
//! triangle inequality and nothing in the tree checks it.
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, VPTreeError};
use crate::point::{Point, Scalar};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Distance {
    /// L2 norm of the component-wise difference.
    #[default]
    Euclidean,
    /// Angle between the two vectors, in radians.
    ///
    /// The zero vector is at angle 0 from itself and pi/2 from
    /// everything else.
    Angular,
}

impl Distance {
    pub const NAMES: [&'static str; 2] = ["euclidean", "angular"];

    pub fn name(&self) -> &'static str {
        match *self {
            Distance::Euclidean => "euclidean",
            Distance::Angular => "angular",
        }
    }

    /// Distance between two points.
    ///
    /// Fails with `DimensionMismatch` when the vectors differ in length.
    pub fn distance<F: Scalar>(&self, a: &Point<F>, b: &Point<F>) -> Result<F> {
        let (x, y) = (a.vector(), b.vector());
        if x.len() != y.len() {
            return Err(VPTreeError::DimensionMismatch { left: x.len(), right: y.len() });
        }

        Ok(match *self {
            Distance::Euclidean => euclidean(x, y),
            Distance::Angular => angular(x, y),
        })
    }
}

fn euclidean<F: Scalar>(x: &[F], y: &[F]) -> F {
    x.iter()
        .zip(y)
        .fold(F::zero(), |acc, (&a, &b)| {
            let d = a - b;
            acc + d * d
        })
        .sqrt()
}

fn angular<F: Scalar>(x: &[F], y: &[F]) -> F {
    let (mut dot, mut xx, mut yy) = (F::zero(), F::zero(), F::zero());
    for (&a, &b) in x.iter().zip(y) {
        dot = dot + a * b;
        xx = xx + a * a;
        yy = yy + b * b;
    }

    match (xx.is_zero(), yy.is_zero()) {
        (true, true) => F::zero(),
        (true, false) | (false, true) => F::FRAC_PI_2(),
        (false, false) => {
            let cos = dot / (xx.sqrt() * yy.sqrt());
            // rounding can push |cos| slightly past 1
            cos.max(-F::one()).min(F::one()).acos()
        }
    }
}

impl FromStr for Distance {
    type Err = VPTreeError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "euclidean" => Ok(Distance::Euclidean),
            "angular" => Ok(Distance::Angular),
            _ => Err(VPTreeError::Configuration { name: name.to_string() }),
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::Distance;
    use crate::error::VPTreeError;
    use crate::point::Point;

    fn p(id: u64, v: &[f64]) -> Point<f64> {
        Point::new(id, v.to_vec())
    }

    #[test]
    fn euclidean() {
        let d = Distance::Euclidean.distance(&p(0, &[0.0, 0.0]), &p(1, &[3.0, 4.0])).unwrap();
        assert_eq!(d, 5.0);

        let a = p(0, &[1.5, -2.0, 7.0]);
        assert_eq!(Distance::Euclidean.distance(&a, &a).unwrap(), 0.0);
    }

    #[test]
    fn angular() {
        let m = Distance::Angular;
        let x = p(0, &[1.0, 0.0]);
        let y = p(1, &[0.0, 2.0]);
        let xy = p(2, &[3.0, 3.0]);
        let neg = p(3, &[-1.0, 0.0]);

        assert!((m.distance(&x, &y).unwrap() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((m.distance(&x, &xy).unwrap() - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
        assert!((m.distance(&x, &neg).unwrap() - std::f64::consts::PI).abs() < 1e-12);
        assert_eq!(m.distance(&xy, &xy).unwrap(), 0.0);
    }

    #[test]
    fn angular_zero_vector() {
        let m = Distance::Angular;
        let zero = p(0, &[0.0, 0.0]);
        let x = p(1, &[1.0, 1.0]);

        assert_eq!(m.distance(&zero, &zero).unwrap(), 0.0);
        assert_eq!(m.distance(&zero, &x).unwrap(), std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn dimension_mismatch() {
        let r = Distance::Euclidean.distance(&p(0, &[1.0]), &p(1, &[1.0, 2.0]));
        match r {
            Err(VPTreeError::DimensionMismatch { left: 1, right: 2 }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn by_name() {
        for name in Distance::NAMES.iter() {
            let m: Distance = name.parse().unwrap();
            assert_eq!(m.name(), *name);
        }
        match "cosine-ish".parse::<Distance>() {
            Err(VPTreeError::Configuration { name }) => assert_eq!(name, "cosine-ish"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
