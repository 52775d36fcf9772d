use std::fmt::{Debug, Display};
use std::hash::{Hash, Hasher};

pub use num::traits::FloatConst;
pub use num::Float;

/// Coordinate and distance type.
pub trait Scalar: Float + FloatConst + Debug + Display {}
impl<T: Float + FloatConst + Debug + Display> Scalar for T {}

pub type PointId = u64;

/// An identified vector in the metric space.
///
/// Equality and hashing go by `id` alone: two points at the same
/// coordinates with different ids are distinct.
#[derive(Debug, Clone)]
pub struct Point<F: Scalar = f32> {
    id: PointId,
    vector: Vec<F>,
}

impl<F: Scalar> Point<F> {
    pub fn new(id: PointId, vector: Vec<F>) -> Self {
        Point { id, vector }
    }

    pub fn id(&self) -> PointId {
        self.id
    }

    pub fn vector(&self) -> &[F] {
        &self.vector
    }

    pub fn dim(&self) -> usize {
        self.vector.len()
    }

    /// No NaN or infinite components.
    pub fn is_finite(&self) -> bool {
        self.vector.iter().all(|c| c.is_finite())
    }
}

impl<F: Scalar> PartialEq for Point<F> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<F: Scalar> Eq for Point<F> {}

impl<F: Scalar> Hash for Point<F> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
