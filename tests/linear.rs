extern crate vptree;

use vptree::{Point, VPTree};

fn check_self_nearest(points: Vec<Point<f32>>) {
    let vp = VPTree::new(points.clone()).unwrap();

    for p in &points {
        // each point should be nearest to itself.
        let nearest = vp.nearest_neighbor(p).unwrap().unwrap();
        assert_eq!(nearest, p);

        let within = vp.range_search(p, 1e-9).unwrap();
        assert_eq!(within.ids(), vec![p.id()]);
    }
}

#[test]
fn test_linear() {
    for n in 10..101u64 {
        let points: Vec<_> = (0..n + 1).map(|x| Point::new(x, vec![x as f32 / n as f32])).collect();
        check_self_nearest(points);
    }
}

#[test]
fn test_harmonic() {
    for n in 10..101u64 {
        let points: Vec<_> = (1..n + 1).map(|x| Point::new(x, vec![1.0 / (x as f32)])).collect();
        check_self_nearest(points);
    }
}

#[test]
fn collinear_range() {
    let points: Vec<_> = (0..5u64).map(|x| Point::new(x, vec![x as f32])).collect();
    let vp = VPTree::new(points).unwrap();

    let mut ids = vp.range_search(&Point::new(99, vec![2.0]), 1.5).unwrap().ids();
    ids.sort();
    assert_eq!(ids, vec![1, 2, 3]);
}
