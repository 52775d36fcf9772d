use crate::point::{Point, Scalar};

/// Index of a node in its tree's arena.
pub type NodeId = usize;

/// A tree node: one point, the radius separating its children, and the
/// children themselves.
///
/// Every point reachable through `inner` was within `radius` of this
/// node's point when the node was built, and every point reachable
/// through `outer` was strictly farther.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<F: Scalar = f32> {
    point: Point<F>,
    radius: Option<F>,
    inner: Option<NodeId>,
    outer: Option<NodeId>,
    n_children: usize,
}

impl<F: Scalar> Node<F> {
    pub(crate) fn new(point: Point<F>) -> Self {
        Node { point, radius: None, inner: None, outer: None, n_children: 0 }
    }

    pub fn point(&self) -> &Point<F> {
        &self.point
    }

    /// `None` until the builder has processed this node.
    pub fn radius(&self) -> Option<F> {
        self.radius
    }

    pub fn inner(&self) -> Option<NodeId> {
        self.inner
    }

    pub fn outer(&self) -> Option<NodeId> {
        self.outer
    }

    /// Number of points partitioned below this node.
    pub fn n_children(&self) -> usize {
        self.n_children
    }

    pub fn is_leaf(&self) -> bool {
        self.inner.is_none() && self.outer.is_none()
    }

    pub(crate) fn set_radius(&mut self, radius: F) {
        self.radius = Some(radius);
    }

    pub(crate) fn set_children(&mut self, inner: Option<NodeId>, outer: Option<NodeId>, n_children: usize) {
        self.inner = inner;
        self.outer = outer;
        self.n_children = n_children;
    }
}

#[cfg(test)]
mod tests {
    use super::Node;
    use crate::point::Point;

    #[test]
    fn fresh_node_is_unprocessed_leaf() {
        let n = Node::new(Point::new(7, vec![1.0f32]));
        assert_eq!(n.point().id(), 7);
        assert_eq!(n.radius(), None);
        assert!(n.is_leaf());
        assert_eq!(n.n_children(), 0);
    }
}
