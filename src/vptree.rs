//! Vantage-Point Trees are a data structure for fast range and
//! k-nearest-neighbor searches in any metric space.
//!
//! Each node holds one point (the vantage point) and a radius. Points
//! within the radius of the vantage point go to the inner subtree, the
//! rest to the outer one. Searches use the triangle inequality to skip
//! subtrees that cannot contain a match, so results are always exact.
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::config::TreeConfig;
use crate::error::{Result, VPTreeError};
use crate::metric::Distance;
use crate::node::{Node, NodeId};
use crate::point::{Point, PointId, Scalar};

/// Points matched by a query, borrowed from the tree that answered it.
#[derive(Debug, Clone)]
pub struct SearchResult<'a, F: Scalar = f32> {
    /// Range search: no particular order. k-NN search: ascending by
    /// distance, ties by ascending id.
    pub points: Vec<&'a Point<F>>,
    /// Wall-clock time spent answering the query.
    pub elapsed: Duration,
    /// Number of nodes whose distance to the query was computed.
    pub visited: usize,
}

impl<'a, F: Scalar> SearchResult<'a, F> {
    fn empty() -> Self {
        SearchResult { points: Vec::new(), elapsed: Duration::default(), visited: 0 }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn ids(&self) -> Vec<PointId> {
        self.points.iter().map(|p| p.id()).collect()
    }
}

impl<'a, F: Scalar> IntoIterator for SearchResult<'a, F> {
    type Item = &'a Point<F>;
    type IntoIter = std::vec::IntoIter<&'a Point<F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

/// k-NN candidate, ordered by distance and then by point id so that the
/// candidate set never depends on traversal order.
struct HeapElem<'a, F: Scalar> {
    dist: F,
    item: &'a Point<F>,
}

impl<'a, F: Scalar> HeapElem<'a, F> {
    fn new(dist: F, item: &'a Point<F>) -> Self {
        HeapElem { dist, item }
    }
}

impl<'a, F: Scalar> PartialEq for HeapElem<'a, F> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<'a, F: Scalar> Eq for HeapElem<'a, F> {}

impl<'a, F: Scalar> PartialOrd for HeapElem<'a, F> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a, F: Scalar> Ord for HeapElem<'a, F> {
    fn cmp(&self, other: &Self) -> Ordering {
        // NaN distances are rejected before they reach the heap.
        self.dist
            .partial_cmp(&other.dist)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.item.id().cmp(&other.item.id()))
    }
}

/// Position of the pivot in a working set of `n >= 2` elements whose
/// vantage point sits at `vantage`: the middle element, or its neighbor
/// if the middle is the vantage point itself.
fn pivot_position(n: usize, vantage: usize) -> usize {
    let mid = n / 2;
    if mid != vantage {
        mid
    } else if mid + 1 < n {
        mid + 1
    } else {
        mid - 1
    }
}

/// Distances involving NaN or infinite coordinates break the triangle
/// inequality the pruning depends on, so such points are refused.
fn check_finite<F: Scalar>(p: &Point<F>, role: &str) -> Result<()> {
    if p.is_finite() {
        Ok(())
    } else {
        Err(VPTreeError::invalid_argument(format!("{} {} has a non-finite component", role, p.id())))
    }
}

/// Construction state. The generator lives here, so it is gone once the
/// tree is handed out.
struct TreeBuilder<F: Scalar> {
    nodes: Vec<Node<F>>,
    metric: Distance,
    rng: StdRng,
    depth: usize,
}

impl<F: Scalar> TreeBuilder<F> {
    fn new(points: Vec<Point<F>>, metric: Distance, seed: u64) -> Result<Self> {
        let mut seen = HashSet::with_capacity(points.len());
        for p in &points {
            check_finite(p, "point")?;
            if !seen.insert(p.id()) {
                return Err(VPTreeError::invalid_argument(format!("duplicate point id {}", p.id())));
            }
        }

        Ok(TreeBuilder {
            nodes: points.into_iter().map(Node::new).collect(),
            metric,
            rng: StdRng::seed_from_u64(seed),
            depth: 0,
        })
    }

    /// Split `working` into the elements within `radius` of `vantage` and
    /// those beyond it. The vantage point itself goes to neither side.
    fn partition_nodes(&self, vantage: NodeId, radius: F, working: &[NodeId])
                       -> Result<(Vec<NodeId>, Vec<NodeId>)> {
        let center = self.nodes[vantage].point();
        let mut inner = Vec::new();
        let mut outer = Vec::new();

        for &id in working {
            let p = self.nodes[id].point();
            if p == center {
                continue;
            }
            if self.metric.distance(center, p)? <= radius {
                inner.push(id);
            } else {
                outer.push(id);
            }
        }
        Ok((inner, outer))
    }

    fn build_level(&mut self, working: Vec<NodeId>, level: usize) -> Result<Option<NodeId>> {
        if working.is_empty() {
            return Ok(None);
        }
        self.depth = self.depth.max(level);

        let n = working.len();
        let vantage_pos = self.rng.gen_range(0..n);
        let vantage = working[vantage_pos];

        if n == 1 {
            self.nodes[vantage].set_radius(F::zero());
            return Ok(Some(vantage));
        }

        let pivot = working[pivot_position(n, vantage_pos)];
        let radius = self.metric.distance(self.nodes[vantage].point(), self.nodes[pivot].point())?;
        self.nodes[vantage].set_radius(radius);

        let (inner, outer) = self.partition_nodes(vantage, radius, &working)?;
        drop(working);

        let n_children = inner.len() + outer.len();
        let inner = self.build_level(inner, level + 1)?;
        let outer = self.build_level(outer, level + 1)?;
        self.nodes[vantage].set_children(inner, outer, n_children);

        Ok(Some(vantage))
    }

    fn build(mut self) -> Result<VPTree<F>> {
        let working: Vec<NodeId> = (0..self.nodes.len()).collect();
        let root = self.build_level(working, 1)?;

        Ok(VPTree { nodes: self.nodes, root, metric: self.metric, depth: self.depth })
    }
}

/// An immutable vantage-point tree.
///
/// The tree owns its points; search results borrow them. Once built it
/// is never modified, so it can be shared between threads and queried
/// concurrently.
#[derive(Debug, Clone, PartialEq)]
pub struct VPTree<F: Scalar = f32> {
    nodes: Vec<Node<F>>,
    root: Option<NodeId>,
    metric: Distance,
    depth: usize,
}

impl<F: Scalar> VPTree<F> {
    /// Construct a tree with the default configuration: euclidean
    /// distance, seed 42.
    pub fn new(items: Vec<Point<F>>) -> Result<VPTree<F>> {
        VPTree::build(items, &TreeConfig::default())
    }

    /// Construct a tree from a set of points.
    ///
    /// The same points in the same order with the same seed always give
    /// the same tree. An empty set gives an empty tree. Points with NaN or
    /// infinite components are rejected with `InvalidArgument`.
    ///
    /// Construction recurses once per level and the tree is not
    /// rebalanced. Many points at identical coordinates all fall inside a
    /// zero radius, so each such point adds a level; on the order of 10^5
    /// duplicates can exhaust the stack.
    pub fn build(items: Vec<Point<F>>, config: &TreeConfig) -> Result<VPTree<F>> {
        VPTree::with_metric(items, config.metric()?, config.random_seed)
    }

    pub fn with_metric(items: Vec<Point<F>>, metric: Distance, seed: u64) -> Result<VPTree<F>> {
        let start = Instant::now();
        let n = items.len();
        let tree = TreeBuilder::new(items, metric, seed)?.build()?;

        debug!(points = n, depth = tree.depth, %metric, elapsed = ?start.elapsed(), "built vantage point tree");
        Ok(tree)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn metric(&self) -> Distance {
        self.metric
    }

    /// Number of levels; 0 for an empty tree.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn root_id(&self) -> Option<NodeId> {
        self.root
    }

    pub fn root(&self) -> Option<&Node<F>> {
        self.root.map(|id| &self.nodes[id])
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<F>> {
        self.nodes.get(id)
    }

    /// All indexed points, in input order.
    pub fn points(&self) -> impl Iterator<Item = &Point<F>> + '_ {
        self.nodes.iter().map(|n| n.point())
    }

    /// Every indexed point strictly closer than `radius` to `query`.
    ///
    /// Fails with `InvalidArgument` for a negative or NaN radius and with
    /// `DimensionMismatch` if the query has the wrong length.
    pub fn range_search(&self, query: &Point<F>, radius: F) -> Result<SearchResult<'_, F>> {
        if radius.is_nan() || radius < F::zero() {
            return Err(VPTreeError::invalid_argument(format!("search radius must be non-negative, got {}", radius)));
        }
        check_finite(query, "query")?;

        let start = Instant::now();
        let mut result = SearchResult::empty();
        if let Some(root) = self.root {
            self.search_level(query, radius, root, &mut result)?;
        }
        result.elapsed = start.elapsed();

        trace!(results = result.len(), visited = result.visited, elapsed = ?result.elapsed, "range search");
        Ok(result)
    }

    fn search_level<'a>(&'a self, query: &Point<F>, radius: F, id: NodeId,
                        result: &mut SearchResult<'a, F>) -> Result<()> {
        let node = &self.nodes[id];
        result.visited += 1;

        let dist = self.metric.distance(query, node.point())?;
        if dist < radius {
            result.points.push(node.point());
        }

        let mu = node.radius().unwrap_or_else(F::zero);
        if let Some(inner) = node.inner() {
            if dist - radius < mu {
                self.search_level(query, radius, inner, result)?;
            }
        }
        if let Some(outer) = node.outer() {
            if dist + radius > mu {
                self.search_level(query, radius, outer, result)?;
            }
        }
        Ok(())
    }

    /// The `k` indexed points closest to `query`, nearest first. Equal
    /// distances are ordered by ascending point id, which also decides
    /// ties at the k-th place.
    ///
    /// An empty tree returns no points. Otherwise `k` must be between 1
    /// and `len()`, or the call fails with `InvalidArgument`.
    pub fn knn_search(&self, query: &Point<F>, k: usize) -> Result<SearchResult<'_, F>> {
        if k == 0 {
            return Err(VPTreeError::invalid_argument("k must be at least 1"));
        }
        check_finite(query, "query")?;
        let root = match self.root {
            Some(root) => root,
            None => return Ok(SearchResult::empty()),
        };
        if k > self.len() {
            return Err(VPTreeError::invalid_argument(format!(
                "k = {} exceeds the {} indexed points", k, self.len())));
        }

        let start = Instant::now();
        let mut heap = BinaryHeap::with_capacity(k);
        let mut visited = 0;
        self.knn_level(query, k, root, &mut heap, &mut visited)?;

        let points = heap.into_sorted_vec().into_iter().map(|e| e.item).collect();
        let result = SearchResult { points, elapsed: start.elapsed(), visited };

        trace!(k, visited, elapsed = ?result.elapsed, "knn search");
        Ok(result)
    }

    /// The single closest point, or `None` for an empty tree.
    pub fn nearest_neighbor(&self, query: &Point<F>) -> Result<Option<&Point<F>>> {
        if self.is_empty() {
            return Ok(None);
        }
        Ok(self.knn_search(query, 1)?.points.pop())
    }

    /// Push the candidates of this subtree onto the heap, replacing
    /// existing further-away elements as necessary.
    fn knn_level<'a>(&'a self, query: &Point<F>, k: usize, id: NodeId,
                     heap: &mut BinaryHeap<HeapElem<'a, F>>, visited: &mut usize) -> Result<()> {
        let node = &self.nodes[id];
        *visited += 1;

        let dist = self.metric.distance(query, node.point())?;
        if dist.is_nan() {
            return Err(VPTreeError::invalid_argument(format!(
                "distance from query to point {} is NaN", node.point().id())));
        }

        let elem = HeapElem::new(dist, node.point());
        if heap.len() < k {
            heap.push(elem);
        } else if let Some(mut worst) = heap.peek_mut() {
            if elem < *worst {
                *worst = elem;
            }
        }

        let mu = node.radius().unwrap_or_else(F::zero);
        let mut children = [(node.inner(), true), (node.outer(), false)];

        // Traverse the outer node first if we're outside the ring.
        if dist > mu {
            children.swap(0, 1);
        }

        for &(child, is_inner) in &children {
            let child = match child {
                Some(child) => child,
                None => continue,
            };
            // Until k candidates are held nothing can be pruned.
            let reachable = match heap.peek() {
                Some(worst) if heap.len() == k => {
                    if is_inner { dist - worst.dist <= mu } else { dist + worst.dist >= mu }
                }
                _ => true,
            };
            if reachable {
                self.knn_level(query, k, child, heap, visited)?;
            }
        }
        Ok(())
    }
}
