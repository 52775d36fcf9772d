//! Vantage-point trees for exact range and k-nearest-neighbor search
//! over any metric space.
//!
//! ```
//! use vptree::{Point, TreeConfig, VPTree};
//!
//! let points: Vec<Point> = (0..16)
//!     .map(|id| Point::new(id, vec![(id / 4) as f32, (id % 4) as f32]))
//!     .collect();
//! let tree = VPTree::build(points, &TreeConfig::default()).unwrap();
//!
//! let query = Point::new(100, vec![1.5, 1.5]);
//! assert_eq!(tree.range_search(&query, 1.0).unwrap().len(), 4);
//! ```
extern crate num;
extern crate rand;

pub mod config;
pub mod dataset;
mod error;
pub mod metric;
pub mod node;
pub mod point;
pub mod vptree;

pub use config::TreeConfig;
pub use error::{Result, VPTreeError};
pub use metric::Distance;
pub use node::{Node, NodeId};
pub use point::{Point, PointId, Scalar};
pub use vptree::{SearchResult, VPTree};
