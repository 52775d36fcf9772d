//! Tree construction settings.
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metric::Distance;

pub const DEFAULT_SEED: u64 = 42;

/// Which distance function to build with, and the seed for vantage point
/// selection.
///
/// The distance is kept as a name so that configuration files can be
/// loaded before the name is validated; it is resolved by
/// [`TreeConfig::metric`] when the tree is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub distance: String,
    pub random_seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            distance: Distance::default().name().to_string(),
            random_seed: DEFAULT_SEED,
        }
    }
}

impl TreeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_distance(mut self, name: impl Into<String>) -> Self {
        self.distance = name.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    /// Resolve the configured distance name.
    pub fn metric(&self) -> Result<Distance> {
        self.distance.parse()
    }
}
