use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while building or querying a tree.
#[derive(Error, Debug)]
pub enum VPTreeError {
    /// The distance function name is not one of the registered metrics.
    #[error("unknown distance function {name:?}")]
    Configuration { name: String },

    /// Two points with vectors of different lengths were compared.
    #[error("dimension mismatch: {left} != {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A dataset row that does not parse as a list of floats.
    #[error("{path:?}, line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

impl VPTreeError {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        VPTreeError::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, VPTreeError>;

#[cfg(test)]
mod tests {
    use super::VPTreeError;

    #[test]
    fn display() {
        let err = VPTreeError::Configuration { name: "hamming".into() };
        assert_eq!(err.to_string(), "unknown distance function \"hamming\"");

        let err = VPTreeError::DimensionMismatch { left: 2, right: 3 };
        assert_eq!(err.to_string(), "dimension mismatch: 2 != 3");

        let err = VPTreeError::invalid_argument("k must be positive");
        assert_eq!(err.to_string(), "invalid argument: k must be positive");
    }
}
