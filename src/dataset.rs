//! Plain CSV point files: one point per row, comma-separated floats, no
//! header. Row `i` (counting only non-blank rows) becomes point id `i`.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use crate::error::{Result, VPTreeError};
use crate::point::{Point, PointId, Scalar};

/// Read at most `limit` points from `path`, or all of them for `None`.
pub fn load_points<F, P>(path: P, limit: Option<usize>) -> Result<Vec<Point<F>>>
    where F: Scalar + FromStr, P: AsRef<Path> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| VPTreeError::Io { path: path.to_path_buf(), source })?;
    read_points(BufReader::new(file), path, limit)
}

/// Read every point in `path`.
pub fn load_queries<F, P>(path: P) -> Result<Vec<Point<F>>>
    where F: Scalar + FromStr, P: AsRef<Path> {
    load_points(path, None)
}

/// Parse points from any buffered reader. `path` is only used in errors.
pub fn read_points<F, R>(reader: R, path: &Path, limit: Option<usize>) -> Result<Vec<Point<F>>>
    where F: Scalar + FromStr, R: BufRead {
    let limit = limit.unwrap_or(usize::MAX);
    let mut points = Vec::new();

    for (lineno, line) in reader.lines().enumerate() {
        if points.len() >= limit {
            break;
        }
        let line = line.map_err(|source| VPTreeError::Io { path: path.to_path_buf(), source })?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let vector = line
            .split(',')
            .map(|field| {
                let field = field.trim();
                field.parse::<F>().map_err(|_| VPTreeError::Parse {
                    path: path.to_path_buf(),
                    line: lineno + 1,
                    message: format!("not a number: {:?}", field),
                })
            })
            .collect::<Result<Vec<F>>>()?;

        points.push(Point::new(points.len() as PointId, vector));
    }
    Ok(points)
}
