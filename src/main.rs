//! Range / k-NN benchmark driver.
//!
//! ```bash
//! vptree --config config.json
//! ```
//!
//! The config names the data and query CSV files, how many data rows to
//! index, the search range, and where to write per-query timings.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use vptree::dataset::{load_points, load_queries};
use vptree::{Point, SearchResult, TreeConfig, VPTree};

#[derive(Parser)]
#[command(name = "vptree")]
#[command(about = "Build a vantage point tree and time range / k-NN queries against it")]
#[command(version)]
struct Cli {
    /// Path to the JSON config file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,
}

#[derive(Debug, Deserialize)]
struct DriverConfig {
    data_path: PathBuf,
    query_path: PathBuf,
    save_path: PathBuf,
    /// Index at most this many data rows
    n: Option<usize>,
    range: f32,
    /// Also run a k-NN search per query
    k: Option<usize>,
    #[serde(flatten)]
    tree: TreeConfig,
}

struct QueryTiming {
    range: (u128, usize),
    knn: Option<(u128, Vec<u64>)>,
}

fn timing(result: &SearchResult<'_>) -> (u128, usize) {
    (result.elapsed.as_micros(), result.len())
}

fn read_config(path: &Path) -> anyhow::Result<DriverConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("reading config {:?}", path))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {:?}", path))
}

fn save_results(path: &Path, results: &[QueryTiming], with_knn: bool) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
    let mut out = BufWriter::new(file);

    if with_knn {
        writeln!(out, "time,n_result,knn_time,knn_ids")?;
    } else {
        writeln!(out, "time,n_result")?;
    }
    for r in results {
        write!(out, "{},{}", r.range.0, r.range.1)?;
        if let Some((time, ids)) = &r.knn {
            let ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
            write!(out, ",{},{}", time, ids.join(" "))?;
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = read_config(&cli.config)?;

    tracing::info!("Loading data from {:?}", config.data_path);
    let points: Vec<Point> = load_points(&config.data_path, config.n)?;
    let queries: Vec<Point> = load_queries(&config.query_path)?;
    tracing::info!("Loaded {} points and {} queries", points.len(), queries.len());

    let tree = VPTree::build(points, &config.tree)?;
    tracing::info!(
        "complete: build ({} points, depth {}, {} distance)",
        tree.len(),
        tree.depth(),
        tree.metric()
    );

    let mut results = Vec::with_capacity(queries.len());
    for query in &queries {
        let range = timing(&tree.range_search(query, config.range)?);
        let knn = match config.k {
            Some(k) => {
                let r = tree.knn_search(query, k)?;
                Some((r.elapsed.as_micros(), r.ids()))
            }
            None => None,
        };
        results.push(QueryTiming { range, knn });
    }

    save_results(&config.save_path, &results, config.k.is_some())?;
    tracing::info!("Wrote {} results to {:?}", results.len(), config.save_path);
    Ok(())
}
