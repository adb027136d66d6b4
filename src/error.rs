use std::path::PathBuf;

use thiserror::Error;

/// Construction-time failures. Nothing in the per-frame path returns these.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("grid size must be positive")]
    EmptyGrid,
    #[error("grid rows must be square: row {row} has {len} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("screen {0} must be positive")]
    ZeroScreen(&'static str),
    #[error("cell size must be finite and positive, got {0}")]
    CellSize(f32),
    #[error("field of view must lie in (0, 180) degrees, got {0}")]
    FieldOfView(f32),
    #[error("wall probability must lie in [0, 1], got {0}")]
    WallProbability(f64),
    #[error("height scale must be finite and positive, got {0}")]
    HeightScale(f32),
    #[error("map scale must be finite and positive, got {0}")]
    MapScale(f32),
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
