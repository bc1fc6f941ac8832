//! Error types for the qgrid crate

use thiserror::Error;

/// Main error type for the qgrid crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid grid size {width}x{height} (each dimension must be in {min}..={max})")]
    InvalidGridSize {
        width: u32,
        height: u32,
        min: u32,
        max: u32,
    },

    #[error("cell ({x}, {y}) is blocked or out of bounds")]
    InvalidCell { x: i32, y: i32 },

    #[error("episode step limit must be positive")]
    InvalidStepLimit,

    #[error("invalid value {value} for {name} (expected 0.0-1.0)")]
    InvalidHyperparameter { name: &'static str, value: f32 },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("table file is truncated: needed {needed} bytes, found {found}")]
    TruncatedTable { needed: usize, found: usize },

    #[error("table header declares invalid dimensions {width}x{height}")]
    InvalidTableHeader { width: i32, height: i32 },

    #[error(
        "loaded table is {table_width}x{table_height} but the environment is {env_width}x{env_height}"
    )]
    DimensionMismatch {
        table_width: u32,
        table_height: u32,
        env_width: u32,
        env_height: u32,
    },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
