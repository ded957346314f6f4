use thiserror::Error;

pub type Result<T, E = EstimateError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum EstimateError {
    /// State code with no entry in the state table.
    #[error("unrecognized location: `{0}`")]
    UnrecognizedLocation(String),

    #[error("elevation grid of {rows}x{cols} needs {} samples, got {len}", .rows * .cols)]
    InvalidElevationGrid {
        rows: usize,
        cols: usize,
        len: usize,
    },

    #[error("elevation sample {index} is not finite")]
    NonFiniteElevation { index: usize },

    #[error("failed to parse assumptions")]
    Assumptions(#[from] toml::de::Error),
}
