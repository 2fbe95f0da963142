use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoadError {
    // Config-related errors
    #[error("Failed to get config directory")]
    ConfigDirNotFound,

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize config: {0}")]
    SerializationFailed(#[from] toml::ser::Error),

    #[error("Failed to deserialize config: {0}")]
    DeserializationFailed(#[from] toml::de::Error),

    #[error("Config file not found at path: {path}")]
    ConfigFileNotFound { path: PathBuf },

    #[error("Invalid road configuration: {reason}")]
    InvalidConfig { reason: String },

    // Grid-related errors
    #[error("Invalid grid data: {reason}")]
    InvalidGridData { reason: String },

    #[error("Grid file not found at path: {path}")]
    GridFileNotFound { path: PathBuf },

    #[error("Corrupted grid file: {reason}")]
    CorruptedGridFile { reason: String },

    #[error("Failed to decode heightmap image: {0}")]
    Image(#[from] image::ImageError),

    // Search and carving errors
    #[error("Dequeue called on an empty frontier")]
    EmptyQueue,

    #[error("Coordinate ({x}, {y}) is outside the {width}x{height} grid")]
    CoordinateOutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
}

/// Result type alias for all operations
pub type RoadResult<T> = Result<T, RoadError>;
