//! Error types for the edges of the crate (config, input parsing, sessions).
//!
//! The detector itself never fails; see `EyeBlinkDetector::update`.

/// Errors raised outside the per-frame detection path
#[derive(Debug, thiserror::Error)]
pub enum BlinkError {
    /// Configuration value out of its domain
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for `DetectorConfig`
    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Replay input line is neither an eye sample nor a face frame
    #[error("Malformed input on line {line}: {source}")]
    FrameParse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Reading replay input failed
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// No session with this id
    #[error("Session not found: {0}")]
    SessionNotFound(String),
}

pub type Result<T> = std::result::Result<T, BlinkError>;
