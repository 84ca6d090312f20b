use std::fmt;
use thiserror::Error;

/// One failed attempt in the decoder fallback chain
#[derive(Debug, Clone)]
pub struct StageFailure {
    pub stage: String,
    pub detail: String,
}

/// No decoder in the fallback chain could parse the input
#[derive(Debug, Clone)]
pub struct DecodeError {
    /// Filename hint supplied by the caller, if any
    pub filename: Option<String>,
    /// Diagnostics from each attempted stage, in attempt order
    pub attempts: Vec<StageFailure>,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unsupported or unreadable audio file. File: {:?}. Decoder detail:",
            self.filename
        )?;
        for attempt in &self.attempts {
            write!(f, "\n  {}: {}", attempt.stage, attempt.detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for DecodeError {}

/// History could not be read or written
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to read history from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse history in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write history to {path}: {detail}")]
    Write { path: String, detail: String },
}

#[derive(Debug, Error)]
pub enum WellnessError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Decoded audio contains no usable samples")]
    EmptyAudio,

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl WellnessError {
    /// Whether the failure was caused by the submitted audio rather than the service
    pub fn is_input_error(&self) -> bool {
        matches!(self, WellnessError::Decode(_) | WellnessError::EmptyAudio)
    }
}

pub type Result<T, E = WellnessError> = std::result::Result<T, E>;
