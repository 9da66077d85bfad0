use thiserror::Error;

/// Any failure between building the intake URL and getting a 2xx back.
///
/// These never escape as panics: the emitter logs them once and hands them
/// back so the host can map them to an advisory failure.
#[derive(Error, Debug)]
pub enum TransmissionError {
    #[error("invalid intake URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to serialize event: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("intake returned HTTP {0}")]
    Status(u16),

    #[error("{0}")]
    Transport(String),
}
