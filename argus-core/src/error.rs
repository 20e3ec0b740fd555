use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("image fetch failed: {0}")]
    Fetch(String),

    #[error("image decode failed: {0}")]
    Decode(String),

    #[error("model load failed: {0}")]
    ModelLoad(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error was caused by the caller's input (bad URL,
    /// unreachable host, undecodable bytes) rather than by this service.
    /// Transports map this to 400 / `INVALID_ARGUMENT`; everything else
    /// maps to 500 / `INTERNAL`.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_) | Error::Fetch(_) | Error::Decode(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
