use thiserror::Error;

/// Top-level error type used across the entire application.
///
/// The analytics core itself never fails; these variants cover the
/// collaborators around it (config, sample sources, persistence sinks).
#[derive(Debug, Error)]
pub enum ChronosError {
    #[error("config error: {0}")]
    Config(String),

    #[error("sample source error: {0}")]
    Source(String),

    #[error("sink error: {0}")]
    Sink(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = ChronosError> = std::result::Result<T, E>;
