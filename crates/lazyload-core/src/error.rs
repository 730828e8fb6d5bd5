use thiserror::Error;

/// Why a fetch failed. Callers only ever see the job's error callback; the
/// cause is logged.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Empty image source")]
    EmptySource,

    #[error("Source {0} escapes the image root")]
    OutsideRoot(String),

    #[error("Failed to read {src}: {source}")]
    Io {
        src: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read image header of {src}: {reason}")]
    Decode { src: String, reason: String },

    #[error("Fetch cancelled")]
    Cancelled,
}

pub type FetchResult<T> = Result<T, FetchError>;
