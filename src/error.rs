use thiserror::Error;

/// How loudly a failure should be surfaced to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Error)]
pub enum CropError {
    #[error("Not a valid image")]
    InvalidInput,

    #[error("failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("{0}")]
    Network(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("no image loaded")]
    NoImage,

    #[error("cannot allocate a {width}x{height} drawing surface")]
    Surface { width: u32, height: u32 },

    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl CropError {
    pub fn severity(&self) -> Severity {
        match self {
            CropError::InvalidInput => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

pub type Result<T> = std::result::Result<T, CropError>;
