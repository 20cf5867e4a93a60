use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("no camera device available")]
    NoDevice,

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("a still image is displayed; retake before capturing")]
    StillDisplayed,

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CaptureError {
    pub fn unsupported(msg: impl Into<String>) -> Self {
        CaptureError::UnsupportedFormat(msg.into())
    }
}
