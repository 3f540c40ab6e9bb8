use thiserror::Error;

/// Errors produced by the upload-to-diagnosis pipeline.
#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("unsupported file extension for \"{0}\"")]
    UnsupportedExtension(String),

    #[error("preprocessing error: {0}")]
    Preprocessing(String),

    #[error("model error: {0}")]
    Model(#[from] tch::TchError),

    #[error("predicted class {0} has no diagnosis entry")]
    ClassOutOfRange(usize),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, InferenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = InferenceError::ClassOutOfRange(9);
        assert_eq!(err.to_string(), "predicted class 9 has no diagnosis entry");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: InferenceError = io_err.into();
        assert!(matches!(err, InferenceError::Io(_)));
    }
}
