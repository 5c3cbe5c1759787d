use thiserror::Error;

#[derive(Error, Debug)]
pub enum CourseMapError {
    #[error("{what} index {index} is out of range (have {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Invalid label: {0}")]
    InvalidLabel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Logging error: {0}")]
    Logging(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl CourseMapError {
    pub fn out_of_range(what: &'static str, index: usize, len: usize) -> Self {
        CourseMapError::IndexOutOfRange { what, index, len }
    }
}

pub type Result<T> = std::result::Result<T, CourseMapError>;
