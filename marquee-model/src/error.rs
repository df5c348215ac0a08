use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug)]
pub enum ModelError {
    InvalidContentId(String),
    InvalidSource(String),
    Url(url::ParseError),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidContentId(msg) => {
                write!(f, "invalid content id: {msg}")
            }
            ModelError::InvalidSource(msg) => write!(f, "invalid source: {msg}"),
            ModelError::Url(err) => write!(f, "url error: {err}"),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Url(err) => Some(err),
            ModelError::InvalidContentId(_) | ModelError::InvalidSource(_) => {
                None
            }
        }
    }
}

impl From<url::ParseError> for ModelError {
    fn from(err: url::ParseError) -> Self {
        ModelError::Url(err)
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
