use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreviewError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("unknown {category} operation: {operation}")]
    UnknownOperation { category: String, operation: String },
    #[error("missing parameter: {0}")]
    MissingParam(String),
    #[error("invalid parameter {name}: {reason}")]
    InvalidParam { name: String, reason: String },
}

impl PreviewError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParam {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
