use thiserror::Error;

/// Failure while rendering one subtree. The serializer turns these into an
/// inline `{error:"..."}` marker instead of aborting the whole render.
#[derive(Debug, Clone, Error)]
pub enum UnpackError {
    /// A single field could not be read.
    #[error("cannot read field `{field}`: {reason}")]
    FieldAccess { field: String, reason: String },
    /// The value's data is not available (released, not yet loaded, ...).
    #[error("{0}")]
    Unavailable(String),
    /// A registered formatter rejected its input.
    #[error("{type_name}: {message}")]
    Formatter { type_name: String, message: String },
    #[error("{0}")]
    Other(String),
}

impl UnpackError {
    pub fn field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        UnpackError::FieldAccess {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn formatter(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        UnpackError::Formatter {
            type_name: type_name.into(),
            message: message.into(),
        }
    }
}

/// Failure delivering a log entry to a sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("log file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("display surface not ready")]
    SurfaceNotReady,
    #[error("display error: {0}")]
    Display(String),
}
