use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Source not found: {0}")]
    NotFound(String),

    /// Platform media failure carrying the engine's diagnostic code.
    #[error("Media error [{code}]: {detail}")]
    Media { code: String, detail: String },

    #[error("Host surface disconnected")]
    Disconnected,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Build a [`BridgeError::Media`] from a code and detail message.
    pub fn media(code: impl Into<String>, detail: impl Into<String>) -> Self {
        BridgeError::Media {
            code: code.into(),
            detail: detail.into(),
        }
    }

    /// Short machine-readable code for this error.
    pub fn code(&self) -> &str {
        match self {
            BridgeError::NotAvailable(_) => "not_available",
            BridgeError::OperationFailed(_) => "operation_failed",
            BridgeError::NotFound(_) => "not_found",
            BridgeError::Media { code, .. } => code,
            BridgeError::Disconnected => "disconnected",
            BridgeError::Io(_) => "io",
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
