//! Error types for the pipeline engine

use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur in pipeline operations
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Lead not found
    #[error("lead not found: {id}")]
    LeadNotFound { id: String },

    /// Column not found
    #[error("column not found: {id}")]
    ColumnNotFound { id: String },

    /// Column count would leave the 1..=10 range
    #[error("capacity exceeded: {message}")]
    CapacityExceeded { message: String },

    /// Required field missing or malformed
    #[error("invalid value for {field}: {message}")]
    Validation { field: String, message: String },

    /// Import content unreadable or without usable records
    #[error("import failed: {message}")]
    ImportParse { message: String },

    /// A drag gesture is already active
    #[error("a drag gesture is already in progress")]
    DragInProgress,

    /// Lock is held by another process
    #[error("lock busy - another operation in progress")]
    LockBusy,

    /// The storage backend refused a write
    #[error("storage is read-only")]
    ReadOnly,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl PipelineError {
    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a capacity error
    pub fn capacity(message: impl Into<String>) -> Self {
        Self::CapacityExceeded {
            message: message.into(),
        }
    }

    /// Create an import error
    pub fn import_parse(message: impl Into<String>) -> Self {
        Self::ImportParse {
            message: message.into(),
        }
    }

    /// Whether the error names a missing lead or column
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::LeadNotFound { .. } | Self::ColumnNotFound { .. })
    }

    /// Short, user-facing wording for transient notifications
    pub fn summary(&self) -> &'static str {
        match self {
            Self::LeadNotFound { .. } => "Lead not found",
            Self::ColumnNotFound { .. } => "Column not found",
            Self::CapacityExceeded { .. } => "Column limit reached",
            Self::Validation { .. } => "Invalid data",
            Self::ImportParse { .. } | Self::Csv(_) => "Could not process file",
            Self::DragInProgress => "Another drag is in progress",
            Self::LockBusy | Self::ReadOnly | Self::Io(_) | Self::Json(_) => "Storage error",
        }
    }
}
