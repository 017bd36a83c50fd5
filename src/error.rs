//! Error types for toolbelt
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, invalid input, bad config)
//! - 3: Not found (contact or task lookup missed)
//! - 4: Operation failed (I/O, corrupt state, lock timeout)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the toolbelt CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const NOT_FOUND: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for toolbelt operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    InvalidPasswordLength(String),

    #[error("Please select at least one character type")]
    NoCharacterClasses,

    #[error("password generation gave up after {attempts} attempts; relax the class requirements or raise password.max_attempts")]
    GenerationExhausted { attempts: u32 },

    #[error("Title is required!")]
    TitleRequired,

    // Not found (exit code 3)
    #[error("Contact '{0}' not found.")]
    ContactNotFound(String),

    #[error("No task at position {position} (list has {len})")]
    TaskNotFound { position: usize, len: usize },

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Corrupt state file {path}: {reason}")]
    CorruptState { path: PathBuf, reason: String },

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::InvalidPasswordLength(_)
            | Error::NoCharacterClasses
            | Error::GenerationExhausted { .. }
            | Error::TitleRequired => exit_codes::USER_ERROR,

            // Lookups
            Error::ContactNotFound(_) | Error::TaskNotFound { .. } => exit_codes::NOT_FOUND,

            // Operation failures
            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::CorruptState { .. }
            | Error::LockFailed(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured fields for the JSON error envelope, where the variant has any.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::InvalidConfig(message) => Some(serde_json::json!({ "message": message })),
            Error::GenerationExhausted { attempts } => {
                Some(serde_json::json!({ "attempts": attempts }))
            }
            Error::ContactNotFound(name) => Some(serde_json::json!({ "name": name })),
            Error::TaskNotFound { position, len } => {
                Some(serde_json::json!({ "position": position, "len": len }))
            }
            Error::CorruptState { path, reason } => Some(serde_json::json!({
                "path": path.display().to_string(),
                "reason": reason,
            })),
            Error::LockFailed(path) => {
                Some(serde_json::json!({ "path": path.display().to_string() }))
            }
            _ => None,
        }
    }
}

/// Result type alias for toolbelt operations
pub type Result<T> = std::result::Result<T, Error>;
