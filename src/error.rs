//! Error types for ActionKV
//!
//! Two layers of errors:
//! - [`ActionError`]: raised by a value while dispatching one of its actions.
//!   It knows the type and action, but not the key.
//! - [`KvError`]: raised by the store, registry and codecs. Action failures are
//!   wrapped together with the key they happened on.
//!
//! [`KvError::kind`] flattens both layers into one [`ErrorKind`] for callers
//! that only want to branch on the failure class.

use thiserror::Error;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Errors raised while dispatching an action on a single value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("Unknown action {action:?} for type {type_id:?}")]
    UnknownAction { type_id: String, action: String },

    #[error("Invalid argument for {action:?}: {reason}")]
    InvalidArgument { action: String, reason: String },

    #[error("Action {action:?} failed: {reason}")]
    Operation { action: String, reason: String },
}

impl ActionError {
    pub fn invalid_argument(action: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            action: action.to_string(),
            reason: reason.into(),
        }
    }

    pub fn operation(action: &str, reason: impl Into<String>) -> Self {
        Self::Operation {
            action: action.to_string(),
            reason: reason.into(),
        }
    }
}

/// Unified error type for ActionKV operations
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // Key Errors
    // -------------------------------------------------------------------------
    #[error("Key not found: {key:?}")]
    KeyNotFound { key: String },

    #[error("Key already exists: {key:?}")]
    KeyExists { key: String },

    #[error("Invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    // -------------------------------------------------------------------------
    // Type Registry Errors
    // -------------------------------------------------------------------------
    #[error("Unknown value type: {type_id:?}")]
    UnknownType { type_id: String },

    #[error("Value type already registered: {type_id:?}")]
    DuplicateType { type_id: String },

    #[error("Key {key:?} holds type {found:?}, expected {expected:?}")]
    TypeMismatch {
        key: String,
        expected: String,
        found: String,
    },

    // -------------------------------------------------------------------------
    // Action Errors
    // -------------------------------------------------------------------------
    #[error("Action on key {key:?} failed: {source}")]
    Action {
        key: String,
        #[source]
        source: ActionError,
    },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Codec error: {0}")]
    Codec(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Binary encoding error: {0}")]
    Bincode(#[from] bincode::Error),

    // -------------------------------------------------------------------------
    // Programming Defects
    // -------------------------------------------------------------------------
    /// A type provider broke a protocol invariant. Not a caller-input error.
    #[error("Invariant violated: {0}")]
    Invariant(String),
}

/// Flat failure classes, one per precondition the core checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    KeyNotFound,
    KeyExists,
    InvalidKey,
    UnknownType,
    DuplicateType,
    TypeMismatch,
    UnknownAction,
    InvalidArgument,
    Operation,
    Codec,
    Invariant,
}

impl KvError {
    /// Classify the error, looking through wrapped action errors
    pub fn kind(&self) -> ErrorKind {
        match self {
            KvError::KeyNotFound { .. } => ErrorKind::KeyNotFound,
            KvError::KeyExists { .. } => ErrorKind::KeyExists,
            KvError::InvalidKey { .. } => ErrorKind::InvalidKey,
            KvError::UnknownType { .. } => ErrorKind::UnknownType,
            KvError::DuplicateType { .. } => ErrorKind::DuplicateType,
            KvError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            KvError::Action { source, .. } => match source {
                ActionError::UnknownAction { .. } => ErrorKind::UnknownAction,
                ActionError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
                ActionError::Operation { .. } => ErrorKind::Operation,
            },
            KvError::Codec(_) | KvError::Json(_) | KvError::Bincode(_) => ErrorKind::Codec,
            KvError::Invariant(_) => ErrorKind::Invariant,
        }
    }

    /// True for errors that indicate a defect in a type provider
    pub fn is_fatal(&self) -> bool {
        matches!(self, KvError::Invariant(_))
    }

    pub(crate) fn key_not_found(key: &str) -> Self {
        KvError::KeyNotFound {
            key: key.to_string(),
        }
    }

    pub(crate) fn unknown_type(type_id: &str) -> Self {
        KvError::UnknownType {
            type_id: type_id.to_string(),
        }
    }
}
