//! The closed error taxonomy returned by every repository operation.

use std::fmt;

use thiserror::Error;

/// The dimension callers branch on.
///
/// Every storage failure is classified into exactly one of these; raw
/// driver errors never cross the repository boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A read matched no row.
    NotFound,
    /// A write violated a uniqueness constraint.
    Duplicate,
    /// A write used a value outside an enumerated column's allowed set.
    EnumValue,
    /// The update statement itself failed.
    UpdateFailed,
    /// The delete statement itself failed.
    DeleteFailed,
    /// Any other storage-level failure.
    PersistenceFailed,
}

impl ErrorKind {
    /// Attach the underlying failure's description.
    pub fn with_context(self, context: impl Into<String>) -> RepoError {
        let context = context.into();
        match self {
            Self::NotFound => RepoError::NotFound(context),
            Self::Duplicate => RepoError::Duplicate(context),
            Self::EnumValue => RepoError::EnumValue(context),
            Self::UpdateFailed => RepoError::UpdateFailed(context),
            Self::DeleteFailed => RepoError::DeleteFailed(context),
            Self::PersistenceFailed => RepoError::PersistenceFailed(context),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotFound => "not_found",
            Self::Duplicate => "duplicate",
            Self::EnumValue => "enum_value",
            Self::UpdateFailed => "update_failed",
            Self::DeleteFailed => "delete_failed",
            Self::PersistenceFailed => "persistence_failed",
        };
        f.write_str(name)
    }
}

/// Errors returned by repository operations.
///
/// The storage variants carry the driver's message for diagnostics.
/// `Cancelled` and `DeadlineExceeded` come from the caller's
/// [`RequestScope`](crate::RequestScope), never from the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoError {
    #[error("entity does not exist: {0}")]
    NotFound(String),

    #[error("entity already exists: {0}")]
    Duplicate(String),

    #[error("invalid enumeration value: {0}")]
    EnumValue(String),

    #[error("update failed: {0}")]
    UpdateFailed(String),

    #[error("delete failed: {0}")]
    DeleteFailed(String),

    #[error("persistence failed: {0}")]
    PersistenceFailed(String),

    #[error("operation cancelled by caller")]
    Cancelled,

    #[error("operation deadline exceeded")]
    DeadlineExceeded,
}

impl RepoError {
    /// The storage classification, or `None` for caller-side interruptions.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::NotFound(_) => Some(ErrorKind::NotFound),
            Self::Duplicate(_) => Some(ErrorKind::Duplicate),
            Self::EnumValue(_) => Some(ErrorKind::EnumValue),
            Self::UpdateFailed(_) => Some(ErrorKind::UpdateFailed),
            Self::DeleteFailed(_) => Some(ErrorKind::DeleteFailed),
            Self::PersistenceFailed(_) => Some(ErrorKind::PersistenceFailed),
            Self::Cancelled | Self::DeadlineExceeded => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// True when the caller's scope, not the store, ended the operation.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}
