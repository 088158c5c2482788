//! Storage-failure classification.
//!
//! Every repository path funnels driver errors through [`classify_error`],
//! so callers only ever see the closed [`RepoError`] taxonomy.

use std::fmt;

use domain::{ErrorKind, RepoError};
use sqlx::error::DatabaseError;
use tracing::{debug, warn};

/// Postgres `invalid_text_representation`, raised for unknown enum labels.
const PG_INVALID_TEXT_REPRESENTATION: &str = "22P02";

/// The kind of statement that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Insert,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Insert => write!(f, "insert"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Map a driver failure to its domain kind.
///
/// Unrecognized failures default to `PersistenceFailed`.
pub fn classify(op: Operation, err: &sqlx::Error) -> ErrorKind {
    match op {
        Operation::Read => match err {
            sqlx::Error::RowNotFound => ErrorKind::NotFound,
            _ => ErrorKind::PersistenceFailed,
        },
        Operation::Insert => match err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => ErrorKind::Duplicate,
            sqlx::Error::Database(db_err) if is_enum_violation(&**db_err) => {
                ErrorKind::EnumValue
            }
            _ => ErrorKind::PersistenceFailed,
        },
        Operation::Update => ErrorKind::UpdateFailed,
        Operation::Delete => ErrorKind::DeleteFailed,
    }
}

/// Classify `err` and keep its description as context.
pub fn classify_error(op: Operation, err: sqlx::Error) -> RepoError {
    debug!(%op, error = ?err, "storage operation failed");
    let kind = classify(op, &err);
    if kind != ErrorKind::NotFound {
        warn!(%op, %kind, "storage failure: {err}");
    }
    kind.with_context(err.to_string())
}

/// Suffix that marks a CHECK constraint as an enumeration's allowed set.
pub const ENUM_CONSTRAINT_SUFFIX: &str = "_enum";

// Enumerations are text columns constrained to their allowed set by a CHECK
// named `<relation>_<column>_enum`; other CHECKs are ordinary failures.
// Native Postgres enums reject a stray label with 22P02 instead.
fn is_enum_violation(err: &dyn DatabaseError) -> bool {
    if err.code().as_deref() == Some(PG_INVALID_TEXT_REPRESENTATION) {
        return true;
    }
    if !err.is_check_violation() {
        return false;
    }
    // Postgres reports the constraint name; SQLite only names it in the
    // message ("CHECK constraint failed: <name>").
    match err.constraint() {
        Some(name) => name.ends_with(ENUM_CONSTRAINT_SUFFIX),
        None => err.message().trim_end().ends_with(ENUM_CONSTRAINT_SUFFIX),
    }
}
