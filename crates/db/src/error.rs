//! Bootstrap errors for the db crate.
//!
//! Repository operations never return these; they return
//! [`domain::RepoError`].  `DbError` only covers connecting to the store.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("invalid pool configuration: {0}")]
    Config(String),
}
