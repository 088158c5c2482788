//! `db` crate: the SQL persistence adapter.
//!
//! Maps domain entities to rows and back, builds parameterized write
//! statements from per-row column descriptors, and classifies every driver
//! failure into the closed [`domain::RepoError`] taxonomy.  No business
//! logic lives here.
//!
//! The backend is chosen at compile time: SQLite by default, PostgreSQL with
//! the `postgres` feature.

pub mod classify;
pub mod error;
pub mod models;
pub mod pool;
pub mod repository;
pub mod schema;
pub mod statement;
pub mod table;

#[cfg(all(test, not(feature = "postgres")))]
mod testing;
#[cfg(all(test, not(feature = "postgres")))]
mod scenario_tests;

pub use classify::{classify, classify_error, Operation};
pub use error::DbError;
pub use pool::{create_pool, DbPool, PoolConfig};
pub use repository::{
    SqlCertificateRepository, SqlReviewRepository, SqlSchoolRepository, SqlUserRepository,
};
pub use schema::{Column, RowSchema, Value};
pub use statement::Statement;
pub use table::Table;

/// The sqlx driver every statement runs against.
#[cfg(feature = "postgres")]
pub type Db = sqlx::Postgres;

/// The sqlx driver every statement runs against.
#[cfg(not(feature = "postgres"))]
pub type Db = sqlx::Sqlite;

/// A row as returned by the active driver.
pub type DbRow = <Db as sqlx::Database>::Row;

/// Bound arguments for the active driver.
pub type DbArguments<'q> = <Db as sqlx::Database>::Arguments<'q>;
