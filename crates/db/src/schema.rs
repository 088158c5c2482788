//! Row schemas: the per-entity description the generic layer works from.
//!
//! A row struct decodes itself with `sqlx::FromRow` and describes its
//! columns for writes through [`RowSchema::columns`].  Implementations build
//! that list by destructuring the row without `..`, so a field added to the
//! struct without a matching descriptor fails to compile.

use chrono::{DateTime, Utc};
use sqlx::query::Query;
use sqlx::FromRow;

use crate::{Db, DbArguments, DbRow};

/// A single bound value, typed by column kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<'a> {
    Text(&'a str),
    NullableText(Option<&'a str>),
    Int(i32),
    BigInt(i64),
    Timestamp(DateTime<Utc>),
}

impl<'a> Value<'a> {
    /// Append this value as the next positional argument of `query`.
    pub(crate) fn bind<'q>(
        self,
        query: Query<'q, Db, DbArguments<'q>>,
    ) -> Query<'q, Db, DbArguments<'q>>
    where
        'a: 'q,
    {
        match self {
            Self::Text(value) => query.bind(value),
            Self::NullableText(value) => query.bind(value),
            Self::Int(value) => query.bind(value),
            Self::BigInt(value) => query.bind(value),
            Self::Timestamp(value) => query.bind(value),
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a Option<String>> for Value<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Self::NullableText(value.as_deref())
    }
}

impl From<i32> for Value<'_> {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for Value<'_> {
    fn from(value: i64) -> Self {
        Self::BigInt(value)
    }
}

impl From<DateTime<Utc>> for Value<'_> {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

/// A column name paired with the value a row holds for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column<'a> {
    pub name: &'static str,
    pub value: Value<'a>,
}

impl<'a> Column<'a> {
    pub fn new(name: &'static str, value: impl Into<Value<'a>>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// Storage-shaped counterpart of a domain entity.
///
/// Conversions are pure and total: `into_domain(from_domain(e)) == e` for
/// every entity whose ID is already assigned.
pub trait RowSchema: for<'r> FromRow<'r, DbRow> + Send + Sync + Unpin + 'static {
    type Entity: Send + Sync + 'static;

    /// Relation the rows live in.
    const RELATION: &'static str;
    /// Primary-key column.
    const KEY: &'static str = "id";

    const FIND_ALL: &'static str;
    /// Takes the key as `$1`.
    const FIND_BY_ID: &'static str;
    /// Takes the key as `$1`.
    const DELETE_BY_ID: &'static str;

    /// Ordered column descriptors, key included.
    fn columns(&self) -> Vec<Column<'_>>;

    /// Populate every column, generating an ID if the entity has none.
    fn from_domain(entity: &Self::Entity) -> Self;

    fn into_domain(self) -> Self::Entity;

    fn id(&self) -> &str;
}
