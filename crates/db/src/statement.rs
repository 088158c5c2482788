//! Generic INSERT / UPDATE construction from column descriptors.
//!
//! Statement text contains only quoted identifiers from static descriptors
//! and `$n` placeholders.  Values are always bound, never interpolated.

use sqlx::query::Query;

use crate::schema::{Column, RowSchema};
use crate::{Db, DbArguments};

/// A parameterized statement and its bindings in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement<'a> {
    sql: String,
    bindings: Vec<Column<'a>>,
}

impl<'a> Statement<'a> {
    /// `INSERT INTO "relation" ("c1", ...) VALUES ($1, ...)`, binding every column.
    ///
    /// # Panics
    ///
    /// If `columns` is empty; that is a broken schema, not a runtime condition.
    pub fn insert(relation: &str, columns: Vec<Column<'a>>) -> Self {
        assert!(
            !columns.is_empty(),
            "row schema for {relation} declares no columns"
        );

        let names = columns
            .iter()
            .map(|column| quote_ident(column.name))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=columns.len())
            .map(|n| format!("${n}"))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            sql: format!(
                "INSERT INTO {} ({names}) VALUES ({placeholders})",
                quote_ident(relation)
            ),
            bindings: columns,
        }
    }

    /// `UPDATE "relation" SET "c2" = $1, ... WHERE "key" = $n`.
    ///
    /// Every non-key column is bound in order, then the key last.
    ///
    /// # Panics
    ///
    /// If `key` is not among `columns` or is the only column.
    pub fn update(relation: &str, key: &str, columns: Vec<Column<'a>>) -> Self {
        let (keys, mut bindings): (Vec<_>, Vec<_>) =
            columns.into_iter().partition(|column| column.name == key);
        let key_column = match keys.as_slice() {
            [only] => *only,
            _ => panic!("row schema for {relation} must declare key column {key} exactly once"),
        };
        assert!(
            !bindings.is_empty(),
            "row schema for {relation} has no columns besides its key"
        );

        let assignments = bindings
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{} = ${}", quote_ident(column.name), i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let key_placeholder = bindings.len() + 1;
        bindings.push(key_column);

        Self {
            sql: format!(
                "UPDATE {} SET {assignments} WHERE {} = ${key_placeholder}",
                quote_ident(relation),
                quote_ident(key)
            ),
            bindings,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Named bindings; the n-th entry fills placeholder `$n`.
    pub fn bindings(&self) -> &[Column<'a>] {
        &self.bindings
    }

    /// An executable sqlx query with every binding applied.
    pub fn query(&self) -> Query<'_, Db, DbArguments<'_>> {
        self.bindings
            .iter()
            .fold(sqlx::query(&self.sql), |query, column| {
                column.value.bind(query)
            })
    }
}

/// INSERT for every column of `row`.
pub fn insert_statement<R: RowSchema>(row: &R) -> Statement<'_> {
    Statement::insert(R::RELATION, row.columns())
}

/// UPDATE of every non-key column of `row`, keyed by [`RowSchema::KEY`].
pub fn update_statement<R: RowSchema>(row: &R) -> Statement<'_> {
    Statement::update(R::RELATION, R::KEY, row.columns())
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
