//! The generic CRUD engine shared by every entity repository.
//!
//! `Table<R>` implements [`Repository`] once for any [`RowSchema`]; entity
//! repositories are type aliases over it plus their own lookups.

use std::marker::PhantomData;

use async_trait::async_trait;
use domain::{Id, RepoError, Repository, RequestScope};
use sqlx::FromRow;
use tracing::{debug, instrument};

use crate::classify::{classify_error, Operation};
use crate::schema::RowSchema;
use crate::statement::{insert_statement, update_statement};
use crate::{Db, DbPool, DbRow};

/// Stateless handle over one relation.  Cloning shares the pool.
pub struct Table<R> {
    pool: DbPool,
    _row: PhantomData<fn() -> R>,
}

impl<R> Clone for Table<R> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _row: PhantomData,
        }
    }
}

impl<R> std::fmt::Debug for Table<R>
where
    R: RowSchema,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("relation", &R::RELATION)
            .finish_non_exhaustive()
    }
}

impl<R: RowSchema> Table<R> {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            _row: PhantomData,
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Exactly one row of any shape; `NotFound` when none matches.
    pub(crate) async fn fetch_one_as<T>(&self, sql: &str, args: &[&str]) -> Result<T, RepoError>
    where
        T: for<'r> FromRow<'r, DbRow> + Send + Unpin,
    {
        args.iter()
            .fold(sqlx::query_as::<Db, T>(sql), |query, arg| query.bind(*arg))
            .fetch_one(&self.pool)
            .await
            .map_err(|err| classify_error(Operation::Read, err))
    }

    /// Every matching row of any shape, in storage order.
    pub(crate) async fn fetch_all_as<T>(
        &self,
        sql: &str,
        args: &[&str],
    ) -> Result<Vec<T>, RepoError>
    where
        T: for<'r> FromRow<'r, DbRow> + Send + Unpin,
    {
        args.iter()
            .fold(sqlx::query_as::<Db, T>(sql), |query, arg| query.bind(*arg))
            .fetch_all(&self.pool)
            .await
            .map_err(|err| classify_error(Operation::Read, err))
    }

    pub(crate) async fn find_one(&self, sql: &str, args: &[&str]) -> Result<R::Entity, RepoError> {
        let row: R = self.fetch_one_as(sql, args).await?;
        Ok(row.into_domain())
    }

    pub(crate) async fn find_many(
        &self,
        sql: &str,
        args: &[&str],
    ) -> Result<Vec<R::Entity>, RepoError> {
        let rows: Vec<R> = self.fetch_all_as(sql, args).await?;
        Ok(rows.into_iter().map(RowSchema::into_domain).collect())
    }

    /// Run a fixed statement, classifying failures as `op`.
    pub(crate) async fn execute(
        &self,
        op: Operation,
        sql: &str,
        args: &[&str],
    ) -> Result<u64, RepoError> {
        let result = args
            .iter()
            .fold(sqlx::query::<Db>(sql), |query, arg| query.bind(*arg))
            .execute(&self.pool)
            .await
            .map_err(|err| classify_error(op, err))?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl<R: RowSchema> Repository<R::Entity> for Table<R> {
    #[instrument(skip_all, fields(relation = R::RELATION))]
    async fn find_all(&self, scope: &RequestScope) -> Result<Vec<R::Entity>, RepoError> {
        scope.run(self.find_many(R::FIND_ALL, &[])).await
    }

    #[instrument(skip_all, fields(relation = R::RELATION, id = %id))]
    async fn find_by_id(&self, scope: &RequestScope, id: &Id) -> Result<R::Entity, RepoError> {
        scope
            .run(self.find_one(R::FIND_BY_ID, &[id.as_str()]))
            .await
    }

    #[instrument(skip_all, fields(relation = R::RELATION))]
    async fn create(
        &self,
        scope: &RequestScope,
        entity: &R::Entity,
    ) -> Result<R::Entity, RepoError> {
        scope
            .run(async {
                let row = R::from_domain(entity);
                insert_statement(&row)
                    .query()
                    .execute(&self.pool)
                    .await
                    .map_err(|err| classify_error(Operation::Insert, err))?;
                debug!(id = row.id(), "row inserted");

                // Read back so the caller sees store-computed state.
                self.find_one(R::FIND_BY_ID, &[row.id()]).await
            })
            .await
    }

    #[instrument(skip_all, fields(relation = R::RELATION))]
    async fn update(
        &self,
        scope: &RequestScope,
        entity: &R::Entity,
    ) -> Result<R::Entity, RepoError> {
        scope
            .run(async {
                let row = R::from_domain(entity);
                let result = update_statement(&row)
                    .query()
                    .execute(&self.pool)
                    .await
                    .map_err(|err| classify_error(Operation::Update, err))?;
                // Zero affected rows is not an error here; the read-back
                // reports the missing row.
                debug!(id = row.id(), rows = result.rows_affected(), "row updated");

                self.find_one(R::FIND_BY_ID, &[row.id()]).await
            })
            .await
    }

    #[instrument(skip_all, fields(relation = R::RELATION, id = %id))]
    async fn delete(&self, scope: &RequestScope, id: &Id) -> Result<(), RepoError> {
        scope
            .run(async {
                let rows = self
                    .execute(Operation::Delete, R::DELETE_BY_ID, &[id.as_str()])
                    .await?;
                debug!(rows, "row deleted");
                Ok(())
            })
            .await
    }
}
