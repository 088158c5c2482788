//! User repository.

use async_trait::async_trait;
use domain::{Id, RepoError, RequestScope, User, UserInfo, UserRepository};
use tracing::instrument;

use crate::models::{UserInfoRow, UserRow};
use crate::table::Table;

pub type SqlUserRepository = Table<UserRow>;

const FIND_BY_EMAIL: &str = r#"SELECT * FROM "user" WHERE email = $1"#;
const FIND_BY_CREDENTIALS: &str = r#"SELECT * FROM "user" WHERE email = $1 AND password = $2"#;
const FIND_USER_INFO: &str = r#"SELECT name, surname FROM "user" WHERE id = $1"#;

#[async_trait]
impl UserRepository for Table<UserRow> {
    #[instrument(skip_all)]
    async fn find_by_email(&self, scope: &RequestScope, email: &str) -> Result<User, RepoError> {
        scope.run(self.find_one(FIND_BY_EMAIL, &[email])).await
    }

    #[instrument(skip_all)]
    async fn find_by_credentials(
        &self,
        scope: &RequestScope,
        email: &str,
        password: &str,
    ) -> Result<User, RepoError> {
        scope
            .run(self.find_one(FIND_BY_CREDENTIALS, &[email, password]))
            .await
    }

    #[instrument(skip_all, fields(user_id = %user_id))]
    async fn find_user_info(
        &self,
        scope: &RequestScope,
        user_id: &Id,
    ) -> Result<UserInfo, RepoError> {
        scope
            .run(async {
                let row: UserInfoRow = self
                    .fetch_one_as(FIND_USER_INFO, &[user_id.as_str()])
                    .await?;
                Ok(row.into())
            })
            .await
    }
}
