//! Review repository.

use async_trait::async_trait;
use domain::{Id, RepoError, RequestScope, Review, ReviewRepository};
use tracing::instrument;

use crate::models::ReviewRow;
use crate::table::Table;

pub type SqlReviewRepository = Table<ReviewRow>;

const FIND_USER_REVIEWS: &str = "SELECT * FROM review WHERE user_id = $1";
const FIND_COURSE_REVIEWS: &str = "SELECT * FROM review WHERE course_id = $1";

#[async_trait]
impl ReviewRepository for Table<ReviewRow> {
    #[instrument(skip_all, fields(user_id = %user_id))]
    async fn find_user_reviews(
        &self,
        scope: &RequestScope,
        user_id: &Id,
    ) -> Result<Vec<Review>, RepoError> {
        scope
            .run(self.find_many(FIND_USER_REVIEWS, &[user_id.as_str()]))
            .await
    }

    #[instrument(skip_all, fields(course_id = %course_id))]
    async fn find_course_reviews(
        &self,
        scope: &RequestScope,
        course_id: &Id,
    ) -> Result<Vec<Review>, RepoError> {
        scope
            .run(self.find_many(FIND_COURSE_REVIEWS, &[course_id.as_str()]))
            .await
    }
}
