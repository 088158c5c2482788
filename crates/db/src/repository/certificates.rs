//! Certificate repository.

use async_trait::async_trait;
use domain::{Certificate, CertificateRepository, Id, RepoError, RequestScope};
use tracing::instrument;

use crate::models::CertificateRow;
use crate::table::Table;

pub type SqlCertificateRepository = Table<CertificateRow>;

const FIND_USER_CERTIFICATES: &str = "SELECT * FROM certificate WHERE user_id = $1";
const FIND_USER_COURSE_CERTIFICATE: &str =
    "SELECT * FROM certificate WHERE course_id = $1 AND user_id = $2";

#[async_trait]
impl CertificateRepository for Table<CertificateRow> {
    #[instrument(skip_all, fields(user_id = %user_id))]
    async fn find_user_certificates(
        &self,
        scope: &RequestScope,
        user_id: &Id,
    ) -> Result<Vec<Certificate>, RepoError> {
        scope
            .run(self.find_many(FIND_USER_CERTIFICATES, &[user_id.as_str()]))
            .await
    }

    #[instrument(skip_all, fields(course_id = %course_id, user_id = %user_id))]
    async fn find_user_course_certificate(
        &self,
        scope: &RequestScope,
        course_id: &Id,
        user_id: &Id,
    ) -> Result<Certificate, RepoError> {
        scope
            .run(self.find_one(
                FIND_USER_COURSE_CERTIFICATE,
                &[course_id.as_str(), user_id.as_str()],
            ))
            .await
    }
}
