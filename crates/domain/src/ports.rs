//! Repository contracts implemented by the persistence adapter.
//!
//! Every method takes the caller's [`RequestScope`] first and returns a
//! [`RepoError`] classified into the closed taxonomy.  Implementations hold
//! no mutable state and are safe to call concurrently.

use async_trait::async_trait;

use crate::{Certificate, Course, Id, RepoError, RequestScope, Review, School, User, UserInfo};

/// The uniform CRUD contract shared by every entity repository.
#[async_trait]
pub trait Repository<E>: Send + Sync
where
    E: Send + Sync + 'static,
{
    /// All rows of the relation, in the order the store returns them.
    async fn find_all(&self, scope: &RequestScope) -> Result<Vec<E>, RepoError>;

    /// Fails with `NotFound` when no row has this ID.
    async fn find_by_id(&self, scope: &RequestScope, id: &Id) -> Result<E, RepoError>;

    /// Insert `entity` (assigning an ID if it has none) and return the
    /// persisted state as read back from the store.
    ///
    /// The write and the read-back are separate statements; a concurrent
    /// delete in between surfaces as `NotFound`.
    async fn create(&self, scope: &RequestScope, entity: &E) -> Result<E, RepoError>;

    /// Overwrite every non-key column and return the persisted state.
    ///
    /// An update matching no row is only detected by the read-back, which
    /// fails with `NotFound`.
    async fn update(&self, scope: &RequestScope, entity: &E) -> Result<E, RepoError>;

    /// Remove the row with this ID.  Succeeds when no row matches.
    async fn delete(&self, scope: &RequestScope, id: &Id) -> Result<(), RepoError>;
}

#[async_trait]
pub trait UserRepository: Repository<User> {
    async fn find_by_email(&self, scope: &RequestScope, email: &str) -> Result<User, RepoError>;

    async fn find_by_credentials(
        &self,
        scope: &RequestScope,
        email: &str,
        password: &str,
    ) -> Result<User, RepoError>;

    async fn find_user_info(&self, scope: &RequestScope, user_id: &Id)
        -> Result<UserInfo, RepoError>;
}

#[async_trait]
pub trait SchoolRepository: Repository<School> {
    /// Schools owned by `owner_id`.
    async fn find_user_schools(
        &self,
        scope: &RequestScope,
        owner_id: &Id,
    ) -> Result<Vec<School>, RepoError>;

    async fn find_school_courses(
        &self,
        scope: &RequestScope,
        school_id: &Id,
    ) -> Result<Vec<Course>, RepoError>;

    async fn find_school_teachers(
        &self,
        scope: &RequestScope,
        school_id: &Id,
    ) -> Result<Vec<User>, RepoError>;

    async fn is_school_teacher(
        &self,
        scope: &RequestScope,
        school_id: &Id,
        teacher_id: &Id,
    ) -> Result<bool, RepoError>;

    /// Record the membership.  A membership that already exists fails with
    /// `Duplicate`.
    async fn add_school_teacher(
        &self,
        scope: &RequestScope,
        school_id: &Id,
        teacher_id: &Id,
    ) -> Result<(), RepoError>;
}

#[async_trait]
pub trait ReviewRepository: Repository<Review> {
    async fn find_user_reviews(
        &self,
        scope: &RequestScope,
        user_id: &Id,
    ) -> Result<Vec<Review>, RepoError>;

    async fn find_course_reviews(
        &self,
        scope: &RequestScope,
        course_id: &Id,
    ) -> Result<Vec<Review>, RepoError>;
}

#[async_trait]
pub trait CertificateRepository: Repository<Certificate> {
    async fn find_user_certificates(
        &self,
        scope: &RequestScope,
        user_id: &Id,
    ) -> Result<Vec<Certificate>, RepoError>;

    async fn find_user_course_certificate(
        &self,
        scope: &RequestScope,
        course_id: &Id,
        user_id: &Id,
    ) -> Result<Certificate, RepoError>;
}
