//! End-to-end repository scenarios against an in-memory SQLite database.
//!
//! Per-entity behaviour is tested next to each repository; these cover
//! flows that cross relations or depend on the request scope.

use std::time::Duration;

use domain::{
    CertificateGrade, CertificateRepository, CourseStatus, Id, RepoError, Repository,
    RequestScope, Review, School, SchoolRepository, User, UserRepository,
};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::repository::{
    SqlCertificateRepository, SqlReviewRepository, SqlSchoolRepository, SqlUserRepository,
};
use crate::testing::{self, sample_user, seed_school_with_course, seed_user};

// ============================================================
// Concrete lifecycle
// ============================================================

#[tokio::test]
async fn user_lifecycle_with_duplicate_and_delete() {
    let pool = testing::pool().await;
    let users = SqlUserRepository::new(pool);
    let scope = RequestScope::new();

    let ada = users
        .create(&scope, &User::new("Ada", "L", "a@x.com", "secret"))
        .await
        .unwrap();
    assert!(ada.id.is_assigned());
    assert_eq!(ada.name, "Ada");
    assert_eq!(ada.surname, "L");
    assert_eq!(ada.email, "a@x.com");

    let err = users
        .create(&scope, &User::new("Bob", "M", "a@x.com", "other"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)), "got {err:?}");

    let found = users.find_by_email(&scope, "a@x.com").await.unwrap();
    assert_eq!(found.name, "Ada");
    assert_eq!(found.id, ada.id);

    users.delete(&scope, &ada.id).await.unwrap();
    assert!(users
        .find_by_id(&scope, &ada.id)
        .await
        .unwrap_err()
        .is_not_found());

    // Deleting again is still a success.
    users.delete(&scope, &ada.id).await.unwrap();
}

#[tokio::test]
async fn every_relation_lists_what_was_written() {
    let pool = testing::pool().await;
    let scope = RequestScope::new();
    let (school, course) = seed_school_with_course(&pool, CourseStatus::Published).await;
    let student = seed_user(&pool, "student@x.com").await;

    let reviews = SqlReviewRepository::new(pool.clone());
    let review = reviews
        .create(&scope, &Review::new(course.id.clone(), student.id.clone(), "Loved it"))
        .await
        .unwrap();

    let certificates = SqlCertificateRepository::new(pool.clone());
    let cert = certificates
        .create(
            &scope,
            &domain::Certificate::new(
                course.id.clone(),
                student.id.clone(),
                "Systems",
                88,
                CertificateGrade::Gold,
            ),
        )
        .await
        .unwrap();

    assert_eq!(reviews.find_all(&scope).await.unwrap(), vec![review]);
    assert_eq!(certificates.find_all(&scope).await.unwrap(), vec![cert]);
    assert_eq!(
        SqlSchoolRepository::new(pool.clone())
            .find_all(&scope)
            .await
            .unwrap(),
        vec![school]
    );
    assert_eq!(
        SqlUserRepository::new(pool).find_all(&scope).await.unwrap().len(),
        2
    );
}

// ============================================================
// Constraint failures outside insert
// ============================================================

#[tokio::test]
async fn deleting_a_referenced_user_is_delete_failed() {
    let pool = testing::pool().await;
    let scope = RequestScope::new();
    let users = SqlUserRepository::new(pool.clone());
    let owner = seed_user(&pool, "owner@x.com").await;

    SqlSchoolRepository::new(pool.clone())
        .create(&scope, &School::new(owner.id.clone(), "Ferris Academy", "Crabs"))
        .await
        .unwrap();

    let err = users.delete(&scope, &owner.id).await.unwrap_err();
    assert!(matches!(err, RepoError::DeleteFailed(_)), "got {err:?}");

    assert_eq!(users.find_by_id(&scope, &owner.id).await.unwrap(), owner);
}

#[tokio::test]
async fn linking_an_unknown_teacher_is_persistence_failed() {
    let pool = testing::pool().await;
    let scope = RequestScope::new();
    let (school, _) = seed_school_with_course(&pool, CourseStatus::Draft).await;

    let err = SqlSchoolRepository::new(pool)
        .add_school_teacher(&scope, &school.id, &Id::new("ghost"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::PersistenceFailed(_)), "got {err:?}");
}

// ============================================================
// Request scope
// ============================================================

#[tokio::test]
async fn cancelled_scope_writes_nothing() {
    let pool = testing::pool().await;
    let users = SqlUserRepository::new(pool);

    let token = CancellationToken::new();
    let scope = RequestScope::new().with_token(token.clone());
    token.cancel();

    let err = users
        .create(&scope, &sample_user("cancelled@x.com"))
        .await
        .unwrap_err();
    assert_eq!(err, RepoError::Cancelled);
    assert!(err.is_interrupted());

    let live = RequestScope::new();
    assert!(users
        .find_by_email(&live, "cancelled@x.com")
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn elapsed_deadline_interrupts_every_operation_kind() {
    let pool = testing::pool().await;
    let users = SqlUserRepository::new(pool.clone());
    let schools = SqlSchoolRepository::new(pool);
    let existing = users
        .create(&RequestScope::new(), &sample_user("kept@x.com"))
        .await
        .unwrap();

    let expired = RequestScope::new().with_deadline(Instant::now());

    assert_eq!(
        users.find_all(&expired).await.unwrap_err(),
        RepoError::DeadlineExceeded
    );
    assert_eq!(
        users.update(&expired, &existing).await.unwrap_err(),
        RepoError::DeadlineExceeded
    );
    assert_eq!(
        users.delete(&expired, &existing.id).await.unwrap_err(),
        RepoError::DeadlineExceeded
    );
    assert_eq!(
        schools
            .is_school_teacher(&expired, &Id::new("s"), &Id::new("t"))
            .await
            .unwrap_err(),
        RepoError::DeadlineExceeded
    );

    // Nothing ran: the user is still there.
    let live = RequestScope::new();
    assert_eq!(users.find_by_id(&live, &existing.id).await.unwrap(), existing);
}

#[tokio::test]
async fn generous_deadline_lets_operations_finish() {
    let pool = testing::pool().await;
    let certificates = SqlCertificateRepository::new(pool);
    let scope = RequestScope::new().with_timeout(Duration::from_secs(30));

    let none = certificates
        .find_user_certificates(&scope, &Id::new("nobody"))
        .await
        .unwrap();
    assert!(none.is_empty());
}
