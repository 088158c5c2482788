//! In-memory SQLite fixtures for repository tests.

use domain::{Course, CourseStatus, Id, RequestScope, Repository, School, User};
use sqlx::sqlite::SqlitePoolOptions;

use crate::models::CourseRow;
use crate::repository::{SqlSchoolRepository, SqlUserRepository};
use crate::schema::RowSchema;
use crate::statement::insert_statement;
use crate::DbPool;

/// A fresh database with every relation created.
pub async fn pool() -> DbPool {
    let pool = memory_pool().await;
    create_schema(&pool, CERTIFICATE_GRADES).await;
    pool
}

/// Same as [`pool`], but the stored grade set predates `bronze`.
pub async fn pool_without_bronze() -> DbPool {
    let pool = memory_pool().await;
    create_schema(&pool, "'gold', 'silver'").await;
    pool
}

// One connection that never recycles, or each new connection would open
// its own empty in-memory database.
async fn memory_pool() -> DbPool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap()
}

const CERTIFICATE_GRADES: &str = "'gold', 'silver', 'bronze'";

async fn create_schema(pool: &DbPool, grades: &str) {
    create_user_table(pool).await;
    create_school_table(pool).await;
    create_course_table(pool).await;
    create_review_table(pool).await;
    create_certificate_table(pool, grades).await;
    create_school_teacher_table(pool).await;
}

async fn create_user_table(pool: &DbPool) {
    sqlx::query(
        r#"
        CREATE TABLE "user" (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            surname TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL,
            phone TEXT,
            city TEXT,
            avatar_url TEXT
        )
        "#,
    )
    .execute(pool)
    .await
    .unwrap();
}

async fn create_school_table(pool: &DbPool) {
    sqlx::query(
        r#"
        CREATE TABLE school (
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL REFERENCES "user"(id),
            name TEXT NOT NULL,
            description TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .unwrap();
}

async fn create_course_table(pool: &DbPool) {
    sqlx::query(
        r#"
        CREATE TABLE course (
            id TEXT PRIMARY KEY,
            school_id TEXT NOT NULL REFERENCES school(id),
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            price INTEGER NOT NULL,
            language TEXT NOT NULL,
            level INTEGER NOT NULL,
            status TEXT NOT NULL
                CONSTRAINT course_status_enum CHECK (status IN ('draft', 'ready', 'published'))
        )
        "#,
    )
    .execute(pool)
    .await
    .unwrap();
}

async fn create_review_table(pool: &DbPool) {
    sqlx::query(
        r#"
        CREATE TABLE review (
            id TEXT PRIMARY KEY,
            course_id TEXT NOT NULL REFERENCES course(id),
            user_id TEXT NOT NULL REFERENCES "user"(id),
            text TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .unwrap();
}

async fn create_certificate_table(pool: &DbPool, grades: &str) {
    let ddl = format!(
        r#"
        CREATE TABLE certificate (
            id TEXT PRIMARY KEY,
            course_id TEXT NOT NULL REFERENCES course(id),
            user_id TEXT NOT NULL REFERENCES "user"(id),
            name TEXT NOT NULL,
            score INTEGER NOT NULL
                CONSTRAINT certificate_score_range CHECK (score BETWEEN 0 AND 100),
            grade TEXT NOT NULL
                CONSTRAINT certificate_grade_enum CHECK (grade IN ({grades})),
            created_at TEXT NOT NULL,
            UNIQUE (course_id, user_id)
        )
        "#
    );
    sqlx::query(&ddl).execute(pool).await.unwrap();
}

async fn create_school_teacher_table(pool: &DbPool) {
    sqlx::query(
        r#"
        CREATE TABLE school_teacher (
            teacher_id TEXT NOT NULL REFERENCES "user"(id),
            school_id TEXT NOT NULL REFERENCES school(id),
            PRIMARY KEY (school_id, teacher_id)
        )
        "#,
    )
    .execute(pool)
    .await
    .unwrap();
}

pub fn sample_user(email: &str) -> User {
    User::new("Ada", "Lovelace", email, "analytical-engine")
}

pub async fn seed_user(pool: &DbPool, email: &str) -> User {
    SqlUserRepository::new(pool.clone())
        .create(&RequestScope::new(), &sample_user(email))
        .await
        .unwrap()
}

/// Courses have no repository of their own; write the row directly.
pub async fn seed_course(pool: &DbPool, school_id: &Id, name: &str, status: CourseStatus) -> Course {
    let course = Course {
        id: Id::generate(),
        school_id: school_id.clone(),
        name: name.to_owned(),
        description: format!("{name} course"),
        price: 4_900,
        language: "en".into(),
        level: 1,
        status,
    };
    insert_statement(&CourseRow::from_domain(&course))
        .query()
        .execute(pool)
        .await
        .unwrap();
    course
}

/// An owner, their school and one course in it.
pub async fn seed_school_with_course(pool: &DbPool, status: CourseStatus) -> (School, Course) {
    let owner = seed_user(pool, "school-owner@x.com").await;
    let school = SqlSchoolRepository::new(pool.clone())
        .create(
            &RequestScope::new(),
            &School::new(owner.id, "Ferris Academy", "Crabs welcome"),
        )
        .await
        .unwrap();
    let course = seed_course(pool, &school.id, "Systems", status).await;
    (school, course)
}
