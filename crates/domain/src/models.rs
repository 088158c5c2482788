//! Domain entities.
//!
//! These are value objects with no storage metadata.  Repositories never
//! mutate them in place; every write returns a fresh value that reflects the
//! persisted state.

use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::Id;

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub name: String,
    pub surname: String,
    /// Unique across all users.
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub avatar_url: Option<String>,
}

impl User {
    /// A user with only the mandatory fields set and no ID assigned.
    pub fn new(
        name: impl Into<String>,
        surname: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: Id::default(),
            name: name.into(),
            surname: surname.into(),
            email: email.into(),
            password: password.into(),
            phone: None,
            city: None,
            avatar_url: None,
        }
    }
}

/// Public part of a user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub name: String,
    pub surname: String,
}

// ---------------------------------------------------------------------------
// School
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub id: Id,
    pub owner_id: Id,
    pub name: String,
    pub description: String,
}

impl School {
    pub fn new(owner_id: Id, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Id::default(),
            owner_id,
            name: name.into(),
            description: description.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Course
// ---------------------------------------------------------------------------

/// Publication state of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text", rename_all = "lowercase"))]
pub enum CourseStatus {
    Draft,
    Ready,
    Published,
}

impl CourseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Ready => "ready",
            Self::Published => "published",
        }
    }
}

impl fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A course offered by a school.  Read-only from this layer's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: Id,
    pub school_id: Id,
    pub name: String,
    pub description: String,
    /// Price in minor currency units.
    pub price: i64,
    pub language: String,
    pub level: i32,
    pub status: CourseStatus,
}

// ---------------------------------------------------------------------------
// Review
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: Id,
    pub course_id: Id,
    pub user_id: Id,
    pub text: String,
}

impl Review {
    pub fn new(course_id: Id, user_id: Id, text: impl Into<String>) -> Self {
        Self {
            id: Id::default(),
            course_id,
            user_id,
            text: text.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Certificate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text", rename_all = "lowercase"))]
pub enum CertificateGrade {
    Gold,
    Silver,
    Bronze,
}

impl CertificateGrade {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Silver => "silver",
            Self::Bronze => "bronze",
        }
    }
}

impl fmt::Display for CertificateGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Proof that a user completed a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: Id,
    pub course_id: Id,
    pub user_id: Id,
    pub name: String,
    pub score: i32,
    pub grade: CertificateGrade,
    pub created_at: DateTime<Utc>,
}

impl Certificate {
    /// A certificate issued now.  The timestamp is cut to microseconds, the
    /// finest precision every backend stores.
    pub fn new(
        course_id: Id,
        user_id: Id,
        name: impl Into<String>,
        score: i32,
        grade: CertificateGrade,
    ) -> Self {
        Self {
            id: Id::default(),
            course_id,
            user_id,
            name: name.into(),
            score,
            grade,
            created_at: Utc::now().trunc_subsecs(6),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&CertificateGrade::Silver).unwrap(), "\"silver\"");
        assert_eq!(serde_json::to_string(&CourseStatus::Published).unwrap(), "\"published\"");
        assert_eq!(CertificateGrade::Bronze.to_string(), "bronze");
    }

    #[test]
    fn issue_time_is_whole_microseconds() {
        use chrono::Timelike;

        let cert = Certificate::new(Id::new("c"), Id::new("u"), "Rust", 90, CertificateGrade::Gold);
        assert_eq!(cert.created_at.nanosecond() % 1_000, 0);
        assert!(!cert.id.is_assigned());
    }

    #[test]
    fn new_entities_have_no_id() {
        let user = User::new("Ann", "Lee", "ann@example.com", "secret");
        assert!(!user.id.is_assigned());
        assert_eq!(user.phone, None);

        let review = Review::new(Id::new("c"), Id::new("u"), "great");
        assert!(!review.id.is_assigned());
    }
}
