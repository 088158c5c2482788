//! Row structs that map 1-to-1 onto database relations.
//!
//! These are *persistence* models and carry no domain behaviour.
//! Domain types live in the `domain` crate; each row converts to and from
//! its entity through [`RowSchema`].

use chrono::{DateTime, Utc};
use domain::{Certificate, CertificateGrade, Course, CourseStatus, Id, Review, School, User, UserInfo};
use sqlx::FromRow;

use crate::schema::{Column, RowSchema};

/// The entity's ID, or a fresh one if it has none yet.
fn assigned_id(id: &Id) -> String {
    if id.is_assigned() {
        id.as_str().to_owned()
    } else {
        Id::generate().into_inner()
    }
}

// ---------------------------------------------------------------------------
// user
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub avatar_url: Option<String>,
}

impl RowSchema for UserRow {
    type Entity = User;

    const RELATION: &'static str = "user";

    const FIND_ALL: &'static str = r#"SELECT * FROM "user""#;
    const FIND_BY_ID: &'static str = r#"SELECT * FROM "user" WHERE id = $1"#;
    const DELETE_BY_ID: &'static str = r#"DELETE FROM "user" WHERE id = $1"#;

    fn columns(&self) -> Vec<Column<'_>> {
        let Self {
            id,
            name,
            surname,
            email,
            password,
            phone,
            city,
            avatar_url,
        } = self;
        vec![
            Column::new("id", id),
            Column::new("name", name),
            Column::new("surname", surname),
            Column::new("email", email),
            Column::new("password", password),
            Column::new("phone", phone),
            Column::new("city", city),
            Column::new("avatar_url", avatar_url),
        ]
    }

    fn from_domain(user: &User) -> Self {
        Self {
            id: assigned_id(&user.id),
            name: user.name.clone(),
            surname: user.surname.clone(),
            email: user.email.clone(),
            password: user.password.clone(),
            phone: user.phone.clone(),
            city: user.city.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }

    fn into_domain(self) -> User {
        User {
            id: Id::from(self.id),
            name: self.name,
            surname: self.surname,
            email: self.email,
            password: self.password,
            phone: self.phone,
            city: self.city,
            avatar_url: self.avatar_url,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// Projection used by the user-info lookup.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserInfoRow {
    pub name: String,
    pub surname: String,
}

impl From<UserInfoRow> for UserInfo {
    fn from(row: UserInfoRow) -> Self {
        Self {
            name: row.name,
            surname: row.surname,
        }
    }
}

// ---------------------------------------------------------------------------
// school
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct SchoolRow {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: String,
}

impl RowSchema for SchoolRow {
    type Entity = School;

    const RELATION: &'static str = "school";

    const FIND_ALL: &'static str = "SELECT * FROM school";
    const FIND_BY_ID: &'static str = "SELECT * FROM school WHERE id = $1";
    const DELETE_BY_ID: &'static str = "DELETE FROM school WHERE id = $1";

    fn columns(&self) -> Vec<Column<'_>> {
        let Self {
            id,
            owner_id,
            name,
            description,
        } = self;
        vec![
            Column::new("id", id),
            Column::new("owner_id", owner_id),
            Column::new("name", name),
            Column::new("description", description),
        ]
    }

    fn from_domain(school: &School) -> Self {
        Self {
            id: assigned_id(&school.id),
            owner_id: school.owner_id.as_str().to_owned(),
            name: school.name.clone(),
            description: school.description.clone(),
        }
    }

    fn into_domain(self) -> School {
        School {
            id: Id::from(self.id),
            owner_id: Id::from(self.owner_id),
            name: self.name,
            description: self.description,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }
}

// ---------------------------------------------------------------------------
// course
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CourseRow {
    pub id: String,
    pub school_id: String,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub language: String,
    pub level: i32,
    /// Stored as lowercase text.
    pub status: CourseStatus,
}

impl RowSchema for CourseRow {
    type Entity = Course;

    const RELATION: &'static str = "course";

    const FIND_ALL: &'static str = "SELECT * FROM course";
    const FIND_BY_ID: &'static str = "SELECT * FROM course WHERE id = $1";
    const DELETE_BY_ID: &'static str = "DELETE FROM course WHERE id = $1";

    fn columns(&self) -> Vec<Column<'_>> {
        let Self {
            id,
            school_id,
            name,
            description,
            price,
            language,
            level,
            status,
        } = self;
        vec![
            Column::new("id", id),
            Column::new("school_id", school_id),
            Column::new("name", name),
            Column::new("description", description),
            Column::new("price", *price),
            Column::new("language", language),
            Column::new("level", *level),
            Column::new("status", status.as_str()),
        ]
    }

    fn from_domain(course: &Course) -> Self {
        Self {
            id: assigned_id(&course.id),
            school_id: course.school_id.as_str().to_owned(),
            name: course.name.clone(),
            description: course.description.clone(),
            price: course.price,
            language: course.language.clone(),
            level: course.level,
            status: course.status,
        }
    }

    fn into_domain(self) -> Course {
        Course {
            id: Id::from(self.id),
            school_id: Id::from(self.school_id),
            name: self.name,
            description: self.description,
            price: self.price,
            language: self.language,
            level: self.level,
            status: self.status,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }
}

// ---------------------------------------------------------------------------
// review
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ReviewRow {
    pub id: String,
    pub course_id: String,
    pub user_id: String,
    pub text: String,
}

impl RowSchema for ReviewRow {
    type Entity = Review;

    const RELATION: &'static str = "review";

    const FIND_ALL: &'static str = "SELECT * FROM review";
    const FIND_BY_ID: &'static str = "SELECT * FROM review WHERE id = $1";
    const DELETE_BY_ID: &'static str = "DELETE FROM review WHERE id = $1";

    fn columns(&self) -> Vec<Column<'_>> {
        let Self {
            id,
            course_id,
            user_id,
            text,
        } = self;
        vec![
            Column::new("id", id),
            Column::new("course_id", course_id),
            Column::new("user_id", user_id),
            Column::new("text", text),
        ]
    }

    fn from_domain(review: &Review) -> Self {
        Self {
            id: assigned_id(&review.id),
            course_id: review.course_id.as_str().to_owned(),
            user_id: review.user_id.as_str().to_owned(),
            text: review.text.clone(),
        }
    }

    fn into_domain(self) -> Review {
        Review {
            id: Id::from(self.id),
            course_id: Id::from(self.course_id),
            user_id: Id::from(self.user_id),
            text: self.text,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }
}

// ---------------------------------------------------------------------------
// certificate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CertificateRow {
    pub id: String,
    pub course_id: String,
    pub user_id: String,
    pub name: String,
    pub score: i32,
    /// Stored as lowercase text.
    pub grade: CertificateGrade,
    pub created_at: DateTime<Utc>,
}

impl RowSchema for CertificateRow {
    type Entity = Certificate;

    const RELATION: &'static str = "certificate";

    const FIND_ALL: &'static str = "SELECT * FROM certificate";
    const FIND_BY_ID: &'static str = "SELECT * FROM certificate WHERE id = $1";
    const DELETE_BY_ID: &'static str = "DELETE FROM certificate WHERE id = $1";

    fn columns(&self) -> Vec<Column<'_>> {
        let Self {
            id,
            course_id,
            user_id,
            name,
            score,
            grade,
            created_at,
        } = self;
        vec![
            Column::new("id", id),
            Column::new("course_id", course_id),
            Column::new("user_id", user_id),
            Column::new("name", name),
            Column::new("score", *score),
            Column::new("grade", grade.as_str()),
            Column::new("created_at", *created_at),
        ]
    }

    fn from_domain(cert: &Certificate) -> Self {
        Self {
            id: assigned_id(&cert.id),
            course_id: cert.course_id.as_str().to_owned(),
            user_id: cert.user_id.as_str().to_owned(),
            name: cert.name.clone(),
            score: cert.score,
            grade: cert.grade,
            created_at: cert.created_at,
        }
    }

    fn into_domain(self) -> Certificate {
        Certificate {
            id: Id::from(self.id),
            course_id: Id::from(self.course_id),
            user_id: Id::from(self.user_id),
            name: self.name,
            score: self.score,
            grade: self.grade,
            created_at: self.created_at,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn column_names<R: RowSchema>(row: &R) -> Vec<&'static str> {
        row.columns().iter().map(|column| column.name).collect()
    }

    fn user() -> User {
        User {
            id: Id::new("u-1"),
            name: "Ada".into(),
            surname: "Lovelace".into(),
            email: "ada@example.com".into(),
            password: "analytical".into(),
            phone: Some("+44 20 0000".into()),
            city: None,
            avatar_url: Some("https://img.example.com/ada.png".into()),
        }
    }

    fn certificate() -> Certificate {
        Certificate {
            id: Id::new("cert-1"),
            course_id: Id::new("c-1"),
            user_id: Id::new("u-1"),
            name: "Rust Basics".into(),
            score: 97,
            grade: CertificateGrade::Gold,
            created_at: Utc
                .with_ymd_and_hms(2024, 3, 14, 15, 9, 26)
                .unwrap()
                .checked_add_signed(chrono::Duration::microseconds(535_897))
                .unwrap(),
        }
    }

    fn course() -> Course {
        Course {
            id: Id::new("c-1"),
            school_id: Id::new("s-1"),
            name: "Systems".into(),
            description: "Ownership and borrowing".into(),
            price: 1_299_900,
            language: "en".into(),
            level: 3,
            status: CourseStatus::Published,
        }
    }

    #[test]
    fn assigned_entities_round_trip_exactly() {
        let u = user();
        assert_eq!(UserRow::from_domain(&u).into_domain(), u);

        let c = certificate();
        assert_eq!(CertificateRow::from_domain(&c).into_domain(), c);

        let course = course();
        assert_eq!(CourseRow::from_domain(&course).into_domain(), course);

        let school = School {
            id: Id::new("s-1"),
            owner_id: Id::new("u-1"),
            name: "Ferris Academy".into(),
            description: "Crabs welcome".into(),
        };
        assert_eq!(SchoolRow::from_domain(&school).into_domain(), school);

        let review = Review {
            id: Id::new("r-1"),
            course_id: Id::new("c-1"),
            user_id: Id::new("u-1"),
            text: "Excellent pacing".into(),
        };
        assert_eq!(ReviewRow::from_domain(&review).into_domain(), review);
    }

    #[test]
    fn unassigned_id_is_generated_and_other_fields_survive() {
        let mut u = user();
        u.id = Id::default();

        let row = UserRow::from_domain(&u);
        assert!(!row.id.is_empty());

        let back = row.into_domain();
        assert!(back.id.is_assigned());
        assert_eq!(User { id: Id::default(), ..back }, u);
    }

    #[test]
    fn descriptors_name_every_stored_column_in_order() {
        assert_eq!(
            column_names(&UserRow::from_domain(&user())),
            ["id", "name", "surname", "email", "password", "phone", "city", "avatar_url"]
        );
        assert_eq!(
            column_names(&CertificateRow::from_domain(&certificate())),
            ["id", "course_id", "user_id", "name", "score", "grade", "created_at"]
        );
        assert_eq!(
            column_names(&CourseRow::from_domain(&course())),
            ["id", "school_id", "name", "description", "price", "language", "level", "status"]
        );
        let review = ReviewRow::from_domain(&Review::new(Id::new("c"), Id::new("u"), "t"));
        assert_eq!(column_names(&review), ["id", "course_id", "user_id", "text"]);
        let school = SchoolRow::from_domain(&School::new(Id::new("u"), "n", "d"));
        assert_eq!(column_names(&school), ["id", "owner_id", "name", "description"]);
    }

    #[test]
    fn key_column_comes_first() {
        let review = ReviewRow::from_domain(&Review::new(Id::new("c"), Id::new("u"), "t"));
        let school = SchoolRow::from_domain(&School::new(Id::new("u"), "n", "d"));
        for names in [
            column_names(&UserRow::from_domain(&user())),
            column_names(&school),
            column_names(&CourseRow::from_domain(&course())),
            column_names(&review),
            column_names(&CertificateRow::from_domain(&certificate())),
        ] {
            assert_eq!(names.first(), Some(&UserRow::KEY));
        }
    }

    #[test]
    fn enumerations_bind_as_lowercase_text() {
        let row = CertificateRow::from_domain(&certificate());
        let grade = row
            .columns()
            .into_iter()
            .find(|column| column.name == "grade")
            .unwrap();
        assert_eq!(grade.value, crate::schema::Value::Text("gold"));
    }
}
