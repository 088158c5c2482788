//! School repository, including the school_teacher link relation.

use async_trait::async_trait;
use domain::{Course, Id, RepoError, RequestScope, School, SchoolRepository, User};
use tracing::{debug, instrument};

use crate::classify::{classify_error, Operation};
use crate::models::{CourseRow, SchoolRow, UserRow};
use crate::schema::RowSchema;
use crate::table::Table;
use crate::Db;

pub type SqlSchoolRepository = Table<SchoolRow>;

const FIND_USER_SCHOOLS: &str = "SELECT * FROM school WHERE owner_id = $1";
const FIND_SCHOOL_COURSES: &str = "SELECT * FROM course WHERE school_id = $1";
const FIND_SCHOOL_TEACHERS: &str = r#"
    SELECT u.*
    FROM "user" u
    JOIN school_teacher st ON u.id = st.teacher_id
    WHERE st.school_id = $1
"#;
const IS_SCHOOL_TEACHER: &str =
    "SELECT COUNT(*) FROM school_teacher WHERE school_id = $1 AND teacher_id = $2";
const ADD_SCHOOL_TEACHER: &str =
    "INSERT INTO school_teacher (teacher_id, school_id) VALUES ($1, $2)";

#[async_trait]
impl SchoolRepository for Table<SchoolRow> {
    #[instrument(skip_all, fields(owner_id = %owner_id))]
    async fn find_user_schools(
        &self,
        scope: &RequestScope,
        owner_id: &Id,
    ) -> Result<Vec<School>, RepoError> {
        scope
            .run(self.find_many(FIND_USER_SCHOOLS, &[owner_id.as_str()]))
            .await
    }

    #[instrument(skip_all, fields(school_id = %school_id))]
    async fn find_school_courses(
        &self,
        scope: &RequestScope,
        school_id: &Id,
    ) -> Result<Vec<Course>, RepoError> {
        scope
            .run(async {
                let rows: Vec<CourseRow> = self
                    .fetch_all_as(FIND_SCHOOL_COURSES, &[school_id.as_str()])
                    .await?;
                Ok(rows.into_iter().map(RowSchema::into_domain).collect())
            })
            .await
    }

    #[instrument(skip_all, fields(school_id = %school_id))]
    async fn find_school_teachers(
        &self,
        scope: &RequestScope,
        school_id: &Id,
    ) -> Result<Vec<User>, RepoError> {
        scope
            .run(async {
                let rows: Vec<UserRow> = self
                    .fetch_all_as(FIND_SCHOOL_TEACHERS, &[school_id.as_str()])
                    .await?;
                Ok(rows.into_iter().map(RowSchema::into_domain).collect())
            })
            .await
    }

    #[instrument(skip_all, fields(school_id = %school_id, teacher_id = %teacher_id))]
    async fn is_school_teacher(
        &self,
        scope: &RequestScope,
        school_id: &Id,
        teacher_id: &Id,
    ) -> Result<bool, RepoError> {
        scope
            .run(async {
                let links: i64 = sqlx::query_scalar::<Db, i64>(IS_SCHOOL_TEACHER)
                    .bind(school_id.as_str())
                    .bind(teacher_id.as_str())
                    .fetch_one(self.pool())
                    .await
                    .map_err(|err| classify_error(Operation::Read, err))?;
                Ok(links > 0)
            })
            .await
    }

    #[instrument(skip_all, fields(school_id = %school_id, teacher_id = %teacher_id))]
    async fn add_school_teacher(
        &self,
        scope: &RequestScope,
        school_id: &Id,
        teacher_id: &Id,
    ) -> Result<(), RepoError> {
        scope
            .run(async {
                self.execute(
                    Operation::Insert,
                    ADD_SCHOOL_TEACHER,
                    &[teacher_id.as_str(), school_id.as_str()],
                )
                .await?;
                debug!("teacher linked to school");
                Ok(())
            })
            .await
    }
}
