//! `domain` crate: entities, the repository contract and its errors.
//!
//! Nothing in here knows about SQL.  The `db` crate implements the
//! [`ports`] traits on top of `sqlx`; callers depend only on this crate.

pub mod error;
pub mod id;
pub mod models;
pub mod ports;
pub mod scope;

pub use error::{ErrorKind, RepoError};
pub use id::Id;
pub use models::{
    Certificate, CertificateGrade, Course, CourseStatus, Review, School, User, UserInfo,
};
pub use ports::{
    CertificateRepository, Repository, ReviewRepository, SchoolRepository, UserRepository,
};
pub use scope::RequestScope;
