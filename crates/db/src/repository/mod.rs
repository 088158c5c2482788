//! Entity repositories, one module per aggregate.
//!
//! Each repository is a [`Table`](crate::table::Table) alias carrying the
//! generic CRUD operations plus the entity's own lookups.  No business
//! logic, pure SQL.

pub mod certificates;
pub mod reviews;
pub mod schools;
pub mod users;

pub use certificates::SqlCertificateRepository;
pub use reviews::SqlReviewRepository;
pub use schools::SqlSchoolRepository;
pub use users::SqlUserRepository;
