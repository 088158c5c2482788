//! `eschool-db` CLI entry-point.
//!
//! Inspect and maintain the eschool store from the shell:
//! - `users`: list, look up and delete users.
//! - `schools`: schools, their courses and their teachers.
//! - `reviews`: reviews by author or course.
//! - `certificates`: issued certificates.
//!
//! Results go to stdout as pretty JSON; logs go to stderr.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use db::{
    create_pool, DbPool, PoolConfig, SqlCertificateRepository, SqlReviewRepository,
    SqlSchoolRepository, SqlUserRepository,
};
use domain::{
    CertificateRepository, Id, RepoError, Repository, RequestScope, ReviewRepository,
    SchoolRepository, UserRepository,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Exit status for a lookup that matched nothing.
const EXIT_NOT_FOUND: u8 = 2;

#[derive(Parser)]
#[command(name = "eschool-db", about = "eschool persistence toolbox", version)]
struct Cli {
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(long, env = "ESCHOOL_MAX_CONNECTIONS", default_value_t = 10)]
    max_connections: u32,

    /// Per-command deadline in seconds.
    #[arg(long, env = "ESCHOOL_TIMEOUT_SECS", default_value_t = 5)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Users and their credentials.
    #[command(subcommand)]
    Users(UserCommand),
    /// Schools, their courses and teachers.
    #[command(subcommand)]
    Schools(SchoolCommand),
    #[command(subcommand)]
    Reviews(ReviewCommand),
    #[command(subcommand)]
    Certificates(CertificateCommand),
}

#[derive(Subcommand)]
enum UserCommand {
    List,
    Get { id: String },
    ByEmail { email: String },
    /// Name and surname only.
    Info { id: String },
    Delete { id: String },
}

#[derive(Subcommand)]
enum SchoolCommand {
    List,
    Get { id: String },
    /// Schools owned by a user.
    OwnedBy { user_id: String },
    Courses { school_id: String },
    Teachers { school_id: String },
    AddTeacher { school_id: String, user_id: String },
    Delete { id: String },
}

#[derive(Subcommand)]
enum ReviewCommand {
    List,
    ByUser { user_id: String },
    ByCourse { course_id: String },
    Delete { id: String },
}

#[derive(Subcommand)]
enum CertificateCommand {
    List,
    ByUser { user_id: String },
    /// The certificate a user earned for a course.
    For { course_id: String, user_id: String },
    Delete { id: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                error!("cannot render output: {err}");
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            error!("{err:#}");
            match err.downcast_ref::<RepoError>() {
                Some(repo_err) if repo_err.is_not_found() => ExitCode::from(EXIT_NOT_FOUND),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<Value> {
    let config = PoolConfig {
        max_connections: cli.max_connections,
        ..PoolConfig::new(cli.database_url)
    };
    let pool = create_pool(&config)
        .await
        .context("failed to connect to database")?;

    let scope = RequestScope::new().with_timeout(Duration::from_secs(cli.timeout_secs));

    let output = match cli.command {
        Command::Users(command) => users(pool, &scope, command).await?,
        Command::Schools(command) => schools(pool, &scope, command).await?,
        Command::Reviews(command) => reviews(pool, &scope, command).await?,
        Command::Certificates(command) => certificates(pool, &scope, command).await?,
    };
    Ok(output)
}

async fn users(pool: DbPool, scope: &RequestScope, command: UserCommand) -> anyhow::Result<Value> {
    let repo = SqlUserRepository::new(pool);
    match command {
        UserCommand::List => to_json(repo.find_all(scope).await?),
        UserCommand::Get { id } => to_json(repo.find_by_id(scope, &Id::new(id)).await?),
        UserCommand::ByEmail { email } => to_json(repo.find_by_email(scope, &email).await?),
        UserCommand::Info { id } => to_json(repo.find_user_info(scope, &Id::new(id)).await?),
        UserCommand::Delete { id } => deleted(repo.delete(scope, &Id::new(id.clone())).await, id),
    }
}

async fn schools(
    pool: DbPool,
    scope: &RequestScope,
    command: SchoolCommand,
) -> anyhow::Result<Value> {
    let repo = SqlSchoolRepository::new(pool);
    match command {
        SchoolCommand::List => to_json(repo.find_all(scope).await?),
        SchoolCommand::Get { id } => to_json(repo.find_by_id(scope, &Id::new(id)).await?),
        SchoolCommand::OwnedBy { user_id } => {
            to_json(repo.find_user_schools(scope, &Id::new(user_id)).await?)
        }
        SchoolCommand::Courses { school_id } => {
            to_json(repo.find_school_courses(scope, &Id::new(school_id)).await?)
        }
        SchoolCommand::Teachers { school_id } => {
            to_json(repo.find_school_teachers(scope, &Id::new(school_id)).await?)
        }
        SchoolCommand::AddTeacher { school_id, user_id } => {
            repo.add_school_teacher(scope, &Id::new(school_id.clone()), &Id::new(user_id.clone()))
                .await?;
            info!(%school_id, %user_id, "teacher added");
            Ok(json!({ "school_id": school_id, "teacher_id": user_id }))
        }
        SchoolCommand::Delete { id } => deleted(repo.delete(scope, &Id::new(id.clone())).await, id),
    }
}

async fn reviews(
    pool: DbPool,
    scope: &RequestScope,
    command: ReviewCommand,
) -> anyhow::Result<Value> {
    let repo = SqlReviewRepository::new(pool);
    match command {
        ReviewCommand::List => to_json(repo.find_all(scope).await?),
        ReviewCommand::ByUser { user_id } => {
            to_json(repo.find_user_reviews(scope, &Id::new(user_id)).await?)
        }
        ReviewCommand::ByCourse { course_id } => {
            to_json(repo.find_course_reviews(scope, &Id::new(course_id)).await?)
        }
        ReviewCommand::Delete { id } => deleted(repo.delete(scope, &Id::new(id.clone())).await, id),
    }
}

async fn certificates(
    pool: DbPool,
    scope: &RequestScope,
    command: CertificateCommand,
) -> anyhow::Result<Value> {
    let repo = SqlCertificateRepository::new(pool);
    match command {
        CertificateCommand::List => to_json(repo.find_all(scope).await?),
        CertificateCommand::ByUser { user_id } => {
            to_json(repo.find_user_certificates(scope, &Id::new(user_id)).await?)
        }
        CertificateCommand::For { course_id, user_id } => to_json(
            repo.find_user_course_certificate(scope, &Id::new(course_id), &Id::new(user_id))
                .await?,
        ),
        CertificateCommand::Delete { id } => {
            deleted(repo.delete(scope, &Id::new(id.clone())).await, id)
        }
    }
}

fn to_json<T: Serialize>(value: T) -> anyhow::Result<Value> {
    serde_json::to_value(value).context("failed to serialize result")
}

fn deleted(result: Result<(), RepoError>, id: String) -> anyhow::Result<Value> {
    result?;
    info!(%id, "deleted");
    Ok(json!({ "deleted": id }))
}
