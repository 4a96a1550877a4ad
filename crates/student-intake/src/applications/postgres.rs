use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use tracing::{error, info};

use super::domain::{ApplicationId, NewApplication, StoredApplication};
use super::repository::{ApplicationRepository, RepositoryError};
use crate::config::{DatabaseConfig, DbSslMode};

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS student_applications (
    id SERIAL PRIMARY KEY,
    first_name VARCHAR(255) NOT NULL,
    last_name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL,
    phone VARCHAR(20) NOT NULL,
    date_of_birth DATE NOT NULL,
    address VARCHAR(500) NOT NULL,
    city VARCHAR(100) NOT NULL,
    state VARCHAR(100) NOT NULL,
    zip_code VARCHAR(20) NOT NULL,
    country VARCHAR(100) NOT NULL DEFAULT 'United States',
    program_of_interest VARCHAR(255) NOT NULL,
    previous_education TEXT NOT NULL,
    gpa DECIMAL(3,2),
    test_scores VARCHAR(255),
    extracurricular_activities TEXT,
    personal_statement TEXT NOT NULL,
    application_status VARCHAR(50) NOT NULL DEFAULT 'submitted',
    submitted_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
    created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

const CREATE_CREATED_AT_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS student_applications_created_at_idx
    ON student_applications (created_at DESC, id DESC)
"#;

// Tables created by older deployments carry plain TIMESTAMP columns; the casts let
// both layouts decode as UTC instants (sqlx pins the session time zone to UTC).
const INSERT_APPLICATION: &str = r#"
INSERT INTO student_applications (
    first_name, last_name, email, phone, date_of_birth, address, city, state,
    zip_code, country, program_of_interest, previous_education, gpa, test_scores,
    extracurricular_activities, personal_statement
) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
RETURNING
    id, first_name, last_name, email, phone, date_of_birth, address, city, state,
    zip_code, country, program_of_interest, previous_education, gpa, test_scores,
    extracurricular_activities, personal_statement, application_status,
    submitted_at::timestamptz AS submitted_at, created_at::timestamptz AS created_at
"#;

const LIST_APPLICATIONS: &str = r#"
SELECT
    id, first_name, last_name, email, phone, date_of_birth, address, city, state,
    zip_code, country, program_of_interest, previous_education, gpa, test_scores,
    extracurricular_activities, personal_statement, application_status,
    submitted_at::timestamptz AS submitted_at, created_at::timestamptz AS created_at
FROM student_applications
ORDER BY created_at DESC, id DESC
"#;

const FETCH_APPLICATION: &str = r#"
SELECT
    id, first_name, last_name, email, phone, date_of_birth, address, city, state,
    zip_code, country, program_of_interest, previous_education, gpa, test_scores,
    extracurricular_activities, personal_statement, application_status,
    submitted_at::timestamptz AS submitted_at, created_at::timestamptz AS created_at
FROM student_applications
WHERE id = $1
"#;

/// PostgreSQL-backed gateway sharing one connection pool across requests.
#[derive(Debug, Clone)]
pub struct PgApplicationStore {
    pool: PgPool,
}

impl PgApplicationStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, RepositoryError> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name)
            .ssl_mode(ssl_mode(config.ssl_mode));

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await
            .map_err(|err| {
                error!(
                    host = %config.host,
                    port = config.port,
                    error = %err,
                    "database connection failed"
                );
                RepositoryError::Unavailable(err.to_string())
            })?;

        info!(host = %config.host, database = %config.name, "connected to application store");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Waits for checked-out connections to be returned, then closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ApplicationRepository for PgApplicationStore {
    async fn initialize(&self) -> Result<(), RepositoryError> {
        for statement in [CREATE_TABLE, CREATE_CREATED_AT_INDEX] {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(unavailable)?;
        }
        info!("student_applications table ready");
        Ok(())
    }

    async fn insert(
        &self,
        application: NewApplication,
    ) -> Result<StoredApplication, RepositoryError> {
        sqlx::query_as::<_, StoredApplication>(INSERT_APPLICATION)
            .bind(application.first_name)
            .bind(application.last_name)
            .bind(application.email)
            .bind(application.phone)
            .bind(application.date_of_birth)
            .bind(application.address)
            .bind(application.city)
            .bind(application.state)
            .bind(application.zip_code)
            .bind(application.country)
            .bind(application.program_of_interest)
            .bind(application.previous_education)
            .bind(application.gpa)
            .bind(application.test_scores)
            .bind(application.extracurricular_activities)
            .bind(application.personal_statement)
            .fetch_one(&self.pool)
            .await
            .map_err(insert_failed)
    }

    async fn list(&self) -> Result<Vec<StoredApplication>, RepositoryError> {
        sqlx::query_as::<_, StoredApplication>(LIST_APPLICATIONS)
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)
    }

    async fn fetch(&self, id: ApplicationId) -> Result<Option<StoredApplication>, RepositoryError> {
        sqlx::query_as::<_, StoredApplication>(FETCH_APPLICATION)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)
    }
}

fn ssl_mode(mode: DbSslMode) -> PgSslMode {
    match mode {
        DbSslMode::Disable => PgSslMode::Disable,
        DbSslMode::Prefer => PgSslMode::Prefer,
        DbSslMode::Require => PgSslMode::Require,
    }
}

fn unavailable(err: sqlx::Error) -> RepositoryError {
    RepositoryError::Unavailable(err.to_string())
}

// Constraint and data-range errors (SQLSTATE classes 22 and 23) mean the row itself was refused.
fn insert_failed(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db_error) => {
            let rejected = db_error
                .code()
                .map(|code| code.starts_with("22") || code.starts_with("23"))
                .unwrap_or(false);
            if rejected {
                RepositoryError::InsertFailed(db_error.message().to_string())
            } else {
                RepositoryError::Unavailable(err.to_string())
            }
        }
        _ => RepositoryError::Unavailable(err.to_string()),
    }
}
