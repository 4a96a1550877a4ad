use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Country stored when the applicant leaves the field out.
pub const DEFAULT_COUNTRY: &str = "United States";

/// Status assigned to every new application. Nothing in this service moves it forward.
pub const SUBMITTED_STATUS: &str = "submitted";

/// Programs offered on the intake form. The store accepts any text.
pub const KNOWN_PROGRAMS: [&str; 9] = [
    "Computer Science",
    "Engineering",
    "Business Administration",
    "Medicine",
    "Law",
    "Arts and Humanities",
    "Natural Sciences",
    "Social Sciences",
    "Other",
];

pub fn is_known_program(program: &str) -> bool {
    KNOWN_PROGRAMS.contains(&program)
}

/// Store-assigned identifier of a student application.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct ApplicationId(pub i32);

impl ApplicationId {
    /// Reads an id from a path segment. Anything other than a positive integer yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim()
            .parse::<i32>()
            .ok()
            .filter(|value| *value > 0)
            .map(Self)
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Creation payload as it arrives on the wire.
///
/// Every field is optional here so that a missing value can be reported by name instead of
/// surfacing as an opaque deserialization failure. System-managed fields (`id`, timestamps,
/// `application_status`) are not part of the payload and are ignored if a client sends them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSubmission {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub program_of_interest: Option<String>,
    pub previous_education: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub gpa: Option<Decimal>,
    pub test_scores: Option<String>,
    pub extracurricular_activities: Option<String>,
    pub personal_statement: Option<String>,
}

/// A submission that passed the record schema and is ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub program_of_interest: String,
    pub previous_education: String,
    pub gpa: Option<Decimal>,
    pub test_scores: Option<String>,
    pub extracurricular_activities: Option<String>,
    pub personal_statement: String,
}

/// Persisted application as returned by the list and detail endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredApplication {
    pub id: ApplicationId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub program_of_interest: String,
    pub previous_education: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub gpa: Option<Decimal>,
    pub test_scores: Option<String>,
    pub extracurricular_activities: Option<String>,
    pub personal_statement: String,
    pub application_status: String,
    pub submitted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl StoredApplication {
    /// Materializes a row for stores that assign ids and timestamps themselves.
    pub fn from_new(id: ApplicationId, application: NewApplication, now: DateTime<Utc>) -> Self {
        let NewApplication {
            first_name,
            last_name,
            email,
            phone,
            date_of_birth,
            address,
            city,
            state,
            zip_code,
            country,
            program_of_interest,
            previous_education,
            gpa,
            test_scores,
            extracurricular_activities,
            personal_statement,
        } = application;

        Self {
            id,
            first_name,
            last_name,
            email,
            phone,
            date_of_birth,
            address,
            city,
            state,
            zip_code,
            country,
            program_of_interest,
            previous_education,
            gpa,
            test_scores,
            extracurricular_activities,
            personal_statement,
            application_status: SUBMITTED_STATUS.to_string(),
            submitted_at: now,
            created_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn receipt(&self) -> SubmissionReceipt {
        SubmissionReceipt {
            id: self.id,
            created_at: self.created_at,
        }
    }
}

/// Body returned after a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub id: ApplicationId,
    pub created_at: DateTime<Utc>,
}
