//! Field rules shared by the creation payload and the stored row.
//!
//! Length limits mirror the column widths of `student_applications`, so a payload that passes
//! here cannot be rejected by the store for size. Program names and the 0.00-4.00 GPA band are
//! advisory only.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use super::domain::{ApplicationSubmission, NewApplication, DEFAULT_COUNTRY};

/// Validation errors raised while turning a submission into an insertable row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaViolation {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{field} must be at most {max} characters (found {found})")]
    TooLong {
        field: &'static str,
        max: usize,
        found: usize,
    },
    #[error("date_of_birth must be a YYYY-MM-DD date (found '{value}')")]
    InvalidDate { value: String },
    #[error("gpa must fit in three digits with two decimals (found {found})")]
    GpaOutOfRange { found: Decimal },
}

pub const NAME_MAX: usize = 255;
pub const EMAIL_MAX: usize = 255;
pub const PHONE_MAX: usize = 20;
pub const ADDRESS_MAX: usize = 500;
pub const REGION_MAX: usize = 100;
pub const ZIP_CODE_MAX: usize = 20;
pub const PROGRAM_MAX: usize = 255;
pub const TEST_SCORES_MAX: usize = 255;

const GPA_SCALE: u32 = 2;

/// Validate a wire submission and apply defaults.
pub fn validate(submission: ApplicationSubmission) -> Result<NewApplication, SchemaViolation> {
    let ApplicationSubmission {
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
    } = submission;

    Ok(NewApplication {
        first_name: required("first_name", first_name, Some(NAME_MAX))?,
        last_name: required("last_name", last_name, Some(NAME_MAX))?,
        email: required("email", email, Some(EMAIL_MAX))?,
        phone: required("phone", phone, Some(PHONE_MAX))?,
        date_of_birth: required_date("date_of_birth", date_of_birth)?,
        address: required("address", address, Some(ADDRESS_MAX))?,
        city: required("city", city, Some(REGION_MAX))?,
        state: required("state", state, Some(REGION_MAX))?,
        zip_code: required("zip_code", zip_code, Some(ZIP_CODE_MAX))?,
        country: optional("country", country, Some(REGION_MAX))?
            .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
        program_of_interest: required(
            "program_of_interest",
            program_of_interest,
            Some(PROGRAM_MAX),
        )?,
        previous_education: required("previous_education", previous_education, None)?,
        gpa: gpa.map(normalize_gpa).transpose()?,
        test_scores: optional("test_scores", test_scores, Some(TEST_SCORES_MAX))?,
        extracurricular_activities: optional(
            "extracurricular_activities",
            extracurricular_activities,
            None,
        )?,
        personal_statement: required("personal_statement", personal_statement, None)?,
    })
}

// Blank counts as missing; the value itself is stored untrimmed.
fn required(
    field: &'static str,
    value: Option<String>,
    max: Option<usize>,
) -> Result<String, SchemaViolation> {
    match value {
        Some(text) if !text.trim().is_empty() => check_length(field, text, max),
        _ => Err(SchemaViolation::MissingField(field)),
    }
}

// Untouched form inputs arrive as "", which is stored as NULL rather than an empty string.
fn optional(
    field: &'static str,
    value: Option<String>,
    max: Option<usize>,
) -> Result<Option<String>, SchemaViolation> {
    match value {
        Some(text) if !text.trim().is_empty() => check_length(field, text, max).map(Some),
        _ => Ok(None),
    }
}

fn required_date(
    field: &'static str,
    value: Option<String>,
) -> Result<NaiveDate, SchemaViolation> {
    let raw = required(field, value, None)?;
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| SchemaViolation::InvalidDate { value: raw })
}

fn check_length(
    field: &'static str,
    text: String,
    max: Option<usize>,
) -> Result<String, SchemaViolation> {
    let Some(max) = max else {
        return Ok(text);
    };

    let found = text.chars().count();
    if found > max {
        return Err(SchemaViolation::TooLong { field, max, found });
    }
    Ok(text)
}

// Same rounding as a DECIMAL(3,2) column applies on insert.
fn normalize_gpa(gpa: Decimal) -> Result<Decimal, SchemaViolation> {
    let rounded = gpa.round_dp_with_strategy(GPA_SCALE, RoundingStrategy::MidpointAwayFromZero);
    if rounded.abs() >= Decimal::TEN {
        return Err(SchemaViolation::GpaOutOfRange { found: gpa });
    }
    Ok(rounded)
}
