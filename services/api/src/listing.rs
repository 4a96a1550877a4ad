use clap::Args;
use std::fmt;
use student_intake::applications::{
    ApplicationRepository, ApplicationService, PgApplicationStore, StoredApplication,
};
use student_intake::config::AppConfig;
use student_intake::error::AppError;
use student_intake::telemetry;

#[derive(Args, Debug)]
pub(crate) struct ShowArgs {
    /// Application id as assigned at submission
    pub(crate) id: String,
}

async fn open_store() -> Result<PgApplicationStore, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(PgApplicationStore::connect(&config.database).await?)
}

pub(crate) async fn run_init_db() -> Result<(), AppError> {
    let store = open_store().await?;
    let outcome = store.initialize().await;
    store.close().await;
    outcome?;
    println!("student_applications table is ready");
    Ok(())
}

pub(crate) async fn run_list() -> Result<(), AppError> {
    let store = open_store().await?;
    let outcome = store.list().await;
    store.close().await;
    let records = outcome?;

    if records.is_empty() {
        println!("No applications yet.");
        return Ok(());
    }

    println!("{} application(s), most recent first", records.len());
    for record in &records {
        println!("{}", render_summary(record));
    }
    Ok(())
}

pub(crate) async fn run_show(args: ShowArgs) -> Result<(), AppError> {
    let store = open_store().await?;
    let service = ApplicationService::new(std::sync::Arc::new(store.clone()));
    let outcome = service.get(&args.id).await;
    store.close().await;

    match outcome {
        Ok(record) => {
            println!("{}", render_detail(&record));
            Ok(())
        }
        Err(err) if err.is_not_found() => {
            println!("Application {} not found", args.id.trim());
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) fn render_summary(record: &StoredApplication) -> String {
    format!(
        "- #{} {} [{}] | {} | {} | {} | submitted {}",
        record.id,
        record.full_name(),
        record.application_status.to_uppercase(),
        record.email,
        record.phone,
        record.program_of_interest,
        record.created_at.format("%b %-d, %Y"),
    )
}

pub(crate) fn render_detail(record: &StoredApplication) -> String {
    DetailView(record).to_string()
}

/// Multi-section detail layout of a single application.
struct DetailView<'a>(&'a StoredApplication);

impl fmt::Display for DetailView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.0;
        writeln!(f, "Application #{} ({})", record.id, record.application_status)?;

        writeln!(f, "\nPersonal information")?;
        writeln!(f, "  Name: {}", record.full_name())?;
        writeln!(f, "  Email: {}", record.email)?;
        writeln!(f, "  Phone: {}", record.phone)?;
        writeln!(f, "  Date of birth: {}", record.date_of_birth)?;

        writeln!(f, "\nAddress")?;
        writeln!(f, "  {}", record.address)?;
        writeln!(f, "  {}, {} {}", record.city, record.state, record.zip_code)?;
        writeln!(f, "  {}", record.country)?;

        writeln!(f, "\nAcademic information")?;
        writeln!(f, "  Program: {}", record.program_of_interest)?;
        writeln!(f, "  Previous education: {}", record.previous_education)?;
        if let Some(gpa) = record.gpa {
            writeln!(f, "  GPA: {gpa:.2}")?;
        }
        if let Some(scores) = &record.test_scores {
            writeln!(f, "  Test scores: {scores}")?;
        }
        if let Some(activities) = &record.extracurricular_activities {
            writeln!(f, "  Extracurricular activities: {activities}")?;
        }

        writeln!(f, "\nPersonal statement")?;
        writeln!(f, "  {}", record.personal_statement)?;

        write!(
            f,
            "\nSubmitted {}",
            record.submitted_at.format("%B %-d, %Y at %H:%M UTC")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;
    use student_intake::applications::{ApplicationId, NewApplication};

    fn record(gpa: Option<Decimal>) -> StoredApplication {
        let application = NewApplication {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1815, 12, 10).expect("valid date"),
            address: "1 Analytics Way".to_string(),
            city: "London".to_string(),
            state: "N/A".to_string(),
            zip_code: "00000".to_string(),
            country: "United States".to_string(),
            program_of_interest: "Computer Science".to_string(),
            previous_education: "Self-taught".to_string(),
            gpa,
            test_scores: None,
            extracurricular_activities: None,
            personal_statement: "Engines weave algebraic patterns.".to_string(),
        };
        let now = Utc
            .with_ymd_and_hms(2026, 3, 4, 15, 30, 0)
            .single()
            .expect("valid timestamp");
        StoredApplication::from_new(ApplicationId(7), application, now)
    }

    #[test]
    fn summary_line_mirrors_the_listing_card() {
        let line = render_summary(&record(None));
        assert_eq!(
            line,
            "- #7 Ada Lovelace [SUBMITTED] | ada@example.com | 555-0100 | Computer Science | submitted Mar 4, 2026"
        );
    }

    #[test]
    fn detail_omits_absent_optional_fields() {
        let detail = render_detail(&record(None));
        assert!(detail.contains("Application #7 (submitted)"));
        assert!(detail.contains("  London, N/A 00000"));
        assert!(!detail.contains("GPA"));
        assert!(!detail.contains("Test scores"));
        assert!(detail.ends_with("Submitted March 4, 2026 at 15:30 UTC"));
    }

    #[test]
    fn detail_prints_gpa_with_two_decimals() {
        let detail = render_detail(&record(Some(Decimal::new(4, 0))));
        assert!(detail.contains("  GPA: 4.00"));
    }
}
