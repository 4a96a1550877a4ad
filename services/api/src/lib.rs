mod cli;
mod infra;
mod listing;
mod routes;
mod server;

use student_intake::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
