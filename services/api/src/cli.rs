use crate::listing::{run_init_db, run_list, run_show, ShowArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use student_intake::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Student Application Intake",
    about = "Serve and review student applications from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Create the student_applications table if it does not exist, then exit
    InitDb,
    /// Review submitted applications
    Applications {
        #[command(subcommand)]
        command: ApplicationsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ApplicationsCommand {
    /// List every application, most recent first
    List,
    /// Show the full detail of one application
    Show(ShowArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Keep applications in process memory instead of PostgreSQL
    #[arg(long)]
    pub(crate) in_memory: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::InitDb => run_init_db().await,
        Command::Applications {
            command: ApplicationsCommand::List,
        } => run_list().await,
        Command::Applications {
            command: ApplicationsCommand::Show(args),
        } => run_show(args).await,
    }
}
