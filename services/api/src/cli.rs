use crate::demo::{run_demo, run_rules, run_validate, DemoArgs, RulesArgs, ValidateArgs};
use crate::server;
use admission_intake::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Admission Intake",
    about = "Validate candidate admission forms, manage waivers, and keep the audit log",
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
    /// Validate an intake draft stored as JSON and print the report
    Validate(ValidateArgs),
    /// Walk sample candidates through validation, waivers, and submission
    Demo(DemoArgs),
    /// Print the active rule set as JSON
    Rules(RulesArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Validate(args) => run_validate(args),
        Command::Demo(args) => run_demo(args),
        Command::Rules(args) => run_rules(args),
    }
}
