use crate::demo::{
    run_catalog_report, run_demo, run_eligibility_check, CatalogReportArgs, DemoArgs,
    EligibilityCheckArgs,
};
use crate::server;
use campus_placement::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Campus Placement Service",
    about = "Run and demonstrate the campus placement eligibility service from the command line",
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
    /// Evaluate a candidate against a single opportunity
    Eligibility {
        #[command(subcommand)]
        command: EligibilityCommand,
    },
    /// Inspect an opportunity catalog export
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
    /// Walk through the eligibility scenarios and an application lifecycle
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum EligibilityCommand {
    /// Print the decision and the predicate trail behind it
    Check(EligibilityCheckArgs),
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// Import a catalog CSV and list its postings, optionally for one candidate
    Report(CatalogReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Seed the opportunity store from a catalog CSV (overrides APP_CATALOG_CSV)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Eligibility {
            command: EligibilityCommand::Check(args),
        } => run_eligibility_check(args),
        Command::Catalog {
            command: CatalogCommand::Report(args),
        } => run_catalog_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
