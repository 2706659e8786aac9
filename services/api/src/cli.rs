use crate::commands::{
    run_costing, run_inventory, run_plans, run_projects, CostingArgs, InventoryArgs, ProjectsArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use costsheet::config::AppConfig;
use costsheet::error::AppError;
use costsheet::telemetry::{self, LogSink};

#[derive(Parser, Debug)]
#[command(
    name = "costsheet",
    about = "Compute unit cost sheets and browse the project catalog",
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
    /// List the configured costing plans and the labels that select them
    Plans,
    /// List catalog projects, or show one project's details
    Projects(ProjectsArgs),
    /// Show available units for a project
    Inventory(InventoryArgs),
    /// Compute a cost sheet for one unit
    Costing(CostingArgs),
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
        Command::Plans => {
            run_plans();
            Ok(())
        }
        Command::Projects(args) => run_projects(&tool_config()?, args).await,
        Command::Inventory(args) => run_inventory(&tool_config()?, args).await,
        Command::Costing(args) => run_costing(&tool_config()?, args).await,
    }
}

/// Configuration for one-shot commands; logs go to stderr so stdout stays the
/// command's output.
fn tool_config() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, LogSink::Stderr)?;
    Ok(config)
}
