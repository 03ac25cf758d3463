use anyhow::Result;
use branch_office_core::{config::Config, migration, server, telemetry};
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(name = "branch-office-core", version, about = "Branch office directory service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Do not apply pending migrations on startup
        #[arg(long)]
        skip_migrations: bool,
    },
    /// Create the database if needed and apply migrations, then exit
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let prometheus_handle = telemetry::init(&config.telemetry)?;

    match cli.command.unwrap_or(Command::Serve {
        skip_migrations: false,
    }) {
        Command::Serve { skip_migrations } => {
            info!("Starting Branch Office Core Service");
            info!("HTTP server listening on {}", config.http_addr());
            server::run(config, prometheus_handle, skip_migrations).await
        }
        Command::Migrate => migration::run_migrations(&config).await,
    }
}
