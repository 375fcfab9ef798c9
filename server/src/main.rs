use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use server::{
    config::AppConfig,
    http::{self, AppState, ServeConfig},
};
use service::{EmployeeError, EmployeeService, NewEmployee};
use tracing::{Level, info};

#[derive(Parser, Debug)]
#[command(name = "staffdir-server", version, about = "Staffdir employee directory")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server.
    Serve(ServeCommand),
    /// Run database migrations (up|down|reset).
    Migrate {
        #[arg(long, default_value = "up")]
        action: String,
    },
    /// Insert a handful of demo employees.
    Seed,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

impl From<ServeCommand> for ServeConfig {
    fn from(value: ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let config = Arc::new(AppConfig::load());
    let db = Arc::new(Database::connect(&config.database_url).await?);

    match cli.command {
        Command::Serve(cmd) => {
            Migrator::up(db.as_ref(), None).await?;
            let state = AppState {
                db: db.clone(),
                employees: EmployeeService::new(db.clone()),
                config: config.clone(),
            };
            http::serve(cmd.into(), state).await
        }
        Command::Migrate { action } => {
            match action.as_str() {
                "up" => Migrator::up(db.as_ref(), None).await?,
                "down" => Migrator::down(db.as_ref(), None).await?,
                "reset" => Migrator::reset(db.as_ref()).await?,
                _ => anyhow::bail!("unknown action: {} (use up|down|reset)", action),
            }
            Ok(())
        }
        Command::Seed => {
            Migrator::up(db.as_ref(), None).await?;
            seed(&EmployeeService::new(db.clone())).await
        }
    }
}

async fn seed(employees: &EmployeeService) -> Result<()> {
    let fixtures = [
        ("Ada", "Lovelace", "ada.lovelace@example.com"),
        ("Grace", "Hopper", "grace.hopper@example.com"),
        ("Edsger", "Dijkstra", "edsger.dijkstra@example.com"),
    ];
    for (first_name, last_name, email) in fixtures {
        let input = NewEmployee {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        };
        match employees.create(input).await {
            Ok(created) => info!(id = created.id, email, "seeded employee"),
            Err(EmployeeError::DuplicateEmail(_)) => {
                info!(email, "employee already present; skipping");
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}
