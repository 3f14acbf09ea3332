//! Combined binary for development - drives both services from one CLI.

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "edu-crud")]
#[command(about = "Board and todo services in one binary")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations for all services
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Insert demo data for all services
    Seed,
    /// Print stored boards and todos
    List,
}

#[derive(Subcommand, Clone, Copy)]
enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate { action } => {
            let (board_action, todo_action) = match action {
                MigrateAction::Up => (
                    board_service_lib::MigrateAction::Up,
                    todo_service_lib::MigrateAction::Up,
                ),
                MigrateAction::Down => (
                    board_service_lib::MigrateAction::Down,
                    todo_service_lib::MigrateAction::Down,
                ),
                MigrateAction::Status => (
                    board_service_lib::MigrateAction::Status,
                    todo_service_lib::MigrateAction::Status,
                ),
                MigrateAction::Fresh => (
                    board_service_lib::MigrateAction::Fresh,
                    todo_service_lib::MigrateAction::Fresh,
                ),
            };

            // Fresh drops every table in a shared database, so the todo
            // schema has to be rebuilt after the board reset as well
            info!("Board service migrations");
            board_service_lib::run_migrations(board_action).await?;
            info!("Todo service migrations");
            todo_service_lib::run_migrations(todo_action).await?;
        }
        Commands::Seed => {
            board_service_lib::seed().await?;
            todo_service_lib::seed().await?;
        }
        Commands::List => {
            println!("== boards ==");
            board_service_lib::list().await?;
            println!("== todos ==");
            todo_service_lib::list().await?;
        }
    }

    Ok(())
}
