//! Todo Service Library
//!
//! A todo list with the same create/update/fetch/delete contract as the
//! board service.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use tracing::info;

use common::AppResult;
use domain::TodoRequest;
use persistence::Persistence;

use crate::config::TodoServiceConfig;
use crate::infra::Database;
use crate::repository::TodoStore;
use crate::service::{TodoManager, TodoService};

/// Build the todo service over a connection pool.
pub fn build_service(persistence: Persistence) -> AppResult<Arc<dyn TodoService>> {
    let repo = Arc::new(TodoStore::new()?);
    Ok(Arc::new(TodoManager::new(persistence, repo)))
}

/// Connect, apply pending migrations and build the service.
pub async fn connect(
    config: &TodoServiceConfig,
) -> Result<Arc<dyn TodoService>, Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database).await?;
    let service = build_service(Persistence::new(db.get_connection()))?;
    Ok(service)
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = TodoServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Insert demo todos.
pub async fn seed() -> Result<(), Box<dyn std::error::Error>> {
    let service = connect(&TodoServiceConfig::from_env()).await?;

    for (order, title) in ["Write migrations", "Add repository", "Cover the service"]
        .into_iter()
        .enumerate()
    {
        let request = TodoRequest {
            order: Some(order as i64),
            ..TodoRequest::titled(title)
        };
        let id = service.create(request).await?;
        info!(id, title, "Seeded todo");
    }

    Ok(())
}

/// Print every todo in list order.
pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let service = connect(&TodoServiceConfig::from_env()).await?;

    for todo in service.fetch_all().await? {
        let mark = if todo.completed { "[x]" } else { "[ ]" };
        println!("{} #{} {} (order {})", mark, todo.id, todo.title, todo.order);
    }

    Ok(())
}
