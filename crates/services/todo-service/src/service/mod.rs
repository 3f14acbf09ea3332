//! Service layer - one unit of work per call.

mod todo_service;

pub use todo_service::{TodoManager, TodoService};
