//! Common utilities shared across all services.
//!
//! This crate provides:
//! - Unified error handling
//! - Configuration structures
//! - Pagination types

pub mod config;
pub mod error;
pub mod pagination;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
pub use pagination::{Paginated, PaginationMeta, MAX_PAGE_SIZE};
