//! SeaORM entities for the todo service schema.

pub mod todo;
