//! SeaORM entities for the board service schema.

pub mod board;
pub mod member;
pub mod order;
pub mod order_product;
pub mod product;
pub mod profile;
