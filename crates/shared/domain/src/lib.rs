//! Domain layer - Core business records and transfer objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Records are shared by the service crates; transfer objects are the flat
//! shapes exchanged with callers.

pub mod board;
pub mod constants;
pub mod error;
pub mod member;
pub mod order;
pub mod todo;

pub use board::{Board, BoardDto, BoardSummary, NewBoard};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use member::{Member, MemberDto, MemberRole, Profile, ProfileDto, RegisterMember};
pub use order::{Order, OrderDto, Product, ProductDto};
pub use todo::{NewTodo, Todo, TodoRequest, TodoResponse};
