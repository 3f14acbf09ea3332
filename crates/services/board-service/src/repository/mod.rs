//! Repository layer for data access.
//!
//! Repositories never open transactions; every call runs in the
//! [`UnitOfWork`](persistence::UnitOfWork) handed in by the service layer.

pub mod entities;
mod board_repository;
mod member_repository;
mod order_repository;

pub use board_repository::{BoardRepository, BoardStore};
pub use member_repository::{MemberRepository, MemberStore};
pub use order_repository::{OrderRepository, OrderStore};

#[cfg(any(test, feature = "test-utils"))]
pub use board_repository::MockBoardRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use member_repository::MockMemberRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use order_repository::MockOrderRepository;
