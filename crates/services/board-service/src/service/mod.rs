//! Service layer - one unit of work per call.

mod board_service;
mod member_service;
mod order_service;

pub use board_service::{BoardManager, BoardService};
pub use member_service::{MemberManager, MemberService};
pub use order_service::{OrderManager, OrderService};
