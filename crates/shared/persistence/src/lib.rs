//! Persistence building blocks shared by the service crates.
//!
//! - [`Database`]: connection management and migration commands
//! - [`Persistence`] / [`UnitOfWork`]: transaction scope per service call,
//!   with updates and deletes staged until commit
//! - [`Repository`]: generic CRUD over any SeaORM entity
//! - [`DerivedQuery`]: finder methods declared by name
//!   (`findByWriterAndCntGreaterThan`) and compiled against the entity

pub mod db;
pub mod query;
pub mod repository;
pub mod sort;
pub mod unit_of_work;

pub use db::Database;
pub use query::{text_match, Comparator, DerivedQuery, QueryArg, QueryError, Subject};
pub use repository::{PrimaryKeyOf, Repository};
pub use sort::{Direction, PageRequest, Sort};
pub use unit_of_work::{Persistence, UnitFuture, UnitOfWork};

#[doc(hidden)]
pub mod __private {
    pub use common::AppResult;
}

/// Run a closure inside a read/write unit of work.
///
/// Shorthand for `persistence.transaction(move |uow| Box::pin(async move { .. }))`.
#[macro_export]
macro_rules! with_transaction {
    ($persistence:expr, |$uow:ident| $body:expr) => {
        $persistence
            .transaction(move |$uow| {
                Box::pin(async move {
                    let result: $crate::__private::AppResult<_> = $body;
                    result
                })
            })
            .await
    };
}

/// Run a closure inside a read-only unit of work.
#[macro_export]
macro_rules! with_read_only {
    ($persistence:expr, |$uow:ident| $body:expr) => {
        $persistence
            .read_only(move |$uow| {
                Box::pin(async move {
                    let result: $crate::__private::AppResult<_> = $body;
                    result
                })
            })
            .await
    };
}
