//! Sorting and page requests.

use sea_orm::{EntityTrait, Order, QueryOrder, Select};

use common::{AppError, AppResult, MAX_PAGE_SIZE};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl From<Direction> for Order {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Asc => Order::Asc,
            Direction::Desc => Order::Desc,
        }
    }
}

/// Ordered list of `(column, direction)` pairs; earlier entries win.
#[derive(Debug, Clone)]
pub struct Sort<E: EntityTrait> {
    orders: Vec<(E::Column, Direction)>,
}

impl<E: EntityTrait> Default for Sort<E> {
    fn default() -> Self {
        Self::unsorted()
    }
}

impl<E: EntityTrait> Sort<E> {
    /// No ordering; the store decides.
    pub fn unsorted() -> Self {
        Self { orders: Vec::new() }
    }

    pub fn by(column: E::Column, direction: Direction) -> Self {
        Self {
            orders: vec![(column, direction)],
        }
    }

    pub fn asc(column: E::Column) -> Self {
        Self::by(column, Direction::Asc)
    }

    pub fn desc(column: E::Column) -> Self {
        Self::by(column, Direction::Desc)
    }

    /// Add a tie-breaker.
    pub fn then(mut self, column: E::Column, direction: Direction) -> Self {
        self.orders.push((column, direction));
        self
    }

    /// Append all orders of `other` after this one's.
    pub fn and(mut self, other: &Sort<E>) -> Self {
        self.orders.extend(other.orders.iter().copied());
        self
    }

    pub fn is_unsorted(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn orders(&self) -> &[(E::Column, Direction)] {
        &self.orders
    }

    /// Apply the ordering to a select.
    pub fn apply(&self, select: Select<E>) -> Select<E> {
        self.orders
            .iter()
            .fold(select, |select, (column, direction)| {
                select.order_by(*column, Order::from(*direction))
            })
    }
}

/// 0-based page request.
#[derive(Debug, Clone)]
pub struct PageRequest<E: EntityTrait> {
    pub page: u64,
    pub size: u64,
    pub sort: Sort<E>,
}

impl<E: EntityTrait> PageRequest<E> {
    /// Page `page` (0-based) of `size` rows, clamped to `MAX_PAGE_SIZE`.
    pub fn of(page: u64, size: u64) -> Self {
        Self {
            page,
            size: size.min(MAX_PAGE_SIZE),
            sort: Sort::unsorted(),
        }
    }

    pub fn of_sorted(page: u64, size: u64, sort: Sort<E>) -> Self {
        Self::of(page, size).sorted(sort)
    }

    pub fn sorted(mut self, sort: Sort<E>) -> Self {
        self.sort = sort;
        self
    }

    /// The following page with the same size and sort.
    pub fn next(&self) -> Self {
        Self {
            page: self.page + 1,
            size: self.size,
            sort: self.sort.clone(),
        }
    }

    /// Reject empty pages before they reach the store.
    pub fn validate(&self) -> AppResult<()> {
        if self.size == 0 {
            return Err(AppError::validation("page size must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    mod post {
        use sea_orm::entity::prelude::*;

        #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
        #[sea_orm(table_name = "post")]
        pub struct Model {
            #[sea_orm(primary_key)]
            pub id: i64,
            pub title: String,
            pub views: i64,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }

    #[test]
    fn page_size_is_clamped() {
        let request: PageRequest<post::Entity> = PageRequest::of(0, 10_000);
        assert_eq!(request.size, MAX_PAGE_SIZE);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let request: PageRequest<post::Entity> = PageRequest::of(0, 0);
        assert!(matches!(request.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn next_keeps_size_and_sort() {
        let request = PageRequest::of_sorted(0, 5, Sort::<post::Entity>::desc(post::Column::Views));
        let next = request.next();
        assert_eq!(next.page, 1);
        assert_eq!(next.size, 5);
        assert_eq!(next.sort.orders().len(), 1);
    }

    #[test]
    fn sort_applies_orders_in_sequence() {
        let sort = Sort::<post::Entity>::desc(post::Column::Views).then(post::Column::Id, Direction::Asc);
        let sql = sort
            .apply(post::Entity::find())
            .build(DbBackend::Sqlite)
            .to_string();

        assert!(sql.ends_with(r#"ORDER BY "post"."views" DESC, "post"."id" ASC"#));
    }
}
