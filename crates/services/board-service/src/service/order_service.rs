//! Order service - products and orders joined through order_product.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

use common::{AppError, AppResult, OptionExt};
use domain::{DomainError, OrderDto, ProductDto};
use persistence::{with_read_only, with_transaction, Persistence};

use crate::repository::OrderRepository;

/// Order service trait for dependency injection.
#[async_trait]
pub trait OrderService: Send + Sync {
    async fn register_product(&self, dto: ProductDto) -> AppResult<i64>;

    /// Save an order together with its product links
    async fn place_order(&self, dto: OrderDto) -> AppResult<i64>;

    /// Order with its products
    async fn fetch_order(&self, id: i64) -> AppResult<OrderDto>;

    /// Every order holding the product, each with its products
    async fn orders_containing(&self, product_id: i64) -> AppResult<Vec<OrderDto>>;
}

/// Concrete implementation of OrderService using repository.
pub struct OrderManager {
    persistence: Persistence,
    repo: Arc<dyn OrderRepository>,
}

impl OrderManager {
    pub fn new(persistence: Persistence, repo: Arc<dyn OrderRepository>) -> Self {
        Self { persistence, repo }
    }
}

#[async_trait]
impl OrderService for OrderManager {
    async fn register_product(&self, dto: ProductDto) -> AppResult<i64> {
        dto.validate().map_err(DomainError::from)?;
        let name = DomainError::require("name", Some(dto.name.as_str()))?.to_string();
        let repo = Arc::clone(&self.repo);

        let product = with_transaction!(self.persistence, |uow| repo.insert_product(uow, name).await)?;
        Ok(product.id)
    }

    async fn place_order(&self, dto: OrderDto) -> AppResult<i64> {
        dto.validate().map_err(DomainError::from)?;

        // The join table's key is (order_id, product_id)
        let mut product_ids: Vec<i64> = Vec::with_capacity(dto.product_ids.len());
        for id in dto.product_ids {
            if !product_ids.contains(&id) {
                product_ids.push(id);
            }
        }
        let order_date = dto.order_date.unwrap_or_else(Utc::now);
        let repo = Arc::clone(&self.repo);

        let order_id = with_transaction!(self.persistence, |uow| {
            let products = repo.find_products(uow, product_ids.clone()).await?;
            if products.len() != product_ids.len() {
                return Err(AppError::NotFound);
            }
            let order = repo.insert_order(uow, order_date).await?;
            repo.attach_products(uow, order.id, product_ids).await?;
            Ok(order.id)
        })?;

        tracing::info!(order_id, "Order placed");
        Ok(order_id)
    }

    async fn fetch_order(&self, id: i64) -> AppResult<OrderDto> {
        let repo = Arc::clone(&self.repo);

        with_read_only!(self.persistence, |uow| {
            let order = repo.find_order(uow, id).await?.ok_or_not_found()?;
            let products = repo.products_of(uow, &order).await?;
            Ok(OrderDto::new(order, products))
        })
    }

    async fn orders_containing(&self, product_id: i64) -> AppResult<Vec<OrderDto>> {
        let repo = Arc::clone(&self.repo);

        with_read_only!(self.persistence, |uow| {
            let product = repo.find_product(uow, product_id).await?.ok_or_not_found()?;
            let orders = repo.orders_containing(uow, &product).await?;

            let mut found = Vec::with_capacity(orders.len());
            for order in orders {
                let products = repo.products_of(uow, &order).await?;
                found.push(OrderDto::new(order, products));
            }
            Ok(found)
        })
    }
}
