//! Product and order repository, including the order_product join rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue::NotSet, EntityTrait, ModelTrait, QueryOrder, Set};

use super::entities::order::{self, Entity as OrderEntity};
use super::entities::order_product::{self, Entity as OrderProductEntity};
use super::entities::product::{self, Entity as ProductEntity};
use common::AppResult;
use domain::{Order, Product};
use persistence::{DerivedQuery, QueryArg, Repository, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Order repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert_product(&self, uow: &mut UnitOfWork, name: String) -> AppResult<Product>;

    async fn find_product(&self, uow: &mut UnitOfWork, id: i64) -> AppResult<Option<Product>>;

    /// Products whose id is in `ids`; unknown ids are skipped
    async fn find_products(&self, uow: &mut UnitOfWork, ids: Vec<i64>) -> AppResult<Vec<Product>>;

    async fn insert_order(
        &self,
        uow: &mut UnitOfWork,
        order_date: DateTime<Utc>,
    ) -> AppResult<Order>;

    async fn find_order(&self, uow: &mut UnitOfWork, id: i64) -> AppResult<Option<Order>>;

    /// Insert one join row per product
    async fn attach_products(
        &self,
        uow: &mut UnitOfWork,
        order_id: i64,
        product_ids: Vec<i64>,
    ) -> AppResult<()>;

    /// Products of an order, through the join table
    async fn products_of(&self, uow: &mut UnitOfWork, order: &Order) -> AppResult<Vec<Product>>;

    /// Orders holding a product, through the join table
    async fn orders_containing(&self, uow: &mut UnitOfWork, product: &Product)
        -> AppResult<Vec<Order>>;
}

/// Concrete implementation of OrderRepository
pub struct OrderStore {
    products: Repository<product::ActiveModel>,
    orders: Repository<order::ActiveModel>,
    products_by_id_in: DerivedQuery<ProductEntity>,
}

impl OrderStore {
    /// Create new repository instance
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            products: Repository::new(),
            orders: Repository::new(),
            products_by_id_in: DerivedQuery::parse("findByIdInOrderByIdAsc")?,
        })
    }
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn insert_product(&self, uow: &mut UnitOfWork, name: String) -> AppResult<Product> {
        let active_model = product::ActiveModel {
            id: NotSet,
            name: Set(name),
        };

        let model = self.products.insert(uow, active_model).await?;
        Ok(Product::from(model))
    }

    async fn find_product(&self, uow: &mut UnitOfWork, id: i64) -> AppResult<Option<Product>> {
        let model = self.products.find_by_id(uow, id).await?;
        Ok(model.map(Product::from))
    }

    async fn find_products(&self, uow: &mut UnitOfWork, ids: Vec<i64>) -> AppResult<Vec<Product>> {
        let models = self
            .products
            .find_by(uow, &self.products_by_id_in, &[QueryArg::list(ids)])
            .await?;
        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn insert_order(
        &self,
        uow: &mut UnitOfWork,
        order_date: DateTime<Utc>,
    ) -> AppResult<Order> {
        let active_model = order::ActiveModel {
            id: NotSet,
            order_date: Set(order_date),
        };

        let model = self.orders.insert(uow, active_model).await?;
        Ok(Order::from(model))
    }

    async fn find_order(&self, uow: &mut UnitOfWork, id: i64) -> AppResult<Option<Order>> {
        let model = self.orders.find_by_id(uow, id).await?;
        Ok(model.map(Order::from))
    }

    async fn attach_products(
        &self,
        uow: &mut UnitOfWork,
        order_id: i64,
        product_ids: Vec<i64>,
    ) -> AppResult<()> {
        if product_ids.is_empty() {
            return Ok(());
        }

        let rows = product_ids
            .into_iter()
            .map(|product_id| order_product::ActiveModel {
                order_id: Set(order_id),
                product_id: Set(product_id),
            });

        let conn = uow.conn().await?;
        OrderProductEntity::insert_many(rows)
            .exec_without_returning(conn)
            .await?;
        tracing::debug!(order_id, "Attached products to order");
        Ok(())
    }

    async fn products_of(&self, uow: &mut UnitOfWork, order: &Order) -> AppResult<Vec<Product>> {
        let conn = uow.conn().await?;
        let models = order::Model::from(order.clone())
            .find_related(ProductEntity)
            .order_by_asc(product::Column::Id)
            .all(conn)
            .await?;
        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn orders_containing(
        &self,
        uow: &mut UnitOfWork,
        product: &Product,
    ) -> AppResult<Vec<Order>> {
        let conn = uow.conn().await?;
        let models = product::Model::from(product.clone())
            .find_related(OrderEntity)
            .order_by_asc(order::Column::Id)
            .all(conn)
            .await?;
        Ok(models.into_iter().map(Order::from).collect())
    }
}
