//! Product and order records (many-to-many through order lines).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Product domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
}

/// Order domain entity; its products are reached through the join table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_date: DateTime<Utc>,
}

/// Product transfer object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ProductDto {
    pub id: Option<i64>,
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
}

impl ProductDto {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        Self {
            id: Some(product.id),
            name: product.name,
        }
    }
}

/// Order transfer object.
///
/// On placement `product_ids` lists the products to attach; on fetch
/// `products` carries the attached products.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct OrderDto {
    pub id: Option<i64>,
    pub order_date: Option<DateTime<Utc>>,
    #[validate(length(min = 1, message = "an order needs at least one product"))]
    #[serde(default)]
    pub product_ids: Vec<i64>,
    #[serde(default)]
    pub products: Vec<ProductDto>,
}

impl OrderDto {
    pub fn with_products(product_ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            product_ids: product_ids.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn new(order: Order, products: Vec<Product>) -> Self {
        Self {
            id: Some(order.id),
            order_date: Some(order.order_date),
            product_ids: products.iter().map(|p| p.id).collect(),
            products: products.into_iter().map(ProductDto::from).collect(),
        }
    }
}
