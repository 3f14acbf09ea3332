//! Order database entity. The table is `orders`; `order` is reserved in SQL.

use sea_orm::entity::prelude::*;

use domain::Order;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub order_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

/// Products of an order, through `order_product`
impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        super::order_product::Relation::Product.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::order_product::Relation::Order.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Order {
    fn from(model: Model) -> Self {
        Order {
            id: model.id,
            order_date: model.order_date,
        }
    }
}

impl From<Order> for Model {
    fn from(order: Order) -> Self {
        Model {
            id: order.id,
            order_date: order.order_date,
        }
    }
}
