//! Todo database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Todo;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "todo")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    /// `order` is reserved in SQL
    #[sea_orm(column_name = "todo_order")]
    pub order: i64,
    pub completed: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Todo {
    fn from(model: Model) -> Self {
        Todo {
            id: model.id,
            title: model.title,
            order: model.order,
            completed: model.completed,
        }
    }
}

impl From<Todo> for Model {
    fn from(todo: Todo) -> Self {
        Model {
            id: todo.id,
            title: todo.title,
            order: todo.order,
            completed: todo.completed,
        }
    }
}
