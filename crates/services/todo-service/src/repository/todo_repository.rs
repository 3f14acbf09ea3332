//! Todo repository implementation.

use async_trait::async_trait;
use sea_orm::{ActiveValue::NotSet, Set};

use super::entities::todo::{self, ActiveModel, Entity as TodoEntity};
use common::AppResult;
use domain::{NewTodo, Todo};
use persistence::{DerivedQuery, Direction, Repository, Sort, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Todo repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn find_by_id(&self, uow: &mut UnitOfWork, id: i64) -> AppResult<Option<Todo>>;

    /// All todos by sort position, then id
    async fn find_all(&self, uow: &mut UnitOfWork) -> AppResult<Vec<Todo>>;

    async fn count(&self, uow: &mut UnitOfWork) -> AppResult<u64>;

    async fn insert(&self, uow: &mut UnitOfWork, todo: NewTodo) -> AppResult<Todo>;

    fn stage_update(&self, uow: &mut UnitOfWork, before: &Todo, after: &Todo) -> AppResult<()>;

    fn stage_delete(&self, uow: &mut UnitOfWork, todo: &Todo) -> AppResult<()>;

    /// Remove every todo right away; returns the number removed
    async fn delete_all(&self, uow: &mut UnitOfWork) -> AppResult<u64>;
}

/// Concrete implementation of TodoRepository
pub struct TodoStore {
    todos: Repository<ActiveModel>,
    delete_all: DerivedQuery<TodoEntity>,
}

impl TodoStore {
    /// Create new repository instance
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            todos: Repository::new(),
            delete_all: DerivedQuery::parse("deleteAll")?,
        })
    }
}

#[async_trait]
impl TodoRepository for TodoStore {
    async fn find_by_id(&self, uow: &mut UnitOfWork, id: i64) -> AppResult<Option<Todo>> {
        let model = self.todos.find_by_id(uow, id).await?;
        Ok(model.map(Todo::from))
    }

    async fn find_all(&self, uow: &mut UnitOfWork) -> AppResult<Vec<Todo>> {
        let sort = Sort::<TodoEntity>::asc(todo::Column::Order).then(todo::Column::Id, Direction::Asc);
        let models = self.todos.find_all_sorted(uow, &sort).await?;
        Ok(models.into_iter().map(Todo::from).collect())
    }

    async fn count(&self, uow: &mut UnitOfWork) -> AppResult<u64> {
        self.todos.count(uow).await
    }

    async fn insert(&self, uow: &mut UnitOfWork, todo: NewTodo) -> AppResult<Todo> {
        let active_model = ActiveModel {
            id: NotSet,
            title: Set(todo.title),
            order: Set(todo.order),
            completed: Set(todo.completed),
        };

        let model = self.todos.insert(uow, active_model).await?;
        Ok(Todo::from(model))
    }

    fn stage_update(&self, uow: &mut UnitOfWork, before: &Todo, after: &Todo) -> AppResult<()> {
        self.todos
            .stage_update(uow, before.clone().into(), after.clone().into())
    }

    fn stage_delete(&self, uow: &mut UnitOfWork, todo: &Todo) -> AppResult<()> {
        self.todos.stage_delete(uow, todo.clone().into())
    }

    async fn delete_all(&self, uow: &mut UnitOfWork) -> AppResult<u64> {
        self.todos.delete_by(uow, &self.delete_all, &[]).await
    }
}
