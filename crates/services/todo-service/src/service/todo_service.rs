//! Todo service - Handles todo-related business logic.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppResult, OptionExt};
use domain::{TodoRequest, TodoResponse};
use persistence::{with_read_only, with_transaction, Persistence};

use crate::repository::TodoRepository;

/// Todo service trait for dependency injection.
#[async_trait]
pub trait TodoService: Send + Sync {
    /// Create a todo and return its id. Missing order and completed take defaults.
    async fn create(&self, request: TodoRequest) -> AppResult<i64>;

    /// Apply the present fields of `request` to todo `request.id`
    async fn update(&self, request: TodoRequest) -> AppResult<i64>;

    async fn fetch_one(&self, id: i64) -> AppResult<TodoResponse>;

    async fn fetch_all(&self) -> AppResult<Vec<TodoResponse>>;

    async fn delete(&self, id: i64) -> AppResult<()>;

    /// Remove every todo; returns how many were removed
    async fn delete_all(&self) -> AppResult<u64>;
}

/// Concrete implementation of TodoService using repository.
pub struct TodoManager {
    persistence: Persistence,
    repo: Arc<dyn TodoRepository>,
}

impl TodoManager {
    pub fn new(persistence: Persistence, repo: Arc<dyn TodoRepository>) -> Self {
        Self { persistence, repo }
    }
}

#[async_trait]
impl TodoService for TodoManager {
    async fn create(&self, request: TodoRequest) -> AppResult<i64> {
        let new_todo = request.into_new_todo()?;
        let repo = Arc::clone(&self.repo);

        let todo = with_transaction!(self.persistence, |uow| repo.insert(uow, new_todo).await)?;
        Ok(todo.id)
    }

    async fn update(&self, request: TodoRequest) -> AppResult<i64> {
        let id = request.update_target()?;
        let repo = Arc::clone(&self.repo);

        with_transaction!(self.persistence, |uow| {
            let before = repo.find_by_id(uow, id).await?.ok_or_not_found()?;
            let mut after = before.clone();
            if after.apply(&request) {
                repo.stage_update(uow, &before, &after)?;
            }
            Ok(id)
        })
    }

    async fn fetch_one(&self, id: i64) -> AppResult<TodoResponse> {
        let repo = Arc::clone(&self.repo);

        let todo = with_read_only!(self.persistence, |uow| repo.find_by_id(uow, id).await)?;
        todo.map(TodoResponse::from).ok_or_not_found()
    }

    async fn fetch_all(&self) -> AppResult<Vec<TodoResponse>> {
        let repo = Arc::clone(&self.repo);

        let todos = with_read_only!(self.persistence, |uow| repo.find_all(uow).await)?;
        Ok(todos.into_iter().map(TodoResponse::from).collect())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let repo = Arc::clone(&self.repo);

        with_transaction!(self.persistence, |uow| {
            let todo = repo.find_by_id(uow, id).await?.ok_or_not_found()?;
            repo.stage_delete(uow, &todo)
        })
    }

    async fn delete_all(&self) -> AppResult<u64> {
        let repo = Arc::clone(&self.repo);

        let removed = with_transaction!(self.persistence, |uow| repo.delete_all(uow).await)?;
        tracing::info!(removed, "Deleted all todos");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{AppError, DatabaseConfig};
    use domain::Todo;
    use tokio_test::assert_ok;

    use crate::infra::Database;
    use crate::repository::MockTodoRepository;

    async fn service(repo: MockTodoRepository) -> TodoManager {
        let db = Database::connect_without_migrations(&DatabaseConfig::in_memory())
            .await
            .unwrap();
        TodoManager::new(Persistence::new(db.get_connection()), Arc::new(repo))
    }

    fn create_test_todo(id: i64) -> Todo {
        Todo {
            id,
            title: "TITLE".to_string(),
            order: 0,
            completed: false,
        }
    }

    #[tokio::test]
    async fn test_create_keeps_title() {
        let mut repo = MockTodoRepository::new();
        repo.expect_insert()
            .withf(|_, todo| todo.title == "Test Title" && !todo.completed)
            .returning(|_, todo| {
                Ok(Todo {
                    id: 1,
                    title: todo.title,
                    order: todo.order,
                    completed: todo.completed,
                })
            });

        let service = service(repo).await;
        let id = service.create(TodoRequest::titled("Test Title")).await.unwrap();

        assert_eq!(id, 1);
    }

    #[tokio::test]
    async fn test_fetch_one_maps_every_field() {
        let mut repo = MockTodoRepository::new();
        repo.expect_find_by_id()
            .withf(|_, id| *id == 123)
            .returning(|_, id| Ok(Some(create_test_todo(id))));

        let service = service(repo).await;
        let actual = service.fetch_one(123).await.unwrap();
        let expected = create_test_todo(123);

        assert_eq!(actual.id, expected.id);
        assert_eq!(actual.title, expected.title);
        assert_eq!(actual.order, expected.order);
        assert_eq!(actual.completed, expected.completed);
    }

    #[tokio::test]
    async fn test_fetch_one_missing_is_not_found() {
        let mut repo = MockTodoRepository::new();
        repo.expect_find_by_id().returning(|_, _| Ok(None));

        let service = service(repo).await;

        assert!(matches!(service.fetch_one(123).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_stages_completed_only() {
        let mut repo = MockTodoRepository::new();
        repo.expect_find_by_id()
            .returning(|_, id| Ok(Some(create_test_todo(id))));
        repo.expect_stage_update()
            .withf(|_, before, after| {
                !before.completed && after.completed && after.title == "TITLE"
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = service(repo).await;
        let request = TodoRequest {
            id: Some(123),
            completed: Some(true),
            ..Default::default()
        };

        assert_eq!(service.update(request).await.unwrap(), 123);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let mut repo = MockTodoRepository::new();
        repo.expect_find_by_id().returning(|_, _| Ok(None));

        let service = service(repo).await;

        assert!(matches!(service.delete(1).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_stages_loaded_todo() {
        let mut repo = MockTodoRepository::new();
        repo.expect_find_by_id()
            .returning(|_, id| Ok(Some(create_test_todo(id))));
        repo.expect_stage_delete()
            .withf(|_, todo| todo.id == 7)
            .times(1)
            .returning(|_, _| Ok(()));

        let service = service(repo).await;
        assert_ok!(service.delete(7).await);
    }
}
