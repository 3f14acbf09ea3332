//! Todo domain entity and its request/response types.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::DEFAULT_TODO_ORDER;
use crate::error::{DomainError, DomainResult};

/// Todo item as persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub order: i64,
    pub completed: bool,
}

impl Todo {
    /// Apply every field present on `request`; returns `true` if anything changed.
    pub fn apply(&mut self, request: &TodoRequest) -> bool {
        let before = self.clone();

        if let Some(title) = &request.title {
            self.title = title.clone();
        }
        if let Some(order) = request.order {
            self.order = order;
        }
        if let Some(completed) = request.completed {
            self.completed = completed;
        }

        *self != before
    }
}

/// Todo to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub order: i64,
    pub completed: bool,
}

/// Todo request (create and partial update)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TodoRequest {
    pub id: Option<i64>,
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: Option<String>,
    pub order: Option<i64>,
    pub completed: Option<bool>,
}

impl TodoRequest {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Validate as a create; missing order/completed take their defaults.
    pub fn into_new_todo(self) -> DomainResult<NewTodo> {
        self.validate()?;
        let title = DomainError::require("title", self.title.as_deref())?.to_string();

        Ok(NewTodo {
            title,
            order: self.order.unwrap_or(DEFAULT_TODO_ORDER),
            completed: self.completed.unwrap_or(false),
        })
    }

    /// Validate as a partial update and return the target identity.
    pub fn update_target(&self) -> DomainResult<i64> {
        self.validate()?;
        let id = self
            .id
            .ok_or_else(|| DomainError::validation("id is required"))?;
        if self.title.is_some() {
            DomainError::require("title", self.title.as_deref())?;
        }
        Ok(id)
    }
}

/// Todo response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoResponse {
    pub id: i64,
    pub title: String,
    pub order: i64,
    pub completed: bool,
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            order: todo.order,
            completed: todo.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_applies_defaults() {
        let todo = TodoRequest::titled("Test Title").into_new_todo().unwrap();
        assert_eq!(todo.title, "Test Title");
        assert_eq!(todo.order, DEFAULT_TODO_ORDER);
        assert!(!todo.completed);
    }

    #[test]
    fn create_without_title_fails() {
        assert!(TodoRequest::default().into_new_todo().is_err());
        assert!(TodoRequest::titled("  ").into_new_todo().is_err());
    }

    #[test]
    fn create_keeps_title_as_given() {
        let todo = TodoRequest::titled("  padded ").into_new_todo().unwrap();
        assert_eq!(todo.title, "  padded ");
    }

    #[test]
    fn apply_leaves_absent_fields_alone() {
        let mut todo = Todo {
            id: 123,
            title: "TITLE".to_string(),
            order: 0,
            completed: false,
        };
        let changed = todo.apply(&TodoRequest {
            id: Some(123),
            completed: Some(true),
            ..Default::default()
        });

        assert!(changed);
        assert_eq!(todo.title, "TITLE");
        assert!(todo.completed);
    }
}
