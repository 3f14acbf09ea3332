//! Board domain record and its transfer objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::INITIAL_VIEW_COUNT;
use crate::error::{DomainError, DomainResult};

/// Board post as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub seq: i64,
    pub title: String,
    pub writer: String,
    pub content: String,
    /// View counter
    pub cnt: i64,
    pub created_at: DateTime<Utc>,
    /// Owning member, if the post was written through a member account
    pub member_id: Option<String>,
}

impl Board {
    /// Apply every field present on `dto`; absent fields are left unchanged.
    ///
    /// Returns `true` when at least one field changed value.
    pub fn apply(&mut self, dto: &BoardDto) -> bool {
        let before = self.clone();

        if let Some(title) = &dto.title {
            self.title = title.clone();
        }
        if let Some(writer) = &dto.writer {
            self.writer = writer.clone();
        }
        if let Some(content) = &dto.content {
            self.content = content.clone();
        }
        if let Some(cnt) = dto.cnt {
            self.cnt = cnt;
        }

        *self != before
    }
}

/// Board to be inserted; identity and timestamp are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBoard {
    pub title: String,
    pub writer: String,
    pub content: String,
    pub cnt: i64,
    pub member_id: Option<String>,
}

impl NewBoard {
    pub fn new(
        title: impl Into<String>,
        writer: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            writer: writer.into(),
            content: content.into(),
            cnt: INITIAL_VIEW_COUNT,
            member_id: None,
        }
    }

    /// Set the view counter
    pub fn with_cnt(mut self, cnt: i64) -> Self {
        self.cnt = cnt;
        self
    }

    /// Attach the post to a member
    pub fn owned_by(mut self, member_id: impl Into<String>) -> Self {
        self.member_id = Some(member_id.into());
        self
    }
}

/// Board transfer object used for create, partial update and fetch.
///
/// On update only `seq` is mandatory; every other `None` field is left
/// untouched on the stored record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BoardDto {
    pub seq: Option<i64>,
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 50, message = "writer must be 1-50 characters"))]
    pub writer: Option<String>,
    pub content: Option<String>,
    #[validate(range(min = 0, message = "cnt cannot be negative"))]
    pub cnt: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl BoardDto {
    /// Convenience constructor for a create request.
    pub fn new(
        title: impl Into<String>,
        writer: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            writer: Some(writer.into()),
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Validate the request as a create and turn it into a [`NewBoard`].
    pub fn into_new_board(self) -> DomainResult<NewBoard> {
        self.validate()?;
        let title = DomainError::require("title", self.title.as_deref())?.to_string();
        let writer = DomainError::require("writer", self.writer.as_deref())?.to_string();
        let content = DomainError::require("content", self.content.as_deref())?.to_string();

        Ok(NewBoard {
            title,
            writer,
            content,
            cnt: self.cnt.unwrap_or(INITIAL_VIEW_COUNT),
            member_id: None,
        })
    }

    /// Validate the request as a partial update and return the target identity.
    pub fn update_target(&self) -> DomainResult<i64> {
        self.validate()?;
        let seq = self
            .seq
            .ok_or_else(|| DomainError::validation("seq is required"))?;

        for (field, value) in [
            ("title", &self.title),
            ("writer", &self.writer),
            ("content", &self.content),
        ] {
            if value.is_some() {
                DomainError::require(field, value.as_deref())?;
            }
        }

        Ok(seq)
    }
}

impl From<Board> for BoardDto {
    fn from(board: Board) -> Self {
        Self {
            seq: Some(board.seq),
            title: Some(board.title),
            writer: Some(board.writer),
            content: Some(board.content),
            cnt: Some(board.cnt),
            created_at: Some(board.created_at),
        }
    }
}

/// Projection row of the board listing (`seq`, `title`, `writer`, `created_at`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSummary {
    pub seq: i64,
    pub title: String,
    pub writer: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Board {
        Board {
            seq: 1,
            title: "JPA".to_string(),
            writer: "이순신".to_string(),
            content: "X".to_string(),
            cnt: 3,
            created_at: Utc::now(),
            member_id: None,
        }
    }

    #[test]
    fn apply_changes_only_present_fields() {
        let mut board = stored();
        let dto = BoardDto {
            seq: Some(1),
            title: Some("AWS".to_string()),
            ..Default::default()
        };

        assert!(board.apply(&dto));
        assert_eq!(board.title, "AWS");
        assert_eq!(board.content, "X");
        assert_eq!(board.writer, "이순신");
        assert_eq!(board.cnt, 3);
    }

    #[test]
    fn apply_reports_no_change_for_identical_values() {
        let mut board = stored();
        let dto = BoardDto {
            seq: Some(1),
            title: Some("JPA".to_string()),
            ..Default::default()
        };

        assert!(!board.apply(&dto));
    }

    #[test]
    fn create_requires_title_writer_and_content() {
        let missing_content = BoardDto {
            title: Some("MVC".to_string()),
            writer: Some("홍길동".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            missing_content.into_new_board(),
            Err(DomainError::Validation(msg)) if msg == "content is required"
        ));

        let board = BoardDto::new("MVC", "홍길동", "Model, View, Controller")
            .into_new_board()
            .unwrap();
        assert_eq!(board.cnt, INITIAL_VIEW_COUNT);
        assert_eq!(board.title, "MVC");
    }

    #[test]
    fn create_keeps_surrounding_whitespace() {
        let board = BoardDto::new(" JPA ", "kim ", "\tX")
            .into_new_board()
            .unwrap();
        assert_eq!(board.title, " JPA ");
        assert_eq!(board.writer, "kim ");
        assert_eq!(board.content, "\tX");
    }

    #[test]
    fn create_rejects_overlong_title() {
        let dto = BoardDto::new("t".repeat(201), "w", "c");
        assert!(matches!(
            dto.into_new_board(),
            Err(DomainError::Validation(msg)) if msg.contains("title")
        ));
    }

    #[test]
    fn update_requires_seq() {
        let dto = BoardDto {
            title: Some("Spring".to_string()),
            ..Default::default()
        };
        assert!(dto.update_target().is_err());

        let dto = BoardDto {
            seq: Some(7),
            ..dto
        };
        assert_eq!(dto.update_target().unwrap(), 7);
    }

    #[test]
    fn update_rejects_blank_present_field() {
        let dto = BoardDto {
            seq: Some(7),
            content: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(dto.update_target().is_err());
    }
}
