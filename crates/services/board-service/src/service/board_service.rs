//! Board service - Handles board-related business logic.
//!
//! Each call runs in its own unit of work: read/write for create, update and
//! delete, read-only for fetches. Updates and deletes are staged against the
//! record loaded in the same unit and written when it commits.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppResult, OptionExt, Paginated};
use domain::{BoardDto, BoardSummary};
use persistence::{with_read_only, with_transaction, Persistence};

use crate::repository::BoardRepository;

/// Board service trait for dependency injection.
#[async_trait]
pub trait BoardService: Send + Sync {
    /// Create a board and return its assigned `seq`
    async fn create(&self, dto: BoardDto) -> AppResult<i64>;

    /// Apply the present fields of `dto` to board `dto.seq`
    async fn update(&self, dto: BoardDto) -> AppResult<i64>;

    async fn fetch_one(&self, seq: i64) -> AppResult<BoardDto>;

    async fn fetch_all(&self) -> AppResult<Vec<BoardDto>>;

    async fn delete(&self, seq: i64) -> AppResult<()>;

    /// 0-based page of boards, most viewed first
    async fn fetch_page(&self, page: u64, size: u64) -> AppResult<Paginated<BoardDto>>;

    /// Boards whose title contains `keyword`, newest first
    async fn search(&self, keyword: &str) -> AppResult<Vec<BoardDto>>;

    /// Listing rows for the same search
    async fn list_summaries(&self, keyword: &str) -> AppResult<Vec<BoardSummary>>;
}

/// Concrete implementation of BoardService using repository.
pub struct BoardManager {
    persistence: Persistence,
    repo: Arc<dyn BoardRepository>,
}

impl BoardManager {
    /// Create new board service instance
    pub fn new(persistence: Persistence, repo: Arc<dyn BoardRepository>) -> Self {
        Self { persistence, repo }
    }
}

#[async_trait]
impl BoardService for BoardManager {
    async fn create(&self, dto: BoardDto) -> AppResult<i64> {
        let new_board = dto.into_new_board()?;
        let repo = Arc::clone(&self.repo);

        let board = with_transaction!(self.persistence, |uow| repo.insert(uow, new_board).await)?;
        tracing::info!(seq = board.seq, "Board created");
        Ok(board.seq)
    }

    async fn update(&self, dto: BoardDto) -> AppResult<i64> {
        let seq = dto.update_target()?;
        let repo = Arc::clone(&self.repo);

        with_transaction!(self.persistence, |uow| {
            let before = repo.find_by_id(uow, seq).await?.ok_or_not_found()?;
            let mut after = before.clone();
            if after.apply(&dto) {
                repo.stage_update(uow, &before, &after)?;
            }
            Ok(seq)
        })
    }

    async fn fetch_one(&self, seq: i64) -> AppResult<BoardDto> {
        let repo = Arc::clone(&self.repo);

        let board = with_read_only!(self.persistence, |uow| repo.find_by_id(uow, seq).await)?;
        board.map(BoardDto::from).ok_or_not_found()
    }

    async fn fetch_all(&self) -> AppResult<Vec<BoardDto>> {
        let repo = Arc::clone(&self.repo);

        let boards = with_read_only!(self.persistence, |uow| repo.find_all(uow).await)?;
        Ok(boards.into_iter().map(BoardDto::from).collect())
    }

    async fn delete(&self, seq: i64) -> AppResult<()> {
        let repo = Arc::clone(&self.repo);

        with_transaction!(self.persistence, |uow| {
            let board = repo.find_by_id(uow, seq).await?.ok_or_not_found()?;
            repo.stage_delete(uow, &board)
        })?;
        tracing::info!(seq, "Board deleted");
        Ok(())
    }

    async fn fetch_page(&self, page: u64, size: u64) -> AppResult<Paginated<BoardDto>> {
        let repo = Arc::clone(&self.repo);

        let boards =
            with_read_only!(self.persistence, |uow| repo.find_page(uow, page, size).await)?;
        Ok(boards.map(BoardDto::from))
    }

    async fn search(&self, keyword: &str) -> AppResult<Vec<BoardDto>> {
        let repo = Arc::clone(&self.repo);
        let keyword = keyword.to_string();

        let boards = with_read_only!(self.persistence, |uow| repo.search(uow, &keyword).await)?;
        Ok(boards.into_iter().map(BoardDto::from).collect())
    }

    async fn list_summaries(&self, keyword: &str) -> AppResult<Vec<BoardSummary>> {
        let repo = Arc::clone(&self.repo);
        let keyword = keyword.to_string();

        with_read_only!(self.persistence, |uow| repo.summaries(uow, &keyword).await)
    }
}
