//! Member service - registration, profile and withdrawal.
//!
//! Boards and the profile point at their member; the member row holds
//! neither, so both are read back through their own repositories.

use async_trait::async_trait;
use std::sync::Arc;
use validator::Validate;

use common::{AppError, AppResult, OptionExt};
use domain::{BoardDto, DomainError, MemberDto, ProfileDto, RegisterMember};
use persistence::{with_read_only, with_transaction, Persistence};

use crate::repository::{BoardRepository, MemberRepository};

/// Member service trait for dependency injection.
#[async_trait]
pub trait MemberService: Send + Sync {
    /// Register a member, with its boards when cascading is enabled
    async fn register(&self, request: RegisterMember) -> AppResult<String>;

    /// Member with its profile, if any
    async fn fetch_member(&self, id: &str) -> AppResult<MemberDto>;

    async fn boards_of(&self, id: &str) -> AppResult<Vec<BoardDto>>;

    /// Give a member its profile; a member has at most one
    async fn attach_profile(&self, id: &str, profile: ProfileDto) -> AppResult<i64>;

    /// Delete a member. Boards go with it; a profile blocks the delete.
    async fn withdraw(&self, id: &str) -> AppResult<()>;
}

/// Concrete implementation of MemberService using repositories.
pub struct MemberManager {
    persistence: Persistence,
    members: Arc<dyn MemberRepository>,
    boards: Arc<dyn BoardRepository>,
    cascade_boards: bool,
}

impl MemberManager {
    pub fn new(
        persistence: Persistence,
        members: Arc<dyn MemberRepository>,
        boards: Arc<dyn BoardRepository>,
    ) -> Self {
        Self {
            persistence,
            members,
            boards,
            cascade_boards: true,
        }
    }

    /// Enable or disable saving boards along with their member.
    pub fn with_cascade(mut self, cascade_boards: bool) -> Self {
        self.cascade_boards = cascade_boards;
        self
    }
}

#[async_trait]
impl MemberService for MemberManager {
    async fn register(&self, request: RegisterMember) -> AppResult<String> {
        let member = request.to_member()?;

        let boards = if self.cascade_boards {
            request
                .boards
                .into_iter()
                .map(|dto| {
                    dto.into_new_board()
                        .map(|board| board.owned_by(member.id.clone()))
                })
                .collect::<Result<Vec<_>, DomainError>>()?
        } else {
            if !request.boards.is_empty() {
                tracing::warn!(
                    member = %member.id,
                    dropped = request.boards.len(),
                    "Board cascade disabled; boards submitted with the member are not saved"
                );
            }
            Vec::new()
        };

        let members = Arc::clone(&self.members);
        let board_repo = Arc::clone(&self.boards);

        let id = with_transaction!(self.persistence, |uow| {
            if members.exists_by_id(uow, &member.id).await? {
                return Err(AppError::conflict("Member"));
            }
            let member = members.insert(uow, member).await?;
            for board in boards {
                board_repo.insert(uow, board).await?;
            }
            Ok(member.id)
        })?;

        tracing::info!(member = %id, "Member registered");
        Ok(id)
    }

    async fn fetch_member(&self, id: &str) -> AppResult<MemberDto> {
        let members = Arc::clone(&self.members);
        let id = id.to_string();

        with_read_only!(self.persistence, |uow| {
            let member = members.find_by_id(uow, &id).await?.ok_or_not_found()?;
            let profile = members.find_profile(uow, &id).await?;
            Ok(MemberDto::new(member, profile))
        })
    }

    async fn boards_of(&self, id: &str) -> AppResult<Vec<BoardDto>> {
        let members = Arc::clone(&self.members);
        let boards = Arc::clone(&self.boards);
        let id = id.to_string();

        let found = with_read_only!(self.persistence, |uow| {
            if !members.exists_by_id(uow, &id).await? {
                return Err(AppError::NotFound);
            }
            boards.find_by_member_id(uow, &id).await
        })?;
        Ok(found.into_iter().map(BoardDto::from).collect())
    }

    async fn attach_profile(&self, id: &str, profile: ProfileDto) -> AppResult<i64> {
        profile.validate().map_err(DomainError::from)?;
        let members = Arc::clone(&self.members);
        let id = id.to_string();

        let profile = with_transaction!(self.persistence, |uow| {
            if !members.exists_by_id(uow, &id).await? {
                return Err(AppError::NotFound);
            }
            if members.find_profile(uow, &id).await?.is_some() {
                return Err(AppError::conflict("Profile"));
            }
            members.insert_profile(uow, &id, profile).await
        })?;
        Ok(profile.id)
    }

    async fn withdraw(&self, id: &str) -> AppResult<()> {
        let members = Arc::clone(&self.members);
        let id = id.to_string();

        let result = with_transaction!(self.persistence, |uow| {
            let member = members.find_by_id(uow, &id).await?.ok_or_not_found()?;
            members.stage_delete(uow, &member)?;
            Ok(member.id)
        });

        match result {
            Ok(id) => {
                tracing::info!(member = %id, "Member withdrawn");
                Ok(())
            }
            Err(e) => {
                if e.is_store_failure() {
                    tracing::warn!(error = %e, "Member withdrawal rolled back");
                }
                Err(e)
            }
        }
    }
}
