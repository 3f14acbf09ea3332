//! Member and profile repository.

use async_trait::async_trait;
use sea_orm::{ActiveValue::NotSet, Set};

use super::entities::member;
use super::entities::profile::{self, Entity as ProfileEntity};
use common::AppResult;
use domain::{Member, Profile, ProfileDto};
use persistence::{DerivedQuery, QueryArg, Repository, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Member repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn find_by_id(&self, uow: &mut UnitOfWork, id: &str) -> AppResult<Option<Member>>;

    async fn exists_by_id(&self, uow: &mut UnitOfWork, id: &str) -> AppResult<bool>;

    /// Insert a member under its caller-chosen id
    async fn insert(&self, uow: &mut UnitOfWork, member: Member) -> AppResult<Member>;

    /// Stage the deletion of a loaded member
    fn stage_delete(&self, uow: &mut UnitOfWork, member: &Member) -> AppResult<()>;

    /// Profile of a member (inverse side of profile -> member)
    async fn find_profile(&self, uow: &mut UnitOfWork, member_id: &str)
        -> AppResult<Option<Profile>>;

    async fn insert_profile(
        &self,
        uow: &mut UnitOfWork,
        member_id: &str,
        profile: ProfileDto,
    ) -> AppResult<Profile>;
}

/// Concrete implementation of MemberRepository
pub struct MemberStore {
    members: Repository<member::ActiveModel>,
    profiles: Repository<profile::ActiveModel>,
    profile_by_member_id: DerivedQuery<ProfileEntity>,
}

impl MemberStore {
    /// Create new repository instance
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            members: Repository::new(),
            profiles: Repository::new(),
            profile_by_member_id: DerivedQuery::parse("findByMemberId")?,
        })
    }
}

#[async_trait]
impl MemberRepository for MemberStore {
    async fn find_by_id(&self, uow: &mut UnitOfWork, id: &str) -> AppResult<Option<Member>> {
        let model = self.members.find_by_id(uow, id.to_string()).await?;
        Ok(model.map(Member::from))
    }

    async fn exists_by_id(&self, uow: &mut UnitOfWork, id: &str) -> AppResult<bool> {
        self.members.exists_by_id(uow, id.to_string()).await
    }

    async fn insert(&self, uow: &mut UnitOfWork, member: Member) -> AppResult<Member> {
        let active_model = member::ActiveModel {
            id: Set(member.id),
            password: Set(member.password),
            name: Set(member.name),
            role: Set(member.role.to_string()),
        };

        let model = self.members.insert(uow, active_model).await?;
        Ok(Member::from(model))
    }

    fn stage_delete(&self, uow: &mut UnitOfWork, member: &Member) -> AppResult<()> {
        self.members.stage_delete(uow, member.clone().into())
    }

    async fn find_profile(
        &self,
        uow: &mut UnitOfWork,
        member_id: &str,
    ) -> AppResult<Option<Profile>> {
        let model = self
            .profiles
            .find_one_by(uow, &self.profile_by_member_id, &[QueryArg::value(member_id)])
            .await?;
        Ok(model.map(Profile::from))
    }

    async fn insert_profile(
        &self,
        uow: &mut UnitOfWork,
        member_id: &str,
        profile: ProfileDto,
    ) -> AppResult<Profile> {
        let active_model = profile::ActiveModel {
            id: NotSet,
            member_id: Set(member_id.to_string()),
            tel: Set(profile.tel),
            address: Set(profile.address),
        };

        let model = self.profiles.insert(uow, active_model).await?;
        Ok(Profile::from(model))
    }
}
