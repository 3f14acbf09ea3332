//! Member, profile and related transfer types.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::board::BoardDto;
use crate::constants::{ROLE_ADMIN, ROLE_MEMBER};
use crate::error::{DomainError, DomainResult};

/// Member roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Member,
    Admin,
}

impl MemberRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, MemberRole::Admin)
    }
}

impl From<&str> for MemberRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => MemberRole::Admin,
            _ => MemberRole::Member,
        }
    }
}

impl From<MemberRole> for String {
    fn from(role: MemberRole) -> Self {
        role.to_string()
    }
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberRole::Admin => write!(f, "{}", ROLE_ADMIN),
            MemberRole::Member => write!(f, "{}", ROLE_MEMBER),
        }
    }
}

/// Member domain entity. The identity is chosen by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub name: String,
    pub role: MemberRole,
}

/// One-to-one contact profile owned by a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub member_id: String,
    pub tel: String,
    pub address: String,
}

/// Member registration request.
///
/// `boards` are posts written along with the registration; whether they are
/// persisted depends on the cascade setting of the member→boards relation.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterMember {
    #[validate(length(min = 1, max = 50, message = "id must be 1-50 characters"))]
    pub id: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub role: Option<String>,
    #[serde(default)]
    pub boards: Vec<BoardDto>,
}

impl RegisterMember {
    pub fn new(id: impl Into<String>, password: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            password: password.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Validate the request and build the member record.
    pub fn to_member(&self) -> DomainResult<Member> {
        self.validate()?;
        let role = match self.role.as_deref().map(str::trim) {
            None | Some("") => MemberRole::Member,
            Some(role) if crate::constants::is_valid_role(role) => MemberRole::from(role),
            Some(role) => {
                return Err(DomainError::validation(format!("unknown role '{}'", role)))
            }
        };

        Ok(Member {
            id: DomainError::require("id", Some(self.id.as_str()))?.to_string(),
            password: self.password.clone(),
            name: DomainError::require("name", Some(self.name.as_str()))?.to_string(),
            role,
        })
    }
}

/// Profile transfer object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ProfileDto {
    pub id: Option<i64>,
    #[validate(length(min = 1, max = 20, message = "tel must be 1-20 characters"))]
    pub tel: String,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
}

impl From<Profile> for ProfileDto {
    fn from(profile: Profile) -> Self {
        Self {
            id: Some(profile.id),
            tel: profile.tel,
            address: profile.address,
        }
    }
}

/// Member response (safe to return to callers: no password).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDto {
    pub id: String,
    pub name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileDto>,
}

impl MemberDto {
    pub fn new(member: Member, profile: Option<Profile>) -> Self {
        Self {
            id: member.id,
            name: member.name,
            role: member.role.to_string(),
            profile: profile.map(ProfileDto::from),
        }
    }
}
