//! Member database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Member, MemberRole};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "member")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub password: String,
    pub name: String,
    pub role: String,
}

// Boards and the profile point here; neither is stored on the member row
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::board::Entity")]
    Board,
    #[sea_orm(has_one = "super::profile::Entity")]
    Profile,
}

impl Related<super::board::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Board.def()
    }
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Member {
    fn from(model: Model) -> Self {
        Member {
            id: model.id,
            password: model.password,
            name: model.name,
            role: MemberRole::from(model.role.as_str()),
        }
    }
}

impl From<Member> for Model {
    fn from(member: Member) -> Self {
        Model {
            id: member.id,
            password: member.password,
            name: member.name,
            role: member.role.to_string(),
        }
    }
}
