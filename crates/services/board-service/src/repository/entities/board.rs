//! Board database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Board;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "board")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub seq: i64,
    pub title: String,
    pub writer: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub cnt: i64,
    pub created_at: DateTimeUtc,
    /// Many side of member -> boards
    pub member_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
        to = "super::member::Column::Id",
        on_delete = "Cascade"
    )]
    Member,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Board {
    fn from(model: Model) -> Self {
        Board {
            seq: model.seq,
            title: model.title,
            writer: model.writer,
            content: model.content,
            cnt: model.cnt,
            created_at: model.created_at,
            member_id: model.member_id,
        }
    }
}

impl From<Board> for Model {
    fn from(board: Board) -> Self {
        Model {
            seq: board.seq,
            title: board.title,
            writer: board.writer,
            content: board.content,
            cnt: board.cnt,
            created_at: board.created_at,
            member_id: board.member_id,
        }
    }
}
