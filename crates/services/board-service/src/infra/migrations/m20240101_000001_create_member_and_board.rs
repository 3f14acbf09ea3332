//! Migration: Create member and board tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Member::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Member::Id)
                            .string_len(50)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Member::Password).string().not_null())
                    .col(ColumnDef::new(Member::Name).string().not_null())
                    .col(
                        ColumnDef::new(Member::Role)
                            .string_len(20)
                            .not_null()
                            .default("member"),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Board::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Board::Seq)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Board::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Board::Writer).string_len(50).not_null())
                    .col(ColumnDef::new(Board::Content).text().not_null())
                    .col(
                        ColumnDef::new(Board::Cnt)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Board::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Board::MemberId).string_len(50).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_board_member")
                            .from(Board::Table, Board::MemberId)
                            .to(Member::Table, Member::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Boards are listed per member and searched by writer
        manager
            .create_index(
                Index::create()
                    .name("idx_board_member_id")
                    .table(Board::Table)
                    .col(Board::MemberId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_board_writer")
                    .table(Board::Table)
                    .col(Board::Writer)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Board::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Member::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Member {
    Table,
    Id,
    Password,
    Name,
    Role,
}

#[derive(Iden)]
enum Board {
    Table,
    Seq,
    Title,
    Writer,
    Content,
    Cnt,
    CreatedAt,
    MemberId,
}
