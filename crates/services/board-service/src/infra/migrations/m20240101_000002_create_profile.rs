//! Migration: Create profile table (one profile per member).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profile::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Profile::MemberId)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Profile::Tel).string_len(20).not_null())
                    .col(ColumnDef::new(Profile::Address).string().not_null())
                    // A member with a profile cannot be removed until the profile is
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_member")
                            .from(Profile::Table, Profile::MemberId)
                            .to(Member::Table, Member::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Profile::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Profile {
    Table,
    Id,
    MemberId,
    Tel,
    Address,
}

#[derive(Iden)]
enum Member {
    Table,
    Id,
}
