use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Identities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Identities::Uid).string().not_null().primary_key())
                    .col(ColumnDef::new(Identities::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Identities::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Identities::DisplayName).string().not_null())
                    .col(ColumnDef::new(Identities::EmailVerified).boolean().not_null().default(false))
                    .col(ColumnDef::new(Identities::Disabled).boolean().not_null().default(false))
                    .col(ColumnDef::new(Identities::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Identities::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Identities::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Identities {
    Table,
    Uid,
    Email,
    PasswordHash,
    DisplayName,
    EmailVerified,
    Disabled,
    CreatedAt,
    UpdatedAt,
}
