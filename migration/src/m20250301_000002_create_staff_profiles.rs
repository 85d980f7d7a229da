use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One profile document per identity uid; no foreign key since the
        // identity lives in a different database.
        manager
            .create_table(
                Table::create()
                    .table(StaffProfiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(StaffProfiles::Uid).string().not_null().primary_key())
                    .col(ColumnDef::new(StaffProfiles::Email).string().not_null())
                    .col(ColumnDef::new(StaffProfiles::DisplayName).string().not_null())
                    .col(ColumnDef::new(StaffProfiles::Role).string().not_null())
                    .col(ColumnDef::new(StaffProfiles::Department).string().not_null())
                    .col(ColumnDef::new(StaffProfiles::IsDisabled).boolean().not_null().default(false))
                    .col(ColumnDef::new(StaffProfiles::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(StaffProfiles::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_staff_profiles_department")
                    .table(StaffProfiles::Table)
                    .col(StaffProfiles::Department)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StaffProfiles::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum StaffProfiles {
    Table,
    Uid,
    Email,
    DisplayName,
    Role,
    Department,
    IsDisabled,
    CreatedAt,
    UpdatedAt,
}
