use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Departments {
    Table,
    CreatedAt,
    Id,
}

#[derive(DeriveIden)]
enum EmployeeChangeLogs {
    Table,
    ChangedAt,
    Id,
}

// Composite indexes matching the keyset ordering `(timestamp, id)` of the
// two cursor-paged listings.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_departments_created_id")
                    .table(Departments::Table)
                    .col(Departments::CreatedAt)
                    .col(Departments::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_change_logs_changed_id")
                    .table(EmployeeChangeLogs::Table)
                    .col(EmployeeChangeLogs::ChangedAt)
                    .col(EmployeeChangeLogs::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_change_logs_changed_id")
                    .table(EmployeeChangeLogs::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_departments_created_id")
                    .table(Departments::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
