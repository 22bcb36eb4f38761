use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `employee_change_logs` table and its columns.
#[derive(DeriveIden)]
enum EmployeeChangeLogs {
    Table,
    Id,
    LogType,
    EmployeeNumber,
    Memo,
    IpAddress,
    ChangedValue,
    ChangedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EmployeeChangeLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmployeeChangeLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EmployeeChangeLogs::LogType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmployeeChangeLogs::EmployeeNumber)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EmployeeChangeLogs::Memo).text())
                    .col(ColumnDef::new(EmployeeChangeLogs::IpAddress).string())
                    .col(
                        ColumnDef::new(EmployeeChangeLogs::ChangedValue)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmployeeChangeLogs::ChangedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EmployeeChangeLogs::Table).to_owned())
            .await
    }
}
