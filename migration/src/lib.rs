pub use sea_orm_migration::prelude::*;

mod m20250820_000001_create_departments_table;
mod m20250820_000002_create_employees_table;
mod m20250820_000003_create_change_logs_table;
mod m20250820_000004_create_files_table;
mod m20250820_000005_add_keyset_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250820_000001_create_departments_table::Migration),
            Box::new(m20250820_000002_create_employees_table::Migration),
            Box::new(m20250820_000003_create_change_logs_table::Migration),
            Box::new(m20250820_000004_create_files_table::Migration),
            Box::new(m20250820_000005_add_keyset_indexes::Migration),
        ]
    }
}
