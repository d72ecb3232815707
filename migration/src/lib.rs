pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_schema_and_base_db_setup;
mod m20250301_000002_create_enums_and_core_tables;
mod m20250301_000003_create_billing_and_delivery_tables;
mod m20250302_000001_add_assignment_and_webhook_constraints;
mod m20250302_000002_add_initial_super_admin;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_schema_and_base_db_setup::Migration),
            Box::new(m20250301_000002_create_enums_and_core_tables::Migration),
            Box::new(m20250301_000003_create_billing_and_delivery_tables::Migration),
            Box::new(m20250302_000001_add_assignment_and_webhook_constraints::Migration),
            Box::new(m20250302_000002_add_initial_super_admin::Migration),
        ]
    }
}
