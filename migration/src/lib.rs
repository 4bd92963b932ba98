pub use sea_orm_migration::prelude::*;

mod m20260101_000001_create_listings;
mod m20260101_000002_create_entitlement_records;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_listings::Migration),
            Box::new(m20260101_000002_create_entitlement_records::Migration),
        ]
    }
}
