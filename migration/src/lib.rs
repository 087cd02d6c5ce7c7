pub use sea_orm_migration::prelude::*;

mod m2025_12_01_100000_create_apartments;
mod m2025_12_01_100100_create_units;
mod m2025_12_01_100200_create_tenants;
mod m2025_12_01_100300_create_payments;
mod m2025_12_01_100400_create_activity_logs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_12_01_100000_create_apartments::Migration),
            Box::new(m2025_12_01_100100_create_units::Migration),
            Box::new(m2025_12_01_100200_create_tenants::Migration),
            Box::new(m2025_12_01_100300_create_payments::Migration),
            Box::new(m2025_12_01_100400_create_activity_logs::Migration),
        ]
    }
}
