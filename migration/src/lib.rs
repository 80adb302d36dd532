pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20260301_000001_user_tables;
mod m20260301_000002_place_tables;
mod m20260322_000001_social_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_user_tables::Migration),
            Box::new(m20260301_000002_place_tables::Migration),
            Box::new(m20260322_000001_social_tables::Migration),
        ]
    }
}
