use sea_orm_migration::prelude::*;

mod m20261001_000001_create_drafts;
mod m20261001_000002_create_trainers;
mod m20261001_000003_create_trainer_slugs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_drafts::Migration),
            Box::new(m20261001_000002_create_trainers::Migration),
            Box::new(m20261001_000003_create_trainer_slugs::Migration),
        ]
    }
}
