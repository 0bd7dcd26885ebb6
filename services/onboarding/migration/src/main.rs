use sea_orm_migration::prelude::*;

use fitpro_onboarding_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
