use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Drafts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Drafts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Drafts::Name).string().not_null())
                    .col(ColumnDef::new(Drafts::Email).string().not_null())
                    .col(ColumnDef::new(Drafts::Phone).string())
                    .col(ColumnDef::new(Drafts::City).string().not_null())
                    .col(ColumnDef::new(Drafts::District).string().not_null())
                    .col(ColumnDef::new(Drafts::Specialty).string().not_null())
                    .col(ColumnDef::new(Drafts::Bio).text())
                    .col(ColumnDef::new(Drafts::Certifications).text())
                    .col(ColumnDef::new(Drafts::Experience).string())
                    .col(ColumnDef::new(Drafts::Services).json_binary().not_null())
                    .col(ColumnDef::new(Drafts::SessionToken).string().not_null())
                    .col(
                        ColumnDef::new(Drafts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Drafts::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Drafts::IsPaid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Drafts::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Drafts::PaymentReference).string())
                    .col(ColumnDef::new(Drafts::FinalId).uuid())
                    .col(ColumnDef::new(Drafts::ActivatedAt).timestamp_with_time_zone())
                    .check(
                        Expr::col(Drafts::IsActive).eq(false).or(Expr::col(Drafts::FinalId)
                            .is_not_null()
                            .and(Expr::col(Drafts::PaymentReference).is_not_null())),
                    )
                    .to_owned(),
            )
            .await?;

        // Housekeeping scans for expired, never-activated drafts.
        manager
            .create_index(
                Index::create()
                    .table(Drafts::Table)
                    .col(Drafts::ExpiresAt)
                    .name("idx_drafts_expires_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Drafts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Drafts {
    Table,
    Id,
    Name,
    Email,
    Phone,
    City,
    District,
    Specialty,
    Bio,
    Certifications,
    Experience,
    Services,
    SessionToken,
    CreatedAt,
    ExpiresAt,
    IsPaid,
    IsActive,
    PaymentReference,
    FinalId,
    ActivatedAt,
}
