use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Trainers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Trainers::Id).uuid().not_null().primary_key())
                    // One trainer per draft, whatever happens upstream.
                    .col(
                        ColumnDef::new(Trainers::DraftId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Trainers::Name).string().not_null())
                    .col(ColumnDef::new(Trainers::Email).string().not_null())
                    .col(ColumnDef::new(Trainers::Phone).string())
                    .col(ColumnDef::new(Trainers::City).string().not_null())
                    .col(ColumnDef::new(Trainers::District).string().not_null())
                    .col(ColumnDef::new(Trainers::Specialty).string().not_null())
                    .col(ColumnDef::new(Trainers::Bio).text())
                    .col(ColumnDef::new(Trainers::Certifications).text())
                    .col(ColumnDef::new(Trainers::Experience).string())
                    .col(ColumnDef::new(Trainers::Services).json_binary().not_null())
                    .col(ColumnDef::new(Trainers::Status).string().not_null())
                    .col(ColumnDef::new(Trainers::Content).json_binary().not_null())
                    .col(ColumnDef::new(Trainers::PaymentReference).string().not_null())
                    .col(
                        ColumnDef::new(Trainers::ActivatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Trainers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Trainers::Table, Trainers::DraftId)
                            .to(Drafts::Table, Drafts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Trainers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Trainers {
    Table,
    Id,
    DraftId,
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
    Status,
    Content,
    PaymentReference,
    ActivatedAt,
    CreatedAt,
}

#[derive(Iden)]
enum Drafts {
    Table,
    Id,
}
