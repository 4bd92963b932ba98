use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Listings {
    Table,
    Id,
    Collection,
    OwnerKey,
    Tier,
    BusinessName,
    BusinessType,
    CopyStyle,
    Phone,
    AddressLine,
    City,
    State,
    Description,
    EventTemplate,
    EventDate,
    TransactionId,
    CreatedAt,
    ExpiresAt,
    DeletedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Listings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Listings::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Listings::Collection).string_len(32).not_null())
                    .col(ColumnDef::new(Listings::OwnerKey).string().not_null())
                    .col(ColumnDef::new(Listings::Tier).string_len(16).not_null())
                    .col(ColumnDef::new(Listings::BusinessName).string().not_null())
                    .col(ColumnDef::new(Listings::BusinessType).string_len(32).null())
                    .col(ColumnDef::new(Listings::CopyStyle).string_len(32).null())
                    .col(ColumnDef::new(Listings::Phone).string().not_null())
                    .col(ColumnDef::new(Listings::AddressLine).string().not_null())
                    .col(ColumnDef::new(Listings::City).string().not_null())
                    .col(ColumnDef::new(Listings::State).string().not_null())
                    .col(ColumnDef::new(Listings::Description).text().null())
                    .col(ColumnDef::new(Listings::EventTemplate).string_len(32).null())
                    .col(ColumnDef::new(Listings::EventDate).date().null())
                    .col(ColumnDef::new(Listings::TransactionId).string().null())
                    .col(
                        ColumnDef::new(Listings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Listings::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Listings::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // feed queries: collection + expiry range, ordered by created_at
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_listings_collection_expires")
                    .table(Listings::Table)
                    .col(Listings::Collection)
                    .col(Listings::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_listings_owner")
                    .table(Listings::Table)
                    .col(Listings::Collection)
                    .col(Listings::OwnerKey)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Listings::Table).to_owned())
            .await?;
        Ok(())
    }
}
