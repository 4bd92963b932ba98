use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum EntitlementRecords {
    Table,
    Gate,
    DocumentKey,
    Uid,
    EntitlementKey,
    Month,
    UsedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // one row per (gate, document_key); the primary key is what makes
        // create-if-absent first-writer-wins
        manager
            .create_table(
                Table::create()
                    .table(EntitlementRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EntitlementRecords::Gate)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EntitlementRecords::DocumentKey)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EntitlementRecords::Uid).string().not_null())
                    .col(
                        ColumnDef::new(EntitlementRecords::EntitlementKey)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EntitlementRecords::Month).string_len(7).null())
                    .col(
                        ColumnDef::new(EntitlementRecords::UsedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_entitlement_records")
                            .col(EntitlementRecords::Gate)
                            .col(EntitlementRecords::DocumentKey),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EntitlementRecords::Table).to_owned())
            .await?;
        Ok(())
    }
}
