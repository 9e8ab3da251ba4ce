use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum CashAgents {
    Table,
    Id,
    Name,
    Phone,
    Location,
    Currency,
    Active,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CashAgents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CashAgents::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CashAgents::Name).string().not_null())
                    .col(ColumnDef::new(CashAgents::Phone).string().not_null())
                    .col(ColumnDef::new(CashAgents::Location).string().not_null())
                    .col(ColumnDef::new(CashAgents::Currency).string().not_null())
                    .col(
                        ColumnDef::new(CashAgents::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(CashAgents::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-cash_agents-location")
                    .table(CashAgents::Table)
                    .col(CashAgents::Location)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CashAgents::Table).to_owned())
            .await
    }
}
