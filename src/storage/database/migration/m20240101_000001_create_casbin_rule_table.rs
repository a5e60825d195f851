use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CasbinRule::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CasbinRule::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CasbinRule::Ptype).string_len(12).not_null())
                    .col(value_column(CasbinRule::V0))
                    .col(value_column(CasbinRule::V1))
                    .col(value_column(CasbinRule::V2))
                    .col(value_column(CasbinRule::V3))
                    .col(value_column(CasbinRule::V4))
                    .col(value_column(CasbinRule::V5))
                    .to_owned(),
            )
            .await?;

        // Natural key: no two rows may describe the same rule
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_casbin_rule_natural_key")
                    .table(CasbinRule::Table)
                    .col(CasbinRule::Ptype)
                    .col(CasbinRule::V0)
                    .col(CasbinRule::V1)
                    .col(CasbinRule::V2)
                    .col(CasbinRule::V3)
                    .col(CasbinRule::V4)
                    .col(CasbinRule::V5)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_casbin_rule_ptype_v1")
                    .table(CasbinRule::Table)
                    .col(CasbinRule::Ptype)
                    .col(CasbinRule::V1)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CasbinRule::Table).to_owned())
            .await
    }
}

fn value_column(column: CasbinRule) -> ColumnDef {
    ColumnDef::new(column)
        .string_len(255)
        .not_null()
        .default("")
        .to_owned()
}

#[derive(DeriveIden, Clone, Copy)]
enum CasbinRule {
    Table,
    Id,
    Ptype,
    V0,
    V1,
    V2,
    V3,
    V4,
    V5,
}
