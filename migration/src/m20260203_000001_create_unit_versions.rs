use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UnitVersions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UnitVersions::Seq)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UnitVersions::UnitId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UnitVersions::Name)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UnitVersions::ParentId)
                            .uuid()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(UnitVersions::UnitType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UnitVersions::Price)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(UnitVersions::UpdateDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Secondary indexes for the two hot lookups: latest version per unit
        // and child rows per parent.
        manager
            .create_index(
                Index::create()
                    .name("idx_unit_versions_unit_id_update_date")
                    .table(UnitVersions::Table)
                    .col(UnitVersions::UnitId)
                    .col(UnitVersions::UpdateDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_unit_versions_parent_id")
                    .table(UnitVersions::Table)
                    .col(UnitVersions::ParentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UnitVersions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UnitVersions {
    Table,
    Seq,
    UnitId,
    Name,
    ParentId,
    UnitType,
    Price,
    UpdateDate,
}
