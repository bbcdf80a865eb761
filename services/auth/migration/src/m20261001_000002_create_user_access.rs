use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserAccess::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserAccess::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserAccess::Email).string().not_null())
                    .col(ColumnDef::new(UserAccess::Ip).string().not_null())
                    .col(ColumnDef::new(UserAccess::Browser).string().not_null())
                    .col(ColumnDef::new(UserAccess::Country).string().not_null())
                    .col(
                        ColumnDef::new(UserAccess::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(UserAccess::Table)
                    .col(UserAccess::Email)
                    .name("idx_user_access_email")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserAccess::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserAccess {
    Table,
    Id,
    Email,
    Ip,
    Browser,
    Country,
    CreatedAt,
}
