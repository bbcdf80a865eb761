use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ForgotPasswords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ForgotPasswords::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ForgotPasswords::Email).string().not_null())
                    .col(
                        ColumnDef::new(ForgotPasswords::Verification)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ForgotPasswords::Used)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(ForgotPasswords::IpRequest).string().not_null())
                    .col(
                        ColumnDef::new(ForgotPasswords::BrowserRequest)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ForgotPasswords::CountryRequest)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ForgotPasswords::IpChanged).string())
                    .col(ColumnDef::new(ForgotPasswords::BrowserChanged).string())
                    .col(ColumnDef::new(ForgotPasswords::CountryChanged).string())
                    .col(
                        ColumnDef::new(ForgotPasswords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ForgotPasswords::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(ForgotPasswords::Table)
                    .col(ForgotPasswords::Email)
                    .name("idx_forgot_passwords_email")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ForgotPasswords::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ForgotPasswords {
    Table,
    Id,
    Email,
    Verification,
    Used,
    IpRequest,
    BrowserRequest,
    CountryRequest,
    IpChanged,
    BrowserChanged,
    CountryChanged,
    CreatedAt,
    UpdatedAt,
}
