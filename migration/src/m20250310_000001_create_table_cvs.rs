use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // =====================================================
        // cvs
        // =====================================================
        manager
            .create_table(
                Table::create()
                    .table(Cvs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cvs::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(Cvs::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Cvs::Title)
                            .string_len(255)
                            .not_null()
                            .default("My Professional CV"),
                    )
                    .col(ColumnDef::new(Cvs::Summary).text().null())
                    .col(
                        ColumnDef::new(Cvs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Cvs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cvs_user_id")
                            .from(Cvs::Table, Cvs::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cvs_user_title_unique")
                    .table(Cvs::Table)
                    .col(Cvs::UserId)
                    .col(Cvs::Title)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Listing is always "my CVs, most recently updated first"
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE INDEX IF NOT EXISTS idx_cvs_user_updated_at
                ON cvs (user_id, updated_at DESC);
                "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TRIGGER update_cvs_updated_at
                BEFORE UPDATE ON cvs
                FOR EACH ROW
                EXECUTE FUNCTION update_updated_at_column();
                "#,
            )
            .await?;

        // =====================================================
        // contacts (at most one per CV)
        // =====================================================
        manager
            .create_table(
                Table::create()
                    .table(Contacts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contacts::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(Contacts::CvId).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Contacts::Phone).string_len(50).null())
                    .col(ColumnDef::new(Contacts::Email).string_len(254).not_null())
                    .col(ColumnDef::new(Contacts::Country).string_len(100).null())
                    .col(ColumnDef::new(Contacts::City).string_len(100).null())
                    .col(ColumnDef::new(Contacts::AddressDetail).string_len(255).null())
                    .col(ColumnDef::new(Contacts::WebsiteUrl).string_len(200).null())
                    .col(ColumnDef::new(Contacts::LinkedinUrl).string_len(200).null())
                    .col(ColumnDef::new(Contacts::GithubUrl).string_len(200).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contacts_cv_id")
                            .from(Contacts::Table, Contacts::CvId)
                            .to(Cvs::Table, Cvs::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Contacts::Table).if_exists().to_owned())
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP TRIGGER IF EXISTS update_cvs_updated_at ON cvs;
                DROP INDEX IF EXISTS idx_cvs_user_updated_at;
                DROP INDEX IF EXISTS idx_cvs_user_title_unique;
                "#,
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Cvs::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Cvs {
    Table,
    Id,
    UserId,
    Title,
    Summary,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Contacts {
    Table,
    Id,
    CvId,
    Phone,
    Email,
    Country,
    City,
    AddressDetail,
    WebsiteUrl,
    LinkedinUrl,
    GithubUrl,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
