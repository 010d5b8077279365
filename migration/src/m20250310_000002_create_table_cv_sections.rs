use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // =====================================================
        // experiences
        // =====================================================
        manager
            .create_table(
                Table::create()
                    .table(Experiences::Table)
                    .if_not_exists()
                    .col(uuid_pk(Experiences::Id))
                    .col(ColumnDef::new(Experiences::CvId).uuid().not_null())
                    .col(ColumnDef::new(Experiences::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Experiences::Company).string_len(255).not_null())
                    .col(ColumnDef::new(Experiences::Location).string_len(255).null())
                    .col(ColumnDef::new(Experiences::StartDate).date().not_null())
                    .col(ColumnDef::new(Experiences::EndDate).date().null())
                    .col(ColumnDef::new(Experiences::Description).text().null())
                    .col(
                        ColumnDef::new(Experiences::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(&mut cv_fk("fk_experiences_cv_id", Experiences::Table, Experiences::CvId))
                    .to_owned(),
            )
            .await?;

        // =====================================================
        // educations
        // =====================================================
        manager
            .create_table(
                Table::create()
                    .table(Educations::Table)
                    .if_not_exists()
                    .col(uuid_pk(Educations::Id))
                    .col(ColumnDef::new(Educations::CvId).uuid().not_null())
                    .col(ColumnDef::new(Educations::Degree).string_len(255).not_null())
                    .col(ColumnDef::new(Educations::Institution).string_len(255).not_null())
                    .col(ColumnDef::new(Educations::Location).string_len(255).null())
                    .col(ColumnDef::new(Educations::StartDate).date().not_null())
                    .col(ColumnDef::new(Educations::EndDate).date().null())
                    .col(ColumnDef::new(Educations::Description).text().null())
                    .col(
                        ColumnDef::new(Educations::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(&mut cv_fk("fk_educations_cv_id", Educations::Table, Educations::CvId))
                    .to_owned(),
            )
            .await?;

        // =====================================================
        // skills
        // =====================================================
        manager
            .create_table(
                Table::create()
                    .table(Skills::Table)
                    .if_not_exists()
                    .col(uuid_pk(Skills::Id))
                    .col(ColumnDef::new(Skills::CvId).uuid().not_null())
                    .col(ColumnDef::new(Skills::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Skills::Category)
                            .string_len(4)
                            .not_null()
                            .default("TECH")
                            .check(Expr::col(Skills::Category).is_in(["TECH", "SOFT", "TOOL"])),
                    )
                    .col(
                        ColumnDef::new(Skills::Level)
                            .small_integer()
                            .not_null()
                            .default(5)
                            .check(Expr::col(Skills::Level).between(0, 10)),
                    )
                    .foreign_key(&mut cv_fk("fk_skills_cv_id", Skills::Table, Skills::CvId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_skills_cv_name_unique")
                    .table(Skills::Table)
                    .col(Skills::CvId)
                    .col(Skills::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // =====================================================
        // languages
        // =====================================================
        manager
            .create_table(
                Table::create()
                    .table(Languages::Table)
                    .if_not_exists()
                    .col(uuid_pk(Languages::Id))
                    .col(ColumnDef::new(Languages::CvId).uuid().not_null())
                    .col(ColumnDef::new(Languages::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Languages::Level).string_len(50).null())
                    .foreign_key(&mut cv_fk("fk_languages_cv_id", Languages::Table, Languages::CvId))
                    .to_owned(),
            )
            .await?;

        // =====================================================
        // interests
        // =====================================================
        manager
            .create_table(
                Table::create()
                    .table(Interests::Table)
                    .if_not_exists()
                    .col(uuid_pk(Interests::Id))
                    .col(ColumnDef::new(Interests::CvId).uuid().not_null())
                    .col(ColumnDef::new(Interests::Name).string_len(100).not_null())
                    .foreign_key(&mut cv_fk("fk_interests_cv_id", Interests::Table, Interests::CvId))
                    .to_owned(),
            )
            .await?;

        // Sections are always fetched per CV
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE INDEX IF NOT EXISTS idx_experiences_cv_id ON experiences (cv_id);
                CREATE INDEX IF NOT EXISTS idx_educations_cv_id ON educations (cv_id);
                CREATE INDEX IF NOT EXISTS idx_languages_cv_id ON languages (cv_id);
                CREATE INDEX IF NOT EXISTS idx_interests_cv_id ON interests (cv_id);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Interests::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Languages::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Skills::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Educations::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Experiences::Table).if_exists().to_owned())
            .await
    }
}

fn uuid_pk<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .uuid()
        .not_null()
        .primary_key()
        .default(Expr::cust("gen_random_uuid()"))
        .to_owned()
}

fn cv_fk<T, C>(name: &str, table: T, col: C) -> ForeignKeyCreateStatement
where
    T: IntoTableRef,
    C: IntoIden,
{
    ForeignKey::create()
        .name(name)
        .from(table, col)
        .to(Cvs::Table, Cvs::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .on_update(ForeignKeyAction::Cascade)
        .to_owned()
}

#[derive(DeriveIden)]
enum Experiences {
    Table,
    Id,
    CvId,
    Title,
    Company,
    Location,
    StartDate,
    EndDate,
    Description,
    SortOrder,
}

#[derive(DeriveIden)]
enum Educations {
    Table,
    Id,
    CvId,
    Degree,
    Institution,
    Location,
    StartDate,
    EndDate,
    Description,
    SortOrder,
}

#[derive(DeriveIden)]
enum Skills {
    Table,
    Id,
    CvId,
    Name,
    Category,
    Level,
}

#[derive(DeriveIden)]
enum Languages {
    Table,
    Id,
    CvId,
    Name,
    Level,
}

#[derive(DeriveIden)]
enum Interests {
    Table,
    Id,
    CvId,
    Name,
}

#[derive(DeriveIden)]
enum Cvs {
    Table,
    Id,
}
