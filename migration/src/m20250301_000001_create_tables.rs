use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Cohort).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Users::WallpapersUsed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Users::WallpapersReceived)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Users::ChosenCategory).string())
                    .col(ColumnDef::new(Users::LastCategoryClick).timestamp())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create images table (the category cache)
        manager
            .create_table(
                Table::create()
                    .table(Images::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Images::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Images::CategoryKey).string().not_null())
                    .col(ColumnDef::new(Images::ImageId).string_len(100).not_null())
                    .col(ColumnDef::new(Images::ImageUrl).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Lookups always filter on category_key
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_images_category_key")
                    .table(Images::Table)
                    .col(Images::CategoryKey)
                    .to_owned(),
            )
            .await?;

        // Create user_images table (the dedup ledger)
        manager
            .create_table(
                Table::create()
                    .table(UserImages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserImages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserImages::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(UserImages::ImageId)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserImages::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create unique index on user_images (user_id, image_id)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_images_user_image")
                    .table(UserImages::Table)
                    .col(UserImages::UserId)
                    .col(UserImages::ImageId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserImages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Images::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Cohort,
    WallpapersUsed,
    WallpapersReceived,
    ChosenCategory,
    LastCategoryClick,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Images {
    Table,
    Id,
    CategoryKey,
    ImageId,
    ImageUrl,
}

#[derive(DeriveIden)]
enum UserImages {
    Table,
    Id,
    UserId,
    ImageId,
    CreatedAt,
}
