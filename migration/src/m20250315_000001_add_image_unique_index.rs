use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop duplicate (category_key, image_id) rows left by earlier prefetch runs,
        // keeping the oldest copy so existing ordering is preserved
        let db = manager.get_connection();
        db.execute_unprepared(
            r#"
            DELETE FROM images
            WHERE id NOT IN (
                SELECT MIN(id) FROM images GROUP BY category_key, image_id
            )
            "#,
        )
        .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_images_category_image")
                    .table(Images::Table)
                    .col(Images::CategoryKey)
                    .col(Images::ImageId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_images_category_image")
                    .table(Images::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Images {
    Table,
    CategoryKey,
    ImageId,
}
