use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    sea_query::{Expr, OnConflict, Query},
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use super::entities::{images, user_images, users};
use crate::db::types::Cohort;
use crate::unsplash::FetchedImage;

pub struct Repo {
    db: DatabaseConnection,
}

/// Summed counters of one cohort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CohortUsage {
    pub cohort: Cohort,
    pub received: i64,
    pub used: i64,
}

#[derive(Debug, FromQueryResult)]
struct CohortUsageRow {
    cohort: Cohort,
    received: Option<i64>,
    used: Option<i64>,
}

impl Repo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn ping(&self) -> Result<()> {
        self.db.ping().await.context("Database ping failed")
    }

    // ==================== Users ====================

    /// Fetch a user, creating it with `cohort` on first contact.
    ///
    /// An existing user keeps its cohort. Returns the user and whether it was
    /// created by this call.
    pub async fn get_or_create_user(
        &self,
        user_id: i64,
        cohort: Cohort,
    ) -> Result<(users::Model, bool)> {
        let now = Utc::now().naive_utc();

        let new_user = users::ActiveModel {
            id: Set(user_id),
            cohort: Set(cohort),
            wallpapers_used: Set(0),
            wallpapers_received: Set(0),
            chosen_category: Set(None),
            last_category_click: Set(None),
            created_at: Set(now),
        };

        // INSERT ... ON CONFLICT(id) DO NOTHING
        let inserted = users::Entity::insert(new_user)
            .on_conflict(
                OnConflict::column(users::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("Failed to insert user")?;

        let user = users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .context("Failed to fetch user")?
            .ok_or_else(|| anyhow::anyhow!("User {} not found after insert", user_id))?;

        Ok((user, inserted > 0))
    }

    #[cfg(test)]
    pub async fn get_user(&self, user_id: i64) -> Result<Option<users::Model>> {
        users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .context("Failed to get user")
    }

    pub async fn list_users(&self) -> Result<Vec<users::Model>> {
        users::Entity::find()
            .order_by_asc(users::Column::Id)
            .all(&self.db)
            .await
            .context("Failed to list users")
    }

    /// Users that have been sent at least one wallpaper
    pub async fn list_users_with_received(&self) -> Result<Vec<users::Model>> {
        users::Entity::find()
            .filter(users::Column::WallpapersReceived.gt(0))
            .order_by_asc(users::Column::Id)
            .all(&self.db)
            .await
            .context("Failed to list users with received wallpapers")
    }

    /// Store the chosen category and stamp the click time used by the daily throttle
    pub async fn record_category_click(
        &self,
        user_id: i64,
        category_key: &str,
        clicked_at: NaiveDateTime,
    ) -> Result<()> {
        let result = users::Entity::update_many()
            .col_expr(
                users::Column::ChosenCategory,
                Expr::value(category_key.to_string()),
            )
            .col_expr(users::Column::LastCategoryClick, Expr::value(clicked_at))
            .filter(users::Column::Id.eq(user_id))
            .exec(&self.db)
            .await
            .context("Failed to record category click")?;

        if result.rows_affected == 0 {
            anyhow::bail!("User {} not found", user_id);
        }
        Ok(())
    }

    pub async fn increment_received(&self, user_id: i64) -> Result<()> {
        self.increment_counter(user_id, users::Column::WallpapersReceived)
            .await
            .context("Failed to increment wallpapers_received")
    }

    pub async fn increment_used(&self, user_id: i64) -> Result<()> {
        self.increment_counter(user_id, users::Column::WallpapersUsed)
            .await
            .context("Failed to increment wallpapers_used")
    }

    async fn increment_counter(&self, user_id: i64, column: users::Column) -> Result<()> {
        // UPDATE users SET <column> = <column> + 1 WHERE id = ?
        let result = users::Entity::update_many()
            .col_expr(column, Expr::col(column).add(1))
            .filter(users::Column::Id.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            anyhow::bail!("User {} not found", user_id);
        }
        Ok(())
    }

    /// Received/used totals grouped by cohort. Cohorts without users are absent.
    pub async fn usage_by_cohort(&self) -> Result<Vec<CohortUsage>> {
        let rows = users::Entity::find()
            .select_only()
            .column(users::Column::Cohort)
            .column_as(Expr::col(users::Column::WallpapersReceived).sum(), "received")
            .column_as(Expr::col(users::Column::WallpapersUsed).sum(), "used")
            .group_by(users::Column::Cohort)
            .into_model::<CohortUsageRow>()
            .all(&self.db)
            .await
            .context("Failed to aggregate usage by cohort")?;

        Ok(rows
            .into_iter()
            .map(|row| CohortUsage {
                cohort: row.cohort,
                received: row.received.unwrap_or(0),
                used: row.used.unwrap_or(0),
            })
            .collect())
    }

    // ==================== Image cache ====================

    /// Images cached under `category_key` that `user_id` has not been sent yet,
    /// oldest first
    pub async fn fetch_unseen(
        &self,
        category_key: &str,
        user_id: i64,
    ) -> Result<Vec<images::Model>> {
        // ... AND image_id NOT IN (SELECT image_id FROM user_images WHERE user_id = ?)
        let seen = Query::select()
            .column(user_images::Column::ImageId)
            .from(user_images::Entity)
            .and_where(user_images::Column::UserId.eq(user_id))
            .to_owned();

        images::Entity::find()
            .filter(images::Column::CategoryKey.eq(category_key))
            .filter(images::Column::ImageId.not_in_subquery(seen))
            .order_by_asc(images::Column::Id)
            .all(&self.db)
            .await
            .context("Failed to fetch unseen images")
    }

    /// Insert a batch of images under `category_key`.
    ///
    /// Pairs already cached for this key are skipped. Returns the number of new rows.
    pub async fn add_images(&self, category_key: &str, batch: &[FetchedImage]) -> Result<u64> {
        if batch.is_empty() {
            return Ok(0);
        }

        let models = batch.iter().map(|image| images::ActiveModel {
            category_key: Set(category_key.to_string()),
            image_id: Set(image.id.clone()),
            image_url: Set(image.url.clone()),
            ..Default::default()
        });

        // INSERT ... ON CONFLICT(category_key, image_id) DO NOTHING
        images::Entity::insert_many(models)
            .on_conflict(
                OnConflict::columns([images::Column::CategoryKey, images::Column::ImageId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("Failed to add images")
    }

    #[cfg(test)]
    pub async fn count_images(&self, category_key: &str) -> Result<u64> {
        use sea_orm::PaginatorTrait;

        images::Entity::find()
            .filter(images::Column::CategoryKey.eq(category_key))
            .count(&self.db)
            .await
            .context("Failed to count images")
    }

    // ==================== Dedup ledger ====================

    /// Record that `image_id` was delivered to `user_id`.
    ///
    /// Idempotent: returns `false` when the pair was already recorded.
    pub async fn mark_seen(&self, user_id: i64, image_id: &str) -> Result<bool> {
        let record = user_images::ActiveModel {
            user_id: Set(user_id),
            image_id: Set(image_id.to_string()),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        // INSERT ... ON CONFLICT(user_id, image_id) DO NOTHING
        let inserted = user_images::Entity::insert(record)
            .on_conflict(
                OnConflict::columns([user_images::Column::UserId, user_images::Column::ImageId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("Failed to mark image as seen")?;

        Ok(inserted > 0)
    }

    #[cfg(test)]
    pub async fn count_seen(&self, user_id: i64) -> Result<u64> {
        use sea_orm::PaginatorTrait;

        user_images::Entity::find()
            .filter(user_images::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .context("Failed to count seen images")
    }
}
