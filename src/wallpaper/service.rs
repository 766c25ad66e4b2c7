use crate::bot::menu;
use crate::bot::notifier::ChatSender;
use crate::db::entities::{images, users};
use crate::db::repo::Repo;
use crate::db::types::Cohort;
use crate::wallpaper::{ImageSelector, Selection};
use anyhow::Result;
use chrono::{Duration, NaiveDateTime, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const WELCOME_TEXT: &str = "Hello! You will receive a wallpaper every day in the morning. Stay tuned!";
pub const NO_SUBCATEGORIES_TEXT: &str = "No subcategories found.";
pub const UNKNOWN_SELECTION_TEXT: &str = "This category is not available, please pick one from the menu.";
pub const THROTTLED_TEXT: &str = "You can get only one wallpaper a day.";
pub const DELIVERY_FAILED_TEXT: &str = "Error sending wallpaper, sorry.";
pub const FEEDBACK_TEXT: &str = "Thank you for the feedback! Good night!";

/// How a category selection ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Not part of the taxonomy
    Unknown,
    /// Another selection happened inside the throttle window
    Throttled,
    /// Neither cache nor provider had an unseen image
    Unavailable { category_key: String },
    Delivered { image_id: String },
    DeliveryFailed { image_id: String },
}

/// User-facing wallpaper flow: registration, category menus, delivery and
/// usage feedback.
pub struct WallpaperService {
    repo: Arc<Repo>,
    selector: Arc<ImageSelector>,
    sender: Arc<dyn ChatSender>,
    throttle: Duration,
}

impl WallpaperService {
    pub fn new(
        repo: Arc<Repo>,
        selector: Arc<ImageSelector>,
        sender: Arc<dyn ChatSender>,
        throttle: Duration,
    ) -> Self {
        Self {
            repo,
            selector,
            sender,
            throttle,
        }
    }

    /// Register the user on first contact and greet them
    pub async fn start(&self, user_id: i64) -> Result<users::Model> {
        let user = self.ensure_user(user_id).await?;
        self.sender.send_text(user_id, WELCOME_TEXT).await?;
        Ok(user)
    }

    /// Reply to a wide top-level category with its subcategory menu
    pub async fn open_category(&self, user_id: i64, category: &str) -> Result<()> {
        match menu::subcategory_menu(category) {
            Some(menu) => {
                let text = format!("Subcategories of {}:", category);
                self.sender.send_menu(user_id, &text, &menu).await
            }
            None => {
                info!("User {} opened unknown category '{}'", user_id, category);
                self.sender.send_text(user_id, NO_SUBCATEGORIES_TEXT).await
            }
        }
    }

    pub async fn choose(&self, user_id: i64, selection: &Selection) -> Result<SelectionOutcome> {
        self.choose_at(user_id, selection, Utc::now().naive_utc())
            .await
    }

    /// Run a leaf selection as of `now` (UTC): validate, throttle, select, deliver.
    pub async fn choose_at(
        &self,
        user_id: i64,
        selection: &Selection,
        now: NaiveDateTime,
    ) -> Result<SelectionOutcome> {
        if !selection.is_known() {
            warn!("User {} picked unknown selection {:?}", user_id, selection);
            self.sender.send_text(user_id, UNKNOWN_SELECTION_TEXT).await?;
            return Ok(SelectionOutcome::Unknown);
        }

        let user = self.ensure_user(user_id).await?;

        if let Some(last_click) = user.last_category_click {
            if now - last_click < self.throttle {
                info!(
                    "User {} throttled, last selection at {}",
                    user_id, last_click
                );
                self.sender.send_text(user_id, THROTTLED_TEXT).await?;
                return Ok(SelectionOutcome::Throttled);
            }
        }

        let category_key = selection.category_key();
        self.repo
            .record_category_click(user_id, &category_key, now)
            .await?;

        let Some(image) = self.selector.select_for_user(user_id, selection).await? else {
            info!("No unseen image for user {} in '{}'", user_id, category_key);
            let text = format!("No new wallpapers for {}, sorry.", category_key);
            self.sender.send_text(user_id, &text).await?;
            return Ok(SelectionOutcome::Unavailable { category_key });
        };

        if let Err(e) = self.deliver(user_id, &image).await {
            error!(
                "Failed to deliver image {} to user {}: {:#}",
                image.image_id, user_id, e
            );
            if let Err(e) = self.sender.send_text(user_id, DELIVERY_FAILED_TEXT).await {
                warn!("Failed to notify user {} about delivery error: {:#}", user_id, e);
            }
            return Ok(SelectionOutcome::DeliveryFailed {
                image_id: image.image_id,
            });
        }

        self.repo.mark_seen(user_id, &image.image_id).await?;
        self.repo.increment_received(user_id).await?;

        info!(
            "✅ Delivered image {} ('{}') to user {}",
            image.image_id, category_key, user_id
        );
        Ok(SelectionOutcome::Delivered {
            image_id: image.image_id,
        })
    }

    /// Record the evening answer; only "yes" changes anything
    pub async fn answer_usage(&self, user_id: i64, used: bool) -> Result<()> {
        self.ensure_user(user_id).await?;
        if used {
            self.repo.increment_used(user_id).await?;
        }
        info!("User {} answered usage prompt: {}", user_id, used);
        self.sender.send_text(user_id, FEEDBACK_TEXT).await
    }

    async fn ensure_user(&self, user_id: i64) -> Result<users::Model> {
        let (user, created) = self
            .repo
            .get_or_create_user(user_id, Cohort::random())
            .await?;
        if created {
            info!("Registered user {} in cohort {}", user_id, user.cohort);
        }
        Ok(user)
    }

    /// Preview photo first, then the full-quality file
    async fn deliver(&self, user_id: i64, image: &images::Model) -> Result<()> {
        self.sender.send_photo(user_id, &image.image_url).await?;
        self.sender.send_document(user_id, &image.image_url).await
    }
}
