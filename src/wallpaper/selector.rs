use crate::db::entities::images;
use crate::db::repo::Repo;
use crate::unsplash::ImageProvider;
use crate::wallpaper::Selection;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Picks an image the user has not been sent yet, refilling the cache from
/// the provider on a miss.
pub struct ImageSelector {
    repo: Arc<Repo>,
    provider: Arc<dyn ImageProvider>,
    batch_size: u32,
}

impl ImageSelector {
    pub fn new(repo: Arc<Repo>, provider: Arc<dyn ImageProvider>, batch_size: u32) -> Self {
        Self {
            repo,
            provider,
            batch_size,
        }
    }

    /// Oldest cached image under the selection's key that `user_id` has not seen.
    ///
    /// Returns `Ok(None)` when neither the cache nor the provider has anything new.
    pub async fn select_for_user(
        &self,
        user_id: i64,
        selection: &Selection,
    ) -> Result<Option<images::Model>> {
        let category_key = selection.category_key();

        let mut unseen = self.repo.fetch_unseen(&category_key, user_id).await?;

        if unseen.is_empty() {
            info!(
                "Cache miss for user {} in '{}', asking provider",
                user_id, category_key
            );

            let fresh = self
                .provider
                .fetch_batch(selection.query(), self.batch_size)
                .await;

            if !fresh.is_empty() {
                let inserted = self.repo.add_images(&category_key, &fresh).await?;
                info!("Cached {} new images under '{}'", inserted, category_key);
                unseen = self.repo.fetch_unseen(&category_key, user_id).await?;
            }
        }

        Ok(unseen.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::setup_test_db;
    use crate::testing::StubProvider;
    use crate::unsplash::FetchedImage;

    fn five_images() -> Vec<FetchedImage> {
        (1..=5)
            .map(|i| FetchedImage {
                id: format!("img{}", i),
                url: format!("https://images.example/img{}", i),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_cache_hit_skips_provider() {
        let repo = Arc::new(setup_test_db().await.unwrap());
        repo.add_images("Space", &five_images()).await.unwrap();

        let provider = Arc::new(StubProvider::new(vec![]));
        let selector = ImageSelector::new(repo.clone(), provider.clone(), 5);

        let image = selector
            .select_for_user(1, &Selection::narrow("Space"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(image.image_id, "img1");
        assert!(provider.queries().is_empty());
    }

    #[tokio::test]
    async fn test_cache_miss_fills_from_provider() {
        let repo = Arc::new(setup_test_db().await.unwrap());
        let provider = Arc::new(StubProvider::new(vec![five_images()]));
        let selector = ImageSelector::new(repo.clone(), provider.clone(), 5);

        let selection = Selection::wide("Nature", "Mountains");
        let image = selector
            .select_for_user(1, &selection)
            .await
            .unwrap()
            .unwrap();

        let ids: Vec<String> = five_images().into_iter().map(|i| i.id).collect();
        assert!(ids.contains(&image.image_id));
        assert_eq!(image.category_key, "Nature:Mountains");
        assert_eq!(repo.count_images("Nature:Mountains").await.unwrap(), 5);

        // The provider is queried with the leaf name, not the compound key
        assert_eq!(provider.queries(), vec![("Mountains".to_string(), 5)]);
    }

    #[tokio::test]
    async fn test_empty_provider_returns_none() {
        let repo = Arc::new(setup_test_db().await.unwrap());
        let provider = Arc::new(StubProvider::new(vec![]));
        let selector = ImageSelector::new(repo.clone(), provider.clone(), 5);

        let image = selector
            .select_for_user(1, &Selection::narrow("Fantasy"))
            .await
            .unwrap();

        assert!(image.is_none());
        assert_eq!(repo.count_images("Fantasy").await.unwrap(), 0);
        assert_eq!(provider.queries().len(), 1);
    }

    #[tokio::test]
    async fn test_never_returns_seen_image() {
        let repo = Arc::new(setup_test_db().await.unwrap());
        repo.add_images("Cities", &five_images()[..2]).await.unwrap();
        repo.mark_seen(3, "img1").await.unwrap();
        repo.mark_seen(3, "img2").await.unwrap();

        // Provider only hands back images the user already saw
        let provider = Arc::new(StubProvider::new(vec![five_images()[..2].to_vec()]));
        let selector = ImageSelector::new(repo.clone(), provider.clone(), 5);

        let image = selector
            .select_for_user(3, &Selection::narrow("Cities"))
            .await
            .unwrap();
        assert!(image.is_none());

        // Another user still gets the first cached image
        let other = selector
            .select_for_user(4, &Selection::narrow("Cities"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(other.image_id, "img1");
    }

    #[tokio::test]
    async fn test_selection_is_deterministic() {
        let repo = Arc::new(setup_test_db().await.unwrap());
        repo.add_images("Animals", &five_images()).await.unwrap();

        let provider = Arc::new(StubProvider::new(vec![]));
        let selector = ImageSelector::new(repo, provider, 5);

        let first = selector
            .select_for_user(9, &Selection::narrow("Animals"))
            .await
            .unwrap();
        let second = selector
            .select_for_user(9, &Selection::narrow("Animals"))
            .await
            .unwrap();
        assert_eq!(first, second);
    }
}
