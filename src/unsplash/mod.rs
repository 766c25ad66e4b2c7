//! Image provider seam between the wallpaper pipeline and Unsplash

mod provider;

pub use provider::UnsplashProvider;

use async_trait::async_trait;

/// One image as handed back by a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub id: String,
    pub url: String,
}

/// Source of fresh images for a search query.
///
/// Implementations never fail: any provider or transport problem yields an
/// empty batch, which callers treat as "try later".
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn fetch_batch(&self, query: &str, count: u32) -> Vec<FetchedImage>;
}
