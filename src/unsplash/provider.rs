use super::{FetchedImage, ImageProvider};
use crate::config::UnsplashConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{error, info, warn};
use unsplash_client::{Orientation, UnsplashClient};

/// [`ImageProvider`] backed by the Unsplash random-photo endpoint
pub struct UnsplashProvider {
    client: UnsplashClient,
}

impl UnsplashProvider {
    pub fn new(config: &UnsplashConfig) -> Result<Self> {
        let client = UnsplashClient::with_base_url(
            config.access_key.clone(),
            config.base_url.clone(),
            Duration::from_secs(config.timeout_sec),
        )
        .context("Failed to build Unsplash client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ImageProvider for UnsplashProvider {
    async fn fetch_batch(&self, query: &str, count: u32) -> Vec<FetchedImage> {
        info!("Fetching {} images from Unsplash for '{}'", count, query);

        match self
            .client
            .random_photos(query, count, Orientation::Portrait)
            .await
        {
            Ok(photos) => photos
                .into_iter()
                .map(|photo| FetchedImage {
                    id: photo.id,
                    url: photo.urls.regular,
                })
                .collect(),
            Err(unsplash_client::Error::QuotaExceeded(body)) => {
                warn!("Unsplash quota exceeded while fetching '{}': {}", query, body);
                Vec::new()
            }
            Err(e) => {
                error!("Error fetching '{}' from Unsplash: {:#}", query, e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(base_url: String) -> UnsplashProvider {
        UnsplashProvider::new(&UnsplashConfig {
            access_key: "test-key".to_string(),
            base_url,
            timeout_sec: 2,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_batch_maps_regular_urls() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/photos/random"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "id": "x1", "urls": { "regular": "https://img/x1" } },
                { "id": "x2", "urls": { "regular": "https://img/x2" } }
            ])))
            .mount(&server)
            .await;

        let images = provider_for(server.uri()).fetch_batch("Cats", 5).await;

        assert_eq!(
            images,
            vec![
                FetchedImage {
                    id: "x1".to_string(),
                    url: "https://img/x1".to_string()
                },
                FetchedImage {
                    id: "x2".to_string(),
                    url: "https://img/x2".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_batch_quota_exceeded_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/photos/random"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Rate Limit Exceeded"))
            .mount(&server)
            .await;

        assert!(provider_for(server.uri()).fetch_batch("Cats", 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_batch_server_error_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/photos/random"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert!(provider_for(server.uri()).fetch_batch("Cats", 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_batch_unreachable_host_is_empty() {
        // Nothing listens on port 9 (discard) in the test environment
        let provider = provider_for("http://127.0.0.1:9".to_string());
        assert!(provider.fetch_batch("Cats", 5).await.is_empty());
    }
}
