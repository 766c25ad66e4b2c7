//! Unsplash API client implementation

use crate::error::{Error, Result};
use crate::models::{Orientation, Photo};
use reqwest::StatusCode;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.unsplash.com";

/// Unsplash allows at most 30 photos per random request
const MAX_RANDOM_COUNT: u32 = 30;

/// Unsplash API client authenticated with an access key (`client_id`)
#[derive(Debug, Clone)]
pub struct UnsplashClient {
    client: reqwest::Client,
    base_url: String,
    access_key: String,
}

impl UnsplashClient {
    /// Create a client against the public Unsplash API
    pub fn new(access_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Self::with_base_url(access_key, DEFAULT_BASE_URL, timeout)
    }

    /// Create a client against a custom API host (proxies, tests)
    pub fn with_base_url(
        access_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_key: access_key.into(),
        })
    }

    /// Fetch `count` random photos matching `query`.
    ///
    /// A 403 response means the hourly quota is used up and is reported as
    /// [`Error::QuotaExceeded`]; every other non-200 status becomes [`Error::Api`].
    pub async fn random_photos(
        &self,
        query: &str,
        count: u32,
        orientation: Orientation,
    ) -> Result<Vec<Photo>> {
        let url = format!("{}/photos/random", self.base_url);
        let count = count.clamp(1, MAX_RANDOM_COUNT);

        let params = [
            ("query", query.to_string()),
            ("client_id", self.access_key.clone()),
            ("count", count.to_string()),
            ("orientation", orientation.as_str().to_string()),
        ];

        let response = self.client.get(&url).query(&params).send().await?;

        let status = response.status();
        let text = response.text().await?;

        match status {
            StatusCode::OK => {
                let photos: Vec<Photo> = serde_json::from_str(&text)?;
                tracing::debug!("Unsplash returned {} photos for '{}'", photos.len(), query);
                Ok(photos)
            }
            StatusCode::FORBIDDEN => Err(Error::QuotaExceeded(text)),
            _ => Err(Error::Api {
                message: text,
                status: status.as_u16(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn photo_json(id: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "width": 3000,
            "height": 4500,
            "urls": {
                "raw": format!("https://images.unsplash.com/{}?raw", id),
                "full": format!("https://images.unsplash.com/{}?full", id),
                "regular": format!("https://images.unsplash.com/{}?w=1080", id),
                "small": format!("https://images.unsplash.com/{}?w=400", id)
            },
            "user": { "name": "someone" }
        })
    }

    fn client_for(server: &MockServer) -> UnsplashClient {
        UnsplashClient::with_base_url("test-key", server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_random_photos_sends_expected_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/photos/random"))
            .and(query_param("query", "Mountains"))
            .and(query_param("client_id", "test-key"))
            .and(query_param("count", "5"))
            .and(query_param("orientation", "portrait"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([photo_json("a1"), photo_json("b2")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let photos = client_for(&server)
            .random_photos("Mountains", 5, Orientation::Portrait)
            .await
            .unwrap();

        assert_eq!(photos.len(), 2);
        assert_eq!(photos[0].id, "a1");
        assert_eq!(photos[0].urls.regular, "https://images.unsplash.com/a1?w=1080");
        assert_eq!(photos[1].id, "b2");
    }

    #[tokio::test]
    async fn test_random_photos_quota_exceeded() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/photos/random"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Rate Limit Exceeded"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .random_photos("Space", 5, Orientation::Portrait)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::QuotaExceeded(ref msg) if msg == "Rate Limit Exceeded"));
    }

    #[tokio::test]
    async fn test_random_photos_other_status_is_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/photos/random"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .random_photos("Nowhere", 5, Orientation::Portrait)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Api { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_random_photos_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/photos/random"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"not\":\"a list\"}"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .random_photos("Nature", 5, Orientation::Portrait)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Json(_)));
    }

    #[tokio::test]
    async fn test_count_is_clamped() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/photos/random"))
            .and(query_param("count", "30"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let photos = client_for(&server)
            .random_photos("Nature", 100, Orientation::Portrait)
            .await
            .unwrap();

        assert!(photos.is_empty());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client =
            UnsplashClient::with_base_url("k", "http://localhost:1234/", Duration::from_secs(1))
                .unwrap();
        assert_eq!(client.base_url, "http://localhost:1234");
    }
}
