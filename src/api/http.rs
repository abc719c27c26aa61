//! HTTP client for the learning API

use super::LearningApi;
use crate::config::ApiConfig;
use crate::error::{Result, StoreError};
use crate::types::{Blog, Course, Event, Group, SurveyBuckets, User};
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

#[derive(Deserialize)]
struct EventsResponse {
    #[serde(default)]
    results: Vec<Event>,
}

#[derive(Deserialize)]
struct DataResponse<T> {
    data: T,
}

#[derive(Default, Deserialize)]
struct BlogsPage {
    #[serde(default)]
    blogs: Vec<Blog>,
}

#[derive(Deserialize)]
struct BlogsResponse {
    #[serde(default)]
    data: BlogsPage,
}

/// HTTP client for the learning API
///
/// # Example
///
/// ```rust,no_run
/// use lumos_store::{ApiConfig, HttpApi, LearningApi};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let api = HttpApi::new(&ApiConfig {
///     base_url: "https://lumos.example.com".into(),
///     bearer_token: Some("session-token".into()),
///     ..Default::default()
/// })?;
///
/// let events = api.events().await?;
/// # Ok(())
/// # }
/// ```
pub struct HttpApi {
    base_url: String,
    client: Client,
}

impl HttpApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = config.bearer_token {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| StoreError::Config("Invalid bearer token".into()))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "GET");
        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        match response.status() {
            StatusCode::UNAUTHORIZED => return Err(StoreError::Unauthorized),
            StatusCode::NOT_FOUND => {
                return Err(StoreError::NotFound(response.url().path().to_string()))
            }
            _ => {}
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Server {
                status,
                message: body,
            });
        }

        let body = response.json().await?;
        Ok(body)
    }
}

#[async_trait]
impl LearningApi for HttpApi {
    async fn me(&self) -> Result<User> {
        self.get("/api/me").await
    }

    async fn events(&self) -> Result<Vec<Event>> {
        let response: EventsResponse = self.get("/api/events").await?;
        Ok(response.results)
    }

    async fn surveys(&self) -> Result<SurveyBuckets> {
        let response: DataResponse<SurveyBuckets> = self.get("/api/surveys").await?;
        Ok(response.data)
    }

    async fn blogs(&self, limit: u32) -> Result<Vec<Blog>> {
        let response: BlogsResponse = self.get(&format!("/api/blogs?limit={}", limit)).await?;
        Ok(response.data.blogs)
    }

    async fn courses(&self) -> Result<Vec<Course>> {
        self.get("/api/courses-subjects").await
    }

    async fn groups(&self) -> Result<Vec<Group>> {
        let response: DataResponse<Vec<Group>> = self.get("/api/groups").await?;
        Ok(response.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let api = HttpApi::new(&ApiConfig {
            base_url: "https://lumos.example.com/".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(api.base_url(), "https://lumos.example.com");
    }

    #[test]
    fn test_rejects_unencodable_token() {
        let result = HttpApi::new(&ApiConfig {
            bearer_token: Some("bad\ntoken".into()),
            ..Default::default()
        });
        assert!(matches!(result, Err(StoreError::Config(_))));
    }

    #[test]
    fn test_response_envelopes() {
        let events: EventsResponse = serde_json::from_str(
            r#"{"count": 1, "results": [{"id": 1, "title": "Meetup", "date": "2024-05-01"}]}"#,
        )
        .unwrap();
        assert_eq!(events.results.len(), 1);

        let blogs: BlogsResponse = serde_json::from_str(r#"{"data": {}}"#).unwrap();
        assert!(blogs.data.blogs.is_empty());

        let groups: DataResponse<Vec<Group>> = serde_json::from_str(
            r#"{"data": [{"id": 2, "users": [{"id": 9}], "course_allocations": [{"course_id": 4}]}]}"#,
        )
        .unwrap();
        assert_eq!(groups.data[0].course_allocations[0].course_id, 4);

        let surveys: DataResponse<SurveyBuckets> =
            serde_json::from_str(r#"{"data": {"self": [], "reviews": []}}"#).unwrap();
        assert!(surveys.data.own.is_empty());
    }
}
