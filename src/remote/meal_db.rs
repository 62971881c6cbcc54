use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::error::TransportException;
use crate::remote::{MealsEnvelope, RecipeSource, RemoteResponse};

/// HTTP client for a TheMealDB-compatible catalog
pub struct MealDbClient {
    client: Client,
    base_url: String,
}

impl MealDbClient {
    /// Create a client from configuration
    pub fn new(config: &ApiConfig) -> Result<Self, reqwest::Error> {
        Self::with_base_url(config.base_url.clone(), Some(config.timeout()))
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (compatible; RecipeFinder/1.0)")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get(
        &self,
        endpoint: &str,
        param: (&str, &str),
    ) -> Result<RemoteResponse<MealsEnvelope>, TransportException> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self.client.get(&url).query(&[param]).send().await?;

        let status = response.status();
        debug!("GET {} -> {}", url, status);
        if !status.is_success() {
            return Ok(RemoteResponse::error(status.as_u16()));
        }

        let body: MealsEnvelope = response.json().await?;
        Ok(RemoteResponse {
            status: status.as_u16(),
            body: Some(body),
        })
    }
}

#[async_trait]
impl RecipeSource for MealDbClient {
    fn source_name(&self) -> &str {
        "themealdb"
    }

    async fn search(
        &self,
        query: &str,
    ) -> Result<RemoteResponse<MealsEnvelope>, TransportException> {
        self.get("search.php", ("s", query)).await
    }

    async fn details(&self, id: &str) -> Result<RemoteResponse<MealsEnvelope>, TransportException> {
        self.get("lookup.php", ("i", id)).await
    }
}
