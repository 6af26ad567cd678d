use crate::error::{KufarError, Result};
use crate::models::SearchQuery;
use crate::scrapers::traits::SearchApi;
use crate::scrapers::types::{CountResponse, SearchPage};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub const DEFAULT_API_BASE: &str = "https://api.kufar.by";

const COUNT_PATH: &str = "/search-api/v2/search/count";
const PAGE_PATH: &str = "/search-api/v2/search/rendered-paginated";

/// Kufar search API client
pub struct KufarApi {
    client: Client,
    base: String,
}

impl KufarApi {
    /// Client for the API at `base`, normally [`DEFAULT_API_BASE`]
    pub fn with_base(client: Client, base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self { client, base }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base, path);
        debug!("GET {} {:?}", url, params);

        let response = self.client.get(&url).query(params).send().await?;

        if !response.status().is_success() {
            warn!("Kufar API returned status: {}", response.status());
            return Err(KufarError::UpstreamStatus {
                url,
                status: response.status(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl SearchApi for KufarApi {
    async fn count(&self, params: &[(String, String)]) -> Result<u64> {
        let response: CountResponse = self.get_json(COUNT_PATH, params).await?;
        Ok(response.count)
    }

    async fn page(&self, query: &SearchQuery) -> Result<SearchPage> {
        let page: SearchPage = self.get_json(PAGE_PATH, &query.page_params()).await?;
        debug!(
            "Page returned {} ads, next cursor: {}",
            page.ads.len(),
            page.next_token().is_some()
        );
        Ok(page)
    }
}
