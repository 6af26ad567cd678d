use crate::error::Result;
use crate::models::SearchQuery;
use crate::scrapers::types::SearchPage;
use async_trait::async_trait;

/// What a landing page tells us about a search
#[derive(Debug, Clone, PartialEq)]
pub struct PageParameters {
    /// Filter values pulled from the page, unfiltered
    pub filters: Vec<(String, String)>,
    /// Human readable category, used to name the export
    pub category_label: String,
}

/// Source of initial search parameters
/// Only the landing page scrape exists today; other sources plug in here
#[async_trait]
pub trait PageParameterSource: Send + Sync {
    async fn parameters(&self, url: &str) -> Result<PageParameters>;
}

/// Paginated listing search
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Total listings matching the query filters
    async fn count(&self, params: &[(String, String)]) -> Result<u64>;

    /// Fetch one page for the query, honoring its cursor
    async fn page(&self, query: &SearchQuery) -> Result<SearchPage>;
}
