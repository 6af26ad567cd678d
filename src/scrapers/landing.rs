use crate::error::{InvalidUrlReason, KufarError, Result};
use crate::scrapers::traits::{PageParameterSource, PageParameters};
use crate::scrapers::types::scalar_text;
use async_trait::async_trait;
use reqwest::{Client, Url};
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Label used when the page has no active menu entry
pub const DEFAULT_CATEGORY_LABEL: &str = "kufar";

const CATEGORY_SELECTOR: &str = "span.styles_link__text__yW1k7.styles_link__text--menu-tree__jVaR7.styles_link__text--menu-tree--active__6niOl";
const STATE_SELECTOR: &str = r#"script[type="application/json"]"#;
const QUERY_POINTER: &str = "/props/initialState/router/query";

/// Reads search parameters off a Kufar listing page
pub struct LandingPage {
    client: Client,
}

impl LandingPage {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let parsed = validate_url(url)?;

        debug!("Fetching landing page: {}", parsed);

        let response = self.client.get(parsed).send().await.map_err(|e| {
            if e.is_connect() {
                KufarError::InvalidUrl {
                    url: url.to_string(),
                    reason: InvalidUrlReason::Unreachable,
                }
            } else {
                KufarError::Http(e)
            }
        })?;

        if !response.status().is_success() {
            warn!("Landing page returned status: {}", response.status());
            return Err(KufarError::UpstreamStatus {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let html = response.text().await?;
        debug!("Downloaded {} bytes of HTML", html.len());
        Ok(html)
    }
}

#[async_trait]
impl PageParameterSource for LandingPage {
    async fn parameters(&self, url: &str) -> Result<PageParameters> {
        let html = self.fetch(url).await?;
        let params = parse_landing_page(url, &html)?;
        info!(
            "Landing page category '{}' with {} filter(s)",
            params.category_label,
            params.filters.len()
        );
        Ok(params)
    }
}

/// Accept only absolute http(s) URLs with a host
pub fn validate_url(url: &str) -> Result<Url> {
    let malformed = || KufarError::InvalidUrl {
        url: url.to_string(),
        reason: InvalidUrlReason::Malformed,
    };
    let parsed = Url::parse(url.trim()).map_err(|_| malformed())?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(malformed());
    }
    Ok(parsed)
}

/// Pull the category label and the router query out of a landing page
pub fn parse_landing_page(url: &str, html: &str) -> Result<PageParameters> {
    let document = Html::parse_document(html);
    let malformed = |detail: &str| KufarError::MalformedUpstreamPage {
        url: url.to_string(),
        detail: detail.to_string(),
    };

    let category_selector = Selector::parse(CATEGORY_SELECTOR).expect("valid category selector");
    let category_label = document
        .select(&category_selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY_LABEL.to_string());

    let state_selector = Selector::parse(STATE_SELECTOR).expect("valid state selector");
    let state = document
        .select(&state_selector)
        .next()
        .ok_or_else(|| malformed("no application/json script block"))?;
    let state_text = state.text().collect::<String>();

    let state: Value = serde_json::from_str(&state_text)
        .map_err(|e| malformed(&format!("state block is not JSON: {}", e)))?;

    let query = state
        .pointer(QUERY_POINTER)
        .and_then(Value::as_object)
        .ok_or_else(|| malformed("no props.initialState.router.query"))?;

    let filters = query
        .iter()
        .map(|(key, value)| (key.clone(), scalar_text(value)))
        .filter(|(_, value)| !value.is_empty())
        .collect();

    Ok(PageParameters {
        filters,
        category_label,
    })
}
