use crate::error::Result;
use crate::models::{SearchQuery, PAGE_SIZE};
use crate::scrapers::{PageParameterSource, SearchApi};
use tracing::{debug, info};

/// Sort sent with the count request when the page carries no filters
pub const DEFAULT_SORT: &str = "lst.d";

/// Everything known about a search before collection starts
#[derive(Debug, Clone)]
pub struct ResolvedQuery {
    pub query: SearchQuery,
    pub total: u64,
    pub category_label: String,
}

/// Turn a landing URL into a paginated query and the total it matches.
/// Issues exactly one count request.
pub async fn resolve_query<S, A>(source: &S, api: &A, url: &str) -> Result<ResolvedQuery>
where
    S: PageParameterSource + ?Sized,
    A: SearchApi + ?Sized,
{
    let params = source.parameters(url).await?;

    let mut query = SearchQuery::new();
    for (key, value) in &params.filters {
        if !query.insert_filter(key, value.as_str()) {
            debug!("Ignoring landing page parameter '{}'", key);
        }
    }

    let mut count_params = query.count_params();
    if !query.has_filters() {
        count_params.push(("sort".to_string(), DEFAULT_SORT.to_string()));
    }
    debug!("Requesting count with {:?}", count_params);
    let total = api.count(&count_params).await?;

    info!("📦 {} listings available in '{}'", total, params.category_label);

    Ok(ResolvedQuery {
        query: query.with_page_size(PAGE_SIZE),
        total,
        category_label: params.category_label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::traits::PageParameters;
    use crate::scrapers::types::SearchPage;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedSource(PageParameters);

    #[async_trait]
    impl PageParameterSource for FixedSource {
        async fn parameters(&self, _url: &str) -> Result<PageParameters> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct CountRecorder {
        calls: Mutex<Vec<Vec<(String, String)>>>,
    }

    #[async_trait]
    impl SearchApi for CountRecorder {
        async fn count(&self, params: &[(String, String)]) -> Result<u64> {
            self.calls.lock().unwrap().push(params.to_vec());
            Ok(321)
        }

        async fn page(&self, _query: &SearchQuery) -> Result<SearchPage> {
            panic!("resolving must not fetch pages");
        }
    }

    fn source(filters: &[(&str, &str)]) -> FixedSource {
        FixedSource(PageParameters {
            filters: filters
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            category_label: "Велосипеды".to_string(),
        })
    }

    fn has(params: &[(String, String)], key: &str, value: &str) -> bool {
        params.iter().any(|(k, v)| k == key && v == value)
    }

    #[tokio::test]
    async fn test_unfiltered_page_counts_with_default_sort() {
        let api = CountRecorder::default();
        let resolved = resolve_query(&source(&[("page", "3")]), &api, "https://www.kufar.by/l")
            .await
            .unwrap();

        let calls = api.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(has(&calls[0], "lang", "ru"));
        assert!(has(&calls[0], "sort", DEFAULT_SORT));
        assert_eq!(resolved.total, 321);
        assert_eq!(resolved.query.filter("sort"), None);
        assert_eq!(resolved.query.filter("page"), None);
        assert_eq!(resolved.query.page_size(), Some(PAGE_SIZE));
    }

    #[tokio::test]
    async fn test_filtered_page_counts_as_is() {
        let api = CountRecorder::default();
        let resolved = resolve_query(
            &source(&[("cat", "17010"), ("rgn", "7")]),
            &api,
            "https://www.kufar.by/l/velosipedy",
        )
        .await
        .unwrap();

        let calls = api.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(has(&calls[0], "cat", "17010"));
        assert!(!calls[0].iter().any(|(k, _)| k == "sort" || k == "size"));
        assert_eq!(resolved.category_label, "Велосипеды");
        assert_eq!(resolved.query.filter("rgn"), Some("7"));
        assert_eq!(resolved.query.cursor(), None);
    }
}
