use crate::error::Result;
use crate::models::{ResultSet, SearchQuery, PAGE_SIZE};
use crate::pipeline::normalize::normalize;
use crate::scrapers::SearchApi;
use tracing::{debug, info, warn};

/// Why collection stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The requested number of records was collected
    QuotaReached,
    /// The source stopped offering pages before the quota was met
    Exhausted(Shortfall),
}

/// Gap between what was requested and what the source delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortfall {
    pub expected: usize,
    pub retrieved: usize,
}

impl Shortfall {
    pub fn missing(&self) -> usize {
        self.expected.saturating_sub(self.retrieved)
    }
}

/// Finished collection run
#[derive(Debug)]
pub struct Collection {
    pub records: ResultSet,
    pub outcome: Outcome,
    /// Page requests issued
    pub pages_fetched: usize,
}

impl Collection {
    pub fn shortfall(&self) -> Option<Shortfall> {
        match self.outcome {
            Outcome::Exhausted(shortfall) => Some(shortfall),
            Outcome::QuotaReached => None,
        }
    }
}

/// Walks cursor pages until the quota is met or the source runs dry
pub struct Collector<'a, A: SearchApi + ?Sized> {
    api: &'a A,
    observer: Option<Box<dyn FnMut(usize) + Send + 'a>>,
}

impl<'a, A: SearchApi + ?Sized> Collector<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            observer: None,
        }
    }

    /// Called with the running record count after every accepted record
    pub fn with_observer(mut self, observer: impl FnMut(usize) + Send + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Collect up to `effective` unique records.
    ///
    /// Returns as soon as the quota is met, even mid-page, without fetching
    /// further pages. A missing "next" cursor ends the run early with a
    /// shortfall instead of an error. Fetch errors propagate unretried.
    pub async fn collect(mut self, mut query: SearchQuery, effective: usize) -> Result<Collection> {
        // The quota comes from the upstream count; reserve one page at most
        let mut records = ResultSet::with_capacity(effective.min(PAGE_SIZE as usize));
        let mut pages_fetched = 0;

        if effective == 0 {
            return Ok(Collection {
                records,
                outcome: Outcome::QuotaReached,
                pages_fetched,
            });
        }

        loop {
            let page = self.api.page(&query).await?;
            pages_fetched += 1;
            debug!("Page {}: {} ads", pages_fetched, page.ads.len());

            for ad in &page.ads {
                if records.contains_link(&ad.ad_link) {
                    debug!("Skipping duplicate {}", ad.ad_link);
                    continue;
                }
                records.push(normalize(ad));

                if let Some(observer) = self.observer.as_mut() {
                    observer(records.len());
                }

                if records.len() == effective {
                    info!(
                        "✅ Collected {} listings from {} page(s)",
                        records.len(),
                        pages_fetched
                    );
                    return Ok(Collection {
                        records,
                        outcome: Outcome::QuotaReached,
                        pages_fetched,
                    });
                }
            }

            match page.next_token() {
                Some(token) => query.set_cursor(token.to_string()),
                None => {
                    let shortfall = Shortfall {
                        expected: effective,
                        retrieved: records.len(),
                    };
                    warn!(
                        "Kufar stopped paginating early: expected {} listings, retrieved {}",
                        shortfall.expected, shortfall.retrieved
                    );
                    return Ok(Collection {
                        records,
                        outcome: Outcome::Exhausted(shortfall),
                        pages_fetched,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KufarError;
    use crate::models::Quota;
    use crate::pipeline::effective_count;
    use crate::scrapers::types::{PageDescriptor, Pagination, RawAd, SearchPage};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Serves canned pages in order and records the cursor of every request
    struct ScriptedApi {
        pages: Vec<SearchPage>,
        cursors: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedApi {
        fn new(pages: Vec<SearchPage>) -> Self {
            Self {
                pages,
                cursors: Mutex::new(Vec::new()),
            }
        }

        fn fetches(&self) -> usize {
            self.cursors.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SearchApi for ScriptedApi {
        async fn count(&self, _params: &[(String, String)]) -> Result<u64> {
            unreachable!("collector never counts")
        }

        async fn page(&self, query: &SearchQuery) -> Result<SearchPage> {
            let mut cursors = self.cursors.lock().unwrap();
            cursors.push(query.cursor().map(str::to_string));
            let index = cursors.len() - 1;
            self.pages
                .get(index)
                .cloned()
                .ok_or_else(|| KufarError::UpstreamStatus {
                    url: format!("page {}", index),
                    status: reqwest::StatusCode::BAD_GATEWAY,
                })
        }
    }

    fn ad(id: usize) -> RawAd {
        RawAd {
            ad_link: format!("https://www.kufar.by/item/{}", id),
            subject: format!("Listing {}", id),
            price_byn: Some(id as i64 * 100),
            ad_parameters: Vec::new(),
        }
    }

    fn page(ids: impl IntoIterator<Item = usize>, next: Option<&str>) -> SearchPage {
        let mut pages = vec![PageDescriptor {
            label: "self".to_string(),
            token: None,
        }];
        if let Some(token) = next {
            pages.push(PageDescriptor {
                label: "next".to_string(),
                token: Some(token.to_string()),
            });
        }
        SearchPage {
            ads: ids.into_iter().map(ad).collect(),
            pagination: Pagination { pages },
        }
    }

    fn query() -> SearchQuery {
        SearchQuery::new().with_page_size(200)
    }

    #[tokio::test]
    async fn test_quota_reached_mid_page_stops_fetching() {
        let api = ScriptedApi::new(vec![
            page(0..200, Some("p2")),
            page(200..400, Some("p3")),
            page(400..460, None),
        ]);

        let collection = Collector::new(&api).collect(query(), 250).await.unwrap();

        assert_eq!(collection.records.len(), 250);
        assert_eq!(collection.outcome, Outcome::QuotaReached);
        assert_eq!(collection.pages_fetched, 2);
        assert_eq!(api.fetches(), 2);
        assert_eq!(
            *api.cursors.lock().unwrap(),
            vec![None, Some("p2".to_string())]
        );
        let last = collection.records.records().last().unwrap();
        assert_eq!(last.link, "https://www.kufar.by/item/249");
    }

    #[tokio::test]
    async fn test_duplicates_across_pages_are_skipped() {
        let api = ScriptedApi::new(vec![
            page(0..60, Some("p2")),
            page((0..10).chain(60..90), None),
        ]);

        let collection = Collector::new(&api).collect(query(), 100).await.unwrap();

        assert_eq!(collection.records.len(), 90);
        let shortfall = collection.shortfall().unwrap();
        assert_eq!(shortfall.expected, 100);
        assert_eq!(shortfall.retrieved, 90);
        assert_eq!(shortfall.missing(), 10);

        let links: Vec<_> = collection
            .records
            .records()
            .iter()
            .map(|r| r.link.clone())
            .collect();
        let expected: Vec<_> = (0..60)
            .chain(60..90)
            .map(|id| format!("https://www.kufar.by/item/{}", id))
            .collect();
        assert_eq!(links, expected);
    }

    #[tokio::test]
    async fn test_duplicates_within_a_page_are_skipped() {
        let api = ScriptedApi::new(vec![page([1, 2, 2, 3, 1], None)]);

        let collection = Collector::new(&api).collect(query(), 5).await.unwrap();

        assert_eq!(collection.records.len(), 3);
        assert_eq!(collection.shortfall().unwrap().missing(), 2);
    }

    #[tokio::test]
    async fn test_missing_next_returns_partial_result() {
        let api = ScriptedApi::new(vec![page(0..30, None)]);

        let collection = Collector::new(&api).collect(query(), 50).await.unwrap();

        assert_eq!(collection.records.len(), 30);
        assert_eq!(
            collection.outcome,
            Outcome::Exhausted(Shortfall {
                expected: 50,
                retrieved: 30
            })
        );
    }

    #[tokio::test]
    async fn test_huge_reported_count_returns_short_result() {
        let api = ScriptedApi::new(vec![page(0..15, None)]);
        let effective = effective_count(100_000_000_000_000_000, Quota::Unbounded);

        let collection = Collector::new(&api).collect(query(), effective).await.unwrap();

        assert_eq!(collection.records.len(), 15);
        let shortfall = collection.shortfall().unwrap();
        assert_eq!(shortfall.expected, effective);
        assert_eq!(shortfall.retrieved, 15);
        assert_eq!(api.fetches(), 1);
    }

    #[tokio::test]
    async fn test_zero_quota_fetches_nothing() {
        let api = ScriptedApi::new(vec![page(0..10, None)]);

        let collection = Collector::new(&api).collect(query(), 0).await.unwrap();

        assert!(collection.records.is_empty());
        assert_eq!(api.fetches(), 0);
    }

    #[tokio::test]
    async fn test_quota_on_page_boundary_does_not_fetch_next() {
        let api = ScriptedApi::new(vec![page(0..20, Some("p2")), page(20..40, None)]);

        let collection = Collector::new(&api).collect(query(), 20).await.unwrap();

        assert_eq!(collection.records.len(), 20);
        assert_eq!(collection.outcome, Outcome::QuotaReached);
        assert_eq!(api.fetches(), 1);
    }

    #[tokio::test]
    async fn test_fetch_error_propagates() {
        let api = ScriptedApi::new(vec![page(0..5, Some("p2"))]);

        let result = Collector::new(&api).collect(query(), 10).await;

        assert!(result.is_err());
        assert_eq!(api.fetches(), 2);
    }

    #[tokio::test]
    async fn test_observer_sees_monotonic_progress() {
        let api = ScriptedApi::new(vec![page(0..3, Some("p2")), page([2, 3, 4], None)]);
        let seen = Mutex::new(Vec::new());

        let collection = Collector::new(&api)
            .with_observer(|n| seen.lock().unwrap().push(n))
            .collect(query(), 10)
            .await
            .unwrap();

        assert_eq!(collection.records.len(), 5);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4, 5]);
    }
}
