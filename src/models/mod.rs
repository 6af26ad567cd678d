use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Language every search request is pinned to
pub const LANGUAGE: &str = "ru";

/// Number of listings requested per page
pub const PAGE_SIZE: u32 = 200;

/// Filter keys accepted from the landing page router state
pub const RECOGNIZED_KEYS: [&str; 8] = ["cepst", "ot", "query", "prc", "ar", "prn", "rgn", "cat"];

/// Placeholder written for fields the source did not supply
pub const PLACEHOLDER: &str = "-";

/// Search parameters sent to the Kufar search API
///
/// Filters are resolved once from the landing page. The page size and the
/// cursor are managed by the collector and cannot be set through `filters`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    filters: BTreeMap<String, String>,
    page_size: Option<u32>,
    cursor: Option<String>,
}

impl SearchQuery {
    /// Base query carrying only the language
    pub fn new() -> Self {
        let mut filters = BTreeMap::new();
        filters.insert("lang".to_string(), LANGUAGE.to_string());
        Self {
            filters,
            page_size: None,
            cursor: None,
        }
    }

    /// Add a filter. Unknown keys and empty values are dropped; returns
    /// whether the filter was kept.
    pub fn insert_filter(&mut self, key: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.is_empty() || !RECOGNIZED_KEYS.contains(&key) {
            return false;
        }
        self.filters.insert(key.to_string(), value);
        true
    }

    /// True when nothing beyond the language is set
    pub fn has_filters(&self) -> bool {
        self.filters.keys().any(|k| k != "lang")
    }

    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub(crate) fn set_cursor(&mut self, token: String) {
        self.cursor = Some(token);
    }

    /// Parameters for the count endpoint (filters only)
    pub fn count_params(&self) -> Vec<(String, String)> {
        self.filters
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Parameters for the page endpoint (filters, page size and cursor)
    pub fn page_params(&self) -> Vec<(String, String)> {
        let mut params = self.count_params();
        if let Some(size) = self.page_size {
            params.push(("size".to_string(), size.to_string()));
        }
        if let Some(cursor) = &self.cursor {
            params.push(("cursor".to_string(), cursor.clone()));
        }
        params
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self::new()
    }
}

/// Listing price
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Price {
    /// Amount in minor currency units (kopecks)
    Amount(i64),
    Negotiable,
}

impl Price {
    /// Build from a minor-unit amount; zero means the seller left it open
    pub fn from_minor(minor: i64) -> Self {
        if minor == 0 {
            Price::Negotiable
        } else {
            Price::Amount(minor)
        }
    }

    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            Price::Amount(minor) => Some(*minor as f64 / 100.0),
            Price::Negotiable => None,
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Amount(minor) => {
                let sign = if *minor < 0 { "-" } else { "" };
                let abs = minor.unsigned_abs();
                write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
            }
            Price::Negotiable => write!(f, "Договорная"),
        }
    }
}

/// One exported listing, a row of the workbook
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRecord {
    pub title: String,
    pub price: Price,
    pub category: String,
    pub condition: String,
    pub link: String,
}

/// Records in discovery order, unique by link
#[derive(Debug, Default)]
pub struct ResultSet {
    records: Vec<ListingRecord>,
    links: HashSet<String>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            links: HashSet::with_capacity(capacity),
        }
    }

    pub fn contains_link(&self, link: &str) -> bool {
        self.links.contains(link)
    }

    /// Append a record unless its link is already present
    pub fn push(&mut self, record: ListingRecord) -> bool {
        if !self.links.insert(record.link.clone()) {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }
}

/// How many records the caller asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quota {
    Unbounded,
    AtMost(usize),
}
