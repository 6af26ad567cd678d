use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Response of the count endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

/// One page of the rendered-paginated endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub ads: Vec<RawAd>,
    #[serde(default)]
    pub pagination: Pagination,
}

impl SearchPage {
    /// Cursor for the following page, if the source offers one
    pub fn next_token(&self) -> Option<&str> {
        self.pagination
            .pages
            .iter()
            .find(|page| page.label == "next")
            .and_then(|page| page.token.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub pages: Vec<PageDescriptor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageDescriptor {
    pub label: String,
    #[serde(default)]
    pub token: Option<String>,
}

/// A listing as the API returns it
#[derive(Debug, Clone, Deserialize)]
pub struct RawAd {
    pub ad_link: String,
    #[serde(default)]
    pub subject: String,
    /// Price in kopecks; the API sends it as a string
    #[serde(default, deserialize_with = "minor_units")]
    pub price_byn: Option<i64>,
    #[serde(default)]
    pub ad_parameters: Vec<AdParameter>,
}

/// Labelled attribute of a listing
#[derive(Debug, Clone, Deserialize)]
pub struct AdParameter {
    /// Human readable label, e.g. "Состояние"
    pub pl: String,
    /// Value, a string or a list of strings
    #[serde(default)]
    pub vl: Value,
}

impl AdParameter {
    pub fn value_text(&self) -> String {
        scalar_text(&self.vl)
    }
}

/// Render a JSON scalar (or list of scalars) as plain text
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .map(scalar_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null | Value::Object(_) => String::new(),
    }
}

fn minor_units<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
