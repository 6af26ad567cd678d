pub mod kufar;
pub mod landing;
pub mod traits;
pub mod types;

pub use kufar::KufarApi;
pub use landing::LandingPage;
pub use traits::{PageParameterSource, PageParameters, SearchApi};

use crate::error::Result;
use reqwest::Client;
use std::time::Duration;

/// HTTP client shared by the landing page scrape and the API calls
pub fn http_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
        .build()?;
    Ok(client)
}
