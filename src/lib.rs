//! Exports Kufar listings for a category or search link.
//!
//! A landing page is resolved into a search query and a total count, the
//! requested quota is reconciled with that total, and cursor pages are
//! walked until the quota is met or the source stops paginating.

pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod prompt;
pub mod scrapers;

pub use error::{KufarError, Result};
pub use models::{ListingRecord, Price, Quota, ResultSet, SearchQuery};
