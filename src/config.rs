use crate::scrapers::kufar::DEFAULT_API_BASE;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Export Kufar listings for a category or search link
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Config {
    /// Kufar API host
    #[arg(long, env = "KUFAR_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Directory the workbooks are written to
    #[arg(short, long, env = "KUFAR_OUTPUT_DIR", default_value = "Товары_куфар")]
    pub output_dir: PathBuf,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Run once for this link instead of prompting
    #[arg(short, long)]
    pub url: Option<String>,

    /// Number of listings to export with --url (default: all)
    #[arg(short, long, requires = "url")]
    pub count: Option<String>,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
