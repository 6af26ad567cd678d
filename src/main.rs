use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use kufar_scout::config::Config;
use kufar_scout::pipeline::{effective_count, resolve_query, Collector};
use kufar_scout::prompt::{self, Request};
use kufar_scout::scrapers::{http_client, KufarApi, LandingPage};
use kufar_scout::{export, KufarError, Quota};
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

struct Scout {
    landing: LandingPage,
    api: KufarApi,
    config: Config,
}

impl Scout {
    fn new(config: Config) -> anyhow::Result<Self> {
        let client = http_client(config.timeout()).context("Failed to create HTTP client")?;
        Ok(Self {
            landing: LandingPage::new(client.clone()),
            api: KufarApi::with_base(client, config.api_base.clone()),
            config,
        })
    }

    async fn run(&self, url: &str, quota: Quota) -> kufar_scout::Result<()> {
        let started = Instant::now();

        let resolved = resolve_query(&self.landing, &self.api, url).await?;
        println!("Всего объявлений в этой категории: {}", resolved.total);

        let effective = effective_count(resolved.total, quota);

        let progress = ProgressBar::new(effective as u64);
        progress.set_style(
            ProgressStyle::with_template("{msg}: {percent:>3}% |{bar:40}| {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        progress.set_message("Загрузка объявлений");

        let bar = progress.clone();
        let collection = Collector::new(&self.api)
            .with_observer(move |n| bar.set_position(n as u64))
            .collect(resolved.query, effective)
            .await;
        progress.finish();
        let collection = collection?;

        if let Some(shortfall) = collection.shortfall() {
            println!(
                "!Внимание! Kufar отдал меньше объявлений, чем ожидалось: загружено {} из {}",
                shortfall.retrieved, shortfall.expected
            );
        }

        export::write_workbook(
            collection.records.records(),
            &self.config.output_dir,
            &resolved.category_label,
            chrono::Local::now().naive_local(),
        )?;

        println!(
            "Время выполнения: {:.2} секунд\n",
            started.elapsed().as_secs_f64()
        );
        Ok(())
    }
}

fn report(err: &KufarError) {
    if err.is_user_error() {
        warn!("{}", err);
    } else {
        error!("{}", err);
    }
    println!("Ошибка: {}\n", err);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("Invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🛒 Kufar Scout");

    let one_shot = config
        .url
        .clone()
        .map(|url| (url, config.count.clone().unwrap_or_default()));
    let scout = Scout::new(config)?;

    if let Some((url, count)) = one_shot {
        let request = prompt::parse_request(&url, &count)?;
        if let Request::Collect { url, quota } = request {
            scout.run(&url, quota).await?;
        }
        return Ok(());
    }

    println!("!!!Для выхода напишите {}!!!", prompt::EXIT_KEYWORD);
    loop {
        let request = match prompt::ask() {
            Ok(request) => request,
            Err(KufarError::Prompt(e)) => return Err(e).context("Failed to read input"),
            Err(e) => {
                report(&e);
                continue;
            }
        };

        match request {
            Request::Exit => return Ok(()),
            Request::Collect { url, quota } => {
                if let Err(e) = scout.run(&url, quota).await {
                    report(&e);
                }
            }
        }
    }
}
