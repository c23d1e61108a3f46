use clap::Parser;
use log::info;
use recipe_crawler::operator::run_session;
use recipe_crawler::{Crawler, CrawlerConfig, RecordStore};
use std::path::PathBuf;
use tokio::io::BufReader;

/// Crawl recipe pages and store them as structured JSON records
#[derive(Parser, Debug)]
#[command(name = "recipe-crawler", version, about)]
struct Cli {
    /// Crawl from this URL without prompting and exit when the frontier is empty
    #[arg(long, value_name = "URL")]
    seed: Option<String>,

    /// Directory receiving the recipe documents
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Completion provider (openai, anthropic, ollama)
    #[arg(long)]
    provider: Option<String>,

    /// Stop each frontier drain after this many pages
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Do not follow suggestion links after an interactive input
    #[arg(long)]
    no_auto: bool,

    /// Print the stored recipes and exit
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = CrawlerConfig::load()?;
    if let Some(dir) = cli.output_dir {
        config.crawl.output_dir = dir;
    }
    if let Some(provider) = cli.provider {
        config.default_provider = provider;
    }
    if cli.max_pages.is_some() {
        config.crawl.max_pages = cli.max_pages;
    }
    if cli.no_auto {
        config.crawl.auto = false;
    }

    if cli.list {
        let store = RecordStore::new(config.crawl.output_dir.clone());
        for record in store.records().await? {
            println!(
                "{}\t{}\t{}",
                record.id.as_deref().unwrap_or("-"),
                record.title.as_deref().unwrap_or("Unknown Title"),
                record.source_url.as_deref().unwrap_or("-")
            );
        }
        return Ok(());
    }

    let mut crawler = Crawler::from_config(&config)?;
    info!(
        "Writing recipes to {}",
        crawler.store().dir().display()
    );

    let summary = match cli.seed {
        Some(seed) => crawler.crawl(&seed).await,
        None => {
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = tokio::io::stdout();
            run_session(&mut crawler, stdin, &mut stdout, config.crawl.auto).await?
        }
    };

    info!(
        "Crawl finished: {} attempted, {} saved, {} without recipe, {} failed, {} still pending",
        summary.attempted,
        summary.persisted,
        summary.skipped,
        summary.errored,
        crawler.state().frontier().len()
    );

    Ok(())
}
