use clap::Parser;
use dotenv::dotenv;
use std::path::PathBuf;
use std::process;
use tracing::error;

use fashion_scraper::config::Config;
use fashion_scraper::error::{Result, ScraperError};
use fashion_scraper::load::{CsvSink, PostgresSink, Sink};
use fashion_scraper::logging;
use fashion_scraper::pipeline::{Pipeline, PipelineResult};
use fashion_scraper::transform::drop_counts;

#[derive(Parser)]
#[command(name = "fashion_scraper")]
#[command(about = "Fashion Studio product catalog ETL scraper")]
#[command(version = "0.1.0")]
struct Cli {
    /// Explicit page numbers to scrape (default: the full catalog range)
    #[arg(long, num_args = 1.., value_name = "PAGE")]
    pages: Option<Vec<u32>>,

    /// PostgreSQL connection string; enables the database sink
    #[arg(long, value_name = "URL")]
    postgresql: Option<String>,

    /// Output CSV path
    #[arg(long, default_value = "products.csv", value_name = "PATH")]
    csv: PathBuf,

    /// Disable the CSV sink
    #[arg(long)]
    no_csv: bool,

    /// Target PostgreSQL table
    #[arg(long, default_value = "products", value_name = "NAME")]
    table: String,
}

async fn run(cli: Cli) -> Result<PipelineResult> {
    let config = Config::load()?;

    let pages: Vec<u32> = match cli.pages {
        Some(pages) => {
            if pages.iter().any(|&p| p == 0) {
                return Err(ScraperError::Config(
                    "page numbers start at 1".to_string(),
                ));
            }
            pages
        }
        None => (config.start_page..=config.end_page).collect(),
    };

    let mut sinks: Vec<Box<dyn Sink>> = Vec::new();
    if !cli.no_csv {
        sinks.push(Box::new(CsvSink::new(cli.csv)));
    }
    if let Some(url) = cli.postgresql {
        sinks.push(Box::new(PostgresSink::new(url, cli.table)));
    }

    let pipeline = Pipeline::new(config)?;
    pipeline.run(&pages, &sinks).await
}

fn print_summary(result: &PipelineResult) {
    println!("\n📊 Run summary:");
    println!(
        "   Pages scraped: {} ({} failed)",
        result.pages_attempted, result.pages_failed
    );
    println!("   Records extracted: {}", result.extracted);
    println!("   Records retained: {}", result.retained);
    println!("   Records dropped: {}", result.dropped());
    for (reason, count) in drop_counts(&result.drops) {
        println!("     - {reason}: {count}");
    }

    if !result.page_errors.is_empty() {
        println!("\n⚠️  Page errors:");
        for err in &result.page_errors {
            println!("   - {err}");
        }
    }

    if !result.sink_outcomes.is_empty() {
        println!("\nSinks:");
        for outcome in &result.sink_outcomes {
            match &outcome.result {
                Ok(()) => println!("   ✓ {}: success", outcome.sink),
                Err(e) => println!("   ✗ {}: {}", outcome.sink, e),
            }
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(result) => {
            print_summary(&result);
            if result.sinks_ok() {
                println!("\n✓ ETL run completed successfully");
            } else {
                println!("\n✗ ETL run finished with sink failures");
                process::exit(1);
            }
        }
        Err(e) => {
            error!("ETL run failed: {}", e);
            eprintln!("✗ ETL run failed: {e}");
            process::exit(1);
        }
    }
}
