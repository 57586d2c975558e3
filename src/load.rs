use crate::error::Result;
use crate::types::CleanProduct;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Postgres, QueryBuilder};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

/// Rows per INSERT statement; keeps the bind count well under the
/// PostgreSQL limit of 65535 parameters.
const INSERT_CHUNK_SIZE: usize = 1000;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// A persistence destination for clean records. Sinks are independent:
/// one sink failing never rolls back another.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Short identifier used in logs and the run summary.
    fn name(&self) -> &'static str;

    /// Persist the full record set for this run, replacing prior content.
    async fn write(&self, products: &[CleanProduct]) -> Result<()>;
}

/// Per-sink outcome of a load phase.
#[derive(Debug)]
pub struct SinkOutcome {
    pub sink: &'static str,
    pub result: std::result::Result<(), String>,
}

/// Writes the record set as CSV, overwriting any previous file.
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Sink for CsvSink {
    fn name(&self) -> &'static str {
        "csv"
    }

    async fn write(&self, products: &[CleanProduct]) -> Result<()> {
        let mut writer = csv::Writer::from_path(&self.path)?;
        for product in products {
            writer.serialize(product)?;
        }
        writer.flush()?;

        info!(path = %self.path.display(), rows = products.len(), "Wrote CSV output");
        Ok(())
    }
}

/// Bulk-inserts the record set into a PostgreSQL table, replacing the
/// table contents on every run.
pub struct PostgresSink {
    url: String,
    table: String,
}

impl PostgresSink {
    pub fn new(url: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            table: table.into(),
        }
    }
}

#[async_trait]
impl Sink for PostgresSink {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    async fn write(&self, products: &[CleanProduct]) -> Result<()> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .connect(&self.url)
            .await?;

        let create = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                title TEXT NOT NULL,
                price DOUBLE PRECISION NOT NULL,
                rating DOUBLE PRECISION NOT NULL,
                colors INTEGER NOT NULL,
                size TEXT NOT NULL,
                gender TEXT NOT NULL,
                \"timestamp\" TEXT NOT NULL
            )",
            self.table
        );
        sqlx::query(&create).execute(&pool).await?;

        // Every run is a full re-extraction, so the old rows go first.
        // Delete and inserts share a transaction: the table is never left
        // half-written if an insert fails.
        let mut tx = pool.begin().await?;
        sqlx::query(&format!("DELETE FROM {}", self.table))
            .execute(&mut *tx)
            .await?;

        for chunk in products.chunks(INSERT_CHUNK_SIZE) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
                "INSERT INTO {} (title, price, rating, colors, size, gender, \"timestamp\") ",
                self.table
            ));
            builder.push_values(chunk, |mut row, product| {
                row.push_bind(&product.title)
                    .push_bind(product.price)
                    .push_bind(product.rating)
                    .push_bind(product.colors as i32)
                    .push_bind(product.size.as_str())
                    .push_bind(product.gender.as_str())
                    .push_bind(&product.timestamp);
            });
            builder.build().execute(&mut *tx).await?;
        }
        tx.commit().await?;

        info!(table = %self.table, rows = products.len(), "Inserted rows into PostgreSQL");
        pool.close().await;
        Ok(())
    }
}

/// Runs every configured sink over the record set and collects one outcome
/// per sink. Failures are reported, never propagated, so a broken sink
/// cannot take the others down with it.
pub async fn load_all(sinks: &[Box<dyn Sink>], products: &[CleanProduct]) -> Vec<SinkOutcome> {
    if sinks.is_empty() {
        warn!("No sinks configured, records will not be persisted");
        println!("⚠️  No sinks configured - nothing was persisted");
        return Vec::new();
    }

    let mut outcomes = Vec::with_capacity(sinks.len());
    for sink in sinks {
        let result = match sink.write(products).await {
            Ok(()) => Ok(()),
            Err(e) => {
                error!(sink = sink.name(), error = %e, "Sink write failed");
                Err(e.to_string())
            }
        };
        outcomes.push(SinkOutcome {
            sink: sink.name(),
            result,
        });
    }
    outcomes
}
