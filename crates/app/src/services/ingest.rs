use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use ingest::IngestStats;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::app::RecordSource;
use crate::error::Result;
use crate::services::{Dataset, SharedConfig, SharedDataset, current_dataset, replace_dataset};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct IngestService {
    config: SharedConfig,
    dataset: SharedDataset,
    client: reqwest::Client,
    /// Held for a whole refresh so swaps land in the order refreshes started.
    running: Arc<Mutex<()>>,
}

impl IngestService {
    pub(super) fn new(config: SharedConfig, dataset: SharedDataset) -> Self {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            config,
            dataset,
            client,
            running: Arc::new(Mutex::new(())),
        }
    }

    /// Fetches the source, parses it and swaps in the new record set. On
    /// failure the previous records stay in place.
    pub async fn run(&self) -> Result<IngestStats> {
        let _running = self.running.lock().await;
        let payload = match &self.config.source {
            RecordSource::Sheet(sheet) => ingest::fetch_payload(&self.client, sheet).await?,
            RecordSource::File(path) => ingest::load_payload(path)?,
        };
        let parsed = ingest::parse_payload(&payload, &self.config.ingest)?;
        for issue in &parsed.stats.issues {
            warn!(row = issue.row, "skipped fill-up row: {}", issue.message);
        }
        info!(
            records = parsed.stats.records_parsed,
            skipped = parsed.stats.rows_skipped,
            "refreshed fill-up records"
        );
        let stats = parsed.stats.clone();
        let generation = current_dataset(&self.dataset)?.generation + 1;
        replace_dataset(
            &self.dataset,
            Dataset {
                records: parsed.records,
                generation,
                last_updated: Some(Utc::now()),
                last_ingest: Some(parsed.stats),
            },
        )?;
        Ok(stats)
    }
}
