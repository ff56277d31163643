mod analytics;
mod ingest;

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use mileage_core::FillupRecord;

use crate::app::AppConfig;
use crate::error::{AppError, Result};

pub use analytics::AnalyticsService;
pub use ingest::IngestService;

type SharedConfig = Arc<AppConfig>;
type SharedDataset = Arc<RwLock<Arc<Dataset>>>;

/// The record set of one ingest. Replaced as a whole on refresh.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<FillupRecord>,
    /// Number of successful refreshes so far; `0` before the first.
    pub generation: u64,
    pub last_updated: Option<DateTime<Utc>>,
    pub last_ingest: Option<::ingest::IngestStats>,
}

/// Service registry for app-level operations.
#[derive(Clone)]
pub struct AppServices {
    pub analytics: AnalyticsService,
    pub ingest: IngestService,
}

impl AppServices {
    pub fn new(config: &AppConfig) -> Self {
        let shared = Arc::new(config.clone());
        let dataset: SharedDataset = Arc::new(RwLock::new(Arc::new(Dataset::default())));
        Self {
            analytics: AnalyticsService::new(shared.clone(), dataset.clone()),
            ingest: IngestService::new(shared, dataset),
        }
    }
}

fn current_dataset(dataset: &SharedDataset) -> Result<Arc<Dataset>> {
    dataset
        .read()
        .map(|guard| Arc::clone(&*guard))
        .map_err(|_| poisoned())
}

fn replace_dataset(dataset: &SharedDataset, next: Dataset) -> Result<()> {
    let mut guard = dataset.write().map_err(|_| poisoned())?;
    *guard = Arc::new(next);
    Ok(())
}

fn poisoned() -> AppError {
    AppError::Message("dataset lock poisoned".to_string())
}
