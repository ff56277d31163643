use std::path::PathBuf;

use ingest::{IngestOptions, IngestStats, SheetSource};

use crate::error::Result;
use crate::services::AppServices;

/// Where fill-up rows come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordSource {
    Sheet(SheetSource),
    /// A saved sheet export, for offline use.
    File(PathBuf),
}

impl RecordSource {
    pub fn describe(&self) -> String {
        match self {
            Self::Sheet(sheet) => format!("sheet {} (gid {})", sheet.sheet_id, sheet.gid),
            Self::File(path) => format!("file {}", path.display()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub source: RecordSource,
    pub ingest: IngestOptions,
    /// Link to the external form used to log new fill-ups.
    pub form_url: Option<String>,
}

impl AppConfig {
    pub fn new(source: RecordSource) -> Self {
        Self {
            source,
            ingest: IngestOptions::default(),
            form_url: None,
        }
    }
}

/// Application state shared by frontend backends (HTTP, CLI).
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub services: AppServices,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let services = AppServices::new(&config);
        Self { config, services }
    }

    pub async fn refresh_data(&self) -> Result<IngestStats> {
        self.services.ingest.run().await
    }
}
