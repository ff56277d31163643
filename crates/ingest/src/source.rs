use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::types::Result;

/// A Google Sheets tab exposed through the `gviz/tq` JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSource {
    pub sheet_id: String,
    pub gid: String,
}

impl SheetSource {
    pub fn new(sheet_id: impl Into<String>, gid: impl Into<String>) -> Self {
        Self {
            sheet_id: sheet_id.into(),
            gid: gid.into(),
        }
    }

    pub fn export_url(&self) -> String {
        format!(
            "https://docs.google.com/spreadsheets/d/{}/gviz/tq?tqx=out:json&gid={}",
            self.sheet_id, self.gid
        )
    }
}

pub async fn fetch_payload(client: &reqwest::Client, source: &SheetSource) -> Result<String> {
    let url = source.export_url();
    info!(sheet_id = %source.sheet_id, gid = %source.gid, "fetching fill-up sheet");
    let response = client.get(&url).send().await?.error_for_status()?;
    let body = response.text().await?;
    debug!(bytes = body.len(), "fetched sheet payload");
    Ok(body)
}

pub fn load_payload(path: &Path) -> Result<String> {
    info!(path = %path.display(), "loading fill-up payload from file");
    Ok(fs::read_to_string(path)?)
}
