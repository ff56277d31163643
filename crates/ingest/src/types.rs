use chrono::FixedOffset;
use mileage_core::FillupRecord;
use serde::{Deserialize, Serialize};

/// Rows at the top of the sheet export that hold titles and column headers.
pub const DEFAULT_HEADER_ROWS: usize = 3;

/// How to read a sheet export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestOptions {
    pub header_rows: usize,
    /// Offset applied to timestamps that carry no zone of their own.
    pub utc_offset_minutes: i32,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            header_rows: DEFAULT_HEADER_ROWS,
            utc_offset_minutes: 0,
        }
    }
}

impl IngestOptions {
    pub fn offset(&self) -> Result<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(IngestError::InvalidOffset(self.utc_offset_minutes))
    }
}

/// Ingest summary returned after parsing a sheet export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestStats {
    pub rows_scanned: usize,
    pub rows_skipped: usize,
    pub records_parsed: usize,
    /// Hex SHA-256 of the raw payload; unchanged digests mean an unchanged sheet.
    pub payload_sha256: String,
    pub issues: Vec<IngestIssue>,
}

/// Non-fatal issues encountered during ingest. `row` indexes `table.rows`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestIssue {
    pub row: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ParsedSheet {
    pub records: Vec<FillupRecord>,
    pub stats: IngestStats,
}

/// Errors emitted by the ingest adapter.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed payload: {0}")]
    Payload(String),
    #[error("invalid utc offset: {0} minutes")]
    InvalidOffset(i32),
}

pub type Result<T> = std::result::Result<T, IngestError>;
