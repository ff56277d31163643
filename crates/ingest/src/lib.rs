mod parser;
mod source;
mod types;

pub use parser::{parse_payload, payload_digest, strip_envelope};
pub use source::{SheetSource, fetch_payload, load_payload};
pub use types::{
    DEFAULT_HEADER_ROWS, IngestError, IngestIssue, IngestOptions, IngestStats, ParsedSheet, Result,
};
