pub mod app;
pub mod config;
pub mod error;
pub mod services;
pub mod util;
pub mod view;

pub use app::{AppConfig, AppState, RecordSource};
pub use config::{ViewNow, ViewParams, ViewSelection};
pub use error::{ApiError, AppError, Result};
pub use services::{AppServices, Dataset};
pub use util::time::{
    format_timestamp_ms, parse_chart_period, parse_period, resolve_now, resolve_view,
};
pub use view::{DashboardView, DataStatus};
