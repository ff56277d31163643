use std::fmt::Write;
use std::sync::Arc;

use rand::RngCore;

use app_api::AppContext;

/// Header every `/api` request must carry, set to the running server's token.
pub const CSRF_HEADER: &str = "x-mileage-token";

/// Router state: the app context plus the per-process CSRF token.
#[derive(Clone)]
pub struct HttpState {
    pub context: AppContext,
    csrf_token: Arc<str>,
}

impl HttpState {
    /// Builds state with a freshly generated token.
    pub fn new(context: AppContext) -> Self {
        Self::with_token(context, generate_csrf_token())
    }

    pub fn with_token(context: AppContext, csrf_token: impl Into<Arc<str>>) -> Self {
        Self {
            context,
            csrf_token: csrf_token.into(),
        }
    }

    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    pub(crate) fn accepts_token(&self, presented: Option<&str>) -> bool {
        presented == Some(self.csrf_token())
    }
}

fn generate_csrf_token() -> String {
    let mut bytes = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    bytes.iter().fold(String::with_capacity(32), |mut hex, byte| {
        let _ = write!(hex, "{byte:02x}");
        hex
    })
}
