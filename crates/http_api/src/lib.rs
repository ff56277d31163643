mod errors;
mod handlers;
mod middleware;
mod state;

use axum::{Router, middleware as axum_middleware, routing::post};

pub use errors::HttpError;
pub use state::{CSRF_HEADER, HttpState};

pub fn router(state: HttpState) -> Router<()> {
    let api = Router::new()
        .route("/dashboard", post(handlers::dashboard))
        .route("/snapshot", post(handlers::snapshot))
        .route("/chart", post(handlers::chart))
        .route("/records", post(handlers::records))
        .route("/status", post(handlers::status))
        .route("/periods", post(handlers::periods))
        .route("/refresh", post(handlers::refresh))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_csrf,
        ));

    Router::new()
        .nest("/api", api)
        .fallback(handlers::not_found)
        .with_state(state)
}
