use axum::{
    extract::{Json, State},
    http::Uri,
    response::IntoResponse,
};

use app_api::{ChartRequest, DashboardRequest, EmptyRequest, SnapshotRequest};

use crate::{errors::HttpError, state::HttpState};

pub async fn dashboard(
    State(state): State<HttpState>,
    Json(req): Json<DashboardRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::dashboard(&state.context, req)?;
    Ok(Json(response))
}

pub async fn snapshot(
    State(state): State<HttpState>,
    Json(req): Json<SnapshotRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::snapshot(&state.context, req)?;
    Ok(Json(response))
}

pub async fn chart(
    State(state): State<HttpState>,
    Json(req): Json<ChartRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::chart(&state.context, req)?;
    Ok(Json(response))
}

pub async fn records(
    State(state): State<HttpState>,
    Json(_): Json<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::records(&state.context)?;
    Ok(Json(response))
}

pub async fn status(
    State(state): State<HttpState>,
    Json(_): Json<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::status(&state.context)?;
    Ok(Json(response))
}

pub async fn periods(Json(_): Json<EmptyRequest>) -> impl IntoResponse {
    Json(app_api::periods())
}

pub async fn refresh(
    State(state): State<HttpState>,
    Json(_): Json<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::refresh(&state.context).await?;
    Ok(Json(response))
}

pub async fn not_found(uri: Uri) -> HttpError {
    HttpError::not_found(uri.path())
}
