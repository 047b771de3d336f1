use axum::{
    extract::{Path, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::Utc;
use muse_history::{GenerationRecord, SearchQuery};
use serde_json::json;
use uuid::Uuid;

use super::history_service::SearchResults;
use crate::{app_module::AppState, error::AppError};

pub fn history_router() -> Router {
    Router::new()
        .route("/", get(search_history).delete(clear_history))
        .route("/delete-matching", post(delete_matching))
        .route("/export", get(export_history))
        .route("/export.txt", get(export_history_text))
        .route("/:id", get(get_record).delete(delete_record))
        .route("/:id/favorite", post(toggle_favorite))
        .route("/:id/tags/:tag", put(add_tag).delete(remove_tag))
        .route("/:id/export", get(export_record))
        .route("/:id/download", get(download_record))
}

fn attachment(content_type: &'static str, file_name: String, body: impl IntoResponse) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response()
}

fn dated_file_name(extension: &str) -> String {
    format!(
        "content_history_{}.{}",
        Utc::now().format("%Y%m%d"),
        extension
    )
}

pub async fn search_history(
    Extension(ctx): Extension<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResults>, AppError> {
    let results = ctx.service.history_service.search(query).await?;
    Ok(Json(results))
}

pub async fn clear_history(
    Extension(ctx): Extension<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let removed = ctx.service.history_service.clear_all().await?;
    Ok(Json(json!({ "removed": removed })))
}

pub async fn delete_matching(
    Extension(ctx): Extension<AppState>,
    Json(query): Json<SearchQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let removed = ctx.service.history_service.remove_matching(query).await?;
    Ok(Json(json!({ "removed": removed })))
}

pub async fn export_history(Extension(ctx): Extension<AppState>) -> Result<Response, AppError> {
    let bytes = ctx.service.history_service.export_all().await?;
    Ok(attachment("application/json", dated_file_name("json"), bytes))
}

pub async fn export_history_text(
    Extension(ctx): Extension<AppState>,
) -> Result<Response, AppError> {
    let report = ctx.service.history_service.export_text().await?;
    Ok(attachment(
        "text/plain; charset=utf-8",
        dated_file_name("txt"),
        report,
    ))
}

pub async fn get_record(
    Extension(ctx): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GenerationRecord>, AppError> {
    Ok(Json(ctx.service.history_service.get(id).await?))
}

pub async fn delete_record(
    Extension(ctx): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ctx.service.history_service.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_favorite(
    Extension(ctx): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GenerationRecord>, AppError> {
    Ok(Json(ctx.service.history_service.toggle_favorite(id).await?))
}

pub async fn add_tag(
    Extension(ctx): Extension<AppState>,
    Path((id, tag)): Path<(Uuid, String)>,
) -> Result<Json<GenerationRecord>, AppError> {
    Ok(Json(ctx.service.history_service.add_tag(id, tag).await?))
}

pub async fn remove_tag(
    Extension(ctx): Extension<AppState>,
    Path((id, tag)): Path<(Uuid, String)>,
) -> Result<Json<GenerationRecord>, AppError> {
    Ok(Json(ctx.service.history_service.remove_tag(id, tag).await?))
}

pub async fn export_record(
    Extension(ctx): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let bytes = ctx.service.history_service.export_one(id).await?;
    Ok(attachment(
        "application/json",
        format!("content_{}.json", id),
        bytes,
    ))
}

pub async fn download_record(
    Extension(ctx): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let record = ctx.service.history_service.get(id).await?;
    Ok(attachment(
        "text/plain; charset=utf-8",
        record.download_file_name(),
        record.text,
    ))
}
