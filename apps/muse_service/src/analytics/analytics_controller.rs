use axum::{extract::Query, routing::get, Extension, Json, Router};
use muse_history::{AnalyticsOptions, AnalyticsReport};
use serde::Deserialize;

use crate::{app_module::AppState, error::AppError};

#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsParams {
    pub top: Option<usize>,
    pub recent: Option<usize>,
}

impl From<AnalyticsParams> for AnalyticsOptions {
    fn from(params: AnalyticsParams) -> Self {
        let defaults = AnalyticsOptions::default();
        AnalyticsOptions {
            top_keywords: params.top.unwrap_or(defaults.top_keywords),
            recent: params.recent.unwrap_or(defaults.recent),
        }
    }
}

pub fn analytics_router() -> Router {
    Router::new().route("/", get(analytics_summary))
}

pub async fn analytics_summary(
    Extension(ctx): Extension<AppState>,
    Query(params): Query<AnalyticsParams>,
) -> Result<Json<AnalyticsReport>, AppError> {
    let report = ctx
        .service
        .history_service
        .summarize(params.into())
        .await?;
    Ok(Json(report))
}
