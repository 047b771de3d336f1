use std::collections::BTreeSet;

use axum::{extract::Path, http::StatusCode, routing::post, Extension, Json, Router};
use muse_history::{
    parse_tags, Audience, ContentType, GenerationParams, GenerationRecord, Language, RhymeScheme,
    Tone,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::content_service::ContentService;
use crate::{app_module::AppState, error::AppError};

/// Tags arrive either as a list or as the comma-separated form field.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Csv(String),
}

impl Default for TagsInput {
    fn default() -> Self {
        TagsInput::List(Vec::new())
    }
}

impl TagsInput {
    pub fn into_tags(self) -> BTreeSet<String> {
        match self {
            TagsInput::List(tags) => tags.iter().flat_map(|tag| parse_tags(tag)).collect(),
            TagsInput::Csv(raw) => parse_tags(&raw),
        }
    }
}

fn default_language() -> Language {
    Language::English
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub keyword: String,
    pub content_type: ContentType,
    #[serde(default = "default_language")]
    pub language: Language,
    #[serde(default)]
    pub tone: Option<Tone>,
    #[serde(default)]
    pub audience: Option<Audience>,
    #[serde(default)]
    pub rhyme_scheme: Option<RhymeScheme>,
    #[serde(default)]
    pub length_words: Option<u16>,
    #[serde(default)]
    pub tags: TagsInput,
}

impl GenerateRequest {
    pub fn into_parts(self) -> (GenerationParams, BTreeSet<String>) {
        let params = GenerationParams {
            keyword: self.keyword,
            content_type: self.content_type,
            language: self.language,
            tone: self.tone,
            audience: self.audience,
            rhyme_scheme: self.rhyme_scheme,
            length_words: self
                .length_words
                .unwrap_or_else(|| self.content_type.default_length_words()),
        };
        (params, self.tags.into_tags())
    }
}

#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub prompt: String,
}

pub fn content_router() -> Router {
    Router::new()
        .route("/prompt", post(preview_prompt))
        .route("/generate", post(generate_content))
        .route("/:id/regenerate", post(regenerate_content))
}

pub async fn preview_prompt(
    Json(request): Json<GenerateRequest>,
) -> Result<Json<PromptResponse>, AppError> {
    let (params, _) = request.into_parts();
    let prompt = ContentService::preview_prompt(&params)?;
    Ok(Json(PromptResponse { prompt }))
}

pub async fn generate_content(
    Extension(ctx): Extension<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<(StatusCode, Json<GenerationRecord>), AppError> {
    let (params, tags) = request.into_parts();
    let record = ctx.service.content_service.generate(params, tags).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn regenerate_content(
    Extension(ctx): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<GenerationRecord>), AppError> {
    let record = ctx.service.content_service.regenerate(id).await?;
    Ok((StatusCode::CREATED, Json(record)))
}
