use std::collections::BTreeSet;
use std::sync::Arc;

use muse_history::{GenerationParams, GenerationRecord, NewRecord};
use muse_llm::LLMClient;
use uuid::Uuid;

use crate::{
    error::AppError, history::history_service::HistoryService,
    prompts::content_prompt::ContentPrompt,
};

/// Prompt Builder → Generation Client → History Store.
#[derive(Clone)]
pub struct ContentService {
    llm_client: Arc<LLMClient>,
    history: HistoryService,
}

impl ContentService {
    pub fn new(llm_client: Arc<LLMClient>, history: HistoryService) -> Self {
        Self {
            llm_client,
            history,
        }
    }

    pub fn preview_prompt(params: &GenerationParams) -> Result<String, AppError> {
        params.validate()?;
        Ok(ContentPrompt::get_prompt(params))
    }

    /// Nothing is stored unless the provider returns usable text.
    pub async fn generate(
        &self,
        params: GenerationParams,
        tags: BTreeSet<String>,
    ) -> Result<GenerationRecord, AppError> {
        let prompt = Self::preview_prompt(&params)?;

        tracing::info!(
            "Generating {} about '{}' ({} words)",
            params.content_type.as_str(),
            params.keyword.trim(),
            params.length_words
        );
        let text = self.llm_client.generate(&prompt).await?;

        let record = NewRecord::new(params, &text, tags)?;
        self.history.append(record).await
    }

    /// Runs a stored record's parameters again and saves the result as a new record.
    pub async fn regenerate(&self, id: Uuid) -> Result<GenerationRecord, AppError> {
        let source = self.history.get(id).await?;
        self.generate(source.params(), source.tags).await
    }
}
