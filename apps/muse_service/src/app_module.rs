use std::sync::Arc;

use muse_history::HistoryStore;
use muse_llm::LLMClient;

use crate::{
    config::Config, content::content_service::ContentService,
    history::history_service::HistoryService,
};

#[derive(Clone)]
pub struct AppService {
    pub content_service: ContentService,
    pub history_service: HistoryService,
}

impl AppService {
    pub fn new(history_store: HistoryStore, llm_client: LLMClient) -> Self {
        let history_service = HistoryService::new(history_store);
        let content_service = ContentService::new(Arc::new(llm_client), history_service.clone());

        Self {
            content_service,
            history_service,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub service: AppService,
}

impl AppState {
    pub fn new(history_store: HistoryStore, llm_client: LLMClient) -> Self {
        Self {
            service: AppService::new(history_store, llm_client),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let llm_client = LLMClient::new(
            config.provider,
            config.credentials.clone(),
            Some(config.llm_client_config()),
        );
        Self::new(HistoryStore::new(config.history_file.clone()), llm_client)
    }
}
