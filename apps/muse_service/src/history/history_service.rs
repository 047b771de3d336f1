use std::sync::Arc;

use muse_history::{
    summarize, AnalyticsOptions, AnalyticsReport, GenerationRecord, HistoryError, HistoryStore,
    NewRecord, SearchQuery, Store,
};
use parking_lot::Mutex;
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub total: usize,
    pub matched: usize,
    pub records: Vec<GenerationRecord>,
}

/// Serialises every read-modify-write of the history file behind one lock and
/// keeps the blocking file I/O off the async workers.
#[derive(Clone)]
pub struct HistoryService {
    store: Arc<Mutex<HistoryStore>>,
}

impl HistoryService {
    pub fn new(store: HistoryStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    async fn run<T, F>(&self, operation: F) -> Result<T, AppError>
    where
        F: FnOnce(&HistoryStore) -> Result<T, HistoryError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let result = tokio::task::spawn_blocking(move || {
            let guard = store.lock();
            operation(&*guard)
        })
        .await?;
        Ok(result?)
    }

    pub async fn load(&self) -> Result<Store, AppError> {
        self.run(|store| store.load()).await
    }

    pub async fn append(&self, record: NewRecord) -> Result<GenerationRecord, AppError> {
        self.run(move |store| store.append(record)).await
    }

    pub async fn get(&self, id: Uuid) -> Result<GenerationRecord, AppError> {
        self.run(move |store| store.get(id)).await
    }

    pub async fn search(&self, query: SearchQuery) -> Result<SearchResults, AppError> {
        self.run(move |store| {
            let snapshot = store.load()?;
            let records: Vec<GenerationRecord> = snapshot.search(&query).cloned().collect();
            Ok(SearchResults {
                total: snapshot.len(),
                matched: records.len(),
                records,
            })
        })
        .await
    }

    pub async fn toggle_favorite(&self, id: Uuid) -> Result<GenerationRecord, AppError> {
        self.run(move |store| store.toggle_favorite(id)).await
    }

    pub async fn add_tag(&self, id: Uuid, tag: String) -> Result<GenerationRecord, AppError> {
        self.run(move |store| store.add_tag(id, &tag)).await
    }

    pub async fn remove_tag(&self, id: Uuid, tag: String) -> Result<GenerationRecord, AppError> {
        self.run(move |store| store.remove_tag(id, &tag)).await
    }

    pub async fn remove(&self, id: Uuid) -> Result<GenerationRecord, AppError> {
        self.run(move |store| store.remove(id)).await
    }

    pub async fn remove_matching(&self, query: SearchQuery) -> Result<usize, AppError> {
        self.run(move |store| store.remove_matching(&query)).await
    }

    pub async fn clear_all(&self) -> Result<usize, AppError> {
        self.run(|store| store.clear_all()).await
    }

    pub async fn export_one(&self, id: Uuid) -> Result<Vec<u8>, AppError> {
        self.run(move |store| store.export_one(id)).await
    }

    pub async fn export_all(&self) -> Result<Vec<u8>, AppError> {
        self.run(|store| store.export_all()).await
    }

    pub async fn export_text(&self) -> Result<String, AppError> {
        self.run(|store| store.export_text()).await
    }

    pub async fn summarize(&self, options: AnalyticsOptions) -> Result<AnalyticsReport, AppError> {
        self.run(move |store| Ok(summarize(&store.load()?, &options)))
            .await
    }
}
