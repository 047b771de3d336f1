use std::collections::HashSet;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::NamedTempFile;
use uuid::Uuid;

use crate::error::HistoryError;
use crate::export;
use crate::model::{normalize_tag, GenerationRecord, NewRecord};
use crate::search::SearchQuery;

pub const DEFAULT_HISTORY_FILE: &str = "content_history.json";

/// In-memory snapshot of the history. Insertion order is chronological order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    records: Vec<GenerationRecord>,
}

impl Store {
    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&GenerationRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    fn get_mut(&mut self, id: Uuid) -> Result<&mut GenerationRecord, HistoryError> {
        self.records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(HistoryError::NotFound(id))
    }

    pub fn push(&mut self, record: NewRecord) -> &GenerationRecord {
        let mut id = Uuid::new_v4();
        while self.get(id).is_some() {
            id = Uuid::new_v4();
        }

        // Keep timestamps monotonic even if the wall clock steps backwards.
        let now = Utc::now();
        let created_at = match self.records.last() {
            Some(last) if last.created_at > now => last.created_at,
            _ => now,
        };

        self.records
            .push(GenerationRecord::from_new(record, id, created_at));
        &self.records[self.records.len() - 1]
    }

    pub fn toggle_favorite(&mut self, id: Uuid) -> Result<&GenerationRecord, HistoryError> {
        let record = self.get_mut(id)?;
        record.favorite = !record.favorite;
        Ok(&*record)
    }

    pub fn add_tag(&mut self, id: Uuid, tag: &str) -> Result<&GenerationRecord, HistoryError> {
        let tag = normalize_tag(tag)?;
        let record = self.get_mut(id)?;
        record.tags.insert(tag);
        Ok(&*record)
    }

    pub fn remove_tag(&mut self, id: Uuid, tag: &str) -> Result<&GenerationRecord, HistoryError> {
        let tag = normalize_tag(tag)?;
        let record = self.get_mut(id)?;
        record.tags.remove(&tag);
        Ok(&*record)
    }

    pub fn remove(&mut self, id: Uuid) -> Result<GenerationRecord, HistoryError> {
        let position = self
            .records
            .iter()
            .position(|record| record.id == id)
            .ok_or(HistoryError::NotFound(id))?;
        Ok(self.records.remove(position))
    }

    pub fn remove_matching(&mut self, query: &SearchQuery) -> usize {
        let before = self.records.len();
        self.records.retain(|record| !query.matches(record));
        before - self.records.len()
    }

    pub fn clear(&mut self) -> usize {
        let removed = self.records.len();
        self.records.clear();
        removed
    }

    /// Lazily yields matching records in insertion order. The iterator can be
    /// cloned to restart the scan.
    pub fn search<'a>(
        &'a self,
        query: &'a SearchQuery,
    ) -> impl Iterator<Item = &'a GenerationRecord> + Clone + 'a {
        self.records.iter().filter(move |record| query.matches(record))
    }

    pub fn encode(&self) -> Result<Vec<u8>, HistoryError> {
        export::to_json(&self.records)
    }

    fn decode(path: &Path, bytes: &[u8]) -> Result<Self, HistoryError> {
        let corrupt = |reason: String| HistoryError::CorruptStore {
            path: path.to_path_buf(),
            reason,
        };

        let records: Vec<GenerationRecord> =
            serde_json::from_slice(bytes).map_err(|e| corrupt(e.to_string()))?;

        let mut seen = HashSet::with_capacity(records.len());
        if let Some(duplicate) = records.iter().find(|record| !seen.insert(record.id)) {
            return Err(corrupt(format!("duplicate record id {}", duplicate.id)));
        }
        for record in &records {
            record
                .check()
                .map_err(|e| corrupt(format!("record {}: {}", record.id, e)))?;
        }

        Ok(Self { records })
    }
}

/// The history file. Every mutation reads the whole file, applies the change in
/// memory and atomically replaces the file.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or blank file is an empty history. Anything unparseable is
    /// reported as corrupt and left exactly as found.
    pub fn load(&self) -> Result<Store, HistoryError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Store::default()),
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Store::default());
        }

        Store::decode(&self.path, &bytes)
    }

    pub fn persist(&self, store: &Store) -> Result<(), HistoryError> {
        let bytes = store.encode()?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(&bytes)?;
        file.as_file().sync_all()?;
        file.persist(&self.path)?;

        tracing::debug!(
            "Persisted {} record(s) to {}",
            store.len(),
            self.path.display()
        );
        Ok(())
    }

    fn update<T>(
        &self,
        mutate: impl FnOnce(&mut Store) -> Result<T, HistoryError>,
    ) -> Result<T, HistoryError> {
        let mut store = self.load()?;
        let output = mutate(&mut store)?;
        self.persist(&store)?;
        Ok(output)
    }

    pub fn append(&self, record: NewRecord) -> Result<GenerationRecord, HistoryError> {
        let created = self.update(|store| Ok(store.push(record).clone()))?;
        tracing::info!(
            "Saved {} about '{}' as {}",
            created.content_type.as_str(),
            created.keyword,
            created.id
        );
        Ok(created)
    }

    pub fn get(&self, id: Uuid) -> Result<GenerationRecord, HistoryError> {
        self.load()?
            .get(id)
            .cloned()
            .ok_or(HistoryError::NotFound(id))
    }

    pub fn toggle_favorite(&self, id: Uuid) -> Result<GenerationRecord, HistoryError> {
        self.update(|store| store.toggle_favorite(id).cloned())
    }

    pub fn add_tag(&self, id: Uuid, tag: &str) -> Result<GenerationRecord, HistoryError> {
        self.update(|store| store.add_tag(id, tag).cloned())
    }

    pub fn remove_tag(&self, id: Uuid, tag: &str) -> Result<GenerationRecord, HistoryError> {
        self.update(|store| store.remove_tag(id, tag).cloned())
    }

    pub fn remove(&self, id: Uuid) -> Result<GenerationRecord, HistoryError> {
        let removed = self.update(|store| store.remove(id))?;
        tracing::info!("Removed record {}", id);
        Ok(removed)
    }

    pub fn remove_matching(&self, query: &SearchQuery) -> Result<usize, HistoryError> {
        let removed = self.update(|store| Ok(store.remove_matching(query)))?;
        tracing::info!("Removed {} matching record(s)", removed);
        Ok(removed)
    }

    pub fn clear_all(&self) -> Result<usize, HistoryError> {
        let removed = self.update(|store| Ok(store.clear()))?;
        tracing::info!("Cleared history ({} record(s))", removed);
        Ok(removed)
    }

    pub fn search(&self, query: &SearchQuery) -> Result<Vec<GenerationRecord>, HistoryError> {
        Ok(self.load()?.search(query).cloned().collect())
    }

    pub fn export_one(&self, id: Uuid) -> Result<Vec<u8>, HistoryError> {
        let store = self.load()?;
        let record = store.get(id).ok_or(HistoryError::NotFound(id))?;
        export::to_json(std::slice::from_ref(record))
    }

    pub fn export_all(&self) -> Result<Vec<u8>, HistoryError> {
        self.load()?.encode()
    }

    pub fn export_text(&self) -> Result<String, HistoryError> {
        Ok(export::text_report(self.load()?.records()))
    }
}
