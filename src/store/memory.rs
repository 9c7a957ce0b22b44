// In-memory DocumentStore for tests
//
// Records every call so tests can assert on the exact sequence of upserts
// and deletes a component produced.

use super::{CollectionStats, DocumentStore, ImportSummary};
use crate::document::IndexDocument;
use crate::error::{CodeSearchError, Result};
use crate::search::{HitDocument, SearchHit, SearchResponse};
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct InMemoryStore {
    docs: Mutex<BTreeMap<String, IndexDocument>>,
    /// One entry per `import_upsert` call, holding the ids in the batch
    pub import_calls: Mutex<Vec<Vec<String>>>,
    pub delete_calls: Mutex<Vec<String>>,
    pub ensure_calls: Mutex<Vec<bool>>,
    /// Make every import fail with a remote error
    pub fail_imports: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_imports: true,
            ..Self::default()
        }
    }

    pub fn get(&self, id: &str) -> Option<IndexDocument> {
        self.docs.lock().unwrap().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.docs.lock().unwrap().len()
    }

    pub fn imports(&self) -> Vec<Vec<String>> {
        self.import_calls.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.delete_calls.lock().unwrap().clone()
    }

    pub fn insert(&self, doc: IndexDocument) {
        self.docs.lock().unwrap().insert(doc.id.clone(), doc);
    }
}

impl DocumentStore for InMemoryStore {
    fn health(&self) -> Result<bool> {
        Ok(true)
    }

    fn collection_stats(&self) -> Result<Option<CollectionStats>> {
        Ok(Some(CollectionStats {
            name: "memory".into(),
            num_documents: self.len() as u64,
        }))
    }

    fn ensure_collection(&self, reset: bool) -> Result<()> {
        self.ensure_calls.lock().unwrap().push(reset);
        if reset {
            self.docs.lock().unwrap().clear();
        }
        Ok(())
    }

    fn import_upsert(&self, docs: &[IndexDocument]) -> Result<ImportSummary> {
        self.import_calls
            .lock()
            .unwrap()
            .push(docs.iter().map(|d| d.id.clone()).collect());
        if self.fail_imports {
            return Err(CodeSearchError::RemoteStatus {
                operation: "import".into(),
                status: 500,
                body: "injected".into(),
            });
        }
        let mut map = self.docs.lock().unwrap();
        for doc in docs {
            map.insert(doc.id.clone(), doc.clone());
        }
        Ok(ImportSummary {
            imported: docs.len(),
            ..ImportSummary::default()
        })
    }

    fn delete_document(&self, id: &str) -> Result<bool> {
        self.delete_calls.lock().unwrap().push(id.to_string());
        Ok(self.docs.lock().unwrap().remove(id).is_some())
    }

    /// Matches `q` against class names, filtered by `subsystem:=` when given
    fn search(&self, params: &[(String, String)]) -> Result<SearchResponse> {
        let param = |key: &str| {
            params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .unwrap_or_default()
        };
        let q = param("q");
        let filter = param("filter_by");
        let hits: Vec<SearchHit> = self
            .docs
            .lock()
            .unwrap()
            .values()
            .filter(|d| q == "*" || d.class_names.iter().any(|c| c == &q))
            .filter(|d| {
                filter
                    .split(" && ")
                    .filter_map(|f| f.strip_prefix("subsystem:="))
                    .all(|s| d.subsystem == s)
            })
            .map(|d| SearchHit {
                document: HitDocument {
                    id: d.id.clone(),
                    path: d.path.clone(),
                    relative_path: d.relative_path.clone(),
                    filename: d.filename.clone(),
                    extension: d.extension.clone(),
                    subsystem: d.subsystem.clone(),
                    class_names: d.class_names.clone(),
                    ..HitDocument::default()
                },
                highlights: Vec::new(),
            })
            .collect();
        Ok(SearchResponse {
            found: hits.len() as u64,
            hits,
            facet_counts: Vec::new(),
        })
    }
}
