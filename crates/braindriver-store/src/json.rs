//! File-backed store: one JSON document per session.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::store::{
    sort_by_creation, DecisionRecord, DecisionStore, NewDecision, SessionRecord, SessionSettings,
};

/// On-disk layout of `{dir}/{session_id}.json`.
#[derive(Debug, Serialize, Deserialize)]
struct SessionDocument {
    session: SessionRecord,
    #[serde(default)]
    decisions: Vec<DecisionRecord>,
}

/// Persists each session and its decisions under a directory.
pub struct JsonFileStore {
    dir: PathBuf,
    /// Serializes read-modify-write cycles on the documents.
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn document_path(&self, session_id: &str) -> Result<PathBuf, StoreError> {
        let valid = !session_id.is_empty()
            && session_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidId(session_id.to_string()));
        }
        Ok(self.dir.join(format!("{session_id}.json")))
    }

    async fn read(&self, path: &Path) -> Result<Option<SessionDocument>, StoreError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, path: &Path, document: &SessionDocument) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_vec_pretty(document)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl DecisionStore for JsonFileStore {
    fn name(&self) -> &str {
        "json"
    }

    async fn create_or_get_session(
        &self,
        session_id: &str,
        language: &str,
    ) -> Result<SessionRecord, StoreError> {
        let path = self.document_path(session_id)?;
        let _guard = self.lock.lock().await;

        if let Some(document) = self.read(&path).await? {
            return Ok(document.session);
        }

        let document = SessionDocument {
            session: SessionRecord::new(session_id, language),
            decisions: Vec::new(),
        };
        self.write(&path, &document).await?;
        tracing::debug!(session_id, path = %path.display(), "created session document");
        Ok(document.session)
    }

    async fn update_session_settings(
        &self,
        session_id: &str,
        settings: &SessionSettings,
    ) -> Result<SessionRecord, StoreError> {
        let path = self.document_path(session_id)?;
        let _guard = self.lock.lock().await;

        let mut document = self
            .read(&path)
            .await?
            .ok_or_else(|| StoreError::NotFound(session_id.to_string()))?;
        document.session.apply(settings);
        self.write(&path, &document).await?;
        Ok(document.session)
    }

    async fn record_decision(&self, decision: &NewDecision) -> Result<DecisionRecord, StoreError> {
        let path = self.document_path(&decision.session_id)?;
        let _guard = self.lock.lock().await;

        let mut document = match self.read(&path).await? {
            Some(document) => document,
            None => SessionDocument {
                session: SessionRecord::new(&decision.session_id, "en"),
                decisions: Vec::new(),
            },
        };
        let record = decision.clone().into_record();
        document.decisions.push(record.clone());
        self.write(&path, &document).await?;
        Ok(record)
    }

    async fn list_decisions(&self, session_id: &str) -> Result<Vec<DecisionRecord>, StoreError> {
        let path = self.document_path(session_id)?;
        let _guard = self.lock.lock().await;

        let mut decisions = self
            .read(&path)
            .await?
            .map(|document| document.decisions)
            .unwrap_or_default();
        sort_by_creation(&mut decisions);
        Ok(decisions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use braindriver_core::{Catalog, Category};

    fn decision(session: &str, question: &str, correct: bool) -> NewDecision {
        NewDecision {
            session_id: session.into(),
            question_id: question.into(),
            q1_answer: Category::Limbic,
            q2_answer: Category::Limbic,
            is_correct_q1: correct,
            is_correct_q2: correct,
        }
    }

    #[tokio::test]
    async fn session_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = JsonFileStore::new(dir.path());
            store.create_or_get_session("abc", "ru").await.unwrap();
            store
                .update_session_settings(
                    "abc",
                    &SessionSettings {
                        sfx_on: Some(false),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
        }

        let reopened = JsonFileStore::new(dir.path());
        let session = reopened.create_or_get_session("abc", "en").await.unwrap();
        assert_eq!(session.language, "ru");
        assert!(!session.sfx_on);
        assert!(dir.path().join("abc.json").exists());
    }

    #[tokio::test]
    async fn decisions_append_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested"));
        store.record_decision(&decision("s-1", "stage1-2", true)).await.unwrap();
        store.record_decision(&decision("s-1", "stage1-5", false)).await.unwrap();

        let decisions = store.list_decisions("s-1").await.unwrap();
        let ids: Vec<&str> = decisions.iter().map(|d| d.question_id.as_str()).collect();
        assert_eq!(ids, vec!["stage1-2", "stage1-5"]);
        assert!(decisions[0].is_correct_q1);
        assert!(!decisions[1].is_correct_q1);
    }

    #[tokio::test]
    async fn unknown_session_has_no_decisions() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(store.list_decisions("missing").await.unwrap().is_empty());

        let err = store
            .update_session_settings("missing", &SessionSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn rejects_path_like_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        for id in ["", "../escape", "a/b", "dot.json"] {
            let err = store.create_or_get_session(id, "en").await.unwrap_err();
            assert!(matches!(err, StoreError::InvalidId(_)), "{id:?}");
        }
    }

    #[tokio::test]
    async fn corrupt_document_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{not json").unwrap();
        let store = JsonFileStore::new(dir.path());
        let err = store.list_decisions("bad").await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[tokio::test]
    async fn results_from_stored_decisions() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        store.record_decision(&decision("s", "stage1-2", true)).await.unwrap();
        store.record_decision(&decision("s", "stage1-5", true)).await.unwrap();

        let results = store
            .compute_results_for_session("s", &Catalog::builtin())
            .await
            .unwrap();
        assert_eq!(results.total_questions, 2);
        assert_eq!(results.total_correct, 2);
        assert_eq!(results.top_system, Category::Limbic);
    }
}
