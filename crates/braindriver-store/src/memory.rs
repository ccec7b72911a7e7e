//! In-memory store for tests and single-process play.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::store::{
    sort_by_creation, DecisionRecord, DecisionStore, NewDecision, SessionRecord, SessionSettings,
};

#[derive(Default)]
struct Inner {
    sessions: HashMap<String, SessionRecord>,
    decisions: HashMap<String, Vec<DecisionRecord>>,
}

/// A store that keeps everything in process memory.
///
/// Can be switched into a failing mode to exercise callers' error handling.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    /// Number of successful decision writes.
    write_count: AtomicU32,
    /// When set, every decision write fails with an I/O error.
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose decision writes always fail.
    pub fn failing() -> Self {
        let store = Self::default();
        store.set_fail_writes(true);
        store
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    /// Number of decisions written so far.
    pub fn write_count(&self) -> u32 {
        self.write_count.load(Ordering::Relaxed)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A panic while holding the lock cannot leave the maps half-updated.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DecisionStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn create_or_get_session(
        &self,
        session_id: &str,
        language: &str,
    ) -> Result<SessionRecord, StoreError> {
        let mut inner = self.lock();
        let session = inner
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionRecord::new(session_id, language));
        Ok(session.clone())
    }

    async fn update_session_settings(
        &self,
        session_id: &str,
        settings: &SessionSettings,
    ) -> Result<SessionRecord, StoreError> {
        let mut inner = self.lock();
        let session = inner
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| StoreError::NotFound(session_id.to_string()))?;
        session.apply(settings);
        Ok(session.clone())
    }

    async fn record_decision(&self, decision: &NewDecision) -> Result<DecisionRecord, StoreError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(StoreError::Io(std::io::Error::other("memory store is failing writes")));
        }

        let mut inner = self.lock();
        inner
            .sessions
            .entry(decision.session_id.clone())
            .or_insert_with(|| SessionRecord::new(&decision.session_id, "en"));

        let record = decision.clone().into_record();
        inner
            .decisions
            .entry(decision.session_id.clone())
            .or_default()
            .push(record.clone());
        self.write_count.fetch_add(1, Ordering::Relaxed);
        Ok(record)
    }

    async fn list_decisions(&self, session_id: &str) -> Result<Vec<DecisionRecord>, StoreError> {
        let inner = self.lock();
        let mut decisions = inner.decisions.get(session_id).cloned().unwrap_or_default();
        sort_by_creation(&mut decisions);
        Ok(decisions)
    }
}
