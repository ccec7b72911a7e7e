//! The persistence collaborator: sessions and their append-only decisions.
//!
//! One session has many decisions. Nothing here feeds back into the in-memory
//! game; results derived from a store are a re-derivation for durability
//! across devices.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use braindriver_core::scoring::{compute_results_from_decisions, DecisionLike};
use braindriver_core::{Answer, Catalog, Category, ResultsSummary};

use crate::error::StoreError;

/// A persisted session with the player's settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub language: String,
    pub sfx_on: bool,
    pub music_on: bool,
    pub voice_on: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(id: &str, language: &str) -> Self {
        let now = Utc::now();
        Self {
            id: id.to_string(),
            language: language.to_string(),
            sfx_on: true,
            music_on: false,
            voice_on: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn apply(&mut self, settings: &SessionSettings) {
        if let Some(sfx_on) = settings.sfx_on {
            self.sfx_on = sfx_on;
        }
        if let Some(music_on) = settings.music_on {
            self.music_on = music_on;
        }
        if let Some(voice_on) = settings.voice_on {
            self.voice_on = voice_on;
        }
        if let Some(language) = &settings.language {
            self.language = language.clone();
        }
        self.updated_at = Utc::now();
    }
}

/// Partial settings update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default)]
    pub sfx_on: Option<bool>,
    #[serde(default)]
    pub music_on: Option<bool>,
    #[serde(default)]
    pub voice_on: Option<bool>,
    #[serde(default)]
    pub language: Option<String>,
}

/// A decision about to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDecision {
    pub session_id: String,
    pub question_id: String,
    pub q1_answer: Category,
    pub q2_answer: Category,
    pub is_correct_q1: bool,
    pub is_correct_q2: bool,
}

impl NewDecision {
    pub fn from_answer(session_id: &str, answer: &Answer) -> Self {
        Self {
            session_id: session_id.to_string(),
            question_id: answer.question_id.clone(),
            q1_answer: answer.q1_answer,
            q2_answer: answer.q2_answer,
            is_correct_q1: answer.is_correct_q1,
            is_correct_q2: answer.is_correct_q2,
        }
    }

    pub(crate) fn into_record(self) -> DecisionRecord {
        DecisionRecord {
            id: Uuid::new_v4(),
            session_id: self.session_id,
            question_id: self.question_id,
            q1_answer: self.q1_answer,
            q2_answer: self.q2_answer,
            is_correct_q1: self.is_correct_q1,
            is_correct_q2: self.is_correct_q2,
            created_at: Utc::now(),
        }
    }
}

/// A stored decision row. Never edited once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub id: Uuid,
    pub session_id: String,
    pub question_id: String,
    pub q1_answer: Category,
    pub q2_answer: Category,
    pub is_correct_q1: bool,
    pub is_correct_q2: bool,
    pub created_at: DateTime<Utc>,
}

impl DecisionLike for DecisionRecord {
    fn question_id(&self) -> &str {
        &self.question_id
    }

    fn q1_answer(&self) -> Category {
        self.q1_answer
    }

    fn q2_answer(&self) -> Category {
        self.q2_answer
    }

    fn is_correct_q1(&self) -> bool {
        self.is_correct_q1
    }

    fn is_correct_q2(&self) -> bool {
        self.is_correct_q2
    }
}

/// Session and decision storage.
#[async_trait]
pub trait DecisionStore: Send + Sync {
    /// Human-readable backend name (e.g. "memory").
    fn name(&self) -> &str;

    /// Return the session with this id, creating it if it does not exist.
    async fn create_or_get_session(
        &self,
        session_id: &str,
        language: &str,
    ) -> Result<SessionRecord, StoreError>;

    /// Update an existing session's settings.
    async fn update_session_settings(
        &self,
        session_id: &str,
        settings: &SessionSettings,
    ) -> Result<SessionRecord, StoreError>;

    /// Append a decision, creating its session if needed.
    async fn record_decision(&self, decision: &NewDecision) -> Result<DecisionRecord, StoreError>;

    /// All decisions of a session, oldest first. Unknown sessions have none.
    async fn list_decisions(&self, session_id: &str) -> Result<Vec<DecisionRecord>, StoreError>;

    /// Re-derive a session's results from its stored decisions.
    async fn compute_results_for_session(
        &self,
        session_id: &str,
        catalog: &Catalog,
    ) -> Result<ResultsSummary, StoreError> {
        let decisions = self.list_decisions(session_id).await?;
        Ok(compute_results_from_decisions(&decisions, catalog)?)
    }
}

/// Sort decisions oldest first, keeping insertion order for equal timestamps.
pub(crate) fn sort_by_creation(decisions: &mut [DecisionRecord]) {
    decisions.sort_by_key(|d| d.created_at);
}
