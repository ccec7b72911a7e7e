//! Game report types with JSON persistence and share text.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Answer;
use crate::scoring::{compute_results, ResultsSummary};
use crate::session::GameSession;

/// A finished (or abandoned) play-through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// Session the answers belong to.
    pub session_id: String,
    /// UI language the game was played in.
    pub language: String,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Number of questions in the drawn sequence.
    pub question_count: usize,
    /// Answers in submission order.
    pub answers: Vec<Answer>,
    /// Derived results.
    pub summary: ResultsSummary,
}

impl GameReport {
    /// Snapshot a session.
    pub fn from_session(session: &GameSession, session_id: &str, language: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id: session_id.to_string(),
            language: language.to_string(),
            created_at: Utc::now(),
            question_count: session.questions().len(),
            answers: session.answers().to_vec(),
            summary: session.results(),
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    ///
    /// The summary is recomputed from the answers, so a hand-edited summary
    /// never disagrees with them.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let mut report: GameReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        report.summary = compute_results(&report.answers);
        Ok(report)
    }

    /// The message shared alongside the results card.
    pub fn share_message(&self, game_name: &str) -> String {
        share_message(&self.summary, game_name)
    }
}

/// "I scored 9/18 in Brain Driver. My top driver: limbic."
pub fn share_message(summary: &ResultsSummary, game_name: &str) -> String {
    format!(
        "I scored {}/{} in {game_name}. My top driver: {}.",
        summary.total_correct, summary.total_questions, summary.top_system
    )
}
