//! Engine error types.
//!
//! Every engine failure is local and synchronous. Callers use
//! [`EngineError::is_recoverable`] to decide between surfacing the error to the
//! player and aborting at startup.

use thiserror::Error;

use crate::model::Stage;

/// Errors raised by the catalog, pool builder, and answer recorder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Static catalog data violates an invariant (duplicate ids, wrong stage in a pool).
    #[error("catalog integrity violated: {0}")]
    CatalogIntegrity(String),

    /// A requested draw size exceeds the pool it draws from.
    #[error("cannot draw {requested} stage {stage} questions from a pool of {available}")]
    Configuration {
        stage: Stage,
        requested: usize,
        available: usize,
    },

    /// The question id is not part of the active session (or catalog).
    #[error("unknown question: {0}")]
    UnknownQuestion(String),

    /// The question has already been answered in this session.
    #[error("question already answered: {0}")]
    DuplicateAnswer(String),

    /// The submitted answer does not match the question's stage shape.
    #[error("answer shape does not fit stage {stage} question {question_id}: {reason}")]
    StageShape {
        question_id: String,
        stage: Stage,
        reason: String,
    },
}

impl EngineError {
    /// Returns `true` for errors the caller can recover from mid-game.
    ///
    /// Catalog and configuration errors are programmer errors detected at
    /// startup; the rest point at stale UI state.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            EngineError::CatalogIntegrity(_) | EngineError::Configuration { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_errors_are_not_recoverable() {
        assert!(!EngineError::CatalogIntegrity("dup".into()).is_recoverable());
        assert!(!EngineError::Configuration {
            stage: Stage::One,
            requested: 30,
            available: 20,
        }
        .is_recoverable());
        assert!(EngineError::UnknownQuestion("x".into()).is_recoverable());
        assert!(EngineError::DuplicateAnswer("x".into()).is_recoverable());
    }

    #[test]
    fn configuration_message_names_sizes() {
        let err = EngineError::Configuration {
            stage: Stage::Two,
            requested: 21,
            available: 20,
        };
        assert_eq!(
            err.to_string(),
            "cannot draw 21 stage 2 questions from a pool of 20"
        );
    }
}
