//! Funnel events marking how far a player got.
//!
//! Events are emitted as structured `tracing` records under the
//! `braindriver::funnel` target; shipping them anywhere is up to the
//! subscriber.

use std::fmt;

use crate::scoring::ResultsSummary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunnelEvent {
    /// The player pressed start on the intro screen.
    IntroButtonClick,
    /// The player chose an answer on the first stage-1 question.
    FirstQuestionChoiceStage1,
    /// All stage-1 questions are answered.
    Stage1Ended,
    /// Stage 2 is finished and the results are shown.
    Stage2Ended { results: ResultsSummary },
}

impl FunnelEvent {
    pub fn name(&self) -> &'static str {
        match self {
            FunnelEvent::IntroButtonClick => "intro_button_click",
            FunnelEvent::FirstQuestionChoiceStage1 => "first_question_choice_stage1",
            FunnelEvent::Stage1Ended => "stage_1_ended",
            FunnelEvent::Stage2Ended { .. } => "stage_2_ended",
        }
    }

    /// Emit the event for the given session and language.
    pub fn emit(&self, session_id: &str, language: &str) {
        match self {
            FunnelEvent::Stage2Ended { results } => tracing::info!(
                target: "braindriver::funnel",
                event = self.name(),
                session_id,
                language,
                total_correct = results.total_correct,
                total_questions = results.total_questions,
                top_system = %results.top_system,
                "funnel"
            ),
            _ => tracing::info!(
                target: "braindriver::funnel",
                event = self.name(),
                session_id,
                language,
                "funnel"
            ),
        }
    }
}

impl fmt::Display for FunnelEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::compute_results;

    #[test]
    fn event_names() {
        assert_eq!(FunnelEvent::IntroButtonClick.name(), "intro_button_click");
        assert_eq!(
            FunnelEvent::FirstQuestionChoiceStage1.to_string(),
            "first_question_choice_stage1"
        );
        assert_eq!(FunnelEvent::Stage1Ended.name(), "stage_1_ended");
        let ended = FunnelEvent::Stage2Ended {
            results: compute_results(&[]),
        };
        assert_eq!(ended.name(), "stage_2_ended");
        // No subscriber installed: emitting is a no-op.
        ended.emit("sess", "en");
    }
}
