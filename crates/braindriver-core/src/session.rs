//! In-memory game session: the question sequence, the current position, and
//! the answers recorded so far.
//!
//! The caller owns one session per play-through and drops it on restart. The
//! session is always the source of truth for scoring, regardless of what any
//! persistence layer manages to store.

use uuid::Uuid;

use crate::error::EngineError;
use crate::model::{Answer, Category, Question, QuestionKind, Stage};
use crate::pool::PoolBuilder;
use crate::scoring::{compute_results, ResultsSummary};
use crate::traits::RandomSource;

/// Outcome of [`GameSession::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the next question.
    Moved { index: usize },
    /// Moved from the last stage-1 question to the first stage-2 question.
    EnteredStage2 { index: usize },
    /// There is no next question; show the results.
    Exhausted,
}

/// One play-through.
#[derive(Debug, Clone)]
pub struct GameSession {
    id: Uuid,
    questions: Vec<Question>,
    index: usize,
    answers: Vec<Answer>,
}

impl GameSession {
    /// Start a session over an already drawn question sequence.
    pub fn new(questions: Vec<Question>) -> Self {
        let id = Uuid::new_v4();
        tracing::debug!(session = %id, questions = questions.len(), "session started");
        Self {
            id,
            questions,
            index: 0,
            answers: Vec::new(),
        }
    }

    /// Draw a fresh sequence and start a session over it.
    pub fn start(builder: &PoolBuilder, source: &mut dyn RandomSource) -> Self {
        Self::new(builder.build_pool(source))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    /// The question at the current position, if the sequence is not exhausted.
    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    /// The recorded answer for a question, if any.
    pub fn answer_for(&self, question_id: &str) -> Option<&Answer> {
        self.answers.iter().find(|a| a.question_id == question_id)
    }

    /// `true` once the position has moved past the last question.
    pub fn is_finished(&self) -> bool {
        self.index >= self.questions.len()
    }

    /// Grade and record an answer.
    ///
    /// Stage-1 questions take a single choice; `q2` may be omitted or repeat
    /// `q1`. Stage-2 questions require both choices. A question can only be
    /// answered once per session.
    pub fn submit(
        &mut self,
        question_id: &str,
        q1: Category,
        q2: Option<Category>,
    ) -> Result<&Answer, EngineError> {
        let question = self
            .questions
            .iter()
            .find(|q| q.id == question_id)
            .ok_or_else(|| EngineError::UnknownQuestion(question_id.to_string()))?;

        if self.answer_for(question_id).is_some() {
            return Err(EngineError::DuplicateAnswer(question_id.to_string()));
        }

        let answer = grade(question, q1, q2)?;
        tracing::debug!(
            session = %self.id,
            question = question_id,
            q1 = %answer.q1_answer,
            q2 = %answer.q2_answer,
            correct_q1 = answer.is_correct_q1,
            correct_q2 = answer.is_correct_q2,
            "answer recorded"
        );

        self.answers.push(answer);
        Ok(&self.answers[self.answers.len() - 1])
    }

    /// Move to the next question, bounded at the sequence length.
    pub fn advance(&mut self) -> Advance {
        if self.index + 1 >= self.questions.len() {
            self.index = self.questions.len();
            return Advance::Exhausted;
        }

        let leaving = self.questions[self.index].stage();
        self.index += 1;
        let entering = self.questions[self.index].stage();

        if leaving == Stage::One && entering == Stage::Two {
            Advance::EnteredStage2 { index: self.index }
        } else {
            Advance::Moved { index: self.index }
        }
    }

    /// Score everything answered so far.
    pub fn results(&self) -> ResultsSummary {
        compute_results(&self.answers)
    }
}

/// Compare the chosen categories against the question's answer key.
pub fn grade(
    question: &Question,
    q1: Category,
    q2: Option<Category>,
) -> Result<Answer, EngineError> {
    let (q2_answer, is_correct_q1, is_correct_q2) = match question.kind {
        QuestionKind::Stage1 { correct_answer } => {
            if let Some(second) = q2.filter(|&second| second != q1) {
                return Err(EngineError::StageShape {
                    question_id: question.id.clone(),
                    stage: Stage::One,
                    reason: format!("single-choice question got a second answer '{second}'"),
                });
            }
            // No second question: the congruent second flag keeps scoring uniform.
            (q1, q1 == correct_answer, true)
        }
        QuestionKind::Stage2 {
            correct_controller,
            correct_controlled,
        } => {
            let q2 = q2.ok_or_else(|| EngineError::StageShape {
                question_id: question.id.clone(),
                stage: Stage::Two,
                reason: "missing the controlled-system answer".to_string(),
            })?;
            (q2, q1 == correct_controller, q2 == correct_controlled)
        }
    };

    Ok(Answer {
        question_id: question.id.clone(),
        stage: question.stage(),
        q1_answer: q1,
        q2_answer,
        is_correct_q1,
        is_correct_q2,
    })
}
