//! Score aggregation.
//!
//! Credit is given per sub-answer: a stage-1 question is worth one point, a
//! stage-2 question two (controller and controlled are graded independently).
//! Each sub-answer lands in the breakdown bucket of the category the player
//! picked.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::EngineError;
use crate::model::{Answer, Category, Stage};

/// Correct vs. attempted sub-answers for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub correct: u32,
    pub total: u32,
}

impl Tally {
    fn record(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.correct += 1;
        }
    }

    /// Fraction correct, `0.0` when nothing was attempted.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

/// Per-category tallies. Always holds all three categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Breakdown(BTreeMap<Category, Tally>);

impl Default for Breakdown {
    fn default() -> Self {
        Self(Category::ALL.iter().map(|&c| (c, Tally::default())).collect())
    }
}

impl Breakdown {
    pub fn get(&self, category: Category) -> Tally {
        self.0.get(&category).copied().unwrap_or_default()
    }

    fn entry(&mut self, category: Category) -> &mut Tally {
        self.0.entry(category).or_default()
    }

    /// Tallies in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, Tally)> + '_ {
        Category::ALL.iter().map(move |&c| (c, self.get(c)))
    }

    /// The category with the most correct sub-answers.
    ///
    /// A three-way tie (including an empty breakdown) falls back to
    /// `neocortex`. A two-way tie at the top goes to the category declared
    /// first.
    pub fn top(&self) -> Category {
        let best = self.iter().map(|(_, t)| t.correct).max().unwrap_or(0);
        let leaders: Vec<Category> = self
            .iter()
            .filter(|(_, t)| t.correct == best)
            .map(|(c, _)| c)
            .collect();

        match leaders.as_slice() {
            [only] => *only,
            [first, _] => *first,
            _ => Category::Neocortex,
        }
    }
}

/// Derived results for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsSummary {
    /// Points available (1 per stage-1 answer, 2 per stage-2 answer).
    pub total_questions: u32,
    /// Points earned.
    pub total_correct: u32,
    /// Correct first sub-answers (main system or controller).
    pub correct_q1: u32,
    /// Correct second sub-answers. Stage-1 answers always count here.
    pub correct_q2: u32,
    pub breakdown: Breakdown,
    pub top_system: Category,
}

impl ResultsSummary {
    /// Share of available points earned, in `[0, 1]`.
    pub fn accuracy(&self) -> f64 {
        if self.total_questions == 0 {
            0.0
        } else {
            self.total_correct as f64 / self.total_questions as f64
        }
    }
}

/// Reduce recorded answers into a results summary. Pure and re-entrant.
pub fn compute_results(answers: &[Answer]) -> ResultsSummary {
    let mut breakdown = Breakdown::default();
    let mut total_questions = 0;
    let mut total_correct = 0;
    let mut correct_q1 = 0;
    let mut correct_q2 = 0;

    for answer in answers {
        total_questions += answer.stage.points();
        correct_q1 += u32::from(answer.is_correct_q1);
        correct_q2 += u32::from(answer.is_correct_q2);

        breakdown
            .entry(answer.q1_answer)
            .record(answer.is_correct_q1);
        total_correct += u32::from(answer.is_correct_q1);

        if answer.stage == Stage::Two {
            breakdown
                .entry(answer.q2_answer)
                .record(answer.is_correct_q2);
            total_correct += u32::from(answer.is_correct_q2);
        }
    }

    let top_system = breakdown.top();
    ResultsSummary {
        total_questions,
        total_correct,
        correct_q1,
        correct_q2,
        breakdown,
        top_system,
    }
}

/// A persisted answer row: same fields as [`Answer`] minus the stage.
pub trait DecisionLike {
    fn question_id(&self) -> &str;
    fn q1_answer(&self) -> Category;
    fn q2_answer(&self) -> Category;
    fn is_correct_q1(&self) -> bool;
    fn is_correct_q2(&self) -> bool;
}

/// Score persisted decisions, resolving each question's stage through the
/// catalog rather than from its identifier.
pub fn compute_results_from_decisions<D: DecisionLike>(
    decisions: &[D],
    catalog: &Catalog,
) -> Result<ResultsSummary, EngineError> {
    let answers = decisions
        .iter()
        .map(|d| {
            let question = catalog
                .get(d.question_id())
                .ok_or_else(|| EngineError::UnknownQuestion(d.question_id().to_string()))?;
            Ok(Answer {
                question_id: d.question_id().to_string(),
                stage: question.stage(),
                q1_answer: d.q1_answer(),
                q2_answer: d.q2_answer(),
                is_correct_q1: d.is_correct_q1(),
                is_correct_q2: d.is_correct_q2(),
            })
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    Ok(compute_results(&answers))
}
