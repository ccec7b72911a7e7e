//! Core data model types for Brain Driver.
//!
//! These are the fundamental types the whole engine uses to represent brain
//! systems, questions, and recorded answers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three brain systems a question can be about.
///
/// Declaration order is significant: it breaks ties between leading
/// categories when picking the top system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Reptilian,
    Limbic,
    Neocortex,
}

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Category; 3] = [Category::Reptilian, Category::Limbic, Category::Neocortex];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Reptilian => "reptilian",
            Category::Limbic => "limbic",
            Category::Neocortex => "neocortex",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reptilian" | "r" => Ok(Category::Reptilian),
            "limbic" | "l" => Ok(Category::Limbic),
            "neocortex" | "n" => Ok(Category::Neocortex),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

/// Question format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Stage {
    /// One question: which system is the main one here?
    One,
    /// Two questions: who controls, and who is controlled?
    Two,
}

impl Stage {
    /// Points a fully answered question of this stage is worth.
    pub fn points(&self) -> u32 {
        match self {
            Stage::One => 1,
            Stage::Two => 2,
        }
    }
}

impl From<Stage> for u8 {
    fn from(stage: Stage) -> u8 {
        match stage {
            Stage::One => 1,
            Stage::Two => 2,
        }
    }
}

impl TryFrom<u8> for Stage {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Stage::One),
            2 => Ok(Stage::Two),
            other => Err(format!("unknown stage: {other}")),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// A single scenario question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier, stable for the lifetime of the process.
    pub id: String,
    /// Key into the locale strings for the situation text.
    pub locale_key: String,
    /// Key for the illustration (`quiz-{image_key}.png`).
    pub image_key: String,
    /// Cosmetic display color.
    pub color: String,
    /// Stage-specific answer key.
    #[serde(flatten)]
    pub kind: QuestionKind,
}

/// The graded part of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionKind {
    Stage1 {
        correct_answer: Category,
    },
    /// Controller and controlled are graded independently and may be equal.
    Stage2 {
        correct_controller: Category,
        correct_controlled: Category,
    },
}

impl Question {
    pub fn stage1(
        id: &str,
        locale_key: &str,
        image_key: &str,
        color: &str,
        correct: Category,
    ) -> Self {
        Self {
            id: id.to_string(),
            locale_key: locale_key.to_string(),
            image_key: image_key.to_string(),
            color: color.to_string(),
            kind: QuestionKind::Stage1 {
                correct_answer: correct,
            },
        }
    }

    pub fn stage2(
        id: &str,
        locale_key: &str,
        image_key: &str,
        color: &str,
        controller: Category,
        controlled: Category,
    ) -> Self {
        Self {
            id: id.to_string(),
            locale_key: locale_key.to_string(),
            image_key: image_key.to_string(),
            color: color.to_string(),
            kind: QuestionKind::Stage2 {
                correct_controller: controller,
                correct_controlled: controlled,
            },
        }
    }

    pub fn stage(&self) -> Stage {
        match self.kind {
            QuestionKind::Stage1 { .. } => Stage::One,
            QuestionKind::Stage2 { .. } => Stage::Two,
        }
    }
}

/// One recorded answer. Created once at submission time and never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: String,
    pub stage: Stage,
    /// Main system (stage 1) or controller (stage 2).
    pub q1_answer: Category,
    /// Controlled system; mirrors `q1_answer` for stage 1.
    pub q2_answer: Category,
    pub is_correct_q1: bool,
    pub is_correct_q2: bool,
}

impl Answer {
    /// Whether both sub-answers are correct.
    pub fn is_fully_correct(&self) -> bool {
        self.is_correct_q1 && self.is_correct_q2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_display_and_parse() {
        assert_eq!(Category::Limbic.to_string(), "limbic");
        assert_eq!("Reptilian".parse::<Category>().unwrap(), Category::Reptilian);
        assert_eq!(" neocortex ".parse::<Category>().unwrap(), Category::Neocortex);
        assert_eq!("l".parse::<Category>().unwrap(), Category::Limbic);
        assert!("cerebellum".parse::<Category>().is_err());
    }

    #[test]
    fn stage_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Stage::Two).unwrap(), "2");
        assert_eq!(serde_json::from_str::<Stage>("1").unwrap(), Stage::One);
        assert!(serde_json::from_str::<Stage>("3").is_err());
    }

    #[test]
    fn question_serde_roundtrip() {
        let q = Question::stage2(
            "stage2-1",
            "ctrl1",
            "ctrl1",
            "#3b82f6",
            Category::Neocortex,
            Category::Limbic,
        );
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains(r#""kind":"stage2""#));
        let back: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(back, q);
        assert_eq!(back.stage(), Stage::Two);
    }

    #[test]
    fn stage_points() {
        assert_eq!(Stage::One.points(), 1);
        assert_eq!(Stage::Two.points(), 2);
    }
}
