//! The question catalog: immutable ground truth for both stages.

use std::collections::HashSet;

use crate::error::EngineError;
use crate::model::{Category, Question, Stage};

use crate::model::Category::{Limbic, Neocortex, Reptilian};

const RED: &str = "#dc2626";
const AMBER: &str = "#f59e0b";
const BLUE: &str = "#3b82f6";

/// Only six illustrations exist per stage; keys cycle through them.
const STAGE1_IMAGE_KEYS: [&str; 6] = ["main1", "main2", "main3", "main4", "main5", "main6"];
const STAGE2_IMAGE_KEYS: [&str; 6] = ["ctrl1", "ctrl2", "ctrl3", "ctrl4", "ctrl5", "ctrl6"];

/// "Which part of the brain is the main one here?"
const STAGE1_ANSWERS: [Category; 20] = [
    Reptilian, Limbic, Neocortex, Reptilian, Limbic, Neocortex, Reptilian, Limbic, Neocortex,
    Reptilian, Limbic, Neocortex, Reptilian, Limbic, Neocortex, Reptilian, Limbic, Neocortex,
    Reptilian, Limbic,
];

/// "Who controls whom?" as (controller, controlled).
const STAGE2_ANSWERS: [(Category, Category); 20] = [
    (Neocortex, Limbic),
    (Neocortex, Reptilian),
    (Neocortex, Limbic),
    (Reptilian, Limbic),
    (Limbic, Neocortex),
    (Neocortex, Limbic),
    (Reptilian, Limbic),
    (Neocortex, Limbic),
    (Limbic, Reptilian),
    (Reptilian, Neocortex),
    (Limbic, Neocortex),
    (Neocortex, Reptilian),
    (Reptilian, Limbic),
    (Neocortex, Limbic),
    (Limbic, Neocortex),
    (Neocortex, Limbic),
    (Reptilian, Limbic),
    (Neocortex, Limbic),
    (Limbic, Reptilian),
    (Neocortex, Limbic),
];

fn image_color(category: Category) -> &'static str {
    match category {
        Reptilian => RED,
        Limbic => AMBER,
        Neocortex => BLUE,
    }
}

/// Two fixed, ordered question pools.
#[derive(Debug, Clone)]
pub struct Catalog {
    stage1: Vec<Question>,
    stage2: Vec<Question>,
}

impl Catalog {
    /// Build a catalog, failing fast on integrity violations.
    ///
    /// Ids must be non-empty and unique across both pools, and each pool may
    /// only hold questions of its own stage.
    pub fn new(stage1: Vec<Question>, stage2: Vec<Question>) -> Result<Self, EngineError> {
        check_pool(&stage1, Stage::One)?;
        check_pool(&stage2, Stage::Two)?;

        let mut seen = HashSet::new();
        for q in stage1.iter().chain(&stage2) {
            if !seen.insert(q.id.as_str()) {
                return Err(EngineError::CatalogIntegrity(format!(
                    "duplicate question id '{}'",
                    q.id
                )));
            }
        }

        Ok(Self { stage1, stage2 })
    }

    /// The built-in catalog: 20 stage-1 and 20 stage-2 situations.
    pub fn builtin() -> Self {
        let stage1 = STAGE1_ANSWERS
            .iter()
            .enumerate()
            .map(|(i, &correct)| {
                let n = i + 1;
                Question::stage1(
                    &format!("stage1-{n}"),
                    &format!("main{n}"),
                    STAGE1_IMAGE_KEYS[i % STAGE1_IMAGE_KEYS.len()],
                    image_color(correct),
                    correct,
                )
            })
            .collect();

        let stage2 = STAGE2_ANSWERS
            .iter()
            .enumerate()
            .map(|(i, &(controller, controlled))| {
                let n = i + 1;
                Question::stage2(
                    &format!("stage2-{n}"),
                    &format!("ctrl{n}"),
                    STAGE2_IMAGE_KEYS[i % STAGE2_IMAGE_KEYS.len()],
                    image_color(controller),
                    controller,
                    controlled,
                )
            })
            .collect();

        Self { stage1, stage2 }
    }

    pub fn stage1(&self) -> &[Question] {
        &self.stage1
    }

    pub fn stage2(&self) -> &[Question] {
        &self.stage2
    }

    /// The pool for the given stage.
    pub fn pool(&self, stage: Stage) -> &[Question] {
        match stage {
            Stage::One => &self.stage1,
            Stage::Two => &self.stage2,
        }
    }

    /// Look a question up by id in either pool.
    pub fn get(&self, id: &str) -> Option<&Question> {
        self.iter().find(|q| q.id == id)
    }

    /// All questions, stage 1 first.
    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.stage1.iter().chain(&self.stage2)
    }

    pub fn len(&self) -> usize {
        self.stage1.len() + self.stage2.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn check_pool(pool: &[Question], stage: Stage) -> Result<(), EngineError> {
    for q in pool {
        if q.id.trim().is_empty() {
            return Err(EngineError::CatalogIntegrity(format!(
                "stage {stage} pool contains a question with an empty id"
            )));
        }
        if q.stage() != stage {
            return Err(EngineError::CatalogIntegrity(format!(
                "question '{}' is stage {} but listed in the stage {stage} pool",
                q.id,
                q.stage()
            )));
        }
    }
    Ok(())
}
