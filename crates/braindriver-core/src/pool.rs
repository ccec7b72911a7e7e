//! Per-game question selection.
//!
//! Draws a uniform random subset, without replacement, from each catalog pool
//! and concatenates the stage-1 draw with the stage-2 draw. There is no
//! per-category coverage guarantee: every subset of the requested size is
//! equally likely.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::EngineError;
use crate::model::{Question, Stage};
use crate::traits::RandomSource;

/// Default number of stage-1 questions per game.
pub const STAGE1_QUESTIONS_PER_GAME: usize = 6;
/// Default number of stage-2 questions per game.
pub const STAGE2_QUESTIONS_PER_GAME: usize = 6;

/// How many questions to draw from each stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSize {
    pub stage1: usize,
    pub stage2: usize,
}

impl Default for PoolSize {
    fn default() -> Self {
        Self {
            stage1: STAGE1_QUESTIONS_PER_GAME,
            stage2: STAGE2_QUESTIONS_PER_GAME,
        }
    }
}

impl PoolSize {
    pub fn total(&self) -> usize {
        self.stage1 + self.stage2
    }

    fn for_stage(&self, stage: Stage) -> usize {
        match stage {
            Stage::One => self.stage1,
            Stage::Two => self.stage2,
        }
    }
}

/// Builds the randomized question sequence for one game.
#[derive(Debug, Clone)]
pub struct PoolBuilder {
    catalog: Arc<Catalog>,
    size: PoolSize,
}

impl PoolBuilder {
    /// Create a builder, rejecting sizes larger than the catalog pools.
    pub fn new(catalog: Arc<Catalog>, size: PoolSize) -> Result<Self, EngineError> {
        for stage in [Stage::One, Stage::Two] {
            let requested = size.for_stage(stage);
            let available = catalog.pool(stage).len();
            if requested > available {
                return Err(EngineError::Configuration {
                    stage,
                    requested,
                    available,
                });
            }
        }
        Ok(Self { catalog, size })
    }

    /// Builder over the built-in catalog with the default sizes.
    pub fn with_defaults() -> Self {
        Self {
            catalog: Arc::new(Catalog::builtin()),
            size: PoolSize::default(),
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn size(&self) -> PoolSize {
        self.size
    }

    /// Draw one game's questions: stage 1 first, then stage 2, each in
    /// post-shuffle order.
    pub fn build_pool(&self, source: &mut dyn RandomSource) -> Vec<Question> {
        let mut sequence = Vec::with_capacity(self.size.total());
        for stage in [Stage::One, Stage::Two] {
            let mut drawn = self.catalog.pool(stage).to_vec();
            shuffle(&mut drawn, source);
            drawn.truncate(self.size.for_stage(stage));
            sequence.extend(drawn);
        }

        tracing::debug!(
            stage1 = self.size.stage1,
            stage2 = self.size.stage2,
            ids = ?sequence.iter().map(|q| q.id.as_str()).collect::<Vec<_>>(),
            "built question pool"
        );
        sequence
    }
}

/// In-place Fisher-Yates shuffle driven by a [`RandomSource`].
pub fn shuffle<T>(items: &mut [T], source: &mut dyn RandomSource) {
    for i in (1..items.len()).rev() {
        let j = source.next_index(i + 1);
        items.swap(i, j);
    }
}
