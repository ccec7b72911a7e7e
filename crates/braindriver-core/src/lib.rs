//! braindriver-core: Question catalog, pool selection, and scoring.
//!
//! This crate defines the data model, the static question catalog, the
//! randomized per-game draw, the in-memory game session, and the score
//! aggregation that the rest of Brain Driver builds on.

pub mod catalog;
pub mod error;
pub mod funnel;
pub mod model;
pub mod parser;
pub mod pool;
pub mod report;
pub mod scoring;
pub mod session;
pub mod statistics;
pub mod traits;

pub use catalog::Catalog;
pub use error::EngineError;
pub use model::{Answer, Category, Question, QuestionKind, Stage};
pub use pool::{PoolBuilder, PoolSize};
pub use scoring::{compute_results, ResultsSummary};
pub use session::{Advance, GameSession};
pub use traits::{RandomSource, RngSource, SequenceSource};
