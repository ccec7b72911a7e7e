//! braindriver-store: Session and decision persistence.
//!
//! Implements the `DecisionStore` trait in memory and as JSON files, plus the
//! fire-and-forget recorder the game uses to persist answers without waiting.

pub mod config;
pub mod error;
pub mod json;
pub mod memory;
pub mod recorder;
pub mod store;

pub use config::{create_store, load_config, load_config_from, BraindriverConfig, StoreConfig};
pub use error::StoreError;
pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use recorder::{PersistentRecorder, RecorderStats};
pub use store::{DecisionRecord, DecisionStore, NewDecision, SessionRecord, SessionSettings};
