//! Game configuration and store factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use braindriver_core::pool::{STAGE1_QUESTIONS_PER_GAME, STAGE2_QUESTIONS_PER_GAME};
use braindriver_core::PoolSize;

use crate::json::JsonFileStore;
use crate::memory::MemoryStore;
use crate::store::DecisionStore;

/// Languages the game ships translations for.
pub const SUPPORTED_LANGUAGES: [&str; 3] = ["en", "fr", "ru"];

/// Where sessions and decisions are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    #[default]
    Memory,
    Json { path: PathBuf },
}

/// Top-level braindriver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BraindriverConfig {
    /// UI language for the session row.
    #[serde(default = "default_language")]
    pub language: String,
    /// Questions drawn from the stage-1 pool per game.
    #[serde(default = "default_stage1")]
    pub stage1_per_game: usize,
    /// Questions drawn from the stage-2 pool per game.
    #[serde(default = "default_stage2")]
    pub stage2_per_game: usize,
    /// Catalog file to load instead of the built-in questions.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    #[serde(default)]
    pub store: StoreConfig,
}

fn default_language() -> String {
    "en".to_string()
}
fn default_stage1() -> usize {
    STAGE1_QUESTIONS_PER_GAME
}
fn default_stage2() -> usize {
    STAGE2_QUESTIONS_PER_GAME
}

impl Default for BraindriverConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            stage1_per_game: default_stage1(),
            stage2_per_game: default_stage2(),
            catalog: None,
            store: StoreConfig::default(),
        }
    }
}

impl BraindriverConfig {
    pub fn pool_size(&self) -> PoolSize {
        PoolSize {
            stage1: self.stage1_per_game,
            stage2: self.stage2_per_game,
        }
    }

    /// Apply overrides that take precedence over the file.
    pub fn apply_overrides(&mut self, language: Option<String>, store_dir: Option<String>) {
        if let Some(language) = language {
            self.language = language;
        }
        if let Some(dir) = store_dir {
            self.store = StoreConfig::Json {
                path: PathBuf::from(dir),
            };
        }
    }

    fn resolve_env(&mut self) {
        self.language = resolve_env_vars(&self.language);
        if let Some(catalog) = &self.catalog {
            self.catalog = Some(PathBuf::from(resolve_env_vars(&catalog.to_string_lossy())));
        }
        if let StoreConfig::Json { path } = &self.store {
            self.store = StoreConfig::Json {
                path: PathBuf::from(resolve_env_vars(&path.to_string_lossy())),
            };
        }
    }

    /// Resolve `${VAR}` references in the file values, then apply overrides.
    ///
    /// Override values are taken literally.
    fn finalize(&mut self, language: Option<String>, store_dir: Option<String>) -> Result<()> {
        self.resolve_env();
        self.apply_overrides(language, store_dir);
        self.validate()
    }

    fn validate(&self) -> Result<()> {
        if !SUPPORTED_LANGUAGES.contains(&self.language.as_str()) {
            anyhow::bail!(
                "unsupported language {:?} (expected one of: {})",
                self.language,
                SUPPORTED_LANGUAGES.join(", ")
            );
        }
        Ok(())
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied verbatim and never scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + 2 + len];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + 2 + len + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `braindriver.toml` in the current directory
/// 2. `~/.config/braindriver/config.toml`
///
/// Environment variable overrides: `BRAINDRIVER_LANGUAGE`, `BRAINDRIVER_STORE_DIR`.
pub fn load_config() -> Result<BraindriverConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<BraindriverConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("braindriver.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<BraindriverConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => BraindriverConfig::default(),
    };

    config.finalize(
        std::env::var("BRAINDRIVER_LANGUAGE").ok(),
        std::env::var("BRAINDRIVER_STORE_DIR").ok(),
    )?;

    tracing::debug!(
        source = ?config_path,
        language = %config.language,
        store = ?config.store,
        "loaded config"
    );
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("braindriver"))
}

/// Create a store instance from its configuration.
pub fn create_store(config: &StoreConfig) -> Arc<dyn DecisionStore> {
    match config {
        StoreConfig::Memory => Arc::new(MemoryStore::new()),
        StoreConfig::Json { path } => Arc::new(JsonFileStore::new(path)),
    }
}
