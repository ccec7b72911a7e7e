//! TOML catalog parser.
//!
//! Loads custom question catalogs from TOML files, renders catalogs back to
//! TOML, and validates them for non-fatal issues.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::model::{Category, Question, QuestionKind, Stage};
use crate::pool::PoolSize;

/// Intermediate TOML structure for catalog files.
#[derive(Debug, Serialize, Deserialize)]
struct TomlCatalogFile {
    #[serde(default)]
    catalog: TomlCatalogHeader,
    #[serde(default)]
    stage1: Vec<TomlStage1>,
    #[serde(default)]
    stage2: Vec<TomlStage2>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlCatalogHeader {
    #[serde(default = "default_name")]
    name: String,
    #[serde(default)]
    description: String,
}

impl Default for TomlCatalogHeader {
    fn default() -> Self {
        Self {
            name: default_name(),
            description: String::new(),
        }
    }
}

fn default_name() -> String {
    "Brain Driver".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlStage1 {
    id: String,
    locale_key: String,
    #[serde(default)]
    image_key: Option<String>,
    #[serde(default = "default_color")]
    color: String,
    correct: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlStage2 {
    id: String,
    locale_key: String,
    #[serde(default)]
    image_key: Option<String>,
    #[serde(default = "default_color")]
    color: String,
    controller: String,
    controlled: String,
}

fn default_color() -> String {
    "#3b82f6".to_string()
}

/// A catalog loaded from a file, with its header metadata.
#[derive(Debug, Clone)]
pub struct CatalogFile {
    pub name: String,
    pub description: String,
    pub catalog: Catalog,
}

fn parse_category(value: &str, question_id: &str) -> Result<Category> {
    value
        .parse()
        .map_err(|e: String| anyhow::anyhow!("question '{question_id}': {e}"))
}

/// Parse a single TOML file into a validated catalog.
pub fn parse_catalog(path: &Path) -> Result<CatalogFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file: {}", path.display()))?;

    parse_catalog_str(&content, path)
}

/// Parse a TOML string into a validated catalog (useful for testing).
pub fn parse_catalog_str(content: &str, source_path: &Path) -> Result<CatalogFile> {
    let parsed: TomlCatalogFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let stage1 = parsed
        .stage1
        .into_iter()
        .map(|q| {
            let correct = parse_category(&q.correct, &q.id)?;
            let image_key = q.image_key.unwrap_or_else(|| q.locale_key.clone());
            Ok(Question::stage1(&q.id, &q.locale_key, &image_key, &q.color, correct))
        })
        .collect::<Result<Vec<_>>>()?;

    let stage2 = parsed
        .stage2
        .into_iter()
        .map(|q| {
            let controller = parse_category(&q.controller, &q.id)?;
            let controlled = parse_category(&q.controlled, &q.id)?;
            let image_key = q.image_key.unwrap_or_else(|| q.locale_key.clone());
            Ok(Question::stage2(
                &q.id,
                &q.locale_key,
                &image_key,
                &q.color,
                controller,
                controlled,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    let catalog = Catalog::new(stage1, stage2)
        .with_context(|| format!("invalid catalog: {}", source_path.display()))?;

    Ok(CatalogFile {
        name: parsed.catalog.name,
        description: parsed.catalog.description,
        catalog,
    })
}

/// Load the catalog at `path`, or the built-in one when no path is given.
pub fn load_catalog_or_builtin(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(p) => Ok(parse_catalog(p)?.catalog),
        None => Ok(Catalog::builtin()),
    }
}

/// Render a catalog as TOML in the format [`parse_catalog_str`] accepts.
pub fn render_catalog_toml(catalog: &Catalog, name: &str, description: &str) -> Result<String> {
    let mut file = TomlCatalogFile {
        catalog: TomlCatalogHeader {
            name: name.to_string(),
            description: description.to_string(),
        },
        stage1: Vec::new(),
        stage2: Vec::new(),
    };

    for q in catalog.iter() {
        match q.kind {
            QuestionKind::Stage1 { correct_answer } => file.stage1.push(TomlStage1 {
                id: q.id.clone(),
                locale_key: q.locale_key.clone(),
                image_key: Some(q.image_key.clone()),
                color: q.color.clone(),
                correct: correct_answer.to_string(),
            }),
            QuestionKind::Stage2 {
                correct_controller,
                correct_controlled,
            } => file.stage2.push(TomlStage2 {
                id: q.id.clone(),
                locale_key: q.locale_key.clone(),
                image_key: Some(q.image_key.clone()),
                color: q.color.clone(),
                controller: correct_controller.to_string(),
                controlled: correct_controlled.to_string(),
            }),
        }
    }

    toml::to_string_pretty(&file).context("failed to render catalog TOML")
}

/// A warning from catalog validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a catalog for issues that do not break integrity but make for a
/// poor game.
pub fn validate_catalog(catalog: &Catalog, size: PoolSize) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for (stage, per_game) in [(Stage::One, size.stage1), (Stage::Two, size.stage2)] {
        let available = catalog.pool(stage).len();
        if available < per_game {
            warnings.push(ValidationWarning {
                question_id: None,
                message: format!(
                    "stage {stage} pool has {available} questions but {per_game} are drawn per game"
                ),
            });
        }
    }

    let stage1_answers: HashSet<Category> = catalog
        .stage1()
        .iter()
        .filter_map(|q| match q.kind {
            QuestionKind::Stage1 { correct_answer } => Some(correct_answer),
            QuestionKind::Stage2 { .. } => None,
        })
        .collect();
    for category in Category::ALL {
        if !stage1_answers.contains(&category) {
            warnings.push(ValidationWarning {
                question_id: None,
                message: format!("no stage 1 question has '{category}' as its answer"),
            });
        }
    }

    let controllers: HashSet<Category> = catalog
        .stage2()
        .iter()
        .filter_map(|q| match q.kind {
            QuestionKind::Stage2 {
                correct_controller, ..
            } => Some(correct_controller),
            QuestionKind::Stage1 { .. } => None,
        })
        .collect();
    for category in Category::ALL {
        if !controllers.contains(&category) {
            warnings.push(ValidationWarning {
                question_id: None,
                message: format!("no stage 2 question has '{category}' as the controller"),
            });
        }
    }

    for q in catalog.iter() {
        if q.locale_key.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: "locale_key is empty".into(),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r##"
[catalog]
name = "Tiny"
description = "A two-question catalog"

[[stage1]]
id = "s1-a"
locale_key = "main1"
image_key = "main1"
color = "#dc2626"
correct = "reptilian"

[[stage2]]
id = "s2-a"
locale_key = "ctrl1"
controller = "Neocortex"
controlled = "limbic"
"##;

    #[test]
    fn parse_valid_toml() {
        let file = parse_catalog_str(VALID_TOML, &PathBuf::from("tiny.toml")).unwrap();
        assert_eq!(file.name, "Tiny");
        assert_eq!(file.catalog.stage1().len(), 1);
        assert_eq!(file.catalog.stage2().len(), 1);

        let q = file.catalog.get("s2-a").unwrap();
        assert_eq!(q.image_key, "ctrl1");
        assert_eq!(q.color, "#3b82f6");
        assert_eq!(
            q.kind,
            QuestionKind::Stage2 {
                correct_controller: Category::Neocortex,
                correct_controlled: Category::Limbic,
            }
        );
    }

    #[test]
    fn parse_unknown_category() {
        let toml = r#"
[[stage1]]
id = "bad"
locale_key = "main1"
correct = "cerebellum"
"#;
        let err = parse_catalog_str(toml, &PathBuf::from("bad.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("unknown category: cerebellum"));
    }

    #[test]
    fn parse_duplicate_ids_is_integrity_error() {
        let toml = r#"
[[stage1]]
id = "same"
locale_key = "main1"
correct = "limbic"

[[stage2]]
id = "same"
locale_key = "ctrl1"
controller = "limbic"
controlled = "limbic"
"#;
        let err = parse_catalog_str(toml, &PathBuf::from("dupes.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("duplicate question id 'same'"));
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_catalog_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn builtin_renders_and_reparses() {
        let builtin = Catalog::builtin();
        let toml = render_catalog_toml(&builtin, "Brain Driver", "").unwrap();
        let file = parse_catalog_str(&toml, &PathBuf::from("builtin.toml")).unwrap();
        assert_eq!(file.catalog.stage1(), builtin.stage1());
        assert_eq!(file.catalog.stage2(), builtin.stage2());
    }

    #[test]
    fn builtin_catalog_has_no_warnings() {
        let warnings = validate_catalog(&Catalog::builtin(), PoolSize::default());
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn validate_small_catalog() {
        let file = parse_catalog_str(VALID_TOML, &PathBuf::from("tiny.toml")).unwrap();
        let warnings = validate_catalog(&file.catalog, PoolSize::default());
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("stage 1 pool has 1 questions but 6")));
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("'limbic' as its answer")));
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("'reptilian' as the controller")));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        std::fs::write(&path, VALID_TOML).unwrap();

        let catalog = load_catalog_or_builtin(Some(&path)).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(load_catalog_or_builtin(None).unwrap().len(), 40);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = parse_catalog(&PathBuf::from("/nonexistent/catalog.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/catalog.toml"));
    }
}
