//! The `braindriver validate` command.

use std::path::PathBuf;

use anyhow::Result;

use braindriver_core::parser::{parse_catalog, validate_catalog};
use braindriver_store::config::load_config_from;

pub fn execute(catalog_path: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let file = parse_catalog(&catalog_path)?;

    println!(
        "Catalog: {} ({} stage 1, {} stage 2 questions)",
        file.name,
        file.catalog.stage1().len(),
        file.catalog.stage2().len()
    );

    let warnings = validate_catalog(&file.catalog, config.pool_size());
    for w in &warnings {
        let prefix = w
            .question_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Catalog valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
