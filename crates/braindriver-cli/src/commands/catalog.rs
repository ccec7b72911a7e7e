//! The `braindriver catalog` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};

use braindriver_core::parser::render_catalog_toml;
use braindriver_core::QuestionKind;

pub fn execute(
    catalog_path: Option<PathBuf>,
    as_toml: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (_, catalog) = super::load_setup(config_path.as_deref(), catalog_path)?;

    if as_toml {
        print!(
            "{}",
            render_catalog_toml(&catalog, "Brain Driver", "Active question catalog")?
        );
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Id", "Stage", "Text key", "Image", "Answer"]);
    for q in catalog.iter() {
        let answer = match q.kind {
            QuestionKind::Stage1 { correct_answer } => correct_answer.to_string(),
            QuestionKind::Stage2 {
                correct_controller,
                correct_controlled,
            } => format!("{correct_controller} -> {correct_controlled}"),
        };
        table.add_row(vec![
            q.id.clone(),
            q.stage().to_string(),
            q.locale_key.clone(),
            q.image_key.clone(),
            answer,
        ]);
    }

    println!("{table}");
    println!(
        "{} questions ({} stage 1, {} stage 2)",
        catalog.len(),
        catalog.stage1().len(),
        catalog.stage2().len()
    );
    Ok(())
}
