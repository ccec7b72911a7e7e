//! The `braindriver init` command.

use anyhow::Result;

use braindriver_core::parser::render_catalog_toml;
use braindriver_core::Catalog;

pub fn execute() -> Result<()> {
    if std::path::Path::new("braindriver.toml").exists() {
        println!("braindriver.toml already exists, skipping.");
    } else {
        std::fs::write("braindriver.toml", SAMPLE_CONFIG)?;
        println!("Created braindriver.toml");
    }

    let catalog_path = std::path::Path::new("catalog.toml");
    if catalog_path.exists() {
        println!("catalog.toml already exists, skipping.");
    } else {
        let toml = render_catalog_toml(
            &Catalog::builtin(),
            "Brain Driver",
            "The built-in questions, ready for editing",
        )?;
        std::fs::write(catalog_path, toml)?;
        println!("Created catalog.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit catalog.toml and point `catalog` in braindriver.toml at it");
    println!("  2. Run: braindriver validate --catalog catalog.toml");
    println!("  3. Run: braindriver play");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# braindriver configuration

language = "en"
stage1_per_game = 6
stage2_per_game = 6
# catalog = "catalog.toml"

[store]
type = "json"
path = "./braindriver-sessions"
"#;
