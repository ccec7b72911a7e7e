//! Subcommand implementations.

pub mod catalog;
pub mod init;
pub mod play;
pub mod results;
pub mod simulate;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;

use braindriver_core::parser::load_catalog_or_builtin;
use braindriver_core::{Catalog, ResultsSummary, RngSource};
use braindriver_store::config::{load_config_from, BraindriverConfig};

/// Load the config and the catalog it (or the command line) points at.
pub(crate) fn load_setup(
    config_path: Option<&Path>,
    catalog_override: Option<PathBuf>,
) -> Result<(BraindriverConfig, Catalog)> {
    let config = load_config_from(config_path)?;
    let catalog_path = catalog_override.or_else(|| config.catalog.clone());
    let catalog = load_catalog_or_builtin(catalog_path.as_deref())?;
    Ok((config, catalog))
}

/// A seeded source when a seed is given, otherwise one seeded from entropy.
pub(crate) fn random_source(seed: Option<u64>) -> RngSource<StdRng> {
    match seed {
        Some(seed) => RngSource(StdRng::seed_from_u64(seed)),
        None => RngSource(StdRng::from_entropy()),
    }
}

/// Per-system breakdown table.
pub(crate) fn results_table(summary: &ResultsSummary) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["System", "Correct", "Attempted", "Accuracy"]);

    for (category, tally) in summary.breakdown.iter() {
        let marker = if category == summary.top_system {
            " *"
        } else {
            ""
        };
        table.add_row(vec![
            Cell::new(format!("{category}{marker}")),
            Cell::new(tally.correct),
            Cell::new(tally.total),
            Cell::new(format!("{:.0}%", tally.ratio() * 100.0)),
        ]);
    }

    table
}

pub(crate) fn print_results(summary: &ResultsSummary) {
    println!("{}", results_table(summary));
    println!(
        "Score: {}/{} ({} main, {} secondary)",
        summary.total_correct, summary.total_questions, summary.correct_q1, summary.correct_q2
    );
    println!("Top driver: {}", summary.top_system);
}
