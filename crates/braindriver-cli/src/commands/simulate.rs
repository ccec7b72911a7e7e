//! The `braindriver simulate` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, Table};

use braindriver_core::statistics::selection_frequencies;
use braindriver_core::PoolBuilder;

pub fn execute(
    runs: u64,
    seed: Option<u64>,
    catalog_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(runs >= 1, "runs must be at least 1");

    let (config, catalog) = super::load_setup(config_path.as_deref(), catalog_path)?;
    let builder = PoolBuilder::new(Arc::new(catalog), config.pool_size())?;
    let mut source = super::random_source(seed);

    tracing::info!(runs, "simulating draws");
    let stats = selection_frequencies(&builder, runs, &mut source);

    for stage_stats in &stats {
        let expected = stage_stats.expected();
        println!(
            "Stage {}: {} questions, {} drawn per game over {} runs",
            stage_stats.stage,
            stage_stats.counts.len(),
            stage_stats.per_game,
            stage_stats.runs
        );

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Question", "Draws", "Deviation"]);
        for (id, count) in &stage_stats.counts {
            let deviation = if expected > 0.0 {
                format!("{:+.1}%", (*count as f64 - expected) / expected * 100.0)
            } else {
                "-".to_string()
            };
            table.add_row(vec![Cell::new(id), Cell::new(count), Cell::new(deviation)]);
        }
        println!("{table}");
        println!(
            "chi-square = {:.2} (df = {}), expected {:.1} draws each\n",
            stage_stats.chi_square(),
            stage_stats.degrees_of_freedom(),
            expected
        );
    }

    Ok(())
}
