//! The `braindriver results` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use braindriver_core::report::share_message;
use braindriver_store::config::StoreConfig;
use braindriver_store::{DecisionStore, JsonFileStore};

pub async fn execute(
    session_id: String,
    store_dir: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, catalog) = super::load_setup(config_path.as_deref(), None)?;

    let dir = match (store_dir, &config.store) {
        (Some(dir), _) => dir,
        (None, StoreConfig::Json { path }) => path.clone(),
        (None, StoreConfig::Memory) => anyhow::bail!(
            "results need a JSON store: pass --store-dir or configure [store]"
        ),
    };

    let store = JsonFileStore::new(&dir);
    let decisions = store.list_decisions(&session_id).await?;
    if decisions.is_empty() {
        anyhow::bail!(
            "no decisions recorded for session {session_id} in {}",
            dir.display()
        );
    }

    let summary = store
        .compute_results_for_session(&session_id, &catalog)
        .await
        .with_context(|| format!("failed to score session {session_id}"))?;

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        "text" => {
            println!("Session: {session_id} ({} decisions)", decisions.len());
            super::print_results(&summary);
            println!("{}", share_message(&summary, "Brain Driver"));
        }
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }

    Ok(())
}
