//! The pull pipeline: validate, export, unpack, merge, check, write.
//!
//! Stages run strictly in order and any error ends the run before the
//! writer is reached, so a failed pull never leaves a partial artifact.

use crate::api::{ApiClient, ExportQuery};
use crate::archive;
use crate::config::Config;
use crate::consistency::{self, ConsistencyReport};
use crate::error::Result;
use crate::languages;
use crate::resources;
use crate::writer::{self, OutputMode};
use std::path::PathBuf;
use tracing::info;

/// What a successful pull produced
#[derive(Debug)]
pub struct PullSummary {
    pub written: Vec<PathBuf>,
    pub languages: Vec<String>,
    pub report: ConsistencyReport,
}

/// Run a pull with a client built from `config`
pub async fn run(config: &Config) -> Result<PullSummary> {
    let client = ApiClient::new(&config.api_url, &config.api_key);
    run_with_client(config, &client).await
}

/// Run a pull with an existing client
pub async fn run_with_client(config: &Config, client: &ApiClient) -> Result<PullSummary> {
    config.validate()?;

    // Step 1: Make sure the requested languages exist
    info!("Validating requested languages");
    languages::validate(&config.languages, client).await?;

    // Step 2: Export
    info!(
        "Exporting namespaces [{}] for languages [{}]",
        config.namespaces.join(", "),
        config.languages.join(", ")
    );
    let bytes = client
        .export(&ExportQuery::new(&config.namespaces, &config.languages))
        .await?;
    info!("Downloaded export archive ({} bytes)", bytes.len());

    // Step 3: Unpack and merge
    let files = archive::unpack(&bytes)?;
    info!("Merging {} files", files.len());
    let tree = resources::merge(&config.languages, files, config.default_namespace())?;

    // Step 4: Interpolation consistency (diagnostic only)
    let report = consistency::detect_inconsistencies(&config.languages, &tree);
    report.log_summary();

    // Step 5: Write
    let mode = OutputMode::from_split_flag(config.split);
    let written = writer::write(&tree, &config.output_path, mode).await?;

    Ok(PullSummary {
        written,
        languages: tree.languages().map(str::to_string).collect(),
        report,
    })
}
