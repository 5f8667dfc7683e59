//! Link check command.

use std::path::Path;

use anyhow::Result;
use mcdocs_static::StaticBuilder;

use super::build::load_config;

/// Run the check command.
pub async fn run(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let report = StaticBuilder::new(config)?.check().await?;

    tracing::info!(
        "Checked {} docs and {} routes: {} broken link(s) tolerated",
        report.docs,
        report.routes,
        report.broken_links
    );

    Ok(())
}
