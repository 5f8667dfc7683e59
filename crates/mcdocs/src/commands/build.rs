//! Static site build command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mcdocs_static::{BuildConfig, SiteConfig, StaticBuilder};
use serde::Deserialize;

/// The parts of site.toml only the CLI reads.
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    build: BuildSettings,
}

#[derive(Debug, Deserialize)]
struct BuildSettings {
    #[serde(default = "default_output")]
    output: String,
    #[serde(default = "default_static_dir")]
    static_dir: String,
    #[serde(default = "default_minify")]
    minify: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            output: default_output(),
            static_dir: default_static_dir(),
            minify: default_minify(),
        }
    }
}

fn default_output() -> String {
    "build".to_string()
}
fn default_static_dir() -> String {
    "static".to_string()
}
fn default_minify() -> bool {
    true
}

/// Load site.toml into a build configuration.
///
/// Relative paths in the file resolve against the directory holding it.
pub fn load_config(config_path: &Path) -> Result<BuildConfig> {
    let site = SiteConfig::load(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    let file: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse [build] in {}", config_path.display()))?;

    let root = match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };

    tracing::info!("Loaded config from {}", config_path.display());

    Ok(BuildConfig {
        output_dir: root.join(&file.build.output),
        static_dir: Some(root.join(&file.build.static_dir)),
        minify: file.build.minify,
        ..BuildConfig::new(site, root)
    })
}

/// Run the build command.
pub async fn run(config_path: &Path, output: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Building static site...");

    let mut config = load_config(config_path)?;
    if let Some(output) = output {
        config.output_dir = output;
    }
    if let Some(minify) = minify {
        config.minify = minify;
    }

    let result = StaticBuilder::new(config)?.build().await?;

    tracing::info!(
        "Built {} pages from {} docs in {}ms",
        result.pages,
        result.docs,
        result.duration_ms
    );
    if result.broken_links > 0 {
        tracing::warn!("{} broken link(s) tolerated", result.broken_links);
    }

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
