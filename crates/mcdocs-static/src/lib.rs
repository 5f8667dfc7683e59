//! Static site generator for the multicommand documentation.
//!
//! Builds the home page, the docs and their navigation from a `site.toml`
//! and a directory of markdown files.

pub mod assets;
pub mod builder;
pub mod config;
pub mod features;
pub mod home;
pub mod links;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, CheckReport, StaticBuilder};
pub use config::{ConfigError, SiteConfig, MULTICOMMAND_SITE_TOML};
pub use features::{render_features, FeatureBlock, FeatureEntry, FEATURES};
pub use home::{compose_home, hero_links, PageView};
pub use links::{BrokenLink, BrokenLinkError, BrokenLinkPolicy, LinkTarget};
