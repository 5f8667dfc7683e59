//! Site configuration (`site.toml`).
//!
//! [`SiteConfig`] is parsed and validated once at build start and never
//! mutated afterwards.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::links::{split_suffix, BrokenLinkPolicy, LinkTarget, RouteTable};

/// The Multicommand documentation site, as shipped by `mcdocs init`.
pub const MULTICOMMAND_SITE_TOML: &str = r#"title = "Multicommand"
tagline = "Simple subcommand CLIs with argparse"
url = "https://andrewrosss.github.io"
base_url = "/"
favicon = "img/favicon.svg"
organization_name = "andrewrosss"
project_name = "multicommand"
on_broken_links = "fail"
on_broken_markdown_links = "warn"

[navbar]
title = "Multicommand"
logo = { alt = "Multicommand Logo", src = "img/logo.svg" }

[[navbar.items]]
doc_id = "installation"
label = "Docs"
position = "left"

[[navbar.items]]
href = "https://github.com/andrewrosss/multicommand"
label = "GitHub"
position = "right"

[footer]
style = "dark"
copyright = "Copyright © {year} Andrew Ross. Built with mcdocs."

[[footer.links]]
title = "DOCUMENTATION"
items = [
  { label = "Installation", to = "/docs/installation" },
  { label = "Introduction", to = "/docs/introduction" },
  { label = "Basic Usage", to = "/docs/basic-usage" },
  { label = "Examples", to = "/docs/examples/simple" },
]

[[footer.links]]
title = "LINKS"
items = [
  { label = "PyPI", href = "https://pypi.org/project/multicommand/" },
  { label = "Github", href = "https://github.com/andrewrosss/multicommand" },
  { label = "Issues", href = "https://github.com/andrewrosss/multicommand/issues" },
  { label = "andrewrosss", href = "https://github.com/andrewrosss" },
]

[[footer.links]]

[docs]
dir = "docs"
route_base = "docs"
edit_url = "https://github.com/andrewrosss/multicommand/tree/master/docs"

[theme]
custom_css = "src/css/custom.css"

[build]
output = "build"
static_dir = "static"
minify = true
"#;

/// Errors that can occur while loading the site configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse site config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid site config: {0}")]
    Invalid(String),
}

/// Site-wide metadata and navigation structure.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Site title
    pub title: String,

    /// Tagline shown under the title on the home page
    #[serde(default)]
    pub tagline: String,

    /// Absolute origin the site is deployed to
    #[serde(default = "default_url")]
    pub url: String,

    /// Path prefix of every page, with leading and trailing `/`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Favicon path relative to the static dir
    #[serde(default)]
    pub favicon: Option<String>,

    #[serde(default)]
    pub organization_name: Option<String>,

    #[serde(default)]
    pub project_name: Option<String>,

    /// Policy for broken navbar, footer and home page links
    #[serde(default = "default_on_broken_links")]
    pub on_broken_links: BrokenLinkPolicy,

    /// Policy for broken links inside docs
    #[serde(default = "default_on_broken_markdown_links")]
    pub on_broken_markdown_links: BrokenLinkPolicy,

    #[serde(default)]
    pub navbar: Navbar,

    #[serde(default)]
    pub footer: Footer,

    #[serde(default)]
    pub docs: DocsConfig,

    #[serde(default)]
    pub theme: ThemeConfig,
}

fn default_url() -> String {
    "http://localhost".to_string()
}
fn default_base_url() -> String {
    "/".to_string()
}
fn default_on_broken_links() -> BrokenLinkPolicy {
    BrokenLinkPolicy::Fail
}
fn default_on_broken_markdown_links() -> BrokenLinkPolicy {
    BrokenLinkPolicy::Warn
}

/// Top navigation bar.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Navbar {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub logo: Option<Logo>,
    #[serde(default)]
    pub items: Vec<NavbarItem>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Logo {
    pub alt: String,
    /// Path relative to the static dir
    pub src: String,
}

/// Side of the navbar an item sits on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemPosition {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawLink")]
pub struct NavbarItem {
    pub label: String,
    pub target: LinkTarget,
    pub position: ItemPosition,
}

/// Site footer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Footer {
    #[serde(default)]
    pub style: FooterStyle,
    #[serde(default)]
    pub links: Vec<FooterLinkGroup>,
    /// Copyright line; `{year}` is replaced with the build year
    #[serde(default)]
    pub copyright: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FooterStyle {
    #[default]
    Dark,
    Light,
}

impl FooterStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FooterLinkGroup {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub items: Vec<FooterLink>,
}

impl FooterLinkGroup {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawLink")]
pub struct FooterLink {
    pub label: String,
    pub target: LinkTarget,
}

/// Docs section.
#[derive(Debug, Clone, Deserialize)]
pub struct DocsConfig {
    /// Source directory, relative to the config file
    #[serde(default = "default_docs_dir")]
    pub dir: PathBuf,

    /// First path segment of every doc route
    #[serde(default = "default_route_base")]
    pub route_base: String,

    /// Base URL for "Edit this page" links
    #[serde(default)]
    pub edit_url: Option<String>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            dir: default_docs_dir(),
            route_base: default_route_base(),
            edit_url: None,
        }
    }
}

fn default_docs_dir() -> PathBuf {
    PathBuf::from("docs")
}
fn default_route_base() -> String {
    "docs".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThemeConfig {
    /// Stylesheet appended after the built-in theme
    #[serde(default)]
    pub custom_css: Option<PathBuf>,
}

/// Link as written in `site.toml`: a label and exactly one of `doc_id`, `to`, `href`.
#[derive(Deserialize)]
struct RawLink {
    label: String,
    #[serde(default)]
    doc_id: Option<String>,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    href: Option<String>,
    #[serde(default)]
    position: ItemPosition,
}

impl RawLink {
    fn target(&self) -> Result<LinkTarget, String> {
        let target = match (&self.doc_id, &self.to, &self.href) {
            (Some(id), None, None) => LinkTarget::Doc(id.clone()),
            (None, Some(to), None) => LinkTarget::Path(to.clone()),
            (None, None, Some(href)) => LinkTarget::External(href.clone()),
            (None, None, None) => {
                return Err(format!("link `{}` needs one of doc_id, to, href", self.label))
            }
            _ => {
                return Err(format!(
                    "link `{}` must set only one of doc_id, to, href",
                    self.label
                ))
            }
        };
        target
            .validate()
            .map_err(|e| format!("link `{}`: {}", self.label, e))?;
        Ok(target)
    }
}

impl TryFrom<RawLink> for NavbarItem {
    type Error = String;

    fn try_from(raw: RawLink) -> Result<Self, Self::Error> {
        let target = raw.target()?;
        Ok(Self {
            label: raw.label,
            target,
            position: raw.position,
        })
    }
}

impl TryFrom<RawLink> for FooterLink {
    type Error = String;

    fn try_from(raw: RawLink) -> Result<Self, Self::Error> {
        let target = raw.target()?;
        Ok(Self {
            label: raw.label,
            target,
        })
    }
}

impl SiteConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: SiteConfig = toml::from_str(content)?;
        config.footer.links.retain(|group| !group.is_empty());
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants every consumer relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.title.trim().is_empty() {
            return Err(ConfigError::Invalid("title must not be empty".to_string()));
        }
        if !self.base_url.starts_with('/') || !self.base_url.ends_with('/') {
            return Err(ConfigError::Invalid(format!(
                "base_url `{}` must start and end with `/`",
                self.base_url
            )));
        }
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "url `{}` must be an absolute http(s) URL",
                self.url
            )));
        }
        let route_base = &self.docs.route_base;
        if route_base.is_empty() || route_base.starts_with('/') || route_base.ends_with('/') {
            return Err(ConfigError::Invalid(format!(
                "docs.route_base `{route_base}` must be a bare path segment"
            )));
        }

        let targets = self
            .navbar
            .items
            .iter()
            .map(|i| (&i.label, &i.target))
            .chain(
                self.footer
                    .links
                    .iter()
                    .flat_map(|g| g.items.iter().map(|l| (&l.label, &l.target))),
            );
        for (label, target) in targets {
            target
                .validate()
                .map_err(|e| ConfigError::Invalid(format!("link `{label}`: {e}")))?;
        }

        Ok(())
    }

    /// Href of a site route, prefixed with `base_url`.
    ///
    /// Pages are written as `<route>/index.html`, so non-root routes get a trailing `/`.
    pub fn route_href(&self, route: &str) -> String {
        let trimmed = route.trim_matches('/');
        if trimmed.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}{}/", self.base_url, trimmed)
        }
    }

    /// Href of a file under the output root (assets, static files).
    pub fn asset_href(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Route a doc is served at when it has no explicit slug.
    pub fn doc_route(&self, id: &str) -> String {
        match id.trim_matches('/') {
            "" => format!("/{}", self.docs.route_base),
            id => format!("/{}/{}", self.docs.route_base, id),
        }
    }

    /// Href of a configured link target.
    ///
    /// Unresolved doc ids fall back to their default route so a tolerated
    /// broken link still renders.
    pub fn target_href(&self, target: &LinkTarget, routes: &RouteTable) -> String {
        match target {
            LinkTarget::External(url) => url.clone(),
            LinkTarget::Doc(id) => match routes.doc_route(id) {
                Some(route) => self.route_href(route),
                None => self.route_href(&self.doc_route(id)),
            },
            LinkTarget::Path(path) => {
                let (route, suffix) = split_suffix(path);
                format!("{}{}", self.route_href(route), suffix)
            }
        }
    }

    /// Absolute URL of a route, for the sitemap.
    pub fn absolute_url(&self, route: &str) -> String {
        format!("{}{}", self.url.trim_end_matches('/'), self.route_href(route))
    }

    /// Copyright line for a given year.
    pub fn copyright(&self, year: i32) -> Option<String> {
        self.footer
            .copyright
            .as_ref()
            .map(|c| c.replace("{year}", &year.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multicommand_site() {
        let config = SiteConfig::from_toml_str(MULTICOMMAND_SITE_TOML).unwrap();

        assert_eq!(config.title, "Multicommand");
        assert_eq!(config.tagline, "Simple subcommand CLIs with argparse");
        assert_eq!(config.on_broken_links, BrokenLinkPolicy::Fail);
        assert_eq!(config.on_broken_markdown_links, BrokenLinkPolicy::Warn);

        assert_eq!(config.navbar.items.len(), 2);
        assert_eq!(
            config.navbar.items[0].target,
            LinkTarget::Doc("installation".to_string())
        );
        assert_eq!(config.navbar.items[1].position, ItemPosition::Right);

        // The trailing empty group is dropped
        assert_eq!(config.footer.links.len(), 2);
        let docs_group = &config.footer.links[0];
        assert_eq!(docs_group.title.as_deref(), Some("DOCUMENTATION"));
        let labels: Vec<_> = docs_group.items.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, ["Installation", "Introduction", "Basic Usage", "Examples"]);
        assert!(config.footer.links[1].items.iter().all(|l| l.target.is_external()));
    }

    #[test]
    fn applies_defaults() {
        let config = SiteConfig::from_toml_str(r#"title = "Docs""#).unwrap();

        assert_eq!(config.base_url, "/");
        assert_eq!(config.docs.dir, PathBuf::from("docs"));
        assert_eq!(config.docs.route_base, "docs");
        assert_eq!(config.on_broken_links, BrokenLinkPolicy::Fail);
        assert!(config.navbar.items.is_empty());
        assert_eq!(config.footer.style, FooterStyle::Dark);
    }

    #[test]
    fn rejects_link_with_two_targets() {
        let err = SiteConfig::from_toml_str(
            r#"
title = "Docs"
[[navbar.items]]
label = "Docs"
doc_id = "intro"
href = "https://example.com"
"#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("only one of doc_id, to, href"));
    }

    #[test]
    fn rejects_link_without_target() {
        let err = SiteConfig::from_toml_str(
            r#"
title = "Docs"
[[footer.links]]
title = "More"
items = [{ label = "Nowhere" }]
"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("needs one of doc_id, to, href"));
    }

    #[test]
    fn rejects_relative_to_and_internal_href() {
        let relative = SiteConfig::from_toml_str(
            "title = \"Docs\"\n[[navbar.items]]\nlabel = \"A\"\nto = \"docs/a\"\n",
        );
        assert!(relative.is_err());

        let internal_href = SiteConfig::from_toml_str(
            "title = \"Docs\"\n[[navbar.items]]\nlabel = \"A\"\nhref = \"/docs/a\"\n",
        );
        assert!(internal_href.is_err());
    }

    #[test]
    fn rejects_bad_base_url_and_title() {
        let err = SiteConfig::from_toml_str("title = \"Docs\"\nbase_url = \"/docs\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = SiteConfig::from_toml_str("title = \"  \"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = SiteConfig::from_toml_str("title = \"Docs\"\nurl = \"example.com\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn builds_hrefs_under_base_url() {
        let config =
            SiteConfig::from_toml_str("title = \"Docs\"\nbase_url = \"/multicommand/\"\nurl = \"https://example.com/\"")
                .unwrap();

        assert_eq!(config.route_href("/"), "/multicommand/");
        assert_eq!(config.route_href("/docs/installation"), "/multicommand/docs/installation/");
        assert_eq!(config.asset_href("assets/main.css"), "/multicommand/assets/main.css");
        assert_eq!(config.doc_route("examples/simple"), "/docs/examples/simple");
        assert_eq!(
            config.absolute_url("/docs/installation"),
            "https://example.com/multicommand/docs/installation/"
        );
    }

    #[test]
    fn resolves_target_hrefs() {
        let config = SiteConfig::from_toml_str(MULTICOMMAND_SITE_TOML).unwrap();
        let mut routes = RouteTable::new();
        routes.add_doc("intro", "introduction.md", "/docs/introduction").unwrap();

        assert_eq!(
            config.target_href(&LinkTarget::Doc("intro".into()), &routes),
            "/docs/introduction/"
        );
        assert_eq!(
            config.target_href(&LinkTarget::Doc("missing".into()), &routes),
            "/docs/missing/"
        );
        assert_eq!(
            config.target_href(&LinkTarget::Path("/docs/installation#pip".into()), &routes),
            "/docs/installation/#pip"
        );
        assert_eq!(
            config.target_href(&LinkTarget::External("https://pypi.org".into()), &routes),
            "https://pypi.org"
        );
    }

    #[test]
    fn substitutes_copyright_year() {
        let config = SiteConfig::from_toml_str(MULTICOMMAND_SITE_TOML).unwrap();

        assert_eq!(
            config.copyright(2024).as_deref(),
            Some("Copyright © 2024 Andrew Ross. Built with mcdocs.")
        );
    }

    #[test]
    fn load_reports_missing_file() {
        let err = SiteConfig::load(Path::new("/nonexistent/site.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
