//! Link targets, the route table and broken-link enforcement.
//!
//! Every link the site emits (navbar, footer, home page buttons, links inside
//! docs) is resolved against the [`RouteTable`] before anything is written.
//! Unresolved links are reported as [`BrokenLink`]s and handled according to
//! the configured [`BrokenLinkPolicy`].

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

static SCHEME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("scheme pattern is valid")
});

/// Returns true for links that leave the site (`https://…`, `mailto:…`, `//host/…`).
pub fn is_external_url(dest: &str) -> bool {
    dest.starts_with("//") || SCHEME.is_match(dest)
}

/// Where a configured link points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// A doc id, resolved through the route table
    Doc(String),
    /// A rooted site path such as `/docs/installation`
    Path(String),
    /// A URL outside the site
    External(String),
}

impl LinkTarget {
    /// Check the shape of the target. Resolution happens later, at build time.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Doc(id) if id.trim().is_empty() => Err("doc_id must not be empty".to_string()),
            Self::Path(path) if !path.starts_with('/') => {
                Err(format!("internal link `{path}` must start with `/`"))
            }
            Self::Path(path) if is_external_url(path) => {
                Err(format!("`{path}` is an external URL; use `href` instead of `to`"))
            }
            Self::External(url) if !is_external_url(url) => {
                Err(format!("`{url}` is not an external URL; use `to` or `doc_id`"))
            }
            _ => Ok(()),
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Self::External(_))
    }
}

impl fmt::Display for LinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doc(id) => write!(f, "doc `{id}`"),
            Self::Path(path) => f.write_str(path),
            Self::External(url) => f.write_str(url),
        }
    }
}

/// What to do when a link does not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrokenLinkPolicy {
    /// Abort the build
    #[serde(alias = "throw")]
    Fail,
    /// Log a warning per link and continue
    Warn,
    /// Continue silently
    Ignore,
}

impl BrokenLinkPolicy {
    /// Apply the policy to the links found by one check.
    ///
    /// Returns how many broken links were tolerated.
    pub fn enforce(self, kind: &str, links: Vec<BrokenLink>) -> Result<usize, BrokenLinkError> {
        if links.is_empty() {
            return Ok(0);
        }

        match self {
            Self::Fail => Err(BrokenLinkError { links }),
            Self::Warn => {
                for link in &links {
                    tracing::warn!("Broken {} link: {}", kind, link);
                }
                Ok(links.len())
            }
            Self::Ignore => {
                tracing::debug!("Ignoring {} broken {} link(s)", links.len(), kind);
                Ok(links.len())
            }
        }
    }
}

impl fmt::Display for BrokenLinkPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fail => "fail",
            Self::Warn => "warn",
            Self::Ignore => "ignore",
        })
    }
}

/// A link that did not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenLink {
    /// Where the link was declared (`navbar`, `docs/intro.md:12`, …)
    pub source: String,
    /// The target as written
    pub target: String,
}

impl fmt::Display for BrokenLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (linked from {})", self.target, self.source)
    }
}

/// Raised when broken links are found under the `fail` policy.
#[derive(Debug, thiserror::Error)]
#[error("{} broken link(s) found:\n{}", links.len(), format_links(links))]
pub struct BrokenLinkError {
    pub links: Vec<BrokenLink>,
}

fn format_links(links: &[BrokenLink]) -> String {
    links
        .iter()
        .map(|l| format!("  - {l}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split `path#frag` / `path?q` into the route part and the suffix.
pub fn split_suffix(dest: &str) -> (&str, &str) {
    match dest.find(['#', '?']) {
        Some(pos) => (&dest[..pos], &dest[pos..]),
        None => (dest, ""),
    }
}

/// Canonical form of a site path: rooted, no trailing slash, no suffix.
pub fn normalize_route(path: &str) -> String {
    let (path, _) = split_suffix(path);
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Why a doc could not be added to a [`RouteTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteConflict {
    /// Another doc has the same id
    Id,
    /// The route is already served by another page
    Route(String),
}

/// Known routes of the site and the doc ids and files behind them.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashSet<String>,
    docs: HashMap<String, String>,
    files: HashMap<String, String>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route that is not backed by a doc.
    pub fn add_route(&mut self, route: &str) {
        self.routes.insert(normalize_route(route));
    }

    /// Register a doc. `file` is its path relative to the docs dir, `/`-separated.
    ///
    /// Every doc needs its own id and its own route, since the route decides
    /// the output file.
    pub fn add_doc(&mut self, id: &str, file: &str, route: &str) -> Result<(), RouteConflict> {
        if self.docs.contains_key(id) {
            return Err(RouteConflict::Id);
        }
        let route = normalize_route(route);
        if self.routes.contains(&route) {
            return Err(RouteConflict::Route(route));
        }
        self.routes.insert(route.clone());
        self.files.insert(file.to_string(), route.clone());
        self.docs.insert(id.to_string(), route);
        Ok(())
    }

    /// Route of a doc id.
    pub fn doc_route(&self, id: &str) -> Option<&str> {
        self.docs.get(id).map(String::as_str)
    }

    /// Route of a doc file (relative to the docs dir).
    pub fn file_route(&self, file: &str) -> Option<&str> {
        self.files.get(file).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.routes.contains(&normalize_route(path))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Resolve a configured target to its route. External targets resolve to themselves.
    pub fn resolve(&self, target: &LinkTarget) -> Option<String> {
        match target {
            LinkTarget::Doc(id) => self.doc_route(id).map(str::to_string),
            LinkTarget::Path(path) => {
                let route = normalize_route(path);
                self.routes.contains(&route).then_some(route)
            }
            LinkTarget::External(url) => Some(url.clone()),
        }
    }
}

/// Outcome of resolving a link written inside a doc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkdownLink {
    /// Leaves the site; not checked
    External,
    /// `#anchor` on the same page
    Fragment,
    /// A known route, plus any `#fragment`/`?query` suffix
    Resolved { route: String, suffix: String },
    /// Nothing matches
    Broken,
}

/// Resolve a link found in the doc at `file` (served at `route`).
///
/// Links to `.md`/`.mdx` files resolve as files relative to the source doc;
/// other relative links resolve against the doc's parent route.
pub fn resolve_markdown_link(routes: &RouteTable, file: &str, route: &str, dest: &str) -> MarkdownLink {
    if is_external_url(dest) {
        return MarkdownLink::External;
    }
    if dest.is_empty() || dest.starts_with('#') {
        return MarkdownLink::Fragment;
    }

    let (path, suffix) = split_suffix(dest);
    let suffix = suffix.to_string();

    if path.ends_with(".md") || path.ends_with(".mdx") {
        let base = if path.starts_with('/') {
            ""
        } else {
            parent_of(file)
        };
        return match join_relative(base, path.trim_start_matches('/'))
            .and_then(|f| routes.file_route(&f).map(str::to_string))
        {
            Some(route) => MarkdownLink::Resolved { route, suffix },
            None => MarkdownLink::Broken,
        };
    }

    let candidate = if path.starts_with('/') {
        Some(normalize_route(path))
    } else {
        join_relative(parent_of(route.trim_start_matches('/')), path).map(|p| normalize_route(&p))
    };

    match candidate {
        Some(route) if routes.contains(&route) => MarkdownLink::Resolved { route, suffix },
        _ => MarkdownLink::Broken,
    }
}

fn parent_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(pos) => &path[..pos],
        None => "",
    }
}

/// Join a relative path onto a `/`-separated base, folding `.` and `..`.
///
/// Returns `None` when the path climbs above the root.
fn join_relative(base: &str, rel: &str) -> Option<String> {
    let mut parts: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
    for part in rel.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    Some(parts.join("/"))
}
