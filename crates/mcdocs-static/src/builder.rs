//! Static site builder.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Datelike;
use pulldown_cmark::{html, CowStr, Event, Parser, Tag};
use walkdir::WalkDir;

use mcdocs_mdx::{markdown_options, parse_doc, ParsedDoc};

use crate::assets::AssetPipeline;
use crate::config::{ConfigError, SiteConfig};
use crate::features::FEATURES;
use crate::home::{compose_home, hero_links};
use crate::links::{
    normalize_route, resolve_markdown_link, BrokenLink, BrokenLinkError, MarkdownLink, RouteConflict,
    RouteTable,
};
use crate::templates::{DocView, HomeView, Layout, LinkView, NavItem, TemplateEngine, TocEntry};

/// Configuration for building the site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Validated site configuration
    pub site: SiteConfig,

    /// Directory relative paths in the site config are resolved against
    pub root: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Directory copied verbatim to the output root
    pub static_dir: Option<PathBuf>,

    /// Minify CSS output
    pub minify: bool,

    /// Year used in the copyright line (defaults to the current year)
    pub year: Option<i32>,
}

impl BuildConfig {
    /// Defaults for a site rooted at `root`: `build/` output, `static/` assets, minified.
    pub fn new(site: SiteConfig, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            site,
            output_dir: root.join("build"),
            static_dir: Some(root.join("static")),
            minify: true,
            year: None,
            root,
        }
    }

    /// Source directory of the docs.
    pub fn docs_dir(&self) -> PathBuf {
        self.root.join(&self.site.docs.dir)
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of HTML pages generated
    pub pages: usize,

    /// Number of docs rendered
    pub docs: usize,

    /// Broken links tolerated by a `warn` or `ignore` policy
    pub broken_links: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Result of a link check without writing output.
#[derive(Debug, PartialEq, Eq)]
pub struct CheckReport {
    /// Number of docs discovered
    pub docs: usize,

    /// Number of known routes
    pub routes: usize,

    /// Broken links tolerated by a `warn` or `ignore` policy
    pub broken_links: usize,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to read docs: {0}")]
    ReadError(String),

    #[error("Failed to parse doc: {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Duplicate doc id `{id}` in {path}")]
    DuplicateDoc { id: String, path: String },

    #[error("{path} and {existing} both map to route `{route}`")]
    DuplicateRoute {
        route: String,
        path: String,
        existing: String,
    },

    #[error(transparent)]
    BrokenLinks(#[from] BrokenLinkError),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

impl From<minijinja::Error> for BuildError {
    fn from(e: minijinja::Error) -> Self {
        BuildError::TemplateError(e.to_string())
    }
}

/// A doc to be built.
#[derive(Debug)]
struct DocPage {
    /// Source file path
    source_path: PathBuf,

    /// Path relative to the docs dir, `/`-separated
    relative_path: String,

    /// Doc id
    id: String,

    /// Site route
    route: String,

    /// Output path
    output_path: PathBuf,

    /// Parsed document
    doc: ParsedDoc,
}

impl DocPage {
    fn title(&self) -> String {
        self.doc
            .title()
            .map(str::to_string)
            .unwrap_or_else(|| capitalize(self.id.rsplit('/').next().unwrap_or(&self.id)))
    }

    fn sidebar_label(&self) -> String {
        self.doc
            .frontmatter
            .as_ref()
            .and_then(|f| f.sidebar_label.clone())
            .unwrap_or_else(|| self.title())
    }

    fn position(&self) -> i32 {
        self.doc
            .frontmatter
            .as_ref()
            .and_then(|f| f.sidebar_position)
            .unwrap_or(i32::MAX)
    }

    /// Top-level directory, if the doc is not at the docs root.
    fn category(&self) -> Option<&str> {
        self.relative_path
            .split_once('/')
            .map(|(dir, _)| dir)
    }
}

/// One sidebar slot: a doc at the root, or a directory of docs.
enum SidebarEntry<'a> {
    Doc(&'a DocPage),
    Category { name: String, docs: Vec<&'a DocPage> },
}

impl SidebarEntry<'_> {
    fn position(&self) -> i32 {
        match self {
            Self::Doc(page) => page.position(),
            Self::Category { docs, .. } => docs.iter().map(|d| d.position()).min().unwrap_or(i32::MAX),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Doc(page) => &page.id,
            Self::Category { name, .. } => name,
        }
    }
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    templates: TemplateEngine,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Result<Self, BuildError> {
        Ok(Self {
            config,
            templates: TemplateEngine::new()?,
        })
    }

    /// Build the static site.
    ///
    /// Links are checked before anything is written, so a build aborted by
    /// the `fail` policy leaves no partial output.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        let site = &self.config.site;

        site.validate()?;

        let docs = self.discover_docs()?;
        let routes = self.build_routes(&docs)?;
        let broken_links = self.check_links(&docs, &routes)?;

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let layout = Layout::new(site, &routes, self.year(), self.styles());

        self.build_home(&layout, &routes)?;

        let entries = sidebar_entries(&docs);
        let order = flatten(&entries);
        for (i, page) in order.iter().enumerate() {
            let previous = i.checked_sub(1).and_then(|p| order.get(p)).copied();
            let next = order.get(i + 1).copied();
            self.build_doc(page, &layout, &routes, &entries, previous, next)?;
        }

        self.build_not_found(&layout)?;
        self.generate_assets()?;
        self.generate_sitemap(&docs)?;

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: docs.len() + 2,
            docs: docs.len(),
            broken_links,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Validate the config and every link without writing output.
    pub async fn check(&self) -> Result<CheckReport, BuildError> {
        self.config.site.validate()?;

        let docs = self.discover_docs()?;
        let routes = self.build_routes(&docs)?;
        let broken_links = self.check_links(&docs, &routes)?;

        Ok(CheckReport {
            docs: docs.len(),
            routes: routes.len(),
            broken_links,
        })
    }

    fn year(&self) -> i32 {
        self.config
            .year
            .unwrap_or_else(|| chrono::Local::now().year())
    }

    /// Stylesheet hrefs: the theme, then the custom stylesheet.
    fn styles(&self) -> Vec<String> {
        let site = &self.config.site;
        let mut styles = vec![site.asset_href("assets/main.css")];
        if let Some(name) = self.custom_css_name() {
            styles.push(site.asset_href(&format!("assets/{name}")));
        }
        styles
    }

    fn custom_css_name(&self) -> Option<String> {
        self.config
            .site
            .theme
            .custom_css
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|f| f.to_string_lossy().to_string())
    }

    /// Discover all docs in the docs directory.
    fn discover_docs(&self) -> Result<Vec<DocPage>, BuildError> {
        let docs_dir = self.config.docs_dir();
        let mut docs = Vec::new();

        if !docs_dir.exists() {
            return Err(BuildError::ReadError(format!(
                "Docs directory not found: {}",
                docs_dir.display()
            )));
        }

        for entry in WalkDir::new(&docs_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if ext != "mdx" && ext != "md" {
                continue;
            }

            // Partials are included by other docs, never rendered on their own
            let file_name = path.file_name().and_then(|f| f.to_str()).unwrap_or("");
            if file_name.starts_with('_') {
                continue;
            }

            let content = fs::read_to_string(path)
                .map_err(|e| BuildError::ReadError(format!("{}: {}", path.display(), e)))?;

            let doc = parse_doc(&content).map_err(|e| BuildError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

            let relative = path.strip_prefix(&docs_dir).unwrap_or(path);
            let relative_path = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            let id = doc_id(&relative_path, &doc);
            let route = self.doc_route(&id, &doc);
            let output_path = self.output_path(&route);

            tracing::debug!("Discovered doc `{}` at {}", id, route);

            docs.push(DocPage {
                source_path: path.to_path_buf(),
                relative_path,
                id,
                route,
                output_path,
                doc,
            });
        }

        docs.sort_by(|a, b| (a.position(), &a.id).cmp(&(b.position(), &b.id)));

        Ok(docs)
    }

    /// Route of a doc: its slug if set, else its id with a trailing `index` dropped.
    fn doc_route(&self, id: &str, doc: &ParsedDoc) -> String {
        let site = &self.config.site;

        if let Some(slug) = doc.frontmatter.as_ref().and_then(|f| f.slug.as_deref()) {
            return site.doc_route(slug);
        }

        let path = match id.rsplit_once('/') {
            Some((dir, "index")) => dir,
            None if id == "index" => "",
            _ => id,
        };
        site.doc_route(path)
    }

    /// Output file for a route.
    fn output_path(&self, route: &str) -> PathBuf {
        let trimmed = route.trim_matches('/');
        if trimmed.is_empty() {
            self.config.output_dir.join("index.html")
        } else {
            self.config.output_dir.join(trimmed).join("index.html")
        }
    }

    /// Register the home page and every doc.
    fn build_routes(&self, docs: &[DocPage]) -> Result<RouteTable, BuildError> {
        let mut routes = RouteTable::new();
        routes.add_route("/");

        for page in docs {
            match routes.add_doc(&page.id, &page.relative_path, &page.route) {
                Ok(()) => {}
                Err(RouteConflict::Id) => {
                    return Err(BuildError::DuplicateDoc {
                        id: page.id.clone(),
                        path: page.source_path.display().to_string(),
                    });
                }
                Err(RouteConflict::Route(route)) => {
                    let existing = docs
                        .iter()
                        .find(|other| normalize_route(&other.route) == route)
                        .map(|other| other.source_path.display().to_string())
                        .unwrap_or_else(|| "the home page".to_string());
                    return Err(BuildError::DuplicateRoute {
                        route,
                        path: page.source_path.display().to_string(),
                        existing,
                    });
                }
            }
        }

        Ok(routes)
    }

    /// Apply both broken-link policies. Returns how many broken links were tolerated.
    fn check_links(&self, docs: &[DocPage], routes: &RouteTable) -> Result<usize, BuildError> {
        let site = &self.config.site;

        let mut tolerated = site
            .on_broken_links
            .enforce("site", self.site_broken_links(routes))?;
        tolerated += site
            .on_broken_markdown_links
            .enforce("markdown", doc_broken_links(docs, routes))?;

        Ok(tolerated)
    }

    /// Broken links in the navbar, footer and home page.
    fn site_broken_links(&self, routes: &RouteTable) -> Vec<BrokenLink> {
        let site = &self.config.site;

        let navbar = site
            .navbar
            .items
            .iter()
            .map(|item| ("navbar".to_string(), &item.target));
        let footer = site.footer.links.iter().flat_map(|group| {
            let source = format!("footer ({})", group.title.as_deref().unwrap_or("untitled"));
            group.items.iter().map(move |link| (source.clone(), &link.target))
        });
        let hero = hero_links();
        let home = hero.iter().map(|link| ("home page".to_string(), &link.target));

        navbar
            .chain(footer)
            .chain(home)
            .filter(|(_, target)| routes.resolve(target).is_none())
            .map(|(source, target)| BrokenLink {
                source,
                target: target.to_string(),
            })
            .collect()
    }

    /// Build the home page.
    fn build_home(&self, layout: &Layout, routes: &RouteTable) -> Result<(), BuildError> {
        let site = &self.config.site;
        let view = compose_home(site, &FEATURES);
        let home = HomeView::new(&view, site, routes);

        let html = self.templates.render_home(layout, &home)?;
        write_file(&self.output_path("/"), &html)
    }

    /// Build a single doc page.
    fn build_doc(
        &self,
        page: &DocPage,
        layout: &Layout,
        routes: &RouteTable,
        entries: &[SidebarEntry<'_>],
        previous: Option<&DocPage>,
        next: Option<&DocPage>,
    ) -> Result<(), BuildError> {
        let site = &self.config.site;
        let page_link = |p: &DocPage| LinkView {
            label: p.sidebar_label(),
            href: site.route_href(&p.route),
            external: false,
            class: None,
        };

        let view = DocView {
            title: page.title(),
            description: page
                .doc
                .frontmatter
                .as_ref()
                .and_then(|f| f.description.clone()),
            content: self.render_markdown(page, routes),
            sidebar: self.sidebar(entries, &page.id),
            toc: page
                .doc
                .toc
                .iter()
                .filter(|e| (2..=3).contains(&e.level))
                .map(|e| TocEntry {
                    title: e.title.clone(),
                    id: e.id.clone(),
                    level: e.level,
                })
                .collect(),
            edit_url: self.edit_url(page),
            previous: previous.map(page_link),
            next: next.map(page_link),
        };

        let html = self.templates.render_doc(layout, &view)?;
        write_file(&page.output_path, &html)
    }

    fn build_not_found(&self, layout: &Layout) -> Result<(), BuildError> {
        let html = self.templates.render_not_found(layout)?;
        write_file(&self.config.output_dir.join("404.html"), &html)
    }

    /// "Edit this page" URL: `edit_url/<docs dir>/<relative path>`.
    fn edit_url(&self, page: &DocPage) -> Option<String> {
        let docs = &self.config.site.docs;
        docs.edit_url.as_ref().map(|base| {
            let dir = docs
                .dir
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            format!("{}/{}/{}", base.trim_end_matches('/'), dir, page.relative_path)
        })
    }

    /// Sidebar for the doc `active_id`.
    fn sidebar(&self, entries: &[SidebarEntry<'_>], active_id: &str) -> Vec<NavItem> {
        let site = &self.config.site;
        let item = |page: &DocPage| NavItem {
            title: page.sidebar_label(),
            href: site.route_href(&page.route),
            children: Vec::new(),
            active: page.id == active_id,
        };

        entries
            .iter()
            .map(|entry| match entry {
                SidebarEntry::Doc(page) => item(page),
                SidebarEntry::Category { name, docs } => {
                    let children: Vec<NavItem> = docs.iter().map(|p| item(p)).collect();
                    NavItem {
                        title: capitalize(name),
                        href: children.first().map(|c| c.href.clone()).unwrap_or_default(),
                        active: children.iter().any(|c| c.active),
                        children,
                    }
                }
            })
            .collect()
    }

    /// Render markdown to HTML, rewriting resolved doc links to their hrefs.
    fn render_markdown(&self, page: &DocPage, routes: &RouteTable) -> String {
        let site = &self.config.site;
        let mut anchors = page.doc.toc.iter().map(|e| e.id.clone());

        let parser = Parser::new_ext(&page.doc.content, markdown_options()).map(|event| match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => Event::Start(Tag::Heading {
                level,
                id: anchors.next().map(CowStr::from).or(id),
                classes,
                attrs,
            }),

            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => {
                let dest_url = match resolve_markdown_link(routes, &page.relative_path, &page.route, &dest_url) {
                    MarkdownLink::Resolved { route, suffix } => {
                        CowStr::from(format!("{}{}", site.route_href(&route), suffix))
                    }
                    _ => dest_url,
                };
                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                })
            }

            other => other,
        });

        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        html_output
    }

    /// Generate static assets.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        let css = AssetPipeline::generate_css();
        let css = if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or(css)
        } else {
            css
        };
        write_file(&assets_dir.join("main.css"), &css)?;
        write_file(&assets_dir.join("main.js"), &AssetPipeline::generate_js())?;

        if let (Some(path), Some(name)) = (&self.config.site.theme.custom_css, self.custom_css_name()) {
            let source_path = self.config.root.join(path);
            if source_path.exists() {
                let content = fs::read_to_string(&source_path).map_err(|e| {
                    BuildError::ReadError(format!("Failed to read stylesheet: {}", e))
                })?;
                write_file(&assets_dir.join(name), &content)?;
                tracing::info!("Copied stylesheet from {}", source_path.display());
            } else {
                tracing::warn!("Stylesheet not found: {}", source_path.display());
            }
        }

        if let Some(static_dir) = &self.config.static_dir {
            if static_dir.exists() {
                let copied = AssetPipeline::copy_dir(static_dir, &self.config.output_dir)
                    .map_err(|e| BuildError::WriteError(e.to_string()))?;
                tracing::info!("Copied {} static files from {}", copied, static_dir.display());
            }
        }

        Ok(())
    }

    /// Generate sitemap and robots.txt.
    fn generate_sitemap(&self, docs: &[DocPage]) -> Result<(), BuildError> {
        let site = &self.config.site;

        let urls: Vec<String> = std::iter::once("/")
            .chain(docs.iter().map(|page| page.route.as_str()))
            .map(|route| format!("  <url>\n    <loc>{}</loc>\n  </url>", site.absolute_url(route)))
            .collect();

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
            urls.join("\n")
        );

        write_file(&self.config.output_dir.join("sitemap.xml"), &sitemap)?;

        let robots = format!(
            "User-agent: *\nAllow: /\nSitemap: {}sitemap.xml",
            site.absolute_url("/")
        );
        write_file(&self.config.output_dir.join("robots.txt"), &robots)
    }
}

/// Doc id: the frontmatter `id` in the doc's directory, else its path without extension.
fn doc_id(relative_path: &str, doc: &ParsedDoc) -> String {
    let without_ext = relative_path
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(relative_path);

    match doc.frontmatter.as_ref().and_then(|f| f.id.as_deref()) {
        Some(id) => match without_ext.rsplit_once('/') {
            Some((dir, _)) => format!("{dir}/{id}"),
            None => id.to_string(),
        },
        None => without_ext.to_string(),
    }
}

/// Broken links inside doc bodies.
fn doc_broken_links(docs: &[DocPage], routes: &RouteTable) -> Vec<BrokenLink> {
    docs.iter()
        .flat_map(|page| {
            page.doc.links.iter().filter_map(move |link| {
                match resolve_markdown_link(routes, &page.relative_path, &page.route, &link.dest) {
                    MarkdownLink::Broken => Some(BrokenLink {
                        source: format!("{}:{}", page.relative_path, link.line),
                        target: link.dest.clone(),
                    }),
                    _ => None,
                }
            })
        })
        .collect()
}

/// Group docs into sidebar entries: root docs first, then one category per
/// top-level directory.
fn sidebar_entries(docs: &[DocPage]) -> Vec<SidebarEntry<'_>> {
    let mut entries = Vec::new();
    let mut categories: BTreeMap<&str, Vec<&DocPage>> = BTreeMap::new();

    // `docs` is already sorted, so root docs and each category keep doc order
    for page in docs {
        match page.category() {
            Some(dir) => categories.entry(dir).or_default().push(page),
            None => entries.push(SidebarEntry::Doc(page)),
        }
    }

    let mut categories: Vec<_> = categories
        .into_iter()
        .map(|(name, docs)| SidebarEntry::Category {
            name: name.to_string(),
            docs,
        })
        .collect();
    categories.sort_by(|a, b| (a.position(), a.name()).cmp(&(b.position(), b.name())));

    entries.extend(categories);
    entries
}

/// Docs in sidebar order, for previous/next links.
fn flatten<'a>(entries: &[SidebarEntry<'a>]) -> Vec<&'a DocPage> {
    entries
        .iter()
        .flat_map(|entry| match entry {
            SidebarEntry::Doc(page) => vec![*page],
            SidebarEntry::Category { docs, .. } => docs.clone(),
        })
        .collect()
}

fn write_file(path: &Path, content: &str) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
    }
    fs::write(path, content).map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))
}

/// Capitalize first letter of a string.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MULTICOMMAND_SITE_TOML;
    use crate::links::{BrokenLinkPolicy, LinkTarget};
    use tempfile::{tempdir, TempDir};

    fn read(path: PathBuf) -> String {
        fs::read_to_string(path).unwrap().replace("&#x2f;", "/")
    }

    /// A site laid out like the multicommand docs.
    fn fixture() -> TempDir {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        fs::create_dir_all(docs.join("examples")).unwrap();

        fs::write(
            docs.join("installation.md"),
            "---\nsidebar_position: 1\n---\n# Installation\n\n## Using pip\n\n```bash\npip install multicommand\n```\n\nNext, read the [introduction](./introduction.md).\n",
        )
        .unwrap();
        fs::write(
            docs.join("introduction.md"),
            "---\nsidebar_position: 2\n---\n# Introduction\n\nSee [basic usage](basic-usage#creating-the-parser).\n",
        )
        .unwrap();
        fs::write(
            docs.join("basic-usage.md"),
            "---\ntitle: Basic Usage\nsidebar_position: 3\n---\n# Basic Usage\n\n## Creating the parser\n\nCall `create_parser`.\n",
        )
        .unwrap();
        fs::write(
            docs.join("examples/simple.md"),
            "---\nsidebar_position: 1\ndescription: A calculator CLI\n---\n# Simple\n\nBack to [installation](../installation.md#using-pip).\n",
        )
        .unwrap();

        fs::create_dir_all(temp.path().join("static/img")).unwrap();
        fs::write(temp.path().join("static/img/logo.svg"), "<svg/>").unwrap();
        fs::create_dir_all(temp.path().join("src/css")).unwrap();
        fs::write(temp.path().join("src/css/custom.css"), ":root { --primary: #25c2a0; }").unwrap();

        temp
    }

    fn config(temp: &TempDir, site: SiteConfig) -> BuildConfig {
        BuildConfig {
            year: Some(2024),
            ..BuildConfig::new(site, temp.path())
        }
    }

    fn multicommand() -> SiteConfig {
        SiteConfig::from_toml_str(MULTICOMMAND_SITE_TOML).unwrap()
    }

    #[tokio::test]
    async fn builds_multicommand_site() {
        let temp = fixture();
        let out = temp.path().join("build");

        let builder = StaticBuilder::new(config(&temp, multicommand())).unwrap();
        let result = builder.build().await.unwrap();

        assert_eq!(result.docs, 4);
        assert_eq!(result.pages, 6);
        assert_eq!(result.broken_links, 0);

        assert!(out.join("index.html").exists());
        assert!(out.join("404.html").exists());
        assert!(out.join("docs/installation/index.html").exists());
        assert!(out.join("docs/examples/simple/index.html").exists());
        assert!(out.join("assets/main.css").exists());
        assert!(out.join("assets/main.js").exists());
        assert!(out.join("assets/custom.css").exists());
        assert!(out.join("img/logo.svg").exists());
    }

    #[tokio::test]
    async fn home_page_has_header_then_features() {
        let temp = fixture();
        let out = temp.path().join("build");

        StaticBuilder::new(config(&temp, multicommand()))
            .unwrap()
            .build()
            .await
            .unwrap();

        let html = read(out.join("index.html"));
        let header = html.find(r#"<h1 class="hero__title">Multicommand</h1>"#).unwrap();
        let tutorial = html.find(r#"href="/docs/basic-usage/">Tutorial</a>"#).unwrap();
        let install = html.find(r#"href="/docs/installation/">Install</a>"#).unwrap();
        let features = html.find(r#"<section class="features">"#).unwrap();
        let small = html.find("<h3>Small</h3>").unwrap();
        let free = html.find("<h3>Dependency-Free</h3>").unwrap();

        assert!(header < tutorial && tutorial < install && install < features);
        assert!(features < small && small < free);
        assert!(html.contains("<code>multicommand.create_parser(...)</code>"));
        assert!(html.contains("Copyright © 2024 Andrew Ross."));
        assert!(html.contains(r#"<link rel="stylesheet" href="/assets/custom.css">"#));
    }

    #[tokio::test]
    async fn rebuilding_is_idempotent() {
        let temp = fixture();
        let out = temp.path().join("build");
        let builder = StaticBuilder::new(config(&temp, multicommand())).unwrap();

        builder.build().await.unwrap();
        let first = read(out.join("index.html"));
        let first_doc = read(out.join("docs/introduction/index.html"));

        builder.build().await.unwrap();

        assert_eq!(first, read(out.join("index.html")));
        assert_eq!(first_doc, read(out.join("docs/introduction/index.html")));
    }

    #[tokio::test]
    async fn renders_docs_with_rewritten_links() {
        let temp = fixture();
        let out = temp.path().join("build");

        StaticBuilder::new(config(&temp, multicommand()))
            .unwrap()
            .build()
            .await
            .unwrap();

        let install = read(out.join("docs/installation/index.html"));
        assert!(install.contains("<title>Installation | Multicommand</title>"));
        assert!(install.contains(r#"<h2 id="using-pip">Using pip</h2>"#));
        assert!(install.contains(r#"<a href="/docs/introduction/">introduction</a>"#));
        assert!(install.contains(
            "https://github.com/andrewrosss/multicommand/tree/master/docs/docs/installation.md"
        ));

        let intro = read(out.join("docs/introduction/index.html"));
        assert!(intro.contains(r#"href="/docs/basic-usage/#creating-the-parser""#));

        let simple = read(out.join("docs/examples/simple/index.html"));
        assert!(simple.contains(r#"href="/docs/installation/#using-pip""#));
        assert!(simple.contains(r#"<meta name="description" content="A calculator CLI">"#));
    }

    #[tokio::test]
    async fn sidebar_and_pagination_follow_positions() {
        let temp = fixture();
        let out = temp.path().join("build");

        StaticBuilder::new(config(&temp, multicommand()))
            .unwrap()
            .build()
            .await
            .unwrap();

        let intro = read(out.join("docs/introduction/index.html"));

        let installation = intro.find(">Installation</a>").unwrap();
        let introduction = intro.find(">Introduction</a>").unwrap();
        let examples = intro.find(r#"<span class="menu__category">Examples</span>"#).unwrap();
        assert!(installation < introduction && introduction < examples);

        assert!(intro.contains(r#"pagination-nav__link--prev" href="/docs/installation/""#));
        assert!(intro.contains(r#"pagination-nav__link--next" href="/docs/basic-usage/""#));

        let install = read(out.join("docs/installation/index.html"));
        assert!(!install.contains("pagination-nav__link--prev"));

        // The category comes last, so its doc ends the sequence
        let simple = read(out.join("docs/examples/simple/index.html"));
        assert!(simple.contains(r#"pagination-nav__link--prev" href="/docs/basic-usage/""#));
        assert!(!simple.contains("pagination-nav__link--next"));
    }

    #[tokio::test]
    async fn generates_sitemap_and_robots() {
        let temp = fixture();
        let out = temp.path().join("build");

        StaticBuilder::new(config(&temp, multicommand()))
            .unwrap()
            .build()
            .await
            .unwrap();

        let sitemap = fs::read_to_string(out.join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("<loc>https://andrewrosss.github.io/</loc>"));
        assert!(sitemap.contains("<loc>https://andrewrosss.github.io/docs/basic-usage/</loc>"));

        let robots = fs::read_to_string(out.join("robots.txt")).unwrap();
        assert!(robots.contains("Sitemap: https://andrewrosss.github.io/sitemap.xml"));
    }

    #[tokio::test]
    async fn dangling_link_aborts_under_fail_policy() {
        let temp = fixture();
        let out = temp.path().join("build");
        let mut site = multicommand();
        site.navbar.items[0].target = LinkTarget::Doc("changelog".to_string());

        let err = StaticBuilder::new(config(&temp, site))
            .unwrap()
            .build()
            .await
            .unwrap_err();

        match err {
            BuildError::BrokenLinks(e) => {
                assert_eq!(e.links.len(), 1);
                assert_eq!(e.links[0].source, "navbar");
                assert_eq!(e.links[0].target, "doc `changelog`");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!out.join("index.html").exists());
    }

    #[tokio::test]
    async fn dangling_link_is_tolerated_under_warn_policy() {
        let temp = fixture();
        let out = temp.path().join("build");
        let mut site = multicommand();
        site.navbar.items[0].target = LinkTarget::Doc("changelog".to_string());
        site.on_broken_links = BrokenLinkPolicy::Warn;

        let result = StaticBuilder::new(config(&temp, site))
            .unwrap()
            .build()
            .await
            .unwrap();

        assert_eq!(result.broken_links, 1);
        let html = read(out.join("index.html"));
        assert!(html.contains(r#"href="/docs/changelog/">Docs</a>"#));
    }

    #[tokio::test]
    async fn missing_tutorial_doc_breaks_home_page() {
        let temp = fixture();
        fs::remove_file(temp.path().join("docs/basic-usage.md")).unwrap();
        let mut site = multicommand();
        site.on_broken_markdown_links = BrokenLinkPolicy::Ignore;

        let err = StaticBuilder::new(config(&temp, site))
            .unwrap()
            .check()
            .await
            .unwrap_err();

        let BuildError::BrokenLinks(e) = err else {
            panic!("expected broken links");
        };
        let sources: Vec<_> = e.links.iter().map(|l| l.source.as_str()).collect();
        assert_eq!(sources, ["footer (DOCUMENTATION)", "home page"]);
    }

    #[tokio::test]
    async fn markdown_links_follow_their_own_policy() {
        let temp = fixture();
        fs::write(
            temp.path().join("docs/introduction.md"),
            "# Introduction\n\nSee [the FAQ](./faq.md).\n",
        )
        .unwrap();

        let report = StaticBuilder::new(config(&temp, multicommand()))
            .unwrap()
            .check()
            .await
            .unwrap();
        assert_eq!(report.docs, 4);
        assert_eq!(report.broken_links, 1);

        let mut strict = multicommand();
        strict.on_broken_markdown_links = BrokenLinkPolicy::Fail;
        let err = StaticBuilder::new(config(&temp, strict))
            .unwrap()
            .check()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("./faq.md (linked from introduction.md:3)"));
    }

    #[tokio::test]
    async fn rejects_duplicate_doc_ids() {
        let temp = fixture();
        fs::write(
            temp.path().join("docs/intro-copy.md"),
            "---\nid: introduction\n---\n# Copy\n",
        )
        .unwrap();

        let err = StaticBuilder::new(config(&temp, multicommand()))
            .unwrap()
            .check()
            .await
            .unwrap_err();

        assert!(matches!(err, BuildError::DuplicateDoc { ref id, .. } if id == "introduction"));
    }

    #[tokio::test]
    async fn repeated_headings_render_distinct_ids() {
        let temp = fixture();
        let out = temp.path().join("build");
        fs::write(
            temp.path().join("docs/basic-usage.md"),
            "# Basic Usage\n\n## Example\n\nOne.\n\n## Example\n\nTwo.\n",
        )
        .unwrap();

        StaticBuilder::new(config(&temp, multicommand()))
            .unwrap()
            .build()
            .await
            .unwrap();

        let html = read(out.join("docs/basic-usage/index.html"));
        assert!(html.contains(r#"<h2 id="example">Example</h2>"#));
        assert!(html.contains(r#"<h2 id="example-1">Example</h2>"#));
        assert!(html.contains(r##"<a href="#example-1">Example</a>"##));
    }

    #[tokio::test]
    async fn rejects_two_docs_on_one_route() {
        let temp = fixture();
        let out = temp.path().join("build");
        let docs = temp.path().join("docs");
        fs::write(docs.join("examples.md"), "# Examples overview\n").unwrap();
        fs::write(docs.join("examples/index.md"), "# Examples index\n").unwrap();

        let err = StaticBuilder::new(config(&temp, multicommand()))
            .unwrap()
            .build()
            .await
            .unwrap_err();

        match err {
            BuildError::DuplicateRoute { route, path, existing } => {
                assert_eq!(route, "/docs/examples");
                let mut files = [path, existing];
                files.sort();
                assert!(files[0].ends_with("examples.md"));
                assert!(files[1].ends_with("index.md"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!out.join("docs/examples/index.html").exists());
    }

    #[tokio::test]
    async fn rejects_shared_slug() {
        let temp = fixture();
        fs::write(
            temp.path().join("docs/setup.md"),
            "---\nslug: /installation\n---\n# Setup\n",
        )
        .unwrap();

        let err = StaticBuilder::new(config(&temp, multicommand()))
            .unwrap()
            .check()
            .await
            .unwrap_err();

        assert!(matches!(err, BuildError::DuplicateRoute { ref route, .. } if route == "/docs/installation"));
    }

    #[tokio::test]
    async fn errors_without_docs_dir() {
        let temp = tempdir().unwrap();

        let err = StaticBuilder::new(config(&temp, multicommand()))
            .unwrap()
            .build()
            .await
            .unwrap_err();

        assert!(matches!(err, BuildError::ReadError(_)));
    }

    #[test]
    fn derives_doc_ids() {
        let plain = parse_doc("# Simple").unwrap();
        let with_id = parse_doc("---\nid: calc\n---\n# Simple").unwrap();

        assert_eq!(doc_id("examples/simple.md", &plain), "examples/simple");
        assert_eq!(doc_id("examples/simple.md", &with_id), "examples/calc");
        assert_eq!(doc_id("installation.mdx", &plain), "installation");
        assert_eq!(doc_id("intro.md", &with_id), "calc");
    }

    #[test]
    fn index_docs_route_to_their_directory() {
        let temp = tempdir().unwrap();
        let builder = StaticBuilder::new(config(&temp, multicommand())).unwrap();
        let plain = parse_doc("# Docs").unwrap();
        let slugged = parse_doc("---\nslug: /getting-started\n---\n").unwrap();

        assert_eq!(builder.doc_route("index", &plain), "/docs");
        assert_eq!(builder.doc_route("examples/index", &plain), "/docs/examples");
        assert_eq!(builder.doc_route("installation", &slugged), "/docs/getting-started");
    }
}
