//! Template engine for rendering site pages.

use minijinja::{context, Environment};
use serde::Serialize;

use crate::config::{ItemPosition, Logo, NavbarItem, SiteConfig};
use crate::features::FeatureBlock;
use crate::home::PageView;
use crate::links::{LinkTarget, RouteTable};

/// A rendered link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkView {
    pub label: String,
    pub href: String,
    /// Opens in a new tab
    pub external: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<&'static str>,
}

impl LinkView {
    pub fn new(label: &str, target: &LinkTarget, config: &SiteConfig, routes: &RouteTable) -> Self {
        Self {
            label: label.to_string(),
            href: config.target_href(target, routes),
            external: target.is_external(),
            class: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoView {
    pub alt: String,
    pub src: String,
}

impl LogoView {
    fn new(logo: &Logo, config: &SiteConfig) -> Self {
        Self {
            alt: logo.alt.clone(),
            src: config.asset_href(&logo.src),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FooterGroupView {
    pub title: Option<String>,
    pub links: Vec<LinkView>,
}

/// Page chrome shared by every page: head, navbar and footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub site_title: String,
    pub base_url: String,
    pub favicon: Option<String>,
    pub navbar_title: Option<String>,
    pub logo: Option<LogoView>,
    pub navbar_left: Vec<LinkView>,
    pub navbar_right: Vec<LinkView>,
    pub footer_style: &'static str,
    pub footer_groups: Vec<FooterGroupView>,
    pub copyright: Option<String>,
    /// Stylesheet hrefs, in load order
    pub styles: Vec<String>,
}

impl Layout {
    pub fn new(config: &SiteConfig, routes: &RouteTable, year: i32, styles: Vec<String>) -> Self {
        let (left, right): (Vec<_>, Vec<_>) = config
            .navbar
            .items
            .iter()
            .partition(|item| item.position == ItemPosition::Left);
        let to_views = |items: Vec<&NavbarItem>| -> Vec<LinkView> {
            items
                .into_iter()
                .map(|item| LinkView::new(&item.label, &item.target, config, routes))
                .collect()
        };

        Self {
            site_title: config.title.clone(),
            base_url: config.base_url.clone(),
            favicon: config.favicon.as_deref().map(|f| config.asset_href(f)),
            navbar_title: config.navbar.title.clone(),
            logo: config.navbar.logo.as_ref().map(|l| LogoView::new(l, config)),
            navbar_left: to_views(left),
            navbar_right: to_views(right),
            footer_style: config.footer.style.as_str(),
            footer_groups: config
                .footer
                .links
                .iter()
                .map(|group| FooterGroupView {
                    title: group.title.clone(),
                    links: group
                        .items
                        .iter()
                        .map(|l| LinkView::new(&l.label, &l.target, config, routes))
                        .collect(),
                })
                .collect(),
            copyright: config.copyright(year),
            styles,
        }
    }
}

/// Hero header of the home page with resolved hrefs.
#[derive(Debug, Clone, Serialize)]
pub struct HomeView<'a> {
    pub title: &'a str,
    pub tagline: &'a str,
    pub description: &'a str,
    pub layout_title: &'a str,
    pub logo: Option<LogoView>,
    pub links: Vec<LinkView>,
    pub features: &'a [FeatureBlock<'a>],
}

impl<'a> HomeView<'a> {
    pub fn new(view: &'a PageView<'a>, config: &SiteConfig, routes: &RouteTable) -> Self {
        Self {
            title: view.header.title,
            tagline: view.header.tagline,
            description: view.description,
            layout_title: view.layout_title,
            logo: view.header.logo.map(|l| LogoView::new(l, config)),
            links: view
                .header
                .links
                .iter()
                .map(|link| LinkView {
                    class: Some(link.class),
                    ..LinkView::new(link.label, &link.target, config, routes)
                })
                .collect(),
            features: &view.features,
        }
    }
}

/// A sidebar item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Display title
    pub title: String,
    /// Link href
    pub href: String,
    /// Child items
    pub children: Vec<NavItem>,
    /// Whether this is the active page
    pub active: bool,
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// Context for rendering a doc page.
#[derive(Debug, Clone, Serialize)]
pub struct DocView {
    pub title: String,
    pub description: Option<String>,
    /// Rendered content HTML
    pub content: String,
    pub sidebar: Vec<NavItem>,
    pub toc: Vec<TocEntry>,
    pub edit_url: Option<String>,
    pub previous: Option<LinkView>,
    pub next: Option<LinkView>,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in layout.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();

        env.add_template("macros.html", MACROS_TEMPLATE)?;
        env.add_template("base.html", BASE_TEMPLATE)?;
        env.add_template("features.html", FEATURES_TEMPLATE)?;
        env.add_template("home.html", HOME_TEMPLATE)?;
        env.add_template("doc.html", DOC_TEMPLATE)?;
        env.add_template("404.html", NOT_FOUND_TEMPLATE)?;

        Ok(Self { env })
    }

    /// Render a named template with an arbitrary context.
    pub fn render(&self, template: &str, ctx: minijinja::Value) -> Result<String, minijinja::Error> {
        self.env.get_template(template)?.render(ctx)
    }

    /// Render the home page.
    pub fn render_home(&self, layout: &Layout, home: &HomeView<'_>) -> Result<String, minijinja::Error> {
        self.render(
            "home.html",
            context! {
                layout => layout,
                title => home.layout_title,
                description => home.description,
                hero => home,
                features => home.features,
            },
        )
    }

    /// Render the feature grid on its own.
    pub fn render_features(&self, features: &[FeatureBlock<'_>]) -> Result<String, minijinja::Error> {
        self.render("features.html", context! { features => features })
    }

    /// Render a doc page.
    pub fn render_doc(&self, layout: &Layout, doc: &DocView) -> Result<String, minijinja::Error> {
        self.render(
            "doc.html",
            context! {
                layout => layout,
                title => &doc.title,
                description => &doc.description,
                content => &doc.content,
                sidebar => &doc.sidebar,
                toc => &doc.toc,
                edit_url => &doc.edit_url,
                previous => &doc.previous,
                next => &doc.next,
            },
        )
    }

    /// Render the 404 page.
    pub fn render_not_found(&self, layout: &Layout) -> Result<String, minijinja::Error> {
        self.render(
            "404.html",
            context! {
                layout => layout,
                title => "Page Not Found",
            },
        )
    }
}

const MACROS_TEMPLATE: &str = r##"{% macro link(item, class) -%}
<a class="{{ item.class or class }}" href="{{ item.href }}"{% if item.external %} target="_blank" rel="noopener noreferrer"{% endif %}>{{ item.label }}</a>
{%- endmacro %}"##;

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
{% import "macros.html" as m -%}
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{% if title and title != layout.site_title %}{{ title }} | {% endif %}{{ layout.site_title }}</title>
  {% if description %}<meta name="description" content="{{ description }}">
  {% endif %}{% if layout.favicon %}<link rel="icon" href="{{ layout.favicon }}">
  {% endif %}{% for style in layout.styles %}<link rel="stylesheet" href="{{ style }}">
  {% endfor %}
</head>
<body>
  <nav class="navbar">
    <div class="navbar__inner">
      <div class="navbar__items">
        <a class="navbar__brand" href="{{ layout.base_url }}">
          {%- if layout.logo %}<img class="navbar__logo" src="{{ layout.logo.src }}" alt="{{ layout.logo.alt }}">{% endif %}
          {%- if layout.navbar_title %}<b class="navbar__title">{{ layout.navbar_title }}</b>{% endif -%}
        </a>
        {% for item in layout.navbar_left %}{{ m.link(item, "navbar__item navbar__link") }}
        {% endfor %}
      </div>
      <div class="navbar__items navbar__items--right">
        {% for item in layout.navbar_right %}{{ m.link(item, "navbar__item navbar__link") }}
        {% endfor %}
      </div>
    </div>
  </nav>
  <div class="main-wrapper">
    {% block content %}{% endblock %}
  </div>
  <footer class="footer footer--{{ layout.footer_style }}">
    <div class="container">
      {% if layout.footer_groups %}
      <div class="row footer__links">
        {% for group in layout.footer_groups %}
        <div class="col footer__col">
          {% if group.title %}<div class="footer__title">{{ group.title }}</div>{% endif %}
          <ul class="footer__items">
            {% for item in group.links %}<li class="footer__item">{{ m.link(item, "footer__link-item") }}</li>
            {% endfor %}
          </ul>
        </div>
        {% endfor %}
      </div>
      {% endif %}
      {% if layout.copyright %}<div class="footer__copyright">{{ layout.copyright }}</div>{% endif %}
    </div>
  </footer>
  <script src="{{ layout.base_url }}assets/main.js"></script>
</body>
</html>"##;

const FEATURES_TEMPLATE: &str = r##"<section class="features">
  <div class="container">
    <div class="row">
      {% for feature in features %}
      <div class="{{ feature.class }}">
        <div class="text--center padding-horiz--md">
          <h3>{{ feature.title }}</h3>
          <p>{{ feature.description | safe }}</p>
        </div>
      </div>
      {% endfor %}
    </div>
  </div>
</section>"##;

const HOME_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<header class="hero hero--primary hero-banner">
  <div class="container">
    {% if hero.logo %}<img src="{{ hero.logo.src }}" alt="{{ hero.logo.alt }}" class="shadow--lw hero__image">{% endif %}
    <h1 class="hero__title">{{ hero.title }}</h1>
    <p class="hero__subtitle">{{ hero.tagline }}</p>
    <div class="buttons">
      {% for link in hero.links %}<a class="{{ link.class }}" href="{{ link.href }}">{{ link.label }}</a>
      {% endfor %}
    </div>
  </div>
</header>
<main>
  {% include "features.html" %}
</main>
{% endblock %}"##;

const DOC_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<div class="doc-layout">
  <aside class="doc-sidebar">
    <ul class="menu__list">
    {% for item in sidebar %}
      <li class="menu__list-item{% if item.active %} menu__list-item--active{% endif %}">
        {% if item.children %}
        <span class="menu__category">{{ item.title }}</span>
        <ul class="menu__list">
          {% for child in item.children %}
          <li class="menu__list-item{% if child.active %} menu__list-item--active{% endif %}">
            <a class="menu__link" href="{{ child.href }}">{{ child.title }}</a>
          </li>
          {% endfor %}
        </ul>
        {% else %}
        <a class="menu__link" href="{{ item.href }}">{{ item.title }}</a>
        {% endif %}
      </li>
    {% endfor %}
    </ul>
  </aside>

  <main class="doc-main">
    <article class="markdown">
      {{ content | safe }}
    </article>

    {% if edit_url %}
    <a class="edit-this-page" href="{{ edit_url }}" target="_blank" rel="noopener noreferrer">Edit this page</a>
    {% endif %}

    {% if previous or next %}
    <nav class="pagination-nav">
      {% if previous %}
      <a class="pagination-nav__link pagination-nav__link--prev" href="{{ previous.href }}">
        <div class="pagination-nav__sublabel">Previous</div>
        <div class="pagination-nav__label">{{ previous.label }}</div>
      </a>
      {% endif %}
      {% if next %}
      <a class="pagination-nav__link pagination-nav__link--next" href="{{ next.href }}">
        <div class="pagination-nav__sublabel">Next</div>
        <div class="pagination-nav__label">{{ next.label }}</div>
      </a>
      {% endif %}
    </nav>
    {% endif %}
  </main>

  {% if toc %}
  <aside class="toc">
    <ul>
    {% for entry in toc %}
      <li class="toc-level-{{ entry.level }}">
        <a href="#{{ entry.id }}">{{ entry.title }}</a>
      </li>
    {% endfor %}
    </ul>
  </aside>
  {% endif %}
</div>
{% endblock %}"##;

const NOT_FOUND_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<main class="container not-found">
  <h1 class="hero__title">Page Not Found</h1>
  <p>We could not find what you were looking for.</p>
  <p><a href="{{ layout.base_url }}">Back to {{ layout.site_title }}</a></p>
</main>
{% endblock %}"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MULTICOMMAND_SITE_TOML;
    use crate::features::{render_features, FeatureEntry, FEATURES};
    use crate::home::compose_home;

    /// minijinja escapes `/` in attribute values.
    fn unescape(html: String) -> String {
        html.replace("&#x2f;", "/")
    }

    fn site() -> (SiteConfig, RouteTable) {
        let config = SiteConfig::from_toml_str(MULTICOMMAND_SITE_TOML).unwrap();
        let mut routes = RouteTable::new();
        routes.add_route("/");
        routes.add_doc("installation", "installation.md", "/docs/installation").unwrap();
        routes.add_doc("basic-usage", "basic-usage.md", "/docs/basic-usage").unwrap();
        (config, routes)
    }

    #[test]
    fn builds_layout_from_config() {
        let (config, routes) = site();
        let layout = Layout::new(&config, &routes, 2024, vec!["/assets/main.css".to_string()]);

        assert_eq!(layout.navbar_left.len(), 1);
        assert_eq!(layout.navbar_left[0].href, "/docs/installation/");
        assert_eq!(layout.navbar_right[0].label, "GitHub");
        assert!(layout.navbar_right[0].external);
        assert_eq!(layout.footer_groups.len(), 2);
        assert_eq!(layout.favicon.as_deref(), Some("/img/favicon.svg"));
        assert_eq!(layout.logo.as_ref().map(|l| l.src.as_str()), Some("/img/logo.svg"));
        assert!(layout.copyright.unwrap().contains("2024"));
    }

    #[test]
    fn renders_home_page() {
        let (config, routes) = site();
        let engine = TemplateEngine::new().unwrap();
        let layout = Layout::new(&config, &routes, 2024, vec![]);
        let view = compose_home(&config, &FEATURES);

        let html = unescape(
            engine
                .render_home(&layout, &HomeView::new(&view, &config, &routes))
                .unwrap(),
        );

        assert!(html.contains("<title>Multicommand</title>"));
        assert!(html.contains(r#"<h1 class="hero__title">Multicommand</h1>"#));
        assert!(html.contains("Simple subcommand CLIs with argparse"));
        assert!(html.contains(r#"href="/docs/basic-usage/">Tutorial</a>"#));
        assert!(html.contains(r#"href="/docs/installation/">Install</a>"#));
        assert!(html.contains("button button--outline button--secondary button--lg"));

        let small = html.find("<h3>Small</h3>").unwrap();
        let simple = html.find("<h3>Simple API</h3>").unwrap();
        let free = html.find("<h3>Dependency-Free</h3>").unwrap();
        assert!(small < simple && simple < free);
    }

    #[test]
    fn renders_footer_and_navbar() {
        let (config, routes) = site();
        let engine = TemplateEngine::new().unwrap();
        let layout = Layout::new(&config, &routes, 2024, vec![]);

        let html = unescape(engine.render_not_found(&layout).unwrap());

        assert!(html.contains("<title>Page Not Found | Multicommand</title>"));
        assert!(html.contains(r#"<div class="footer__title">DOCUMENTATION</div>"#));
        assert!(html.contains(r#"href="https://pypi.org/project/multicommand/" target="_blank""#));
        assert!(html.contains("Copyright © 2024 Andrew Ross."));
        assert!(html.contains("footer--dark"));
        assert!(html.contains(r#"<script src="/assets/main.js"></script>"#));
    }

    #[test]
    fn feature_descriptions_pass_through_unescaped_once() {
        let engine = TemplateEngine::new().unwrap();
        let entries = [FeatureEntry::new("Tagged", "Use <code>create_parser</code> &amp; go")];

        let html = engine.render_features(&render_features(&entries)).unwrap();

        assert!(html.contains("<p>Use <code>create_parser</code> &amp; go</p>"));
        assert!(!html.contains("&lt;code&gt;"));
        assert!(!html.contains("&amp;amp;"));
    }

    #[test]
    fn renders_doc_page() {
        let (config, routes) = site();
        let engine = TemplateEngine::new().unwrap();
        let layout = Layout::new(&config, &routes, 2024, vec![]);

        let doc = DocView {
            title: "Installation".to_string(),
            description: None,
            content: "<h1>Installation</h1><p>pip install multicommand</p>".to_string(),
            sidebar: vec![NavItem {
                title: "Installation".to_string(),
                href: "/docs/installation/".to_string(),
                children: vec![],
                active: true,
            }],
            toc: vec![TocEntry {
                title: "Using pip".to_string(),
                id: "using-pip".to_string(),
                level: 2,
            }],
            edit_url: Some("https://github.com/x/edit/installation.md".to_string()),
            previous: None,
            next: Some(LinkView {
                label: "Basic Usage".to_string(),
                href: "/docs/basic-usage/".to_string(),
                external: false,
                class: None,
            }),
        };

        let html = unescape(engine.render_doc(&layout, &doc).unwrap());

        assert!(html.contains("<title>Installation | Multicommand</title>"));
        assert!(html.contains("<p>pip install multicommand</p>"));
        assert!(html.contains("menu__list-item--active"));
        assert!(html.contains("Edit this page"));
        assert!(html.contains(r##"<a href="#using-pip">Using pip</a>"##));
        assert!(html.contains("pagination-nav__link--next"));
        assert!(!html.contains("pagination-nav__link--prev"));
    }

    #[test]
    fn missing_layout_is_an_error() {
        let engine = TemplateEngine::new().unwrap();

        let err = engine.render("blog.html", context! {}).unwrap_err();

        assert_eq!(err.kind(), minijinja::ErrorKind::TemplateNotFound);
    }
}
