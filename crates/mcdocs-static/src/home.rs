//! Home page composition: hero header followed by the feature grid.

use crate::config::{Logo, SiteConfig};
use crate::features::{render_features, FeatureBlock, FeatureEntry};
use crate::links::LinkTarget;

/// Route of the tutorial the "Tutorial" button opens.
pub const TUTORIAL_ROUTE: &str = "/docs/basic-usage";

/// Route of the installation guide the "Install" button opens.
pub const INSTALL_ROUTE: &str = "/docs/installation";

/// A button in the hero header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroLink {
    pub label: &'static str,
    pub target: LinkTarget,
    pub class: &'static str,
}

/// The two hero buttons, in display order.
pub fn hero_links() -> [HeroLink; 2] {
    [
        HeroLink {
            label: "Tutorial",
            target: LinkTarget::Path(TUTORIAL_ROUTE.to_string()),
            class: "button button--outline button--secondary button--lg",
        },
        HeroLink {
            label: "Install",
            target: LinkTarget::Path(INSTALL_ROUTE.to_string()),
            class: "button button--secondary button--lg",
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeHeader<'a> {
    pub title: &'a str,
    pub tagline: &'a str,
    pub logo: Option<&'a Logo>,
    pub links: [HeroLink; 2],
}

/// Everything the home page shows, built fresh for each render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView<'a> {
    /// `<title>` of the page
    pub layout_title: &'a str,
    /// Meta description
    pub description: &'a str,
    pub header: HomeHeader<'a>,
    pub features: Vec<FeatureBlock<'a>>,
}

/// Compose the home page from the site config and the feature list.
pub fn compose_home<'a>(config: &'a SiteConfig, features: &[FeatureEntry<'a>]) -> PageView<'a> {
    PageView {
        layout_title: &config.title,
        description: &config.tagline,
        header: HomeHeader {
            title: &config.title,
            tagline: &config.tagline,
            logo: config.navbar.logo.as_ref(),
            links: hero_links(),
        },
        features: render_features(features),
    }
}
