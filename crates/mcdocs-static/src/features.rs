//! Feature list shown on the home page.

use serde::Serialize;

/// Trusted HTML authored in this repository.
///
/// Rendered exactly once, without escaping or sanitizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Markup<'a>(&'a str);

impl<'a> Markup<'a> {
    pub const fn new(html: &'a str) -> Self {
        Self(html)
    }

    pub fn as_str(&self) -> &'a str {
        self.0
    }
}

/// One selling point of the library. List order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureEntry<'a> {
    pub title: &'a str,
    pub description: Markup<'a>,
}

impl<'a> FeatureEntry<'a> {
    pub const fn new(title: &'a str, description: &'a str) -> Self {
        Self {
            title,
            description: Markup::new(description),
        }
    }
}

/// The Multicommand feature list.
pub const FEATURES: [FeatureEntry<'static>; 3] = [
    FeatureEntry::new(
        "Small",
        r#"The magic happens in a single module (<a href="https://github.com/andrewrosss/multicommand/blob/master/src/multicommand.py"><code>multicommand.py</code></a>)"#,
    ),
    FeatureEntry::new(
        "Simple API",
        "Structure commands however you like, then call <code>multicommand.create_parser(...)</code>.",
    ),
    FeatureEntry::new(
        "Dependency-Free",
        "All you need is python 3.6+. <code>multicommand</code> uses just the standard library.",
    ),
];

/// Grid column class of every feature block (three per row).
pub const FEATURE_COLUMN_CLASS: &str = "col col--4";

/// A feature ready for the `features.html` template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureBlock<'a> {
    pub title: &'a str,
    pub description: Markup<'a>,
    pub class: &'static str,
}

/// Map each entry to one block, keeping order.
pub fn render_features<'a>(entries: &[FeatureEntry<'a>]) -> Vec<FeatureBlock<'a>> {
    entries
        .iter()
        .map(|entry| FeatureBlock {
            title: entry.title,
            description: entry.description,
            class: FEATURE_COLUMN_CLASS,
        })
        .collect()
}
