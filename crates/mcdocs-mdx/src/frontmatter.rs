//! Frontmatter extraction and parsing.

use serde::Deserialize;

/// Parsed frontmatter from a doc file.
///
/// Every field is optional: a doc without frontmatter takes its id from its
/// path and its title from its first heading.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Frontmatter {
    /// Doc id override (defaults to the path relative to the docs dir)
    #[serde(default)]
    pub id: Option<String>,

    /// Page title
    #[serde(default)]
    pub title: Option<String>,

    /// Page description for the meta tag
    #[serde(default)]
    pub description: Option<String>,

    /// Label shown in the sidebar instead of the title
    #[serde(default)]
    pub sidebar_label: Option<String>,

    /// Position in the sidebar (lower = first)
    #[serde(default)]
    pub sidebar_position: Option<i32>,

    /// Custom route override, relative to the docs route base
    #[serde(default)]
    pub slug: Option<String>,
}

/// Extract frontmatter from doc content.
///
/// Returns the parsed frontmatter and the remaining content after the frontmatter block.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Ok((None, source));
    }

    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    // serde_yaml rejects an empty document
    let frontmatter = if yaml_content.is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(yaml_content)
            .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?
    };

    Ok((Some(frontmatter), remaining.trim_start()))
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),
}
