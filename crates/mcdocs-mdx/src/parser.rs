//! Markdown doc parser.

use std::collections::HashSet;

use pulldown_cmark::{Event, HeadingLevel, LinkType, Options, Parser, Tag, TagEnd};

use crate::frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};

/// Markdown extensions enabled for both parsing and rendering.
pub fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// A parsed doc.
#[derive(Debug, Clone)]
pub struct ParsedDoc {
    /// Parsed frontmatter (if present)
    pub frontmatter: Option<Frontmatter>,

    /// Markdown content (without frontmatter)
    pub content: String,

    /// Text of the first level-1 heading
    pub heading: Option<String>,

    /// Table of contents entries
    pub toc: Vec<TocEntry>,

    /// Outgoing links in document order
    pub links: Vec<DocLink>,
}

impl ParsedDoc {
    /// Frontmatter title, falling back to the first H1.
    pub fn title(&self) -> Option<&str> {
        self.frontmatter
            .as_ref()
            .and_then(|f| f.title.as_deref())
            .or(self.heading.as_deref())
    }
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// A link found in the doc body.
#[derive(Debug, Clone, PartialEq)]
pub struct DocLink {
    /// Destination as written
    pub dest: String,
    /// 1-based line in the source file (frontmatter included)
    pub line: usize,
}

/// Errors that can occur when parsing a doc.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

/// Parse a markdown doc.
///
/// Extracts frontmatter, headings and links.
pub fn parse_doc(source: &str) -> Result<ParsedDoc, ParseError> {
    let (frontmatter, content) = extract_frontmatter(source)?;

    // Lines consumed by the frontmatter block
    let line_offset = source[..source.len() - content.len()].matches('\n').count();

    let mut toc = Vec::new();
    let mut links = Vec::new();
    let mut heading = None;
    let mut anchors = HashSet::new();
    let mut current_heading: Option<(u8, String)> = None;

    let parser = Parser::new_ext(content, markdown_options()).into_offset_iter();

    for (event, range) in parser {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current_heading = Some((heading_level(level), String::new()));
            }

            Event::Text(text) | Event::Code(text) => {
                if let Some((_, ref mut heading_text)) = current_heading {
                    heading_text.push_str(&text);
                }
            }

            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = current_heading.take() {
                    if level == 1 && heading.is_none() {
                        heading = Some(title.clone());
                    }
                    let id = unique_anchor(slugify(&title), &mut anchors);
                    toc.push(TocEntry { title, id, level });
                }
            }

            Event::Start(Tag::Link {
                link_type,
                dest_url,
                ..
            }) => {
                if link_type == LinkType::Email {
                    continue;
                }
                let line = line_offset + content[..range.start].matches('\n').count() + 1;
                links.push(DocLink {
                    dest: dest_url.to_string(),
                    line,
                });
            }

            _ => {}
        }
    }

    Ok(ParsedDoc {
        frontmatter,
        content: content.to_string(),
        heading,
        toc,
        links,
    })
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Convert a heading to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Suffix repeated anchors with `-1`, `-2`, ... so every heading id on a page is distinct.
fn unique_anchor(slug: String, taken: &mut HashSet<String>) -> String {
    let mut id = slug.clone();
    let mut n = 1;
    while !taken.insert(id.clone()) {
        id = format!("{slug}-{n}");
        n += 1;
    }
    id
}
