//! Markdown doc parser with frontmatter, heading and link extraction.
//!
//! This crate parses the documentation sources of the site: YAML frontmatter,
//! the table of contents and every outgoing link, so the site builder can
//! resolve doc ids and check links before rendering.

pub mod frontmatter;
pub mod parser;

pub use frontmatter::{Frontmatter, FrontmatterError};
pub use parser::{markdown_options, parse_doc, slugify, DocLink, ParseError, ParsedDoc, TocEntry};
