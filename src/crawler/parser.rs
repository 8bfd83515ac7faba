//! Path queries over parsed HTML
//!
//! Queries are CSS selectors, optionally followed by one XPath-style
//! projection step:
//!
//! | Query | Selects |
//! |-------|---------|
//! | `ul.results a` | matching elements (their text, as values) |
//! | `ul.results a/@href` | the `href` attribute of matching elements |
//! | `h1.title/text()` | the text content of matching elements |
//!
//! Query problems are returned as [`QueryError`] values; nothing here panics
//! on user input.

use crate::crawler::FetchResult;
use crate::output::StatusMessage;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

const TEXT_STEP: &str = "/text()";
const ATTRIBUTE_STEP: &str = "/@";

/// Status reported once a page has been turned into a tree
pub const PARSED_MESSAGE: &str = "Page document parsed successfully.";

/// Errors that can occur while compiling a query
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("empty query")]
    Empty,

    #[error("invalid selector in '{query}': {message}")]
    InvalidSelector { query: String, message: String },

    #[error("invalid attribute step in '{query}'")]
    InvalidAttribute { query: String },
}

/// What a query yields for each matched element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    Element,
    Attribute(String),
    Text,
}

/// How many matches to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchCount {
    All,
    First,
}

/// A compiled query
#[derive(Debug, Clone)]
pub struct PathQuery {
    selector: Selector,
    projection: Projection,
}

impl PathQuery {
    pub fn parse(query: &str) -> Result<Self, QueryError> {
        let trimmed = query.trim();

        let (selector_part, projection) = match last_step(trimmed) {
            Some(index) if &trimmed[index..] == TEXT_STEP => (&trimmed[..index], Projection::Text),
            Some(index) if trimmed[index..].starts_with(ATTRIBUTE_STEP) => {
                let name = &trimmed[index + ATTRIBUTE_STEP.len()..];
                if name.is_empty()
                    || !name
                        .chars()
                        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == ':')
                {
                    return Err(QueryError::InvalidAttribute {
                        query: query.to_string(),
                    });
                }
                (&trimmed[..index], Projection::Attribute(name.to_string()))
            }
            _ => (trimmed, Projection::Element),
        };

        let selector_part = selector_part.trim();
        if selector_part.is_empty() {
            return Err(QueryError::Empty);
        }

        let selector = Selector::parse(selector_part).map_err(|e| QueryError::InvalidSelector {
            query: query.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            selector,
            projection,
        })
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Elements matched by the selector part, in document order
    pub fn select<'a>(&self, tree: &'a Html) -> Vec<ElementRef<'a>> {
        tree.select(&self.selector).collect()
    }

    /// Projected values; blank values are dropped
    pub fn values(&self, tree: &Html, count: MatchCount) -> Vec<String> {
        let values = tree
            .select(&self.selector)
            .filter_map(|element| self.project(element))
            .filter(|value| !value.is_empty());

        match count {
            MatchCount::All => values.collect(),
            MatchCount::First => values.take(1).collect(),
        }
    }

    fn project(&self, element: ElementRef<'_>) -> Option<String> {
        match &self.projection {
            Projection::Attribute(name) => element.value().attr(name).map(|v| v.trim().to_string()),
            Projection::Element | Projection::Text => {
                Some(element.text().collect::<String>().trim().to_string())
            }
        }
    }
}

/// Byte index of the last `/` outside attribute brackets and quoted strings
fn last_step(query: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote = None;
    let mut last = None;

    for (index, c) in query.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, '/') if depth == 0 => last = Some(index),
            _ => {}
        }
    }

    last
}

/// Parses raw HTML into a document tree
pub fn parse_document(html: &str) -> Html {
    Html::parse_document(html)
}

/// Parses the body of a fetch result into a document tree
pub fn parse_tree(page: &FetchResult) -> Html {
    let tree = parse_document(&page.page_doc);
    tracing::debug!("Page document for {} parsed successfully", page.url);
    StatusMessage::success(PARSED_MESSAGE).with_url(&page.url).emit();
    tree
}

/// Returns every element matched by `query`
///
/// A projection step in the query does not change which elements match.
pub fn extract_all<'a>(tree: &'a Html, query: &str) -> Result<Vec<ElementRef<'a>>, QueryError> {
    Ok(PathQuery::parse(query)?.select(tree))
}

/// Returns the first element matched by `query`, if any
pub fn extract_first<'a>(tree: &'a Html, query: &str) -> Result<Option<ElementRef<'a>>, QueryError> {
    let query = PathQuery::parse(query)?;
    Ok(tree.select(&query.selector).next())
}

/// Evaluates `query` and returns its projected string values
pub fn select_values(tree: &Html, query: &str, count: MatchCount) -> Result<Vec<String>, QueryError> {
    Ok(PathQuery::parse(query)?.values(tree, count))
}
