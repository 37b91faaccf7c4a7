//! Document assembly – joins page fragments with explicit page breaks.

use std::fmt;

use crate::binder::Fragment;

/// Marker placed between consecutive pages; print engines break the page
/// after it.
pub const PAGE_BREAK: &str = r#"<div style="page-break-after: always"></div>"#;

/// The full catalog markup handed to a renderer.
///
/// Page boundaries are kept as byte ranges into the markup, so fragments
/// whose own text contains [`PAGE_BREAK`] are never split apart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    markup: String,
    pages: Vec<(usize, usize)>,
}

impl Document {
    pub fn as_str(&self) -> &str {
        &self.markup
    }

    pub fn into_string(self) -> String {
        self.markup
    }

    /// Number of fragments the document was assembled from.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// True when no page was assembled.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// The markup of each page, in order, without separators.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|&(start, end)| &self.markup[start..end])
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.markup)
    }
}

/// Concatenate `fragments` in order with [`PAGE_BREAK`] between neighbours.
///
/// No fragments yield an empty document; a single fragment is returned as-is
/// with no trailing separator.
pub fn assemble<I>(fragments: I) -> Document
where
    I: IntoIterator<Item = Fragment>,
{
    let mut markup = String::new();
    let mut pages = Vec::new();
    for fragment in fragments {
        if !pages.is_empty() {
            markup.push_str(PAGE_BREAK);
        }
        let start = markup.len();
        markup.push_str(fragment.as_str());
        pages.push((start, markup.len()));
    }
    Document { markup, pages }
}
