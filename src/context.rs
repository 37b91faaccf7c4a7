//! Page contexts – the variable namespace each page is rendered with.

use serde::Serialize;

use crate::pagination::Page;
use crate::record::Record;

/// Names a template may reference outside any loop.
pub const ITEMS: &str = "items";
pub const PAGE_NUMBER: &str = "page_number";
pub const TOTAL_PAGES: &str = "total_pages";

/// Everything a template sees while rendering one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageContext<'a> {
    /// The page's records, untouched.
    pub items: &'a [Record],
    /// Zero-padded display number ("01", "02", ...).
    pub page_number: String,
    pub total_pages: usize,
}

impl<'a> PageContext<'a> {
    /// Derive the context of `page` in a run of `total_pages` pages.
    pub fn new(page: &Page<'a>, total_pages: usize) -> Self {
        Self {
            items: page.records,
            page_number: format_page_number(page.number),
            total_pages,
        }
    }
}

/// Format a 1-based page position for display: at least two digits,
/// never truncated.
pub fn format_page_number(number: usize) -> String {
    format!("{number:02}")
}

/// Build one context per page, in page order.
pub fn build_contexts<'a>(pages: &[Page<'a>]) -> Vec<PageContext<'a>> {
    let total = pages.len();
    pages.iter().map(|p| PageContext::new(p, total)).collect()
}
