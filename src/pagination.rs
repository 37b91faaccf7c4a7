//! Pagination – splits an ordered record set into fixed-capacity pages.
//!
//! The split is a stable partition: concatenating every page's records in
//! page order reproduces the input exactly. Pages borrow the input slice.

use crate::error::{CatalogError, Result};
use crate::record::Record;

/// Default number of products per catalog page (a 3×3 grid).
pub const DEFAULT_ITEMS_PER_PAGE: usize = 9;

/// One page of records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a> {
    /// 1-based position among all pages of the run.
    pub number: usize,
    pub records: &'a [Record],
}

impl<'a> Page<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Validate a capacity coming from the outside world.
///
/// Accepts a signed value so that negative input is reported as a
/// configuration error rather than wrapping.
pub fn capacity_from(value: i64) -> Result<usize> {
    match usize::try_from(value) {
        Ok(c) if c > 0 => Ok(c),
        _ => Err(CatalogError::InvalidCapacity { capacity: value }),
    }
}

/// Number of pages needed for `len` records at `capacity` per page.
pub fn page_count(len: usize, capacity: usize) -> usize {
    len.div_ceil(capacity)
}

/// Split `records` into pages of at most `capacity` records.
///
/// Zero records produce zero pages. A capacity of zero is rejected before
/// anything is split.
pub fn paginate(records: &[Record], capacity: usize) -> Result<Vec<Page<'_>>> {
    if capacity == 0 {
        return Err(CatalogError::InvalidCapacity { capacity: 0 });
    }

    log::info!(
        "Splitting {} products into pages of {} items",
        records.len(),
        capacity
    );

    let pages: Vec<Page<'_>> = records
        .chunks(capacity)
        .enumerate()
        .map(|(i, chunk)| Page {
            number: i + 1,
            records: chunk,
        })
        .collect();

    debug_assert_eq!(pages.len(), page_count(records.len(), capacity));
    log::info!("Created {} pages", pages.len());
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| Record::from_pairs([("name", format!("product {i}"))]))
            .collect()
    }

    #[test]
    fn exact_fit_is_single_page() {
        let recs = records(9);
        let pages = paginate(&recs, 9).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[0].len(), 9);
    }

    #[test]
    fn overflow_starts_new_page() {
        let recs = records(10);
        let pages = paginate(&recs, 9).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].len(), 9);
        assert_eq!(pages[1].len(), 1);
        assert_eq!(pages[1].number, 2);
        assert_eq!(pages[1].records[0], recs[9]);
    }

    #[test]
    fn no_records_no_pages() {
        assert!(paginate(&[], 9).unwrap().is_empty());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let recs = records(3);
        assert!(matches!(
            paginate(&recs, 0),
            Err(CatalogError::InvalidCapacity { capacity: 0 })
        ));
    }

    #[test]
    fn capacity_from_rejects_non_positive() {
        assert_eq!(capacity_from(9).unwrap(), 9);
        assert!(matches!(
            capacity_from(-3),
            Err(CatalogError::InvalidCapacity { capacity: -3 })
        ));
        assert!(capacity_from(0).is_err());
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 9), 0);
        assert_eq!(page_count(1, 9), 1);
        assert_eq!(page_count(18, 9), 2);
        assert_eq!(page_count(19, 9), 3);
    }
}
