//! Pagination over a clause set's filters.
//!
//! State is computed once at construction from a snapshot of the current
//! filters — the total is not recomputed if the clause set changes
//! afterward.

use crate::error::{WeftError, WeftResult};
use crate::model::Model;
use crate::query::Query;

/// One page marker in a rendered link window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLink {
    pub page: u64,
    pub current: bool,
}

/// Computed pagination state for one query.
#[derive(Debug, Clone, Copy)]
pub struct Paginate {
    current_page: u64,
    per_page: u64,
    total: u64,
    pages: u64,
    offset: u64,
}

impl Paginate {
    /// Compute pagination for the given clause set and write the derived
    /// offset back into it.
    ///
    /// The clause set must already carry a limit; the total is taken from
    /// a `count(*)` over the same filters. `page` is 1-based and clamped
    /// up to 1.
    pub async fn new(model: &Model<'_>, query: &mut Query, page: u64) -> WeftResult<Self> {
        let per_page = query.limit_value().ok_or(WeftError::MissingLimit)?;
        let total = model.count(query).await?.max(0) as u64;

        let current_page = page.max(1);
        let offset = (current_page - 1) * per_page;
        query.offset(offset);

        Ok(Self {
            current_page,
            per_page,
            total,
            pages: total.div_ceil(per_page),
            offset,
        })
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Total page count: `ceil(total / per_page)`, 0 when there are no
    /// records.
    pub fn pages(&self) -> u64 {
        self.pages
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// A bounded window of page markers centered on the current page,
    /// clipped to `[1, pages]`.
    pub fn links(&self, links_per_page: u64) -> Vec<PageLink> {
        let start = self
            .current_page
            .saturating_sub(links_per_page / 2)
            .max(1);
        let end = (start + links_per_page.saturating_sub(1)).min(self.pages);

        (start..=end)
            .map(|page| PageLink {
                page,
                current: page == self.current_page,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paginate(current_page: u64, per_page: u64, total: u64) -> Paginate {
        Paginate {
            current_page,
            per_page,
            total,
            pages: total.div_ceil(per_page),
            offset: (current_page - 1) * per_page,
        }
    }

    #[test]
    fn test_offset_and_page_count() {
        let p = paginate(3, 10, 25);
        assert_eq!(p.offset(), 20);
        assert_eq!(p.pages(), 3);
    }

    #[test]
    fn test_first_page_has_no_offset() {
        let p = paginate(1, 10, 95);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.pages(), 10);
    }

    #[test]
    fn test_zero_total_means_zero_pages() {
        let p = paginate(1, 10, 0);
        assert_eq!(p.pages(), 0);
        assert!(p.links(5).is_empty());
    }

    #[test]
    fn test_links_center_on_current_page() {
        let p = paginate(5, 10, 100);
        let pages: Vec<u64> = p.links(5).iter().map(|l| l.page).collect();
        assert_eq!(pages, vec![3, 4, 5, 6, 7]);
        assert!(p.links(5)[2].current);
    }

    #[test]
    fn test_links_clip_at_start() {
        let p = paginate(1, 10, 100);
        let pages: Vec<u64> = p.links(5).iter().map(|l| l.page).collect();
        assert_eq!(pages, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_links_clip_at_end() {
        let p = paginate(10, 10, 100);
        let pages: Vec<u64> = p.links(5).iter().map(|l| l.page).collect();
        assert_eq!(pages, vec![8, 9, 10]);
    }
}
