//! Pagination math.

#![forbid(unsafe_code)]

/// Half-open slice of the filtered list for one page, plus the number of
/// filler rows needed to pad the last page to a uniform height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub start: usize,
    pub end: usize,
    pub empty_rows: usize,
}

/// Clamp a page index so the window never runs more than one page past the
/// filtered count.
pub fn clamp_page(filtered: usize, page: usize, size: usize) -> usize {
    if filtered == 0 || size == 0 {
        return 0;
    }
    page.min((filtered - 1) / size)
}

pub fn window(filtered: usize, page: usize, size: usize) -> PageWindow {
    let page = clamp_page(filtered, page, size);
    let start = page * size;
    let end = (start + size).min(filtered);
    let empty_rows = ((page + 1) * size).saturating_sub(filtered);
    PageWindow { start, end, empty_rows }
}
