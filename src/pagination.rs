//! Fixed-size paging over an already ordered result set.

pub const QUESTIONS_PER_PAGE: usize = 10;

/// Returns the `page_number`-th page (1-based) of `items`.
///
/// Page numbers below 1 are treated as 1. A page past the end of `items` is
/// empty; callers decide whether that means "not found".
pub fn select_page<T>(items: &[T], page_number: i64, page_size: usize) -> &[T] {
    let page = usize::try_from(page_number.max(1)).unwrap_or(usize::MAX);
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}
