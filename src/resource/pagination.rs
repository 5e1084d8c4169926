//! Pagination slicing for collection listings.
//!
//! Pages are 1-based. A missing, non-numeric, or below-1 page parameter
//! behaves as page 1; an offset past the end of the result set yields an
//! empty page rather than an error.

/// Compute the start offset for a requested page.
pub fn page_offset(raw_page: Option<&str>, page_size: usize) -> usize {
    let page = raw_page
        .and_then(|p| p.trim().parse::<i64>().ok())
        .unwrap_or(1)
        .max(1);
    (page as usize - 1).saturating_mul(page_size)
}

/// Take one page out of the full result set.
pub fn slice_page<T>(results: Vec<T>, offset: usize, page_size: usize) -> Vec<T> {
    results.into_iter().skip(offset).take(page_size).collect()
}
