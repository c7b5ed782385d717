use crate::models::PageView;

pub const PAGE_SIZE: usize = 5;

pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size)
}

/// Clamp to `[1, total_pages]`. With no pages at all the answer is still 1.
pub fn clamp_page(requested: usize, total_pages: usize) -> usize {
    requested.clamp(1, total_pages.max(1))
}

pub fn paginate<T: Clone>(items: &[T], requested_page: usize, page_size: usize) -> PageView<T> {
    let total_items = items.len();
    let total_pages = total_pages(total_items, page_size);
    let page = clamp_page(requested_page, total_pages);

    let start = (page - 1).saturating_mul(page_size).min(total_items);
    let end = start.saturating_add(page_size).min(total_items);

    PageView {
        items: items[start..end].to_vec(),
        page,
        page_size,
        total_items,
        total_pages,
        scroll_to_top: true,
    }
}
