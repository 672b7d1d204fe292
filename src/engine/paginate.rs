use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// 生效页码（从 1 开始，已夹紧到 `1..=total_pages`）
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
}

impl PageInfo {
    pub fn new(total_items: usize, page_size: usize, requested: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_items.div_ceil(page_size).max(1);
        Self {
            page: requested.clamp(1, total_pages),
            total_pages,
            total_items,
            page_size,
        }
    }

    pub fn range(&self) -> Range<usize> {
        let start = ((self.page - 1) * self.page_size).min(self.total_items);
        let end = (self.page * self.page_size).min(self.total_items);
        start..end
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

impl Default for PageInfo {
    fn default() -> Self {
        Self::new(0, 1, 1)
    }
}

pub fn paginate<T: Clone>(items: &[T], requested: usize, page_size: usize) -> (Vec<T>, PageInfo) {
    let info = PageInfo::new(items.len(), page_size, requested);
    (items[info.range()].to_vec(), info)
}
