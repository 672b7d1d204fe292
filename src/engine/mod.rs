//! 过滤 / 排序 / 分页引擎，对条目类型泛型。

pub mod facets;
pub mod filter;
pub mod item;
pub mod paginate;
pub mod sort;

pub use facets::{facet_options, find_option, prune_departments, FacetOptions};
pub use filter::Filter;
pub use item::CatalogItem;
pub use paginate::{paginate, PageInfo};
pub use sort::{sort_items, CommerceSort, ProducerSort, SortOrder, UnknownSortKey};

/// 一次计算的输入
#[derive(Debug, Clone)]
pub struct Query<'a, S> {
    pub text: &'a str,
    pub region: &'a str,
    pub departments: &'a [String],
    pub sort: S,
    pub page: usize,
    pub page_size: usize,
}

#[derive(Debug, Clone)]
pub struct QueryResult<T> {
    /// 当前页的条目
    pub items: Vec<T>,
    pub page: PageInfo,
    pub facets: FacetOptions,
}

/// 过滤 → 排序 → 分页，同时给出按地区约束的分面选项。
pub fn run_query<T, S>(items: &[T], query: &Query<'_, S>) -> QueryResult<T>
where
    T: CatalogItem + Clone,
    S: SortOrder<T>,
{
    let filter = Filter::new(query.text, query.region, query.departments);
    let mut matched = filter.apply(items);
    sort_items(&mut matched, query.sort);
    let page = PageInfo::new(matched.len(), query.page_size, query.page);
    QueryResult {
        items: matched[page.range()].iter().map(|item| (*item).clone()).collect(),
        page,
        facets: facet_options(items, query.region),
    }
}
