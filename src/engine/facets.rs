//! 级联分面：省份选项受当前地区约束。

use super::filter::Filter;
use super::item::CatalogItem;
use crate::catalog::build_facet_options;
use crate::collate;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetOptions {
    pub regions: Vec<String>,
    pub departments: Vec<String>,
}

/// 地区选项覆盖整个集合；省份选项只来自地区范围内的子集（未选地区时同样覆盖全集）。
/// 全文搜索不影响选项。
pub fn facet_options<T: CatalogItem>(items: &[T], region: &str) -> FacetOptions {
    let regions = build_facet_options(items.iter(), |item| item.region());
    let scope = Filter::new("", region, &[]);
    let departments = build_facet_options(
        items.iter().filter(|item| scope.matches_region(*item)),
        |item| item.department(),
    );
    FacetOptions {
        regions,
        departments,
    }
}

/// 去掉不在新选项列表里的已选省份，其余保持原顺序并统一成选项里的写法。
pub fn prune_departments(selected: &[String], options: &[String]) -> Vec<String> {
    selected
        .iter()
        .filter_map(|d| options.iter().find(|o| collate::eq(o, d)).cloned())
        .fold(Vec::new(), |mut kept, d| {
            if !kept.contains(&d) {
                kept.push(d);
            }
            kept
        })
}

/// 在选项中找到与输入等价的值（忽略大小写/重音）
pub fn find_option<'a>(options: &'a [String], wanted: &str) -> Option<&'a String> {
    options.iter().find(|o| collate::eq(o, wanted))
}
