use super::item::CatalogItem;
use crate::collate;

/// 预先折叠好的过滤条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    query: String,
    region: String,
    departments: Vec<String>,
}

impl Filter {
    pub fn new(query: &str, region: &str, departments: &[String]) -> Self {
        Self {
            query: collate::fold(query),
            region: collate::fold(region),
            departments: departments
                .iter()
                .map(|d| collate::fold(d))
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    /// 依次应用：全文 → 地区 → 省份
    pub fn matches<T: CatalogItem>(&self, item: &T) -> bool {
        self.matches_text(item) && self.matches_region(item) && self.matches_departments(item)
    }

    pub fn matches_text<T: CatalogItem>(&self, item: &T) -> bool {
        self.query.is_empty() || item.search_keys().iter().any(|k| k.contains(&self.query))
    }

    pub fn matches_region<T: CatalogItem>(&self, item: &T) -> bool {
        self.region.is_empty() || collate::fold(item.region()) == self.region
    }

    pub fn matches_departments<T: CatalogItem>(&self, item: &T) -> bool {
        if self.departments.is_empty() {
            return true;
        }
        let department = collate::fold(item.department());
        !department.is_empty() && self.departments.contains(&department)
    }

    pub fn apply<'a, T: CatalogItem>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(*item)).collect()
    }
}
