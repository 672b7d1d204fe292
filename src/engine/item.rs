use crate::catalog::{CommerceRow, ProducerCard, Rating};
use chrono::{DateTime, Utc};

/// 引擎看到的条目：过滤和排序只通过这些访问器取值。
///
/// 生产者视图和商户扁平视图各实现一次，算法本身只写一份。
pub trait CatalogItem {
    /// 稳定且唯一的键，作为最后一级排序依据
    fn key(&self) -> &str;
    fn display_name(&self) -> &str;
    /// 折叠后的名称，用于名称排序
    fn name_key(&self) -> &str;
    fn city(&self) -> &str;
    fn region(&self) -> &str;
    fn department(&self) -> &str;
    fn rating(&self) -> Rating;
    fn timestamp(&self) -> Option<DateTime<Utc>>;
    /// 全文搜索匹配的折叠字段
    fn search_keys(&self) -> &[String];
}

impl CatalogItem for ProducerCard {
    fn key(&self) -> &str {
        &self.key
    }
    fn display_name(&self) -> &str {
        &self.name
    }
    fn name_key(&self) -> &str {
        &self.name_key
    }
    fn city(&self) -> &str {
        &self.city
    }
    fn region(&self) -> &str {
        &self.region
    }
    fn department(&self) -> &str {
        &self.department
    }
    fn rating(&self) -> Rating {
        self.rating
    }
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.joined_at
    }
    fn search_keys(&self) -> &[String] {
        &self.search_keys
    }
}

impl CatalogItem for CommerceRow {
    fn key(&self) -> &str {
        &self.key
    }
    fn display_name(&self) -> &str {
        &self.name
    }
    fn name_key(&self) -> &str {
        &self.name_key
    }
    fn city(&self) -> &str {
        &self.city
    }
    fn region(&self) -> &str {
        &self.region
    }
    fn department(&self) -> &str {
        &self.department
    }
    fn rating(&self) -> Rating {
        self.rating
    }
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
    // 额外包含所属生产者的名称
    fn search_keys(&self) -> &[String] {
        &self.search_keys
    }
}
