//! 派生层：有效属性、扁平化、分面选项。全部是纯函数，不会因为字段缺失而失败。

use super::model::{resolve, Commerce, Producer};
use super::rows::CommerceRow;
use crate::collate;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;

pub const PRODUCER_FALLBACK_NAME: &str = "Producteur";
pub const COMMERCE_FALLBACK_NAME: &str = "Commerce";

/// 沿回退链解析出的展示属性，未知时为 `""`
pub trait Effective {
    fn effective_display_name(&self) -> String;
    fn effective_region(&self) -> String;
    fn effective_department(&self) -> String;
    fn effective_city(&self) -> String;
}

impl Effective for Producer {
    fn effective_display_name(&self) -> String {
        let name = resolve(Producer::NAME_CHAIN, self);
        if name.is_empty() {
            PRODUCER_FALLBACK_NAME.to_string()
        } else {
            name
        }
    }

    fn effective_region(&self) -> String {
        resolve(Producer::REGION_CHAIN, self)
    }

    fn effective_department(&self) -> String {
        resolve(Producer::DEPARTMENT_CHAIN, self)
    }

    fn effective_city(&self) -> String {
        resolve(Producer::CITY_CHAIN, self)
    }
}

impl Effective for Commerce {
    fn effective_display_name(&self) -> String {
        let name = resolve(Commerce::NAME_CHAIN, self);
        if name.is_empty() {
            COMMERCE_FALLBACK_NAME.to_string()
        } else {
            name
        }
    }

    fn effective_region(&self) -> String {
        resolve(Commerce::REGION_CHAIN, self)
    }

    fn effective_department(&self) -> String {
        resolve(Commerce::DEPARTMENT_CHAIN, self)
    }

    fn effective_city(&self) -> String {
        resolve(Commerce::CITY_CHAIN, self)
    }
}

pub fn effective_bio(producer: &Producer) -> String {
    resolve(Producer::BIO_CHAIN, producer)
}

/// 支持 RFC 3339、`YYYY-MM-DD HH:MM:SS` 和纯日期；解析不了返回 None（排序时视为最早）
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// 每个 (生产者, 有效商户) 一行；顺序 = 生产者输入顺序，再按商户输入顺序
pub fn flatten(producers: &[Arc<Producer>]) -> Vec<CommerceRow> {
    producers
        .iter()
        .enumerate()
        .flat_map(|(position, producer)| {
            producer
                .commerces
                .iter()
                .enumerate()
                .filter(|(_, c)| c.is_active())
                .map(move |(index, _)| CommerceRow::new(Arc::clone(producer), position, index))
        })
        .collect()
}

/// 提取字段、丢弃空值、按折叠键去重，并按法语规则排序。
///
/// 只在大小写/重音上不同的写法合并为一个选项，保留输入中最先出现的写法。
pub fn build_facet_options<'a, T, I, F>(items: I, extractor: F) -> Vec<String>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    F: Fn(&'a T) -> &'a str,
{
    let mut seen = HashSet::new();
    let mut options: Vec<String> = items
        .into_iter()
        .map(|item| extractor(item).trim())
        .filter(|v| !v.is_empty() && seen.insert(collate::fold(v)))
        .map(str::to_string)
        .collect();
    options.sort_by(|a, b| collate::compare(a, b));
    options
}
