use super::certification::Certification;
use super::derive::{effective_bio, flatten, parse_timestamp, Effective};
use super::model::{Commerce, Producer};
use super::rating::Rating;
use crate::collate;
use chrono::{DateTime, Utc};
use log::info;
use std::sync::Arc;

/// 记录 id 缺失时退回到它在输入中的位置
fn record_key(id: &str, position: usize) -> String {
    let id = id.trim();
    if id.is_empty() {
        format!("#{}", position)
    } else {
        id.to_string()
    }
}

/// 生产者视图中的一行：有效属性在构建时一次算好
#[derive(Debug, Clone)]
pub struct ProducerCard {
    pub key: String,
    pub producer: Arc<Producer>,
    pub name: String,
    pub city: String,
    pub region: String,
    pub department: String,
    pub bio: String,
    pub rating: Rating,
    pub joined_at: Option<DateTime<Utc>>,
    pub commerce_count: usize,
    pub(crate) name_key: String,
    pub(crate) search_keys: Vec<String>,
}

impl ProducerCard {
    pub fn new(producer: Arc<Producer>, position: usize) -> Self {
        let key = record_key(&producer.id, position);
        let name = producer.effective_display_name();
        let city = producer.effective_city();
        let region = producer.effective_region();
        let department = producer.effective_department();
        let search_keys = [&name, &city, &region, &department]
            .into_iter()
            .map(|s| collate::fold(s))
            .collect();
        Self {
            key,
            name_key: collate::fold(&name),
            bio: effective_bio(&producer),
            rating: Rating::from_parts(producer.avg_rating, producer.rating_count),
            joined_at: producer.date_joined.as_deref().and_then(parse_timestamp),
            commerce_count: producer.active_commerces().count(),
            name,
            city,
            region,
            department,
            search_keys,
            producer,
        }
    }

    pub fn commerces(&self) -> impl Iterator<Item = &Commerce> {
        self.producer.active_commerces()
    }
}

/// 扁平视图中的一行：一个 (生产者, 商户) 对
#[derive(Debug, Clone)]
pub struct CommerceRow {
    /// `生产者id-商户id`
    pub key: String,
    pub producer: Arc<Producer>,
    index: usize,
    pub name: String,
    pub producer_name: String,
    pub city: String,
    pub region: String,
    pub department: String,
    pub rating: Rating,
    pub created_at: Option<DateTime<Utc>>,
    pub(crate) name_key: String,
    pub(crate) producer_key: String,
    pub(crate) search_keys: Vec<String>,
}

impl CommerceRow {
    /// `index` 必须是 `producer.commerces` 的合法下标
    pub(crate) fn new(producer: Arc<Producer>, position: usize, index: usize) -> Self {
        let commerce = &producer.commerces[index];
        let key = format!(
            "{}-{}",
            record_key(&producer.id, position),
            record_key(&commerce.id, index)
        );
        let name = commerce.effective_display_name();
        let producer_name = producer.effective_display_name();
        let city = commerce.effective_city();
        let region = commerce.effective_region();
        let department = commerce.effective_department();
        let search_keys = [&name, &city, &region, &department, &producer_name]
            .into_iter()
            .map(|s| collate::fold(s))
            .collect();
        let created_at = commerce
            .created_at
            .as_deref()
            .and_then(parse_timestamp)
            .or_else(|| producer.date_joined.as_deref().and_then(parse_timestamp));
        let rating = Rating::from_parts(commerce.avg_rating, commerce.rating_count);
        Self {
            key,
            index,
            name_key: collate::fold(&name),
            producer_key: collate::fold(&producer_name),
            name,
            producer_name,
            city,
            region,
            department,
            rating,
            created_at,
            search_keys,
            producer,
        }
    }

    pub fn commerce(&self) -> &Commerce {
        &self.producer.commerces[self.index]
    }

    pub fn certifications(&self) -> &[Certification] {
        &self.commerce().certifications
    }
}

/// 一次拉取后构建的两个视图
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub producers: Vec<ProducerCard>,
    pub commerces: Vec<CommerceRow>,
}

impl Catalog {
    pub fn from_producers(producers: Vec<Producer>) -> Self {
        let shared: Vec<Arc<Producer>> = producers.into_iter().map(Arc::new).collect();
        let cards = shared
            .iter()
            .enumerate()
            .map(|(i, p)| ProducerCard::new(Arc::clone(p), i))
            .collect::<Vec<_>>();
        let rows = flatten(&shared);
        info!(
            "catalog built: {} producers, {} commerces",
            cards.len(),
            rows.len()
        );
        Self {
            producers: cards,
            commerces: rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }
}
