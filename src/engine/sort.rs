//! 排序键与比较器。每个比较器都是严格全序：主键 → 名称 → 记录键。

use super::item::CatalogItem;
use crate::catalog::{CommerceRow, ProducerCard};
use crate::collate;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

pub trait SortOrder<T>: Copy {
    fn compare(self, a: &T, b: &T) -> Ordering;
}

/// 同分时：名称升序，再按记录键
pub fn tie_break<T: CatalogItem>(a: &T, b: &T) -> Ordering {
    a.name_key()
        .cmp(b.name_key())
        .then_with(|| a.key().cmp(b.key()))
}

fn by_recent<T: CatalogItem>(a: &T, b: &T) -> Ordering {
    // None < Some，倒序后无法解析的时间排在最后
    b.timestamp().cmp(&a.timestamp())
}

fn by_region<T: CatalogItem>(a: &T, b: &T) -> Ordering {
    collate::compare_facet(a.region(), b.region())
}

fn by_department<T: CatalogItem>(a: &T, b: &T) -> Ordering {
    collate::compare_facet(a.department(), b.department())
}

fn by_rating<T: CatalogItem>(a: &T, b: &T) -> Ordering {
    a.rating().rank_cmp(&b.rating())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProducerSort {
    #[default]
    Recent,
    Name,
    Commerces,
    Region,
    Department,
    RatingDesc,
    RatingAsc,
}

impl ProducerSort {
    pub const ALL: [ProducerSort; 7] = [
        ProducerSort::Recent,
        ProducerSort::Name,
        ProducerSort::Commerces,
        ProducerSort::Region,
        ProducerSort::Department,
        ProducerSort::RatingDesc,
        ProducerSort::RatingAsc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProducerSort::Recent => "recent",
            ProducerSort::Name => "name",
            ProducerSort::Commerces => "commerces",
            ProducerSort::Region => "region",
            ProducerSort::Department => "department",
            ProducerSort::RatingDesc => "rating_desc",
            ProducerSort::RatingAsc => "rating_asc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProducerSort::Recent => "Plus récents",
            ProducerSort::Name => "Nom (A→Z)",
            ProducerSort::Commerces => "Nombre de commerces",
            ProducerSort::Region => "Région",
            ProducerSort::Department => "Département",
            ProducerSort::RatingDesc => "Mieux notés",
            ProducerSort::RatingAsc => "Moins bien notés",
        }
    }

    pub fn cycle(self, forward: bool) -> Self {
        cycle(&Self::ALL, self, forward)
    }
}

impl SortOrder<ProducerCard> for ProducerSort {
    fn compare(self, a: &ProducerCard, b: &ProducerCard) -> Ordering {
        let primary = match self {
            ProducerSort::Recent => by_recent(a, b),
            ProducerSort::Name => Ordering::Equal,
            ProducerSort::Commerces => b.commerce_count.cmp(&a.commerce_count),
            ProducerSort::Region => by_region(a, b),
            ProducerSort::Department => by_department(a, b),
            ProducerSort::RatingDesc => by_rating(b, a),
            ProducerSort::RatingAsc => by_rating(a, b),
        };
        primary.then_with(|| tie_break(a, b))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommerceSort {
    #[default]
    Name,
    Recent,
    Producer,
    Region,
    Department,
    RatingDesc,
    RatingAsc,
}

impl CommerceSort {
    pub const ALL: [CommerceSort; 7] = [
        CommerceSort::Name,
        CommerceSort::Recent,
        CommerceSort::Producer,
        CommerceSort::Region,
        CommerceSort::Department,
        CommerceSort::RatingDesc,
        CommerceSort::RatingAsc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CommerceSort::Name => "name",
            CommerceSort::Recent => "recent",
            CommerceSort::Producer => "producer",
            CommerceSort::Region => "region",
            CommerceSort::Department => "department",
            CommerceSort::RatingDesc => "rating_desc",
            CommerceSort::RatingAsc => "rating_asc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CommerceSort::Name => "Nom (A→Z)",
            CommerceSort::Recent => "Plus récents",
            CommerceSort::Producer => "Producteur",
            CommerceSort::Region => "Région",
            CommerceSort::Department => "Département",
            CommerceSort::RatingDesc => "Mieux notés",
            CommerceSort::RatingAsc => "Moins bien notés",
        }
    }

    pub fn cycle(self, forward: bool) -> Self {
        cycle(&Self::ALL, self, forward)
    }
}

impl SortOrder<CommerceRow> for CommerceSort {
    fn compare(self, a: &CommerceRow, b: &CommerceRow) -> Ordering {
        let primary = match self {
            CommerceSort::Name => Ordering::Equal,
            CommerceSort::Recent => by_recent(a, b),
            CommerceSort::Producer => a.producer_key.cmp(&b.producer_key),
            CommerceSort::Region => by_region(a, b),
            CommerceSort::Department => by_department(a, b),
            CommerceSort::RatingDesc => by_rating(b, a),
            CommerceSort::RatingAsc => by_rating(a, b),
        };
        primary.then_with(|| tie_break(a, b))
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let idx = all.iter().position(|s| *s == current).unwrap_or(0);
    let next = if forward {
        (idx + 1) % all.len()
    } else {
        (idx + all.len() - 1) % all.len()
    };
    all[next]
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key: {0}")]
pub struct UnknownSortKey(pub String);

fn parse_key(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace('-', "_")
}

impl FromStr for ProducerSort {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = parse_key(s);
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == key)
            .ok_or_else(|| UnknownSortKey(s.to_string()))
    }
}

impl FromStr for CommerceSort {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = parse_key(s);
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == key)
            .ok_or_else(|| UnknownSortKey(s.to_string()))
    }
}

impl fmt::Display for ProducerSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for CommerceSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 对引用排序，原集合不动
pub fn sort_items<'a, T, S: SortOrder<T>>(items: &mut [&'a T], sort: S) {
    items.sort_by(|a, b| sort.compare(a, b));
}
