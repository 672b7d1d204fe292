//! 后端返回的嵌套记录，以及各个“有效属性”的回退链。
//!
//! 回退链是按优先级排列的访问函数数组，和类型定义放在一起，便于整体审阅。

use super::certification::{self, Certification};
use super::lenient;
use serde::Deserialize;
use std::borrow::Cow;

/// 回退链中的一环：返回 None 或空串表示“这一环没有值”
pub type Accessor<T> = for<'a> fn(&'a T) -> Option<Cow<'a, str>>;

/// 取链上第一个非空（去首尾空白后）的值，全部落空时返回 `""`。
pub fn resolve<T>(chain: &[Accessor<T>], item: &T) -> String {
    chain
        .iter()
        .filter_map(|accessor| accessor(item))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
        .unwrap_or_default()
}

/// 地区/省份引用：可能是字符串，也可能是带 `name` 的对象
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawNamed")]
pub struct NamedRef {
    pub name: String,
    pub code: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNamed {
    Name(String),
    Object {
        #[serde(default, alias = "nom", alias = "label", deserialize_with = "lenient::string")]
        name: Option<String>,
        #[serde(default, deserialize_with = "lenient::string")]
        code: Option<String>,
    },
}

impl From<RawNamed> for NamedRef {
    fn from(raw: RawNamed) -> Self {
        match raw {
            RawNamed::Name(name) => NamedRef {
                name,
                code: String::new(),
            },
            RawNamed::Object { name, code } => NamedRef {
                name: name.unwrap_or_default(),
                code: code.unwrap_or_default(),
            },
        }
    }
}

fn named(r: &Option<NamedRef>) -> Option<Cow<'_, str>> {
    r.as_ref().map(|r| Cow::Borrowed(r.name.as_str()))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Department {
    #[serde(default, alias = "nom", deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub region: Option<NamedRef>,
}

/// 省份：字符串或对象
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawDepartment")]
pub struct DepartmentRef(pub Department);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDepartment {
    Name(String),
    Object(Department),
}

impl From<RawDepartment> for DepartmentRef {
    fn from(raw: RawDepartment) -> Self {
        match raw {
            RawDepartment::Name(name) => DepartmentRef(Department {
                name: Some(name),
                ..Department::default()
            }),
            RawDepartment::Object(d) => DepartmentRef(d),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct City {
    #[serde(default, alias = "nom", deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, alias = "postalCode", alias = "zip_code", deserialize_with = "lenient::string")]
    pub postal_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub department: Option<DepartmentRef>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub region: Option<NamedRef>,
}

/// 城市：字符串或对象
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawCity")]
pub struct CityRef(pub City);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCity {
    Name(String),
    Object(City),
}

impl From<RawCity> for CityRef {
    fn from(raw: RawCity) -> Self {
        match raw {
            RawCity::Name(name) => CityRef(City {
                name: Some(name),
                ..City::default()
            }),
            RawCity::Object(c) => CityRef(c),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Address {
    #[serde(default, alias = "streetNumber", deserialize_with = "lenient::string")]
    pub street_number: Option<String>,
    #[serde(default, alias = "street_name", alias = "streetName", deserialize_with = "lenient::string")]
    pub street: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub complement: Option<String>,
    #[serde(default, alias = "postalCode", alias = "zip_code", deserialize_with = "lenient::string")]
    pub postal_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub city: Option<CityRef>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub department: Option<NamedRef>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub region: Option<NamedRef>,
}

impl Address {
    pub fn city(&self) -> Option<&City> {
        self.city.as_ref().map(|c| &c.0)
    }

    pub fn department(&self) -> Option<&Department> {
        self.city()?.department.as_ref().map(|d| &d.0)
    }

    /// 单行地址，用于详情展示
    pub fn one_line(&self) -> String {
        let street = [self.street_number.as_deref(), self.street.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let postal = self
            .postal_code
            .as_deref()
            .or_else(|| self.city().and_then(|c| c.postal_code.as_deref()))
            .unwrap_or("");
        let city = self.city().and_then(|c| c.name.as_deref()).unwrap_or("");
        let locality = format!("{} {}", postal.trim(), city.trim()).trim().to_string();
        [street.as_str(), self.complement.as_deref().unwrap_or("").trim(), locality.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// 商户（子实体）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Commerce {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(default, alias = "company_name", alias = "companyName", deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
    #[serde(default, alias = "logo_url", alias = "logoUrl", deserialize_with = "lenient::string")]
    pub logo: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: Option<String>,
    #[serde(default, alias = "phone_number", alias = "phoneNumber", deserialize_with = "lenient::string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub website: Option<String>,
    #[serde(default, alias = "isActive", alias = "active", deserialize_with = "lenient::flag")]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub region: Option<NamedRef>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub department: Option<NamedRef>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub address: Option<Address>,
    #[serde(default, deserialize_with = "certification::deserialize")]
    pub certifications: Vec<Certification>,
    #[serde(default, alias = "avgRating", alias = "average_rating", alias = "rating", deserialize_with = "lenient::number")]
    pub avg_rating: Option<f64>,
    #[serde(default, alias = "ratingCount", alias = "ratings_count", alias = "reviews_count", deserialize_with = "lenient::count")]
    pub rating_count: Option<u32>,
    #[serde(default, alias = "createdAt", deserialize_with = "lenient::string")]
    pub created_at: Option<String>,
}

impl Commerce {
    /// 只有显式标记为 false 才算停用
    pub fn is_active(&self) -> bool {
        self.is_active != Some(false)
    }

    pub const NAME_CHAIN: &'static [Accessor<Commerce>] = &[commerce_name];

    pub const REGION_CHAIN: &'static [Accessor<Commerce>] = &[
        commerce_region,
        commerce_address_region,
        commerce_city_region,
        commerce_department_region,
    ];

    pub const DEPARTMENT_CHAIN: &'static [Accessor<Commerce>] = &[
        commerce_department,
        commerce_address_department,
        commerce_city_department,
    ];

    pub const CITY_CHAIN: &'static [Accessor<Commerce>] = &[commerce_city];
}

fn commerce_name(c: &Commerce) -> Option<Cow<'_, str>> {
    c.name.as_deref().map(Cow::Borrowed)
}

fn commerce_region(c: &Commerce) -> Option<Cow<'_, str>> {
    named(&c.region)
}

fn commerce_address_region(c: &Commerce) -> Option<Cow<'_, str>> {
    named(&c.address.as_ref()?.region)
}

fn commerce_city_region(c: &Commerce) -> Option<Cow<'_, str>> {
    named(&c.address.as_ref()?.city()?.region)
}

fn commerce_department_region(c: &Commerce) -> Option<Cow<'_, str>> {
    named(&c.address.as_ref()?.department()?.region)
}

fn commerce_department(c: &Commerce) -> Option<Cow<'_, str>> {
    named(&c.department)
}

fn commerce_address_department(c: &Commerce) -> Option<Cow<'_, str>> {
    named(&c.address.as_ref()?.department)
}

fn commerce_city_department(c: &Commerce) -> Option<Cow<'_, str>> {
    c.address
        .as_ref()?
        .department()?
        .name
        .as_deref()
        .map(Cow::Borrowed)
}

fn commerce_city(c: &Commerce) -> Option<Cow<'_, str>> {
    c.address.as_ref()?.city()?.name.as_deref().map(Cow::Borrowed)
}

/// 生产者（顶层实体）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Producer {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(default, alias = "firstName", deserialize_with = "lenient::string")]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastName", deserialize_with = "lenient::string")]
    pub last_name: Option<String>,
    #[serde(default, alias = "displayName", alias = "public_name", alias = "publicName", deserialize_with = "lenient::string")]
    pub display_name: Option<String>,
    #[serde(default, alias = "biography", deserialize_with = "lenient::string")]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub presentation: Option<String>,
    #[serde(default, alias = "dateJoined", alias = "created_at", alias = "createdAt", deserialize_with = "lenient::string")]
    pub date_joined: Option<String>,
    #[serde(default, alias = "avgRating", alias = "average_rating", alias = "rating", deserialize_with = "lenient::number")]
    pub avg_rating: Option<f64>,
    #[serde(default, alias = "ratingCount", alias = "ratings_count", alias = "reviews_count", deserialize_with = "lenient::count")]
    pub rating_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub city: Option<CityRef>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub region: Option<NamedRef>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub department: Option<NamedRef>,
    #[serde(default, alias = "companies", deserialize_with = "lenient::list")]
    pub commerces: Vec<Commerce>,
}

impl Producer {
    pub fn active_commerces(&self) -> impl Iterator<Item = &Commerce> {
        self.commerces.iter().filter(|c| c.is_active())
    }

    pub const NAME_CHAIN: &'static [Accessor<Producer>] =
        &[producer_display_name, producer_full_name];

    pub const BIO_CHAIN: &'static [Accessor<Producer>] =
        &[producer_bio, producer_description, producer_presentation];

    pub const REGION_CHAIN: &'static [Accessor<Producer>] =
        &[producer_region, producer_commerce_region];

    pub const DEPARTMENT_CHAIN: &'static [Accessor<Producer>] =
        &[producer_department, producer_commerce_department];

    pub const CITY_CHAIN: &'static [Accessor<Producer>] = &[producer_city, producer_commerce_city];
}

fn producer_display_name(p: &Producer) -> Option<Cow<'_, str>> {
    p.display_name.as_deref().map(Cow::Borrowed)
}

/// 名 + 姓
fn producer_full_name(p: &Producer) -> Option<Cow<'_, str>> {
    let parts = [p.first_name.as_deref(), p.last_name.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>();
    Some(Cow::Owned(parts.join(" ")))
}

fn producer_bio(p: &Producer) -> Option<Cow<'_, str>> {
    p.bio.as_deref().map(Cow::Borrowed)
}

fn producer_description(p: &Producer) -> Option<Cow<'_, str>> {
    p.description.as_deref().map(Cow::Borrowed)
}

fn producer_presentation(p: &Producer) -> Option<Cow<'_, str>> {
    p.presentation.as_deref().map(Cow::Borrowed)
}

fn producer_region(p: &Producer) -> Option<Cow<'_, str>> {
    named(&p.region)
}

fn producer_commerce_region(p: &Producer) -> Option<Cow<'_, str>> {
    first_commerce_value(p, Commerce::REGION_CHAIN)
}

fn producer_department(p: &Producer) -> Option<Cow<'_, str>> {
    named(&p.department)
}

fn producer_commerce_department(p: &Producer) -> Option<Cow<'_, str>> {
    first_commerce_value(p, Commerce::DEPARTMENT_CHAIN)
}

fn producer_city(p: &Producer) -> Option<Cow<'_, str>> {
    p.city.as_ref()?.0.name.as_deref().map(Cow::Borrowed)
}

fn producer_commerce_city(p: &Producer) -> Option<Cow<'_, str>> {
    first_commerce_value(p, Commerce::CITY_CHAIN)
}

/// 第一个能解析出值的有效商户
fn first_commerce_value<'a>(p: &'a Producer, chain: &[Accessor<Commerce>]) -> Option<Cow<'a, str>> {
    p.active_commerces()
        .map(|c| resolve(chain, c))
        .find(|v| !v.is_empty())
        .map(Cow::Owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn region_and_department_accept_string_or_object() {
        let c: Commerce = serde_json::from_value(json!({
            "id": 7,
            "region": "Occitanie",
            "department": {"nom": "Gard", "code": "30"}
        }))
        .unwrap();
        assert_eq!(c.id, "7");
        assert_eq!(c.region.unwrap().name, "Occitanie");
        let d = c.department.unwrap();
        assert_eq!((d.name.as_str(), d.code.as_str()), ("Gard", "30"));
    }

    #[test]
    fn nested_address_hierarchy_parses() {
        let c: Commerce = serde_json::from_value(json!({
            "address": {
                "street_number": "12",
                "street": "rue des Lilas",
                "city": {
                    "name": "Nîmes",
                    "postal_code": "30000",
                    "department": {"name": "Gard", "region": {"name": "Occitanie"}}
                }
            }
        }))
        .unwrap();
        assert_eq!(resolve(Commerce::CITY_CHAIN, &c), "Nîmes");
        assert_eq!(resolve(Commerce::DEPARTMENT_CHAIN, &c), "Gard");
        assert_eq!(resolve(Commerce::REGION_CHAIN, &c), "Occitanie");
        assert_eq!(
            c.address.unwrap().one_line(),
            "12 rue des Lilas, 30000 Nîmes"
        );
    }

    #[test]
    fn malformed_nested_fields_degrade_to_absent() {
        let p: Producer = serde_json::from_value(json!({
            "id": "p1",
            "commerces": [
                {"id": 1, "address": "pas une adresse", "certifications": "AB"},
                "not a commerce",
                {"id": 2, "address": {"city": 12}}
            ],
            "region": [1, 2]
        }))
        .unwrap();
        assert_eq!(p.commerces.len(), 2);
        assert!(p.commerces[0].address.is_none());
        assert!(p.commerces[0].certifications.is_empty());
        assert!(p.region.is_none());
        assert_eq!(resolve(Producer::REGION_CHAIN, &p), "");
    }

    #[test]
    fn inactive_flag_variants() {
        let c: Commerce = serde_json::from_value(json!({"active": false})).unwrap();
        assert!(!c.is_active());
        let c: Commerce = serde_json::from_value(json!({})).unwrap();
        assert!(c.is_active());
    }
}
