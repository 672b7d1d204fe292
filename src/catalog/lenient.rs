//! 宽松的反序列化辅助函数。
//!
//! 后端返回的记录字段经常缺失或类型不一致（数字 id、字符串评分、对象或字符串形式的
//! 地区引用）。这里的函数先读成 `serde_json::Value`，再尽量转换；转换失败一律降级为
//! “缺失”，不会让整条记录解析失败。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub(crate) fn string<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(&Value::deserialize(d)?))
}

/// id 字段：字符串或数字，缺失时为空串
pub(crate) fn id<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(&Value::deserialize(d)?).unwrap_or_default())
}

pub(crate) fn number<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };
    Ok(n.filter(|x| x.is_finite()))
}

pub(crate) fn count<'de, D>(d: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    let n = match v {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|x| x.is_finite() && *x >= 0.0).map(|x| x as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(n.map(|x| x.min(u32::MAX as u64) as u32))
}

pub(crate) fn flag<'de, D>(d: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    Ok(match v {
        Value::Bool(b) => Some(b),
        Value::Number(n) => n.as_i64().map(|x| x != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "oui" => Some(true),
            "false" | "0" | "no" | "non" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// 嵌套对象：解析失败时为 None
pub(crate) fn object<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let v = Value::deserialize(d)?;
    if v.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(v).ok())
}

/// 列表：非数组时为空，无法解析的元素直接跳过
pub(crate) fn list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let v = Value::deserialize(d)?;
    Ok(list_from_value(v))
}

pub(crate) fn list_from_value<T: DeserializeOwned>(v: Value) -> Vec<T> {
    match v {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

fn value_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "id")]
        id: String,
        #[serde(default, deserialize_with = "number")]
        score: Option<f64>,
        #[serde(default, deserialize_with = "count")]
        votes: Option<u32>,
        #[serde(default, deserialize_with = "flag")]
        active: Option<bool>,
        #[serde(default, deserialize_with = "list")]
        tags: Vec<String>,
    }

    #[test]
    fn tolerates_mixed_types() {
        let p: Probe = serde_json::from_value(json!({
            "id": 42,
            "score": "4,5",
            "votes": 3.0,
            "active": "false",
            "tags": ["a", 1, "b", null]
        }))
        .unwrap();
        assert_eq!(p.id, "42");
        assert_eq!(p.score, Some(4.5));
        assert_eq!(p.votes, Some(3));
        assert_eq!(p.active, Some(false));
        assert_eq!(p.tags, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn garbage_degrades_to_absent() {
        let p: Probe = serde_json::from_value(json!({
            "id": {"nested": true},
            "score": "n/a",
            "votes": -2,
            "active": [],
            "tags": "bio"
        }))
        .unwrap();
        assert_eq!(p.id, "");
        assert_eq!(p.score, None);
        assert_eq!(p.votes, None);
        assert_eq!(p.active, None);
        assert!(p.tags.is_empty());
    }
}
