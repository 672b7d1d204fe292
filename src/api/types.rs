use crate::catalog::Producer;
use async_trait::async_trait;
use log::warn;
use serde_json::Value;

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("http error: {0}")]
    Http(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("invalid payload: {0}")]
    Decode(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 目录数据来源：只有一个只读操作
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_producers(&self) -> Result<Vec<Producer>, FetchError>;

    /// 用于日志
    fn describe(&self) -> String;
}

/// 解析载荷：顶层数组，或包在 `results` / `data` 里的数组。
///
/// 单个元素不是对象时跳过并记一条警告，不影响其他记录。
pub fn decode_producers(body: &str) -> Result<Vec<Producer>, FetchError> {
    let value: Value = serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("results").or_else(|| map.remove("data")) {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(FetchError::Decode(
                    "expected an array of producers".to_string(),
                ))
            }
        },
        _ => {
            return Err(FetchError::Decode(
                "expected an array of producers".to_string(),
            ))
        }
    };

    let total = items.len();
    let producers: Vec<Producer> = items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| {
            if !item.is_object() {
                warn!("skipping producer #{}: not an object", i);
                return None;
            }
            match serde_json::from_value(item) {
                Ok(p) => Some(p),
                Err(e) => {
                    warn!("skipping producer #{}: {}", i, e);
                    None
                }
            }
        })
        .collect();
    if producers.len() != total {
        warn!("decoded {} of {} producers", producers.len(), total);
    }
    Ok(producers)
}
