use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// 认证标签（AB、Label Rouge、AOP ……）的统一形态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certification {
    pub code: String,
    pub label: String,
}

/// 线上的两种写法：纯代码字符串，或 `{code, label}` 对象
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCertification {
    Code(String),
    Full {
        #[serde(default)]
        code: Option<String>,
        #[serde(default, alias = "name", alias = "libelle")]
        label: Option<String>,
    },
}

impl RawCertification {
    fn normalize(self) -> Option<Certification> {
        let clean = |s: Option<String>| s.map(|x| x.trim().to_string()).filter(|x| !x.is_empty());
        match self {
            RawCertification::Code(code) => {
                let code = clean(Some(code))?;
                Some(Certification {
                    label: code.clone(),
                    code,
                })
            }
            RawCertification::Full { code, label } => match (clean(code), clean(label)) {
                (Some(code), Some(label)) => Some(Certification { code, label }),
                (Some(code), None) => Some(Certification {
                    label: code.clone(),
                    code,
                }),
                (None, Some(label)) => Some(Certification {
                    code: label.clone(),
                    label,
                }),
                (None, None) => None,
            },
        }
    }
}

/// 把任意 JSON 值规整成认证列表；非数组返回空列表，无法识别的元素跳过。
pub fn normalize_certifications(value: &Value) -> Vec<Certification> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| RawCertification::deserialize(item).ok())
        .filter_map(RawCertification::normalize)
        .collect()
}

pub(crate) fn deserialize<'de, D>(d: D) -> Result<Vec<Certification>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(normalize_certifications(&Value::deserialize(d)?))
}
