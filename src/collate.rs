//! 法语排序规则：忽略大小写与重音的比较和折叠。
//!
//! 所有排序键、分面相等判断和全文匹配都经过这里，保证同一个字符串
//! 在任何地方的比较结果一致。

use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// 折叠为比较键：NFD 分解后去掉组合附加符，转小写，展开法语连字，合并空白。
///
/// `"  Éric  Œuvre "` → `"eric oeuvre"`
pub fn fold(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.nfd() {
        if is_combining_mark(c) {
            continue;
        }
        match c {
            'œ' | 'Œ' => out.push_str("oe"),
            'æ' | 'Æ' => out.push_str("ae"),
            'ß' => out.push_str("ss"),
            _ => out.extend(c.to_lowercase()),
        }
    }
    whitespace_re().replace_all(out.trim(), " ").into_owned()
}

/// 基础字母级别的比较（大小写、重音不敏感）。
pub fn compare(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b))
}

/// 与 `compare` 相同，但空字符串（未知值）排在所有具名值之后。
pub fn compare_facet(a: &str, b: &str) -> Ordering {
    match (a.trim().is_empty(), b.trim().is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => compare(a, b),
    }
}

pub fn eq(a: &str, b: &str) -> bool {
    fold(a) == fold(b)
}

/// 折叠后的子串匹配；空 needle 总是匹配。
pub fn contains(haystack: &str, needle: &str) -> bool {
    let needle = fold(needle);
    needle.is_empty() || fold(haystack).contains(&needle)
}
