use std::time::{Duration, Instant};

/// 搜索框去抖：按键只更新待提交文本，静默超过 `delay` 后才提交。
///
/// 时间由调用方传入，主循环每一轮调用一次 `poll`。
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
    committed: String,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            committed: String::new(),
        }
    }

    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.pending = Some((text.into(), now));
    }

    /// 到期且与已提交文本不同时返回新文本
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let due = match &self.pending {
            Some((_, at)) => now.saturating_duration_since(*at) >= self.delay,
            None => false,
        };
        if due {
            self.commit()
        } else {
            None
        }
    }

    /// 立即提交（例如按下回车）
    pub fn flush(&mut self) -> Option<String> {
        self.commit()
    }

    fn commit(&mut self) -> Option<String> {
        let (text, _) = self.pending.take()?;
        if text == self.committed {
            return None;
        }
        self.committed = text.clone();
        Some(text)
    }

    /// 丢弃待提交文本并清空已提交文本
    pub fn reset(&mut self) {
        self.pending = None;
        self.committed.clear();
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn committed(&self) -> &str {
        &self.committed
    }
}
