use super::types::{decode_producers, CatalogSource, FetchError};
use super::urls::url_producers;
use crate::catalog::Producer;
use crate::config::AppConfig;
use async_trait::async_trait;
use log::{info, warn};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

/// 通过 HTTP 拉取目录，失败时按固定间隔重试
pub struct HttpCatalogSource {
    client: Client,
    base_url: String,
    max_tries: usize,
    delay_unexpected: Duration,
}

impl HttpCatalogSource {
    /// # 参数
    ///
    /// * `base_url` - API 根地址
    /// * `timeout` - 单次请求超时
    /// * `max_tries` - 最大尝试次数（至少 1）
    /// * `delay_unexpected` - 两次尝试之间的等待
    pub fn new(
        base_url: String,
        timeout: Duration,
        max_tries: usize,
        delay_unexpected: Duration,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("vitrine/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Http(e.to_string()))?;
        Ok(Self {
            client,
            base_url,
            max_tries: max_tries.max(1),
            delay_unexpected,
        })
    }

    pub fn from_config(cfg: &AppConfig) -> Result<Self, FetchError> {
        Self::new(
            cfg.api_url.clone(),
            cfg.http_timeout,
            cfg.http_max_tries,
            cfg.http_retry_delay,
        )
    }

    /// 5xx 和 429 值得重试，其余非成功状态直接放弃
    fn is_retryable(status: StatusCode) -> bool {
        status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
    }

    /// 执行 GET（带重试）
    async fn get_with_retry(&self, url: &str) -> Result<Response, FetchError> {
        let mut last_err = FetchError::Http("no attempt made".to_string());

        for try_num in 1..=self.max_tries {
            match self.client.get(url).send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        info!("{} GET {} [{} tries]", self, url, try_num);
                        return Ok(resp);
                    }
                    if !Self::is_retryable(status) {
                        warn!("{} GET {} -> {}", self, url, status);
                        return Err(FetchError::Status(status.as_u16()));
                    }
                    warn!("{} GET {} -> {} (try {}/{})", self, url, status, try_num, self.max_tries);
                    last_err = FetchError::Status(status.as_u16());
                }
                Err(e) => {
                    warn!("{} GET {} failed: {} (try {}/{})", self, url, e, try_num, self.max_tries);
                    last_err = FetchError::Http(e.to_string());
                }
            }

            if try_num < self.max_tries {
                tokio::time::sleep(self.delay_unexpected).await;
            }
        }

        warn!("{} GET {} [max {} tries ran out]", self, url, self.max_tries);
        Err(last_err)
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_producers(&self) -> Result<Vec<Producer>, FetchError> {
        let url = url_producers(&self.base_url);
        let resp = self.get_with_retry(&url).await?;
        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;
        decode_producers(&body)
    }

    fn describe(&self) -> String {
        url_producers(&self.base_url)
    }
}

impl std::fmt::Display for HttpCatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<HttpCatalogSource [{}]>", self.base_url)
    }
}

impl std::fmt::Debug for HttpCatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<HttpCatalogSource [{}]>", self.base_url)
    }
}
