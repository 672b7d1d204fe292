use super::client::HttpCatalogSource;
use super::types::{decode_producers, CatalogSource, FetchError};
use crate::catalog::Producer;
use crate::config::AppConfig;
use async_trait::async_trait;
use log::info;
use std::path::PathBuf;

/// 从本地 JSON 文件读取（离线演示、调试）
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    async fn fetch_producers(&self) -> Result<Vec<Producer>, FetchError> {
        let body = tokio::fs::read_to_string(&self.path).await?;
        let producers = decode_producers(&body)?;
        info!(
            "loaded {} producers from {}",
            producers.len(),
            self.path.display()
        );
        Ok(producers)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Debug)]
pub enum InnerSource {
    Http(HttpCatalogSource),
    File(FileCatalogSource),
}

/// 按配置选择来源：设置了 `catalog_file` 就读文件，否则走 HTTP
#[derive(Debug)]
pub struct AnySource {
    inner: InnerSource,
}

impl AnySource {
    pub fn from_config(cfg: &AppConfig) -> Result<Self, FetchError> {
        let inner = match &cfg.catalog_file {
            Some(path) => InnerSource::File(FileCatalogSource::new(path.clone())),
            None => InnerSource::Http(HttpCatalogSource::from_config(cfg)?),
        };
        Ok(Self { inner })
    }
}

#[async_trait]
impl CatalogSource for AnySource {
    async fn fetch_producers(&self) -> Result<Vec<Producer>, FetchError> {
        match &self.inner {
            InnerSource::Http(s) => s.fetch_producers().await,
            InnerSource::File(s) => s.fetch_producers().await,
        }
    }

    fn describe(&self) -> String {
        match &self.inner {
            InnerSource::Http(s) => s.describe(),
            InnerSource::File(s) => s.describe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn file_source_reads_and_decodes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": 1, "display_name": "Ferme Abel"}}]"#).unwrap();
        let source = FileCatalogSource::new(file.path());
        let producers = source.fetch_producers().await.unwrap();
        assert_eq!(producers.len(), 1);
        assert_eq!(producers[0].display_name.as_deref(), Some("Ferme Abel"));
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let source = FileCatalogSource::new("/nonexistent/vitrine/producers.json");
        assert!(matches!(source.fetch_producers().await, Err(FetchError::Io(_))));
    }

    #[test]
    fn config_picks_the_file_source() {
        let cfg = AppConfig {
            catalog_file: Some(PathBuf::from("producers.json")),
            ..AppConfig::default()
        };
        let source = AnySource::from_config(&cfg).unwrap();
        assert_eq!(source.describe(), "producers.json");
    }
}
