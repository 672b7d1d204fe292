use crate::api::CatalogSource;
use crate::app_state::AppEvent;
use log::{error, info};
use tokio::sync::mpsc;

/// 加载批次号；每次（重新）加载递增，过期批次的结果被丢弃
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn next(self) -> Self {
        LoadTicket(self.0.wrapping_add(1))
    }

    pub fn generation(self) -> u64 {
        self.0
    }
}

pub async fn load_catalog(
    source: &dyn CatalogSource,
    ticket: LoadTicket,
    tx: &mpsc::UnboundedSender<AppEvent>,
) {
    let _ = tx.send(AppEvent::Log(format!(
        "chargement du catalogue: {}",
        source.describe()
    )));
    match source.fetch_producers().await {
        Ok(producers) => {
            info!(
                "catalog load #{} finished: {} producers",
                ticket.generation(),
                producers.len()
            );
            // 界面已退出时通道关闭，忽略即可
            let _ = tx.send(AppEvent::CatalogLoaded { ticket, producers });
        }
        Err(e) => {
            error!("catalog load #{} failed: {}", ticket.generation(), e);
            let _ = tx.send(AppEvent::LoadFailed {
                ticket,
                message: format!("impossible de charger le catalogue: {}", e),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FileCatalogSource;
    use std::io::Write;

    #[tokio::test]
    async fn load_reports_producers_under_the_given_ticket() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"results": [{{"id": 7}}]}}"#).unwrap();
        let source = FileCatalogSource::new(file.path());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let ticket = LoadTicket::default().next();

        load_catalog(&source, ticket, &tx).await;

        assert!(matches!(rx.recv().await, Some(AppEvent::Log(_))));
        match rx.recv().await {
            Some(AppEvent::CatalogLoaded { ticket: t, producers }) => {
                assert_eq!(t, ticket);
                assert_eq!(producers.len(), 1);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn failure_is_reported_not_raised() {
        let source = FileCatalogSource::new("/nonexistent/vitrine.json");
        let (tx, mut rx) = mpsc::unbounded_channel();
        load_catalog(&source, LoadTicket::default(), &tx).await;

        let _ = rx.recv().await;
        match rx.recv().await {
            Some(AppEvent::LoadFailed { message, .. }) => {
                assert!(message.starts_with("impossible de charger le catalogue"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn closed_channel_is_ignored() {
        let source = FileCatalogSource::new("/nonexistent/vitrine.json");
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        load_catalog(&source, LoadTicket::default(), &tx).await;
    }
}
