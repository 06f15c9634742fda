use crate::{
    casafari::CasafariClient, config::Config, db::PgPropertyStore, sync::SyncService,
};
use anyhow::Result;
use log::{error, info};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Instant,
};
use tokio::sync::broadcast::Receiver;

/// Runs the configured sync on a fixed interval until shut down.
pub struct SyncProducer;

impl SyncProducer {
    pub async fn run(
        config: &Arc<Config>,
        shutdown: Arc<AtomicBool>,
        mut shutdown_rx: Receiver<()>,
    ) -> Result<()> {
        let interval = config.sync.interval()?;
        let client = CasafariClient::new(&config.casafari)?;

        while !shutdown.load(Ordering::Acquire) {
            info!("Starting SyncProducer run");
            let start = Instant::now();

            match PgPropertyStore::connect(&config.database_url) {
                Ok(store) => {
                    let mut service = SyncService::new(client.clone(), store)
                        .with_per_page(config.casafari.per_page);
                    let stats = service.sync_all(&config.sync.filters).await;
                    info!(
                        "Finished SyncProducer run in {:?}: {}",
                        start.elapsed(),
                        stats
                    );
                }
                Err(e) => error!("Skipping SyncProducer run, database unavailable: {e}"),
            }

            tokio::select! {
               _ = tokio::time::sleep(interval) => {}
               _ = shutdown_rx.recv() => {
                   break
               }
            }
        }

        info!("SyncProducer stopped");
        Ok(())
    }
}
