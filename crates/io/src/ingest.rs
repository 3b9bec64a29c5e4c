//! Ingestion cycle: fetch → parse → normalize → rank → publish.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rankboard_engine::{LeaderboardConfig, LeaderboardError, Snapshot, SnapshotStore};

use crate::csv::parse_table;
use crate::source::DataSource;

pub struct Ingestor {
    source: Box<dyn DataSource>,
    config: LeaderboardConfig,
}

impl Ingestor {
    pub fn new(source: Box<dyn DataSource>, config: LeaderboardConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &LeaderboardConfig {
        &self.config
    }

    /// Run one cycle and build a snapshot without publishing it.
    pub fn build(&self) -> Result<Snapshot, LeaderboardError> {
        let text = self.source.fetch()?;
        let table = parse_table(&text)?;
        Snapshot::build(
            &table.headers,
            &table.rows,
            &self.config,
            self.source.label(),
            Utc::now(),
        )
    }

    /// Run one cycle and publish the result.
    ///
    /// On failure nothing is published: the store keeps serving whatever
    /// snapshot it had before.
    pub fn refresh(&self, store: &SnapshotStore) -> Result<Arc<Snapshot>, LeaderboardError> {
        let start = Instant::now();
        log::debug!("ingesting from {}", self.source.label());

        match self.build() {
            Ok(snapshot) => {
                let published = store.publish(snapshot);
                log::info!(
                    "ingestion cycle finished in {}ms",
                    start.elapsed().as_millis()
                );
                Ok(published)
            }
            Err(e) => {
                match store.current() {
                    Some(prior) => log::warn!(
                        "ingestion failed, keeping snapshot v{}: {e}",
                        prior.version()
                    ),
                    None => log::warn!("ingestion failed, no snapshot available: {e}"),
                }
                Err(e)
            }
        }
    }
}
