//! Immutable, versioned output of one ingestion cycle.
//!
//! A `Snapshot` is built completely before it is published; `SnapshotStore`
//! swaps the shared `Arc` under a write lock, so readers either see the
//! previous snapshot or the new one, never a mix.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::config::LeaderboardConfig;
use crate::error::LeaderboardError;
use crate::model::{NormalizedRecord, RawRow, Schema};
use crate::normalize::normalize_table;
use crate::rank::rank;

#[derive(Debug, Clone)]
pub struct Snapshot {
    version: u64,
    schema: Arc<Schema>,
    records: Vec<NormalizedRecord>,
    last_updated: DateTime<Utc>,
    source: String,
}

impl Snapshot {
    /// Normalize and rank one cycle's rows. Unpublished: version is 0.
    pub fn build(
        headers: &[String],
        rows: &[RawRow],
        config: &LeaderboardConfig,
        source: impl Into<String>,
        last_updated: DateTime<Utc>,
    ) -> Result<Self, LeaderboardError> {
        let (schema, records) = normalize_table(headers, rows, config)?;
        Ok(Self {
            version: 0,
            schema,
            records: rank(records),
            last_updated,
            source: source.into(),
        })
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Records in canonical rank order.
    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    pub fn headers(&self) -> &[String] {
        self.schema.headers()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Read accessor consumed by the display layer.
    pub fn response(&self) -> LeaderboardResponse<'_> {
        LeaderboardResponse {
            data: &self.records,
            headers: self.schema.headers(),
            total_records: self.records.len(),
            last_updated: self.last_updated.to_rfc3339_opts(SecondsFormat::Millis, true),
            source: &self.source,
            version: self.version,
        }
    }

    pub fn summary(&self, config: &LeaderboardConfig) -> Summary {
        let eligible = self
            .records
            .iter()
            .filter(|r| r.text(&config.fields.completion) == config.sentinels.completed)
            .count();
        Summary {
            total_participants: self.records.len(),
            eligible_participants: eligible,
            redeemed_participants: self.records.iter().filter(|r| r.redeemed()).count(),
            version: self.version,
            last_updated: self.last_updated.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse<'a> {
    pub data: &'a [NormalizedRecord],
    pub headers: &'a [String],
    pub total_records: usize,
    pub last_updated: String,
    pub source: &'a str,
    pub version: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_participants: usize,
    /// Participants whose completion flag equals its sentinel.
    pub eligible_participants: usize,
    pub redeemed_participants: usize,
    pub version: u64,
    pub last_updated: String,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Holds the authoritative snapshot. Cloning the store shares it.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    inner: Arc<RwLock<StoreState>>,
}

#[derive(Debug, Default)]
struct StoreState {
    current: Option<Arc<Snapshot>>,
    next_version: u64,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp the next version onto `snapshot` and make it current.
    pub fn publish(&self, mut snapshot: Snapshot) -> Arc<Snapshot> {
        let mut state = self.inner.write();
        state.next_version += 1;
        snapshot.version = state.next_version;
        let published = Arc::new(snapshot);
        state.current = Some(Arc::clone(&published));
        log::info!(
            "published snapshot v{} ({} records from {})",
            published.version,
            published.len(),
            published.source
        );
        published
    }

    /// The current snapshot, if any cycle has succeeded yet.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.inner.read().current.clone()
    }

    pub fn version(&self) -> u64 {
        self.inner.read().current.as_ref().map(|s| s.version).unwrap_or(0)
    }
}
