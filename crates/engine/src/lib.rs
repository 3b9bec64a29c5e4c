//! `rankboard-engine`: leaderboard normalization, ranking and filtering.
//!
//! Pure engine crate: receives raw rows, returns ranked snapshots and
//! filtered views. No file or network IO.

pub mod classify;
pub mod columns;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod participant;
pub mod rank;
pub mod snapshot;
pub mod style;
pub mod view;

pub use classify::{classify, FieldKind};
pub use config::LeaderboardConfig;
pub use error::LeaderboardError;
pub use model::{FieldValue, NormalizedRecord, RawRow, Schema};
pub use normalize::{normalize, normalize_table};
pub use rank::rank;
pub use snapshot::{Snapshot, SnapshotStore};
pub use view::{view, FilterCriteria, ViewRecord};
