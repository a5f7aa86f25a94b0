#![forbid(unsafe_code)]

mod repo;
mod snapshot;
mod store;

pub use repo::StateRepository;
pub use snapshot::{
    HISTORY_KEY, HistorySnapshot, RUN_STATE_KEY, RunStateSnapshot, SNAPSHOT_SCHEMA_VERSION,
    Snapshot, is_fresh,
};
pub use store::{JsonFileStore, MemoryStore, NoopStore, StateStore};
