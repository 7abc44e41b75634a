//! Pluggable agent state behind `adapt` / `sense`.
//!
//! The backing strategy is chosen once, at construction, from
//! `AgentSettings::framework`:
//! - `key_value` -- `KeyValueState`, a flat map
//! - `graph` -- `ExternalGraphState`, every write produces a checkpoint that
//!   can be listed and rolled back to, in the manner of graph workflow
//!   frameworks' memory savers; only the most recent checkpoints are kept

pub mod graph;
pub mod key_value;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sensorium_types::config::StateFramework;
use sensorium_types::error::StateError;
use serde::Serialize;

pub use graph::ExternalGraphState;
pub use key_value::KeyValueState;

/// A numbered snapshot of state taken after a write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Checkpoint {
    pub version: u64,
    pub created_at: DateTime<Utc>,
    /// Key that changed to produce this checkpoint.
    pub key: String,
    pub values: BTreeMap<String, String>,
}

/// Storage strategy for an agent's internal state.
pub trait StateStore: Send + std::fmt::Debug {
    fn get(&self, key: &str) -> Option<String>;

    /// Write (or with `None`, remove) a key. Returns the previous value.
    fn set(&mut self, key: &str, value: Option<String>, at: DateTime<Utc>) -> Option<String>;

    /// Current key/value view.
    fn snapshot(&self) -> BTreeMap<String, String>;

    /// Checkpoint history, oldest first. Empty for stores without history.
    fn checkpoints(&self) -> Vec<Checkpoint> {
        Vec::new()
    }

    /// Restore the values recorded at `version`.
    fn rollback(&mut self, version: u64, at: DateTime<Utc>) -> Result<(), StateError> {
        let _ = (version, at);
        Err(StateError::Unsupported("rollback"))
    }
}

/// Build the store selected by `framework`.
pub fn state_store_for(framework: StateFramework) -> Box<dyn StateStore> {
    match framework {
        StateFramework::KeyValue => Box::new(KeyValueState::new()),
        StateFramework::Graph => Box::new(ExternalGraphState::new()),
    }
}
