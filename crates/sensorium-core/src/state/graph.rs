//! Checkpointed state for graph-style workflows.
//!
//! Each write appends a checkpoint holding the full value map after the
//! write. Rolling back restores a checkpoint's values and records the
//! restore as a new checkpoint. Only the most recent checkpoints are
//! retained; versions keep counting up after old ones are discarded.

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Utc};
use sensorium_types::error::StateError;

use super::{Checkpoint, StateStore};

/// Checkpoints kept by [`ExternalGraphState::new`].
pub const DEFAULT_HISTORY_LIMIT: usize = 64;

#[derive(Debug)]
pub struct ExternalGraphState {
    values: BTreeMap<String, String>,
    history: VecDeque<Checkpoint>,
    history_limit: usize,
    version: u64,
}

impl Default for ExternalGraphState {
    fn default() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl ExternalGraphState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `limit` checkpoints (at least one).
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            values: BTreeMap::new(),
            history: VecDeque::new(),
            history_limit: limit.max(1),
            version: 0,
        }
    }

    /// Version of the most recent checkpoint (0 before any write).
    pub fn version(&self) -> u64 {
        self.version
    }

    fn record(&mut self, key: &str, at: DateTime<Utc>) {
        self.version += 1;
        if self.history.len() == self.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(Checkpoint {
            version: self.version,
            created_at: at,
            key: key.to_string(),
            values: self.values.clone(),
        });
    }
}

impl StateStore for ExternalGraphState {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Option<String>, at: DateTime<Utc>) -> Option<String> {
        let previous = match value {
            Some(value) => self.values.insert(key.to_string(), value),
            None => self.values.remove(key),
        };
        self.record(key, at);
        previous
    }

    fn snapshot(&self) -> BTreeMap<String, String> {
        self.values.clone()
    }

    fn checkpoints(&self) -> Vec<Checkpoint> {
        self.history.iter().cloned().collect()
    }

    fn rollback(&mut self, version: u64, at: DateTime<Utc>) -> Result<(), StateError> {
        let checkpoint = self
            .history
            .iter()
            .find(|c| c.version == version)
            .ok_or(StateError::CheckpointNotFound(version))?;
        self.values = checkpoint.values.clone();
        self.record("", at);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_write_is_checkpointed() {
        let mut state = ExternalGraphState::new();
        state.set("a", Some("1".into()), Utc::now());
        state.set("b", Some("2".into()), Utc::now());
        state.set("a", None, Utc::now());

        let history = state.checkpoints();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].version, 1);
        assert_eq!(history[1].values.len(), 2);
        assert_eq!(history[2].key, "a");
        assert!(!history[2].values.contains_key("a"));
    }

    #[test]
    fn rollback_restores_values_and_appends() {
        let mut state = ExternalGraphState::new();
        state.set("mood", Some("calm".into()), Utc::now());
        state.set("mood", Some("agitated".into()), Utc::now());

        state.rollback(1, Utc::now()).unwrap();

        assert_eq!(state.get("mood").as_deref(), Some("calm"));
        assert_eq!(state.version(), 3);
    }

    #[test]
    fn rollback_to_unknown_version_fails() {
        let mut state = ExternalGraphState::new();
        let err = state.rollback(7, Utc::now()).unwrap_err();
        assert!(matches!(err, StateError::CheckpointNotFound(7)));
    }

    #[test]
    fn history_keeps_only_recent_checkpoints() {
        let mut state = ExternalGraphState::with_history_limit(3);
        for i in 0..5 {
            state.set("step", Some(i.to_string()), Utc::now());
        }

        let versions: Vec<u64> = state.checkpoints().iter().map(|c| c.version).collect();
        assert_eq!(versions, vec![3, 4, 5]);
        assert_eq!(state.version(), 5);

        let err = state.rollback(1, Utc::now()).unwrap_err();
        assert!(matches!(err, StateError::CheckpointNotFound(1)));

        state.rollback(3, Utc::now()).unwrap();
        assert_eq!(state.get("step").as_deref(), Some("2"));
        assert_eq!(state.version(), 6);
        assert_eq!(state.checkpoints().len(), 3);
    }

    #[test]
    fn default_history_is_bounded() {
        let mut state = ExternalGraphState::new();
        for _ in 0..DEFAULT_HISTORY_LIMIT + 10 {
            state.set("k", Some("v".into()), Utc::now());
        }
        assert_eq!(state.checkpoints().len(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(state.checkpoints()[0].version, 11);
    }
}
