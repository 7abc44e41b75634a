use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::StateStore;

/// Flat key/value state.
#[derive(Debug, Default)]
pub struct KeyValueState {
    values: BTreeMap<String, String>,
}

impl KeyValueState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for KeyValueState {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Option<String>, _at: DateTime<Utc>) -> Option<String> {
        match value {
            Some(value) => self.values.insert(key.to_string(), value),
            None => self.values.remove(key),
        }
    }

    fn snapshot(&self) -> BTreeMap<String, String> {
        self.values.clone()
    }
}
