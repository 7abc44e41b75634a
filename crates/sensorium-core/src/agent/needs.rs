//! Motivational layer: decay over time, satiation by events, prompt context.

use std::collections::BTreeMap;

use sensorium_types::event::{event_data, kind};
use sensorium_types::need::Need;
use serde_json::json;
use tracing::debug;

use super::Agent;
use crate::clock::seconds_between;

/// Event type recorded on `need_satisfied` when an impact is applied.
pub const IMPACT_EVENT_TYPE: &str = "impact";

impl Agent {
    /// Snapshot of every need, in insertion order.
    pub fn needs(&self) -> Vec<Need> {
        self.inner
            .needs
            .lock()
            .expect("needs lock poisoned")
            .clone()
    }

    pub fn get_need_by_name(&self, name: &str) -> Option<Need> {
        self.inner
            .needs
            .lock()
            .expect("needs lock poisoned")
            .iter()
            .find(|n| n.name == name)
            .cloned()
    }

    /// Decay every need by the time elapsed since it was last touched.
    ///
    /// Emits `needs_updated` with the full value map whenever the agent has
    /// at least one need, even if nothing actually changed.
    pub fn update_needs(&self) -> BTreeMap<String, f64> {
        let now = self.inner.clock.now();
        let values: BTreeMap<String, f64> = {
            let mut needs = self.inner.needs.lock().expect("needs lock poisoned");
            for need in needs.iter_mut() {
                let elapsed = seconds_between(need.last_updated, now);
                if elapsed > 0.0 {
                    need.decay(elapsed);
                    need.last_updated = now;
                }
            }
            needs.iter().map(|n| (n.name.clone(), n.value)).collect()
        };

        if !values.is_empty() {
            self.emit(kind::NEEDS_UPDATED, Some(event_data(json!({ "needs": values }))));
        }
        values
    }

    /// Satiate every need whose `satiation_event_type` is `event_type`.
    ///
    /// `amount` overrides each need's own `satiation_rate`. Emits one
    /// `need_satisfied` per matching need and returns their new values.
    pub fn process_need_satisfaction(
        &self,
        event_type: &str,
        amount: Option<f64>,
    ) -> BTreeMap<String, f64> {
        let now = self.inner.clock.now();
        let changes: Vec<(String, f64, f64)> = {
            let mut needs = self.inner.needs.lock().expect("needs lock poisoned");
            needs
                .iter_mut()
                .filter(|n| n.satiation_event_type == event_type)
                .map(|need| {
                    let old_value = need.value;
                    let new_value = need.satiate(amount);
                    need.last_updated = need.last_updated.max(now);
                    (need.name.clone(), old_value, new_value)
                })
                .collect()
        };

        let mut satisfied = BTreeMap::new();
        for (name, old_value, new_value) in changes {
            debug!(agent_id = %self.inner.id, need = %name, old_value, new_value, "need satisfied");
            self.emit(
                kind::NEED_SATISFIED,
                Some(event_data(json!({
                    "need_name": name,
                    "old_value": old_value,
                    "new_value": new_value,
                    "event_type": event_type,
                }))),
            );
            satisfied.insert(name, new_value);
        }
        satisfied
    }

    /// Nudge one need by a signed impact in `[-1, 1]` (typically the
    /// `purpose_introspection` of a generated reply).
    ///
    /// Returns the new value, or `None` if the agent has no such need.
    pub fn apply_need_impact(&self, name: &str, impact: f64) -> Option<f64> {
        let now = self.inner.clock.now();
        let (old_value, new_value) = {
            let mut needs = self.inner.needs.lock().expect("needs lock poisoned");
            let need = needs.iter_mut().find(|n| n.name == name)?;
            let old_value = need.value;
            let new_value = need.apply_impact(impact);
            need.last_updated = need.last_updated.max(now);
            (old_value, new_value)
        };

        self.emit(
            kind::NEED_SATISFIED,
            Some(event_data(json!({
                "need_name": name,
                "old_value": old_value,
                "new_value": new_value,
                "event_type": IMPACT_EVENT_TYPE,
            }))),
        );
        Some(new_value)
    }

    /// Human-readable needs summary for prompt construction.
    ///
    /// Updates needs first, so it emits `needs_updated` as a side effect.
    pub fn get_needs_context(&self) -> String {
        let empty = self.inner.needs.lock().expect("needs lock poisoned").is_empty();
        if empty {
            return "No active needs.".to_string();
        }

        self.update_needs();

        let mut lines = vec!["Current Internal Needs:".to_string()];
        for need in self.needs() {
            lines.push(format!("  - {}", need.to_context_string()));
            if !need.description.is_empty() {
                lines.push(format!("    ({})", need.description));
            }
        }
        lines.join("\n")
    }
}
