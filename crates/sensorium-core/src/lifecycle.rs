//! Agent lifecycle state machine.
//!
//! Only two transitions are validated: `suspend` (from anywhere) and
//! `resume` (from `Suspended` or `Initiated`). Every other status is set
//! directly by orchestration code. The sole behavioural effect of status is
//! the suspension gate in `admits`.

use std::sync::Mutex;

use sensorium_types::agent::AgentStatus;
use sensorium_types::event::{kind, EventData};
use serde_json::json;
use tracing::debug;

/// A status change, reported as the payload of `status_changed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub previous: AgentStatus,
    pub current: AgentStatus,
}

impl Transition {
    pub fn to_event_data(&self) -> EventData {
        sensorium_types::event::event_data(json!({
            "previous_status": self.previous,
            "current_status": self.current,
        }))
    }
}

#[derive(Debug)]
pub struct Lifecycle {
    status: Mutex<AgentStatus>,
}

impl Lifecycle {
    pub fn new(initial: AgentStatus) -> Self {
        Self {
            status: Mutex::new(initial),
        }
    }

    pub fn status(&self) -> AgentStatus {
        *self.status.lock().expect("lifecycle lock poisoned")
    }

    /// Unvalidated assignment. Returns the previous status.
    pub fn set(&self, status: AgentStatus) -> AgentStatus {
        let mut current = self.status.lock().expect("lifecycle lock poisoned");
        let previous = *current;
        *current = status;
        debug!(%previous, current = %status, "status set directly");
        previous
    }

    /// Move to `Suspended`. Always succeeds, even when already suspended.
    pub fn suspend(&self) -> Transition {
        let previous = self.set(AgentStatus::Suspended);
        Transition {
            previous,
            current: AgentStatus::Suspended,
        }
    }

    /// Move to `Active` from `Suspended` or `Initiated`; `None` otherwise.
    pub fn resume(&self) -> Option<Transition> {
        let mut current = self.status.lock().expect("lifecycle lock poisoned");
        match *current {
            AgentStatus::Suspended | AgentStatus::Initiated => {
                let previous = *current;
                *current = AgentStatus::Active;
                Some(Transition {
                    previous,
                    current: AgentStatus::Active,
                })
            }
            other => {
                debug!(status = %other, "resume ignored");
                None
            }
        }
    }

    /// Suspension gate: a suspended agent only processes `status_changed`.
    pub fn admits(&self, event_type: &str) -> bool {
        self.status() != AgentStatus::Suspended || event_type == kind::STATUS_CHANGED
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new(AgentStatus::Initiated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suspend_from_any_state() {
        for status in [
            AgentStatus::Initiated,
            AgentStatus::Active,
            AgentStatus::Working,
            AgentStatus::Suspended,
            AgentStatus::Error,
        ] {
            let lifecycle = Lifecycle::new(status);
            let t = lifecycle.suspend();
            assert_eq!(t.previous, status);
            assert_eq!(lifecycle.status(), AgentStatus::Suspended);
        }
    }

    #[test]
    fn resume_only_from_suspended_or_initiated() {
        assert!(Lifecycle::new(AgentStatus::Initiated).resume().is_some());
        assert!(Lifecycle::new(AgentStatus::Suspended).resume().is_some());
        for status in [
            AgentStatus::Active,
            AgentStatus::Working,
            AgentStatus::Waiting,
            AgentStatus::Error,
            AgentStatus::Deleted,
        ] {
            let lifecycle = Lifecycle::new(status);
            assert!(lifecycle.resume().is_none());
            assert_eq!(lifecycle.status(), status);
        }
    }

    #[test]
    fn gate_admits_only_status_changes_while_suspended() {
        let lifecycle = Lifecycle::default();
        assert!(lifecycle.admits("message_sent"));
        lifecycle.suspend();
        assert!(!lifecycle.admits("message_sent"));
        assert!(lifecycle.admits(kind::STATUS_CHANGED));
    }

    #[test]
    fn transition_payload_uses_lowercase_names() {
        let t = Transition {
            previous: AgentStatus::Active,
            current: AgentStatus::Suspended,
        };
        let data = t.to_event_data();
        assert_eq!(data["previous_status"], json!("active"));
        assert_eq!(data["current_status"], json!("suspended"));
    }
}
