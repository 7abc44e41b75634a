//! Per-agent listener registry.
//!
//! Local sensors are keyed by event type; global sensors see every event.
//! Dispatch takes a snapshot of the matching listeners and releases all locks
//! before invoking them, so a listener may emit, register or unregister on
//! the same agent without deadlocking. Changes made during a dispatch apply
//! from the next dispatch on.

use std::sync::RwLock;

use dashmap::DashMap;
use sensorium_types::event::Event;
use tracing::{debug, warn};

use super::Sensor;

/// Outcome of a single `emit` or forwarded dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The suspension gate dropped the event; no listener ran.
    Dropped,
    /// Listeners ran. Failures were logged and did not stop the fan-out.
    Dispatched { invoked: usize, failed: usize },
}

impl Delivery {
    pub fn is_dropped(&self) -> bool {
        matches!(self, Delivery::Dropped)
    }

    /// Number of listeners invoked (0 when dropped).
    pub fn invoked(&self) -> usize {
        match self {
            Delivery::Dropped => 0,
            Delivery::Dispatched { invoked, .. } => *invoked,
        }
    }

    pub fn failed(&self) -> usize {
        match self {
            Delivery::Dropped => 0,
            Delivery::Dispatched { failed, .. } => *failed,
        }
    }
}

/// Insertion-ordered listener lists for one agent.
#[derive(Debug, Default)]
pub struct SensorRegistry {
    local: DashMap<String, Vec<Sensor>>,
    global: RwLock<Vec<Sensor>>,
}

impl SensorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one event type. Duplicates are allowed and
    /// are invoked once per registration.
    pub fn on(&self, event_type: &str, sensor: Sensor) {
        self.local
            .entry(event_type.to_string())
            .or_default()
            .push(sensor);
        debug!(event_type, "registered local sensor");
    }

    /// Remove the first registration of `sensor` for `event_type`.
    ///
    /// Returns `false` (and does nothing) if it was not registered.
    pub fn off(&self, event_type: &str, sensor: &Sensor) -> bool {
        let Some(mut list) = self.local.get_mut(event_type) else {
            return false;
        };
        match list.iter().position(|s| s.same_as(sensor)) {
            Some(pos) => {
                list.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Register a listener for every event type.
    pub fn on_any(&self, sensor: Sensor) {
        self.global
            .write()
            .expect("sensor registry lock poisoned")
            .push(sensor);
        debug!("registered global sensor");
    }

    /// Remove the first global registration of `sensor`.
    pub fn off_any(&self, sensor: &Sensor) -> bool {
        let mut global = self.global.write().expect("sensor registry lock poisoned");
        match global.iter().position(|s| s.same_as(sensor)) {
            Some(pos) => {
                global.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn local_count(&self, event_type: &str) -> usize {
        self.local.get(event_type).map(|l| l.len()).unwrap_or(0)
    }

    pub fn global_count(&self) -> usize {
        self.global.read().expect("sensor registry lock poisoned").len()
    }

    /// Listeners an event of `event_type` would reach, in call order:
    /// local registrations first, then global ones.
    fn snapshot(&self, event_type: &str) -> Vec<Sensor> {
        let mut sensors: Vec<Sensor> = self
            .local
            .get(event_type)
            .map(|l| l.value().clone())
            .unwrap_or_default();
        sensors.extend(
            self.global
                .read()
                .expect("sensor registry lock poisoned")
                .iter()
                .cloned(),
        );
        sensors
    }

    /// Invoke every matching listener synchronously, in registration order.
    ///
    /// A failing listener is logged and counted; the remaining listeners
    /// still run.
    pub fn dispatch(&self, event: &Event) -> Delivery {
        let sensors = self.snapshot(event.event_type());
        let mut failed = 0;
        for sensor in &sensors {
            if let Err(err) = sensor.sense(event) {
                failed += 1;
                warn!(
                    event_type = event.event_type(),
                    source = %event.source(),
                    error = %err,
                    "sensor failed during dispatch"
                );
            }
        }
        Delivery::Dispatched {
            invoked: sensors.len(),
            failed,
        }
    }
}
