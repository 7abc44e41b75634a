//! The agent: identity, lifecycle, sensors, subscriptions, needs and state.
//!
//! `Agent` is a cheap-to-clone handle over shared internals. Every method
//! takes `&self`, so listeners can hold a clone and call back into the agent
//! (emit, read needs, unsubscribe) while a dispatch is in progress.
//!
//! - `needs` -- the motivational layer (`update_needs`, satisfaction, context)
//! - `subscription` -- forwarding another agent's events into this one

pub mod needs;
pub mod subscription;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex};

use sensorium_types::agent::{
    AgentCard, AgentId, AgentStatus, Authorizations, Goal, Role, Safety,
};
use sensorium_types::config::{AgentProfile, AgentSettings};
use sensorium_types::error::StateError;
use sensorium_types::event::{event_data, kind, Event, EventData};
use sensorium_types::need::Need;
use serde_json::json;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::lifecycle::Lifecycle;
use crate::sensor::{Delivery, Sensor, SensorRegistry};
use crate::state::{state_store_for, Checkpoint, StateStore};

use subscription::Subscription;

pub(crate) struct AgentInner {
    id: AgentId,
    role: Role,
    goals: Vec<Goal>,
    kind: Option<String>,
    skills: Vec<String>,
    authorizations: Authorizations,
    safety: Safety,
    settings: AgentSettings,
    lifecycle: Lifecycle,
    sensors: SensorRegistry,
    subscriptions: Mutex<HashMap<AgentId, Subscription>>,
    needs: Mutex<Vec<Need>>,
    state: Mutex<Box<dyn StateStore>>,
    clock: Arc<dyn Clock>,
}

/// A conversational agent's event-driven core.
#[derive(Clone)]
pub struct Agent {
    inner: Arc<AgentInner>,
}

impl Agent {
    pub fn builder() -> AgentBuilder {
        AgentBuilder::default()
    }

    /// Build an agent from a configuration profile.
    pub fn from_profile(profile: &AgentProfile, settings: AgentSettings) -> Self {
        let mut builder = Agent::builder()
            .role(profile.role.clone())
            .goals(profile.goals.clone())
            .needs(profile.needs.clone())
            .skills(profile.skills.clone())
            .authorizations(profile.authorizations.clone())
            .safety(profile.safety.clone())
            .settings(settings);
        if let Some(id) = &profile.id {
            builder = builder.id(id.as_str());
        }
        if let Some(kind) = &profile.kind {
            builder = builder.kind(kind.as_str());
        }
        builder.build()
    }

    pub(crate) fn from_inner(inner: Arc<AgentInner>) -> Self {
        Self { inner }
    }

    pub fn id(&self) -> &AgentId {
        &self.inner.id
    }

    pub fn role(&self) -> &Role {
        &self.inner.role
    }

    pub fn goals(&self) -> &[Goal] {
        &self.inner.goals
    }

    pub fn kind(&self) -> Option<&str> {
        self.inner.kind.as_deref()
    }

    pub fn skills(&self) -> &[String] {
        &self.inner.skills
    }

    pub fn authorizations(&self) -> &Authorizations {
        &self.inner.authorizations
    }

    pub fn safety(&self) -> &Safety {
        &self.inner.safety
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.inner.settings
    }

    /// Display name: the role name, or `Agent-<id>` when the role is unnamed.
    pub fn display_name(&self) -> String {
        if self.inner.role.name.is_empty() {
            format!("Agent-{}", self.inner.id)
        } else {
            self.inner.role.name.clone()
        }
    }

    /// Discovery descriptor for a protocol server.
    pub fn card(&self) -> AgentCard {
        AgentCard {
            name: self.display_name(),
            description: self.inner.role.content.clone(),
            version: self.inner.settings.card_version.clone(),
            url: self.inner.settings.card_url.clone(),
            capabilities: self.inner.settings.capabilities.clone(),
            skills: self.inner.skills.clone(),
        }
    }

    /// Whether two handles refer to the same agent.
    pub fn ptr_eq(&self, other: &Agent) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // -- Lifecycle --

    pub fn status(&self) -> AgentStatus {
        self.inner.lifecycle.status()
    }

    /// Set the status without validation or events (orchestration loops use
    /// this for `Working`, `Waiting`, `Error`, `Deleted`).
    pub fn set_status(&self, status: AgentStatus) {
        self.inner.lifecycle.set(status);
    }

    /// Pause the agent. Emits `status_changed`, which passes the gate.
    pub fn suspend(&self) -> Delivery {
        let transition = self.inner.lifecycle.suspend();
        info!(agent_id = %self.inner.id, previous = %transition.previous, "agent suspended");
        self.emit(kind::STATUS_CHANGED, Some(transition.to_event_data()))
    }

    /// Reactivate a suspended or freshly created agent.
    ///
    /// Returns `false` without emitting anything from any other status.
    pub fn resume(&self) -> bool {
        match self.inner.lifecycle.resume() {
            Some(transition) => {
                info!(agent_id = %self.inner.id, previous = %transition.previous, "agent resumed");
                self.emit(kind::STATUS_CHANGED, Some(transition.to_event_data()));
                true
            }
            None => false,
        }
    }

    // -- Events --

    /// Emit an event from this agent.
    ///
    /// While suspended, everything except `status_changed` is dropped.
    /// Otherwise listeners for `event_type` run first, then global listeners,
    /// each in registration order, synchronously and depth-first.
    pub fn emit(&self, event_type: &str, data: Option<EventData>) -> Delivery {
        if !self.inner.lifecycle.admits(event_type) {
            debug!(agent_id = %self.inner.id, event_type, "suspended agent dropped event");
            return Delivery::Dropped;
        }
        let event = Event::new(
            event_type,
            self.inner.id.clone(),
            self.inner.clock.now(),
            data.unwrap_or_default(),
        );
        self.inner.sensors.dispatch(&event)
    }

    pub fn on(&self, event_type: &str, sensor: Sensor) {
        self.inner.sensors.on(event_type, sensor);
    }

    /// No-op when `sensor` is not registered for `event_type`.
    pub fn off(&self, event_type: &str, sensor: &Sensor) {
        self.inner.sensors.off(event_type, sensor);
    }

    pub fn on_any(&self, sensor: Sensor) {
        self.inner.sensors.on_any(sensor);
    }

    /// No-op when `sensor` is not registered globally.
    pub fn off_any(&self, sensor: &Sensor) {
        self.inner.sensors.off_any(sensor);
    }

    pub fn sensors(&self) -> &SensorRegistry {
        &self.inner.sensors
    }

    // -- State --

    /// Change internal state in response to a stimulus and emit
    /// `state_changed` with `{key, value, previous_value}`.
    ///
    /// A `None` value removes the key. Returns the previous value.
    pub fn adapt(&self, key: &str, value: Option<&str>) -> Option<String> {
        let now = self.inner.clock.now();
        let previous = self
            .inner
            .state
            .lock()
            .expect("agent state lock poisoned")
            .set(key, value.map(str::to_string), now);
        self.emit(
            kind::STATE_CHANGED,
            Some(event_data(json!({
                "key": key,
                "value": value,
                "previous_value": previous,
            }))),
        );
        previous
    }

    pub fn sense(&self, key: &str) -> Option<String> {
        self.inner
            .state
            .lock()
            .expect("agent state lock poisoned")
            .get(key)
    }

    pub fn state_snapshot(&self) -> BTreeMap<String, String> {
        self.inner
            .state
            .lock()
            .expect("agent state lock poisoned")
            .snapshot()
    }

    pub fn state_checkpoints(&self) -> Vec<Checkpoint> {
        self.inner
            .state
            .lock()
            .expect("agent state lock poisoned")
            .checkpoints()
    }

    /// Restore a checkpoint (checkpointing stores only).
    pub fn rollback_state(&self, version: u64) -> Result<(), StateError> {
        let now = self.inner.clock.now();
        self.inner
            .state
            .lock()
            .expect("agent state lock poisoned")
            .rollback(version, now)
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.inner.id)
            .field("role", &self.inner.role.name)
            .field("status", &self.status())
            .finish()
    }
}

/// Builder for `Agent`. Every field is optional.
#[derive(Default)]
pub struct AgentBuilder {
    id: Option<AgentId>,
    role: Role,
    goals: Vec<Goal>,
    kind: Option<String>,
    skills: Vec<String>,
    authorizations: Authorizations,
    safety: Safety,
    status: AgentStatus,
    needs: Vec<Need>,
    settings: AgentSettings,
    state: Option<Box<dyn StateStore>>,
    clock: Option<Arc<dyn Clock>>,
}

impl AgentBuilder {
    pub fn id(mut self, id: impl Into<AgentId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn goals(mut self, goals: Vec<Goal>) -> Self {
        self.goals = goals;
        self
    }

    pub fn goal(mut self, goal: Goal) -> Self {
        self.goals.push(goal);
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn skills(mut self, skills: Vec<String>) -> Self {
        self.skills = skills;
        self
    }

    pub fn authorizations(mut self, authorizations: Authorizations) -> Self {
        self.authorizations = authorizations;
        self
    }

    pub fn safety(mut self, safety: Safety) -> Self {
        self.safety = safety;
        self
    }

    pub fn status(mut self, status: AgentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn needs(mut self, needs: Vec<Need>) -> Self {
        self.needs = needs;
        self
    }

    pub fn need(mut self, need: Need) -> Self {
        self.needs.push(need);
        self
    }

    pub fn settings(mut self, settings: AgentSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Override the store selected by `settings.framework`.
    pub fn state_store(mut self, store: Box<dyn StateStore>) -> Self {
        self.state = Some(store);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Agent {
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let now = clock.now();

        // Keyed by name: a later need replaces an earlier one in place.
        let mut needs: Vec<Need> = Vec::with_capacity(self.needs.len());
        for need in self.needs {
            let mut need = need.normalized();
            need.last_updated = now;
            match needs.iter_mut().find(|n| n.name == need.name) {
                Some(existing) => *existing = need,
                None => needs.push(need),
            }
        }

        let state = self
            .state
            .unwrap_or_else(|| state_store_for(self.settings.framework));
        let id = self.id.unwrap_or_else(AgentId::generate);
        debug!(agent_id = %id, needs = needs.len(), "agent constructed");

        Agent {
            inner: Arc::new(AgentInner {
                id,
                role: self.role,
                goals: self.goals,
                kind: self.kind,
                skills: self.skills,
                authorizations: self.authorizations,
                safety: self.safety,
                settings: self.settings,
                lifecycle: Lifecycle::new(self.status),
                sensors: SensorRegistry::new(),
                subscriptions: Mutex::new(HashMap::new()),
                needs: Mutex::new(needs),
                state: Mutex::new(state),
                clock,
            }),
        }
    }
}
