//! Agent-to-agent event forwarding.
//!
//! Subscribing registers a global forwarder on the target. The forwarder
//! holds only a weak reference to the subscriber, so it never keeps a
//! dropped subscriber alive, and the subscriber removes its forwarders from
//! still-live targets when it is dropped.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use sensorium_types::agent::AgentId;
use sensorium_types::event::Event;
use tracing::{debug, warn};

use super::{Agent, AgentInner};
use crate::sensor::{Delivery, Sensor};

pub(crate) struct Subscription {
    target: Weak<AgentInner>,
    forwarder: Sensor,
}

impl Agent {
    /// Start receiving `other`'s events through this agent's own listeners.
    ///
    /// Returns `false` if already subscribed to this very agent, or if
    /// `other` is this agent or shares its id. An entry left behind by a
    /// dropped agent, or by a different agent with the same id, is replaced.
    pub fn subscribe_to(&self, other: &Agent) -> bool {
        if self.ptr_eq(other) || self.id() == other.id() {
            warn!(agent_id = %self.inner.id, target = %other.id(), "refusing to subscribe an agent to itself");
            return false;
        }

        let mut subs = self
            .inner
            .subscriptions
            .lock()
            .expect("subscriptions lock poisoned");
        if let Some(existing) = subs.remove(other.id()) {
            match existing.target.upgrade() {
                Some(target) if Arc::ptr_eq(&target, &other.inner) => {
                    subs.insert(other.id().clone(), existing);
                    return false;
                }
                Some(stale) => {
                    stale.sensors.off_any(&existing.forwarder);
                    debug!(agent_id = %self.inner.id, target = %other.id(), "replacing subscription to a different agent with the same id");
                }
                None => {}
            }
        }

        let subscriber = Arc::downgrade(&self.inner);
        let forwarder = Sensor::infallible(move |event| {
            if let Some(inner) = subscriber.upgrade() {
                Agent::from_inner(inner).handle_external_event(event);
            }
        });
        other.on_any(forwarder.clone());
        subs.insert(
            other.id().clone(),
            Subscription {
                target: Arc::downgrade(&other.inner),
                forwarder,
            },
        );
        debug!(agent_id = %self.inner.id, target = %other.id(), "subscribed");
        true
    }

    /// Stop receiving `other`'s events. Returns `false` if not subscribed.
    pub fn unsubscribe_from(&self, other: &Agent) -> bool {
        let mut subs = self
            .inner
            .subscriptions
            .lock()
            .expect("subscriptions lock poisoned");
        match subs.remove(other.id()) {
            Some(subscription) => {
                other.off_any(&subscription.forwarder);
                debug!(agent_id = %self.inner.id, target = %other.id(), "unsubscribed");
                true
            }
            None => false,
        }
    }

    /// Whether a live agent with this id is among this agent's subscriptions.
    pub fn is_subscribed_to(&self, id: &AgentId) -> bool {
        let mut subs = self
            .inner
            .subscriptions
            .lock()
            .expect("subscriptions lock poisoned");
        prune_dropped(&mut subs);
        subs.contains_key(id)
    }

    /// Ids of the live agents this agent currently listens to.
    pub fn subscriptions(&self) -> Vec<AgentId> {
        let mut subs = self
            .inner
            .subscriptions
            .lock()
            .expect("subscriptions lock poisoned");
        prune_dropped(&mut subs);
        subs.keys().cloned().collect()
    }

    /// Re-dispatch an event that originated on a subscribed agent.
    ///
    /// The event keeps its original source and timestamp. It is dropped when
    /// this agent is suspended (unless it is a status change), when its
    /// source is not one of this agent's subscriptions (so events relayed
    /// through an intermediate agent are not forwarded again), or when its
    /// source carries this agent's own id.
    pub fn handle_external_event(&self, event: &Event) -> Delivery {
        if !self.inner.lifecycle.admits(event.event_type()) {
            debug!(
                agent_id = %self.inner.id,
                event_type = event.event_type(),
                source = %event.source(),
                "suspended agent dropped forwarded event"
            );
            return Delivery::Dropped;
        }
        if event.source() == self.id() || !self.is_subscribed_to(event.source()) {
            return Delivery::Dropped;
        }
        self.inner.sensors.dispatch(event)
    }
}

fn prune_dropped(subs: &mut HashMap<AgentId, Subscription>) {
    subs.retain(|_, s| s.target.strong_count() > 0);
}

impl Drop for AgentInner {
    fn drop(&mut self) {
        let subs = match self.subscriptions.get_mut() {
            Ok(subs) => subs,
            Err(poisoned) => poisoned.into_inner(),
        };
        for (_, subscription) in subs.drain() {
            if let Some(target) = subscription.target.upgrade() {
                target.sensors.off_any(&subscription.forwarder);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use sensorium_types::event::kind;

    use super::*;

    fn recorder(agent: &Agent) -> Arc<Mutex<Vec<Event>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        agent.on_any(Sensor::infallible(move |e| s.lock().unwrap().push(e.clone())));
        seen
    }

    #[test]
    fn forwarded_event_keeps_source_and_timestamp() {
        let speaker = Agent::builder().id("carla").build();
        let listener = Agent::builder().id("roberto").build();
        let seen = recorder(&listener);

        assert!(listener.subscribe_to(&speaker));
        speaker.emit("message_sent", None);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].source().as_str(), "carla");
        assert_eq!(seen[0].event_type(), "message_sent");
    }

    #[test]
    fn local_listeners_on_subscriber_see_forwarded_events() {
        let speaker = Agent::builder().build();
        let listener = Agent::builder().build();
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        listener.on(
            "message_sent",
            Sensor::infallible(move |_| {
                c.fetch_add(1, Ordering::SeqCst);
            }),
        );

        listener.subscribe_to(&speaker);
        speaker.emit("message_sent", None);
        speaker.emit("other", None);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_stops_forwarding() {
        let speaker = Agent::builder().build();
        let listener = Agent::builder().build();
        let seen = recorder(&listener);

        listener.subscribe_to(&speaker);
        assert!(listener.unsubscribe_from(&speaker));
        assert!(!listener.unsubscribe_from(&speaker));
        speaker.emit("message_sent", None);

        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(speaker.sensors().global_count(), 0);
        assert!(listener.subscriptions().is_empty());
    }

    #[test]
    fn double_subscribe_registers_one_forwarder() {
        let speaker = Agent::builder().build();
        let listener = Agent::builder().build();
        let seen = recorder(&listener);

        assert!(listener.subscribe_to(&speaker));
        assert!(!listener.subscribe_to(&speaker));
        speaker.emit("message_sent", None);

        assert_eq!(speaker.sensors().global_count(), 1);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn self_subscription_is_refused() {
        let agent = Agent::builder().build();
        assert!(!agent.subscribe_to(&agent.clone()));
        assert_eq!(agent.sensors().global_count(), 0);
    }

    #[test]
    fn suspended_subscriber_drops_forwarded_events() {
        let speaker = Agent::builder().build();
        let listener = Agent::builder().build();
        listener.subscribe_to(&speaker);
        listener.suspend();
        let seen = recorder(&listener);

        speaker.emit("message_sent", None);
        speaker.emit(kind::STATUS_CHANGED, None);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].is_status_change());
    }

    #[test]
    fn subscriptions_are_additive() {
        let a = Agent::builder().id("a").build();
        let b = Agent::builder().id("b").build();
        let listener = Agent::builder().build();
        let seen = recorder(&listener);

        listener.subscribe_to(&a);
        listener.subscribe_to(&b);
        a.emit("ping", None);
        b.emit("ping", None);
        listener.unsubscribe_from(&a);
        a.emit("ping", None);
        b.emit("ping", None);

        let sources: Vec<String> = seen
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.source().to_string())
            .collect();
        assert_eq!(sources, vec!["a", "b", "b"]);
    }

    #[test]
    fn relayed_events_are_not_forwarded_again() {
        let origin = Agent::builder().id("origin").build();
        let middle = Agent::builder().id("middle").build();
        let tail = Agent::builder().id("tail").build();
        let middle_seen = recorder(&middle);
        let tail_seen = recorder(&tail);

        middle.subscribe_to(&origin);
        tail.subscribe_to(&middle);
        origin.emit("ping", None);
        middle.emit("pong", None);

        assert_eq!(middle_seen.lock().unwrap().len(), 2);
        let tail_seen = tail_seen.lock().unwrap();
        assert_eq!(tail_seen.len(), 1);
        assert_eq!(tail_seen[0].source().as_str(), "middle");
    }

    #[test]
    fn mutual_subscription_does_not_loop() {
        let a = Agent::builder().id("a").build();
        let b = Agent::builder().id("b").build();
        let a_seen = recorder(&a);
        let b_seen = recorder(&b);

        a.subscribe_to(&b);
        b.subscribe_to(&a);
        a.emit("ping", None);

        assert_eq!(a_seen.lock().unwrap().len(), 1);
        assert_eq!(b_seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn dropped_target_is_pruned_and_can_be_resubscribed() {
        let listener = Agent::builder().id("roberto-001").build();
        let seen = recorder(&listener);
        {
            let carla = Agent::builder().id("carla-001").build();
            assert!(listener.subscribe_to(&carla));
        }
        assert!(listener.subscriptions().is_empty());

        let carla = Agent::builder().id("carla-001").build();
        assert!(listener.subscribe_to(&carla));
        assert_eq!(carla.sensors().global_count(), 1);
        carla.emit("message_sent", None);

        assert_eq!(seen.lock().unwrap().len(), 1);
        assert_eq!(listener.subscriptions(), vec![AgentId::from("carla-001")]);
    }

    #[test]
    fn live_agent_with_same_id_replaces_old_subscription() {
        let listener = Agent::builder().build();
        let first = Agent::builder().id("carla-001").build();
        let second = Agent::builder().id("carla-001").build();

        assert!(listener.subscribe_to(&first));
        assert!(listener.subscribe_to(&second));

        assert_eq!(first.sensors().global_count(), 0);
        assert_eq!(second.sensors().global_count(), 1);
    }

    #[test]
    fn agents_sharing_an_id_cannot_subscribe_to_each_other() {
        let a = Agent::builder().id("carla-001").build();
        let b = Agent::builder().id("carla-001").build();
        let a_seen = recorder(&a);
        let b_seen = recorder(&b);

        assert!(!a.subscribe_to(&b));
        assert!(!b.subscribe_to(&a));
        a.emit("message_sent", None);

        assert_eq!(a_seen.lock().unwrap().len(), 1);
        assert!(b_seen.lock().unwrap().is_empty());
        assert_eq!(a.sensors().global_count(), 1);
    }

    #[test]
    fn external_event_carrying_own_id_is_dropped() {
        let agent = Agent::builder().id("carla-001").build();
        let event = Event::new("message_sent", agent.id().clone(), chrono::Utc::now(), Default::default());
        assert!(agent.handle_external_event(&event).is_dropped());
    }

    #[test]
    fn dropping_subscriber_removes_forwarder() {
        let speaker = Agent::builder().build();
        {
            let listener = Agent::builder().build();
            listener.subscribe_to(&speaker);
            assert_eq!(speaker.sensors().global_count(), 1);
        }
        assert_eq!(speaker.sensors().global_count(), 0);
        assert_eq!(speaker.emit("ping", None).invoked(), 0);
    }
}
