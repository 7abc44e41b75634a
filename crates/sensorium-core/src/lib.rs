//! Event-driven lifecycle and needs engine for Sensorium agents.
//!
//! This crate holds the agent core and the traits ("ports") that the
//! infrastructure layer implements. It depends only on `sensorium-types` --
//! never on `sensorium-infra`, HTTP or LLM client crates.

pub mod agent;
pub mod clock;
pub mod communicate;
pub mod lifecycle;
pub mod protocol;
pub mod sensor;
pub mod state;

pub use agent::{Agent, AgentBuilder};
pub use communicate::{BoxCommunicator, Communicator};
pub use sensor::{Delivery, Sensor};
