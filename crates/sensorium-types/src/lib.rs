//! Shared domain types for Sensorium.
//!
//! This crate contains the domain types exchanged between the agent engine,
//! the infrastructure adapters and the binary: agent identity and lifecycle,
//! events, homeostatic needs, protocol tasks, configuration and errors.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod agent;
pub mod config;
pub mod error;
pub mod event;
pub mod need;
pub mod response;
pub mod task;
