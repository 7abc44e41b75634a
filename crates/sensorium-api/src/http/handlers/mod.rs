//! Route handlers.
//!
//! - `protocol` -- agent card discovery and task submission
//! - `agent` -- status, needs and lifecycle control for the hosted agent

pub mod agent;
pub mod protocol;
