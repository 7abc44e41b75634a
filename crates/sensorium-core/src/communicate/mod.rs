//! The `Communicator` capability: turn a prompt into a reply.
//!
//! The engine never calls a model itself. Hosts pair an `Agent` with a
//! `Communicator` implementation (an LLM client in sensorium-infra, a canned
//! responder in tests) and hand it to the protocol adapter.

pub mod box_communicator;

use std::future::Future;

use sensorium_types::error::CommError;

use crate::agent::Agent;

pub use box_communicator::BoxCommunicator;

/// An agent that can answer a prompt.
///
/// Uses native async fn in traits (RPITIT). Wrap implementations in
/// `BoxCommunicator` when the concrete type must be erased.
pub trait Communicator: Send + Sync {
    /// The agent whose identity, needs and events this communicator drives.
    fn agent(&self) -> &Agent;

    /// Produce a reply to `prompt`.
    ///
    /// Timeouts and provider failures are reported as `CommError`; the
    /// caller decides what to do with them.
    fn communicate(&self, prompt: &str) -> impl Future<Output = Result<String, CommError>> + Send;
}
