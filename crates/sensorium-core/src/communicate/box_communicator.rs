//! BoxCommunicator -- object-safe dynamic dispatch wrapper for Communicator.
//!
//! 1. `CommunicatorDyn` is an object-safe mirror with a boxed future
//! 2. Blanket-impl `CommunicatorDyn` for all `T: Communicator`
//! 3. `BoxCommunicator` wraps `Box<dyn CommunicatorDyn>` and itself
//!    implements `Communicator`, so it plugs into `TaskHandler`

use std::future::Future;
use std::pin::Pin;

use sensorium_types::error::CommError;

use super::Communicator;
use crate::agent::Agent;

/// Object-safe version of [`Communicator`].
pub trait CommunicatorDyn: Send + Sync {
    fn agent(&self) -> &Agent;

    fn communicate_boxed<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, CommError>> + Send + 'a>>;
}

impl<T: Communicator> CommunicatorDyn for T {
    fn agent(&self) -> &Agent {
        Communicator::agent(self)
    }

    fn communicate_boxed<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, CommError>> + Send + 'a>> {
        Box::pin(self.communicate(prompt))
    }
}

/// Type-erased communicator, for hosts that pick the implementation at
/// runtime (a live LLM client, or a stub in tests).
pub struct BoxCommunicator {
    inner: Box<dyn CommunicatorDyn>,
}

impl BoxCommunicator {
    pub fn new<T: Communicator + 'static>(communicator: T) -> Self {
        Self {
            inner: Box::new(communicator),
        }
    }
}

impl Communicator for BoxCommunicator {
    fn agent(&self) -> &Agent {
        self.inner.agent()
    }

    fn communicate(&self, prompt: &str) -> impl Future<Output = Result<String, CommError>> + Send {
        async move { self.inner.communicate_boxed(prompt).await }
    }
}

impl std::fmt::Debug for BoxCommunicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxCommunicator")
            .field("agent", self.inner.agent().id())
            .finish()
    }
}
