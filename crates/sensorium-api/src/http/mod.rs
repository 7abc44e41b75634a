//! HTTP layer: the agent-interoperability endpoints plus a small
//! `/api/v1/` management surface in the envelope format.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
