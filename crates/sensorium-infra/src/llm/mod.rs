//! LLM collaborators.
//!
//! - `openai` -- OpenAI-compatible chat completions client
//! - `prompt` -- needs-aware system prompt construction
//! - `communicator` -- `LlmCommunicator`, the `Communicator` the binary uses

pub mod communicator;
pub mod openai;
pub mod prompt;

pub use communicator::LlmCommunicator;
pub use openai::ChatClient;
