//! Infrastructure implementations for Sensorium.
//!
//! Implements the ports defined in `sensorium-core`: configuration loading
//! from TOML files and an LLM-backed `Communicator` over an
//! OpenAI-compatible HTTP API.

pub mod config;
pub mod llm;
