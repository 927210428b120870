//! Chatrelay - minimal HTTP relay for chat completions
//!
//! This library exposes two stateless endpoints: `/chat` forwards a user
//! message to an OpenAI-compatible completion API and returns the reply,
//! and `/upload` echoes an uploaded file back as base64 text.

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod telemetry;
pub mod upstream;
