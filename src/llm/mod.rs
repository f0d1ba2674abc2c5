//! Model client for turning a query into a shell command.
//!
//! One backend: OpenRouter's OpenAI-compatible chat-completion endpoint. The
//! raw reply goes through [`clean::clean_command`] before it reaches the caller.

pub mod clean;
pub mod openrouter;

pub use openrouter::OpenRouterClient;
