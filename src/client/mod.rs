//! Terminal interaction for the terminalai CLI.
//!
//! - A spinner on stderr while the model is working
//! - Line-buffered prompts for the API key, model and setup choices

pub mod input;
pub mod spinner;

pub use input::Console;
pub use spinner::Spinner;
