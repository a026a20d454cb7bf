//! I/O helpers: completion backends, prompts and configuration.

pub mod backend;
pub mod command;
pub mod completion;
pub mod config;
pub mod ollama;
pub mod process;
pub mod prompt;
