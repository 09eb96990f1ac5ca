//! Interactive chat module
//!
//! Provides a readline-based interactive interface for comparison sessions.

mod command;
mod repl;

pub use repl::ChatRepl;
