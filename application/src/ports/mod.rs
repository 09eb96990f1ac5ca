//! Ports (interfaces) implemented by outer layers.

pub mod backend;
pub mod conversation_logger;
pub mod session_observer;
