//! Output formatting for terminal display

pub mod console;
pub mod formatter;
