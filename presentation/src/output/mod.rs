//! Output rendering: final reports and the live count line

pub mod console;
pub mod formatter;
pub mod live;
