//! Automation behaviors and the loop that schedules them.

mod engine;
mod kind;
mod rotation;
mod scheduler;
mod settings;

pub use engine::*;
pub use kind::*;
pub use rotation::*;
pub use scheduler::*;
pub use settings::*;
