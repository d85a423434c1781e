//! Synthesized keyboard input.

mod actuator;
mod key;
mod sink;

pub use actuator::*;
pub use key::*;
pub use sink::*;
