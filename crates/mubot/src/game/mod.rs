mod builder;
mod snapshot;

#[cfg(test)]
pub(crate) mod fixtures;

pub use builder::*;
pub use snapshot::*;
