mod process;
mod reader;

#[cfg(test)]
pub mod mock;

pub use process::*;
pub use reader::{MAX_TEXT_LEN, MemoryReader, ReadMemory, decode_text};

#[cfg(test)]
pub use mock::{MockMemoryBuilder, MockMemoryReader};
