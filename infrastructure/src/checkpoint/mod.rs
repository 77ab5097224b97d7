//! Checkpoint stores for paused agent runs

mod memory;

pub use memory::MemoryCheckpointStore;
