pub mod options;

pub use options::{JsonFileStore, MemoryStore, OptionsStore};
