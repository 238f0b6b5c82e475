pub mod model;
pub mod store;

pub use model::{context, LogContext, LogEntry, LogLevel};
pub use store::LogStore;
