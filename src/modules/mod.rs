// Declare all modules
pub mod admin;
pub mod config;
pub mod email;
pub mod logs;
pub mod settings;
pub mod store;
pub mod utils;

// No re-exports here as they're handled in lib.rs
