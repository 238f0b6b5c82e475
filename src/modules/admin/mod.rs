pub mod actions;
pub mod dashboard;

pub use actions::{AdminActions, Notice};
pub use dashboard::{summarize, DashboardSummary, RelayStatus};
