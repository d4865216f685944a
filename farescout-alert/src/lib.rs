pub mod dispatch;
pub mod engine;
pub mod policy;
pub mod scheduler;

pub use dispatch::{ResendConfig, ResendNotifier};
pub use engine::{AlertEngine, AlertSettings, TickSummary};
pub use policy::{AlertPolicy, AlertReason, Decision};
pub use scheduler::{AlertScheduler, Schedule};
