pub mod config;
pub mod drift;
pub mod error;
pub mod guardrails;
pub mod scheduler;
pub mod text;

pub use config::BreathConfig;
pub use drift::{DriftConfig, DriftMetrics, DriftSnapshot};
pub use error::{ConfigError, Result};
pub use guardrails::{GuardConfig, GuardFailure, GuardResult, GuardSuite};
pub use scheduler::{BreathScheduler, ResetReason, ScheduleDecision, SchedulerConfig};
