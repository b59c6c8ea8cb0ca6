//! Session orchestration for the breath control loop.
//!
//! [`BreathLoop`] owns the session state and ties the generator to the drift,
//! guard and scheduling components from `breath_runtime`.

pub mod audit;
pub mod breath_loop;
pub mod state;

pub use audit::{AuditEvent, AuditLog, AuditRecord, ExhaleRecord, TurnRecord};
pub use breath_loop::BreathLoop;
pub use state::{KEEP_TURNS, SessionMode, SessionState};
