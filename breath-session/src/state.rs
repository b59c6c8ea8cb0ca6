use breath_runtime::{DriftSnapshot, GuardResult};

use crate::audit::AuditLog;

/// Turns retained in the prompt and output buffers after an exhale.
pub const KEEP_TURNS: usize = 2;

/// Mutable record of one session. Mutated only by the owning loop.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Completed-or-attempted turns. Never decreases.
    pub turn_count: u64,
    pub prompt_history: Vec<String>,
    pub output_history: Vec<String>,
    pub last_drift: Option<DriftSnapshot>,
    pub last_guard: Option<GuardResult>,
    pub audit_log: AuditLog,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all but the last `keep` prompts and outputs.
    pub(crate) fn trim_history(&mut self, keep: usize) {
        trim_front(&mut self.prompt_history, keep);
        trim_front(&mut self.output_history, keep);
    }
}

fn trim_front(buffer: &mut Vec<String>, keep: usize) {
    let excess = buffer.len().saturating_sub(keep);
    buffer.drain(..excess);
}

/// Observable session mode, derived from the latest audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Accumulating history.
    Steady,
    /// History was truncated on the latest turn.
    JustReset,
}
