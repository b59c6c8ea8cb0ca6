use std::collections::BTreeMap;

use breath_runtime::{GuardFailure, ResetReason};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Scoring and scheduling outcome of one completed turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: u64,
    pub output_chars: usize,
    pub drift_score: f64,
    pub len_growth: f64,
    pub repeat_ratio: f64,
    pub guard_fail_reason: Option<GuardFailure>,
    pub guard_deltas: BTreeMap<String, Value>,
    pub scheduled_reset: bool,
    pub reset_reason: Option<ResetReason>,
}

/// Marker serialized as `"event": "EXHALE"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditEvent {
    #[serde(rename = "EXHALE")]
    Exhale,
}

/// A state reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExhaleRecord {
    pub event: AuditEvent,
    pub reason: Option<ResetReason>,
    pub turn: u64,
    pub kept_turns: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuditRecord {
    Exhale(ExhaleRecord),
    Turn(TurnRecord),
}

impl AuditRecord {
    pub fn turn(&self) -> u64 {
        match self {
            Self::Exhale(record) => record.turn,
            Self::Turn(record) => record.turn,
        }
    }

    pub fn is_exhale(&self) -> bool {
        matches!(self, Self::Exhale(_))
    }
}

/// Append-only, in-memory audit trail owned by one session.
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    entries: Vec<AuditRecord>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: AuditRecord) {
        self.entries.push(record);
    }

    pub fn entries(&self) -> &[AuditRecord] {
        &self.entries
    }

    pub fn last(&self) -> Option<&AuditRecord> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One JSON object per line, oldest first.
    pub fn to_json_lines(&self) -> serde_json::Result<String> {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&serde_json::to_string(entry)?);
            out.push('\n');
        }
        Ok(out)
    }
}
