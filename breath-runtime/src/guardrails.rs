use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::text;

/// Phrases that signal the generator is looping back on itself. Matched
/// against the lowercased output.
pub const SELF_REFERENCE_NEEDLES: &[&str] = &[
    "as i said",
    "as i mentioned",
    "i already told",
    "i have said",
    "如我所說",
    "如我提到",
    "我剛剛說過",
];

/// Line prefixes that mark a line as meta commentary for the phase check.
const META_LINE_MARKERS: &[char] = &['[', '（'];

// ---------------------------------------------------------------------------
// GuardConfig - Thresholds for the four checks
// ---------------------------------------------------------------------------

/// Thresholds for [`GuardSuite`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// C1: maximum output length in characters.
    pub max_output_chars: usize,
    /// C2: self-reference hits tolerated before the check fails.
    pub max_self_reference_hits: u32,
    /// C3: expected share of meta lines.
    pub phase_ratio_target: f64,
    /// C3: allowed absolute distance from the target.
    pub phase_ratio_epsilon: f64,
    /// C4: currently has no effect; the presence check always passes.
    pub guard_presence_required: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            max_output_chars: 4000,
            max_self_reference_hits: 3,
            phase_ratio_target: 0.5,
            phase_ratio_epsilon: 0.35,
            guard_presence_required: true,
        }
    }
}

// ---------------------------------------------------------------------------
// GuardFailure - Which check failed
// ---------------------------------------------------------------------------

/// A failed guard check, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuardFailure {
    #[serde(rename = "C1_FAIL_output_overrun")]
    Overrun,
    #[serde(rename = "C2_FAIL_spiral_self_lock")]
    SelfLock,
    #[serde(rename = "C3_FAIL_phase_out_of_band")]
    PhaseOutOfBand,
    #[serde(rename = "C4_FAIL_guard_missing")]
    GuardMissing,
}

impl GuardFailure {
    /// Evaluation and reporting order.
    pub const ORDER: [GuardFailure; 4] = [
        GuardFailure::Overrun,
        GuardFailure::SelfLock,
        GuardFailure::PhaseOutOfBand,
        GuardFailure::GuardMissing,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::Overrun => "C1_FAIL_output_overrun",
            Self::SelfLock => "C2_FAIL_spiral_self_lock",
            Self::PhaseOutOfBand => "C3_FAIL_phase_out_of_band",
            Self::GuardMissing => "C4_FAIL_guard_missing",
        }
    }
}

impl std::fmt::Display for GuardFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// GuardResult - Outcome of one check pass
// ---------------------------------------------------------------------------

/// Outcome of [`GuardSuite::check`] for a single output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardResult {
    pub overrun_ok: bool,
    pub self_lock_ok: bool,
    pub phase_balance_ok: bool,
    pub guard_present_ok: bool,
    /// First failing check in [`GuardFailure::ORDER`], if any.
    pub fail_reason: Option<GuardFailure>,
    /// Measured values and thresholds, for the audit trail only.
    pub deltas: BTreeMap<String, Value>,
}

impl GuardResult {
    pub fn failed(&self) -> bool {
        self.fail_reason.is_some()
    }

    fn passed(&self, check: GuardFailure) -> bool {
        match check {
            GuardFailure::Overrun => self.overrun_ok,
            GuardFailure::SelfLock => self.self_lock_ok,
            GuardFailure::PhaseOutOfBand => self.phase_balance_ok,
            GuardFailure::GuardMissing => self.guard_present_ok,
        }
    }
}

// ---------------------------------------------------------------------------
// GuardSuite - The four checks plus the self-reference counter
// ---------------------------------------------------------------------------

/// Runs the C1–C4 checks against generated text.
///
/// C2 is the only stateful check: every output containing a self-reference
/// phrase bumps a counter that persists across calls until [`reset`] is
/// invoked. C4 is a placeholder and always passes, whatever
/// `guard_presence_required` says.
///
/// [`reset`]: GuardSuite::reset
#[derive(Debug, Clone, Default)]
pub struct GuardSuite {
    config: GuardConfig,
    self_reference_hits: u32,
}

impl GuardSuite {
    pub fn new(config: GuardConfig) -> Self {
        Self {
            config,
            self_reference_hits: 0,
        }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Running count of outputs that contained a self-reference phrase.
    pub fn self_reference_hits(&self) -> u32 {
        self.self_reference_hits
    }

    pub fn check(&mut self, output: &str) -> GuardResult {
        let mut deltas: BTreeMap<String, Value> = BTreeMap::new();

        let output_chars = output.chars().count();
        let overrun_ok = output_chars <= self.config.max_output_chars;
        deltas.insert("output_chars".into(), json!(output_chars));
        deltas.insert("max_output_chars".into(), json!(self.config.max_output_chars));

        if contains_self_reference(output) {
            self.self_reference_hits = self.self_reference_hits.saturating_add(1);
        }
        let self_lock_ok = self.self_reference_hits <= self.config.max_self_reference_hits;
        deltas.insert("self_ref_hits".into(), json!(self.self_reference_hits));
        deltas.insert(
            "max_self_ref_hits".into(),
            json!(self.config.max_self_reference_hits),
        );

        let phase_ratio = phase_ratio(output);
        let phase_balance_ok = (phase_ratio - self.config.phase_ratio_target).abs()
            <= self.config.phase_ratio_epsilon;
        deltas.insert("phase_ratio".into(), json!(phase_ratio));
        deltas.insert(
            "phase_ratio_target".into(),
            json!(self.config.phase_ratio_target),
        );
        deltas.insert(
            "phase_ratio_epsilon".into(),
            json!(self.config.phase_ratio_epsilon),
        );

        let guard_present_ok = true;
        deltas.insert("guard_present".into(), json!(guard_present_ok));

        let mut result = GuardResult {
            overrun_ok,
            self_lock_ok,
            phase_balance_ok,
            guard_present_ok,
            fail_reason: None,
            deltas,
        };
        let fail_reason = GuardFailure::ORDER
            .into_iter()
            .find(|check| !result.passed(*check));
        result.fail_reason = fail_reason;
        result
    }

    /// Zero the self-reference counter. The other checks hold no state.
    pub fn reset(&mut self) {
        self.self_reference_hits = 0;
    }
}

/// Whether the lowercased text contains any [`SELF_REFERENCE_NEEDLES`] entry.
pub fn contains_self_reference(text: &str) -> bool {
    let lowered = text.to_lowercase();
    SELF_REFERENCE_NEEDLES
        .iter()
        .any(|needle| lowered.contains(needle))
}

/// Fraction of non-blank lines whose trimmed form starts with a meta marker.
/// Zero when there are no non-blank lines.
pub fn phase_ratio(text: &str) -> f64 {
    let mut total = 0usize;
    let mut meta = 0usize;
    for line in text::split_lines(text)
        .map(text::trim)
        .filter(|l| !l.is_empty())
    {
        total += 1;
        if line.starts_with(META_LINE_MARKERS) {
            meta += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    meta as f64 / total as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
