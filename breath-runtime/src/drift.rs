use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::text;

/// Lower bound applied to the growth ratio before taking its logarithm.
const MIN_LOG_GROWTH: f64 = 1e-6;

// ---------------------------------------------------------------------------
// DriftConfig - Window and weights for drift scoring
// ---------------------------------------------------------------------------

/// Tuning for [`DriftMetrics`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    /// Number of most recent outputs considered.
    pub window: usize,
    /// Weight of `ln(length_growth)` in the drift score.
    pub length_growth_weight: f64,
    /// Weight of the repeat ratio in the drift score.
    pub repeat_weight: f64,
    /// Scores at or above this value count as drifting.
    pub drift_threshold: f64,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            window: 8,
            length_growth_weight: 0.6,
            repeat_weight: 0.4,
            drift_threshold: 1.2,
        }
    }
}

// ---------------------------------------------------------------------------
// DriftSnapshot - One turn's drift measurement
// ---------------------------------------------------------------------------

/// Drift measurement for the most recent output.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DriftSnapshot {
    pub drift_score: f64,
    /// Latest output length over the windowed median length.
    pub length_growth: f64,
    /// Token overlap of the latest output with the one before it, in `[0, 1]`.
    pub repeat_ratio: f64,
}

impl DriftSnapshot {
    /// Snapshot reported when there is not enough history to compare.
    pub const ZERO: Self = Self {
        drift_score: 0.0,
        length_growth: 0.0,
        repeat_ratio: 0.0,
    };
}

// ---------------------------------------------------------------------------
// DriftMetrics - Growth and repetition scoring
// ---------------------------------------------------------------------------

/// Scores recent output growth and repetition using text alone.
#[derive(Debug, Clone, Default)]
pub struct DriftMetrics {
    config: DriftConfig,
}

impl DriftMetrics {
    pub fn new(config: DriftConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DriftConfig {
        &self.config
    }

    /// Score the tail of `outputs`. Fewer than two windowed entries yield
    /// [`DriftSnapshot::ZERO`].
    pub fn compute<S: AsRef<str>>(&self, outputs: &[S]) -> DriftSnapshot {
        let start = outputs.len().saturating_sub(self.config.window);
        let recent = &outputs[start..];
        let [.., previous, latest] = recent else {
            return DriftSnapshot::ZERO;
        };

        let lengths: Vec<usize> = recent.iter().map(|s| char_len(s.as_ref())).collect();
        let latest_len = char_len(latest.as_ref());
        let median = lower_median(lengths);
        let length_growth = latest_len as f64 / median.max(1) as f64;

        let repeat_ratio = repeat_ratio(previous.as_ref(), latest.as_ref());

        let drift_score = self.config.length_growth_weight
            * length_growth.max(MIN_LOG_GROWTH).ln()
            + self.config.repeat_weight * repeat_ratio;

        DriftSnapshot {
            drift_score,
            length_growth,
            repeat_ratio,
        }
    }

    pub fn is_drifting(&self, snapshot: &DriftSnapshot) -> bool {
        snapshot.drift_score >= self.config.drift_threshold
    }
}

/// Character count, floored at 1.
fn char_len(text: &str) -> usize {
    text.chars().count().max(1)
}

/// Element at index `len / 2` after an ascending sort; no interpolation.
fn lower_median(mut lengths: Vec<usize>) -> usize {
    lengths.sort_unstable();
    lengths[lengths.len() / 2]
}

/// Share of `latest`'s distinct whitespace tokens that also appear in
/// `previous`.
pub fn repeat_ratio(previous: &str, latest: &str) -> f64 {
    let previous_tokens: HashSet<&str> = text::split_tokens(previous).collect();
    let latest_tokens: HashSet<&str> = text::split_tokens(latest).collect();
    if previous_tokens.is_empty() || latest_tokens.is_empty() {
        return 0.0;
    }
    let shared = latest_tokens.intersection(&previous_tokens).count();
    shared as f64 / latest_tokens.len().max(1) as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
