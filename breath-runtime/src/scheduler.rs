use serde::{Deserialize, Serialize};

/// Tuning for [`BreathScheduler`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Force a reset every N turns. 0 = never.
    pub exhale_every_n_turns: u64,
    pub exhale_on_drift: bool,
    pub exhale_on_guard_fail: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            exhale_every_n_turns: 8,
            exhale_on_drift: true,
            exhale_on_guard_fail: true,
        }
    }
}

/// Why a reset was scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetReason {
    GuardFail,
    Drift,
    Periodic,
}

impl ResetReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GuardFail => "guard_fail",
            Self::Drift => "drift",
            Self::Periodic => "periodic",
        }
    }
}

impl std::fmt::Display for ResetReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The scheduler's verdict for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDecision {
    pub should_reset: bool,
    pub reason: Option<ResetReason>,
}

impl ScheduleDecision {
    pub fn reset(reason: ResetReason) -> Self {
        Self {
            should_reset: true,
            reason: Some(reason),
        }
    }

    pub fn keep() -> Self {
        Self {
            should_reset: false,
            reason: None,
        }
    }
}

/// Maps a turn's signals to a reset decision: guard failure, then drift,
/// then the periodic cadence.
#[derive(Debug, Clone, Default)]
pub struct BreathScheduler {
    config: SchedulerConfig,
}

impl BreathScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn decide(&self, turn_index: u64, drifting: bool, guard_failed: bool) -> ScheduleDecision {
        if guard_failed && self.config.exhale_on_guard_fail {
            return ScheduleDecision::reset(ResetReason::GuardFail);
        }
        if drifting && self.config.exhale_on_drift {
            return ScheduleDecision::reset(ResetReason::Drift);
        }
        let every = self.config.exhale_every_n_turns;
        if every > 0 && turn_index % every == 0 {
            return ScheduleDecision::reset(ResetReason::Periodic);
        }
        ScheduleDecision::keep()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn every(n: u64) -> BreathScheduler {
        BreathScheduler::new(SchedulerConfig {
            exhale_every_n_turns: n,
            ..SchedulerConfig::default()
        })
    }

    #[test]
    fn test_guard_fail_outranks_everything() {
        let scheduler = BreathScheduler::default();
        assert_eq!(
            scheduler.decide(8, true, true),
            ScheduleDecision::reset(ResetReason::GuardFail)
        );
    }

    #[test]
    fn test_drift_outranks_periodic() {
        let scheduler = BreathScheduler::default();
        assert_eq!(
            scheduler.decide(8, true, false),
            ScheduleDecision::reset(ResetReason::Drift)
        );
    }

    #[test]
    fn test_periodic_cadence() {
        let scheduler = every(5);
        assert_eq!(
            scheduler.decide(5, false, false),
            ScheduleDecision::reset(ResetReason::Periodic)
        );
        assert_eq!(scheduler.decide(4, false, false), ScheduleDecision::keep());
        assert_eq!(
            scheduler.decide(10, false, false),
            ScheduleDecision::reset(ResetReason::Periodic)
        );
    }

    #[test]
    fn test_zero_cadence_disables_periodic() {
        let scheduler = every(0);
        for turn in 0..20 {
            assert_eq!(scheduler.decide(turn, false, false), ScheduleDecision::keep());
        }
    }

    #[test]
    fn test_disabled_triggers_fall_through() {
        let scheduler = BreathScheduler::new(SchedulerConfig {
            exhale_every_n_turns: 3,
            exhale_on_drift: false,
            exhale_on_guard_fail: false,
        });
        assert_eq!(scheduler.decide(1, true, true), ScheduleDecision::keep());
        assert_eq!(
            scheduler.decide(3, true, true),
            ScheduleDecision::reset(ResetReason::Periodic)
        );
    }

    #[test]
    fn test_reason_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ResetReason::GuardFail).unwrap(),
            "\"guard_fail\""
        );
        assert_eq!(ResetReason::Periodic.to_string(), "periodic");
        assert_eq!(ResetReason::Drift.as_str(), "drift");
    }
}
