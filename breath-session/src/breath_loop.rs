use breath_provider::{GenerationError, GenerationMeta, Generator};
use breath_runtime::{
    BreathConfig, BreathScheduler, DriftMetrics, DriftSnapshot, GuardResult, GuardSuite,
    ResetReason, ScheduleDecision,
};
use tracing::{debug, info, warn};

use crate::audit::{AuditEvent, AuditRecord, ExhaleRecord, TurnRecord};
use crate::state::{KEEP_TURNS, SessionMode, SessionState};

/// Drives one turn at a time: generate, score, check, schedule, and exhale
/// when told to.
///
/// Strictly synchronous. Callers that share a loop across threads must
/// serialize access to it themselves.
#[derive(Debug)]
pub struct BreathLoop<G> {
    generator: G,
    drift: DriftMetrics,
    guards: GuardSuite,
    scheduler: BreathScheduler,
    state: SessionState,
}

impl<G: Generator> BreathLoop<G> {
    pub fn new(
        generator: G,
        drift: DriftMetrics,
        guards: GuardSuite,
        scheduler: BreathScheduler,
    ) -> Self {
        Self {
            generator,
            drift,
            guards,
            scheduler,
            state: SessionState::new(),
        }
    }

    pub fn from_config(generator: G, config: BreathConfig) -> Self {
        Self::new(
            generator,
            DriftMetrics::new(config.drift),
            GuardSuite::new(config.guard),
            BreathScheduler::new(config.scheduler),
        )
    }

    /// Run one turn and return the generated text.
    ///
    /// A generator error is returned as-is. The prompt and turn counter are
    /// already recorded at that point, but no audit record is written.
    pub fn step(
        &mut self,
        prompt: &str,
        meta: Option<&GenerationMeta>,
    ) -> Result<String, GenerationError> {
        self.state.turn_count += 1;
        let turn = self.state.turn_count;
        self.state.prompt_history.push(prompt.to_string());

        let empty = GenerationMeta::new();
        let output = match self.generator.generate(prompt, meta.unwrap_or(&empty)) {
            Ok(output) => output,
            Err(err) => {
                warn!(turn, error = %err, "generation failed");
                return Err(err);
            }
        };
        self.state.output_history.push(output.clone());

        let snapshot = self.drift.compute(self.state.output_history.as_slice());
        let drifting = self.drift.is_drifting(&snapshot);

        let guard = self.guards.check(&output);
        if let Some(failure) = guard.fail_reason {
            warn!(turn, check = %failure, "guard check failed");
        }

        let decision = self.scheduler.decide(turn, drifting, guard.failed());
        debug!(
            turn,
            drift_score = snapshot.drift_score,
            len_growth = snapshot.length_growth,
            repeat_ratio = snapshot.repeat_ratio,
            drifting,
            scheduled_reset = decision.should_reset,
            "turn scored"
        );

        self.record_turn(turn, &output, &snapshot, &guard, decision);
        self.state.last_drift = Some(snapshot);
        self.state.last_guard = Some(guard);

        if decision.should_reset {
            self.exhale(decision.reason);
        }

        Ok(output)
    }

    /// Trim history to the last [`KEEP_TURNS`] entries, zero the guard
    /// counter and log the reset. Also callable directly by hosts.
    pub fn exhale(&mut self, reason: Option<ResetReason>) {
        self.state.trim_history(KEEP_TURNS);
        self.guards.reset();
        let turn = self.state.turn_count;
        info!(
            turn,
            reason = reason.map(ResetReason::as_str),
            kept_turns = KEEP_TURNS,
            "exhale"
        );
        self.state
            .audit_log
            .record(AuditRecord::Exhale(ExhaleRecord {
                event: AuditEvent::Exhale,
                reason,
                turn,
                kept_turns: KEEP_TURNS,
            }));
    }

    fn record_turn(
        &mut self,
        turn: u64,
        output: &str,
        snapshot: &DriftSnapshot,
        guard: &GuardResult,
        decision: ScheduleDecision,
    ) {
        self.state.audit_log.record(AuditRecord::Turn(TurnRecord {
            turn,
            output_chars: output.chars().count(),
            drift_score: snapshot.drift_score,
            len_growth: snapshot.length_growth,
            repeat_ratio: snapshot.repeat_ratio,
            guard_fail_reason: guard.fail_reason,
            guard_deltas: guard.deltas.clone(),
            scheduled_reset: decision.should_reset,
            reset_reason: decision.reason,
        }));
    }
}

impl<G> BreathLoop<G> {
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn drift(&self) -> &DriftMetrics {
        &self.drift
    }

    pub fn guards(&self) -> &GuardSuite {
        &self.guards
    }

    pub fn scheduler(&self) -> &BreathScheduler {
        &self.scheduler
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn mode(&self) -> SessionMode {
        match self.state.audit_log.last() {
            Some(record) if record.is_exhale() => SessionMode::JustReset,
            _ => SessionMode::Steady,
        }
    }
}
