//! Client-side timer and screen sequencing as a tick-driven state machine.
//!
//! The session owns no clock. A front-end calls [`GameSession::tick`] every
//! [`TICK_MS`](crate::constants::TICK_MS) milliseconds and forwards the
//! submission returned by [`GameSession::stop`] to the attempt endpoint.

use crate::constants::{
    DEFAULT_COOLDOWN_TICKS, DEFAULT_MISSES_BEFORE_GATE, SLOW_MODE_STEPS_PER_SECOND,
};
use crate::error::GameError;
use crate::leaderboard::{AttemptOutcome, AttemptRequest};
use crate::player::Player;
use crate::rules::{centis_to_seconds, is_perfect_centis, normalize_name};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GateConfig {
    /// Consecutive misses that close the gate. Zero disables gating.
    pub misses_before_gate: u32,
    pub cooldown_ticks: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            misses_before_gate: DEFAULT_MISSES_BEFORE_GATE,
            cooldown_ticks: DEFAULT_COOLDOWN_TICKS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gate {
    Open,
    /// Cleared by watching an ad or by waiting out the cooldown.
    Closed { cooldown_remaining: u32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct StopResult {
    pub player_name: String,
    pub centis: u32,
    pub time: f64,
    pub attempt: u32,
    pub locally_perfect: bool,
    pub outcome: Option<AttemptOutcome>,
    pub submission_failed: bool,
}

impl StopResult {
    pub fn rank(&self) -> Option<u32> {
        self.outcome.as_ref().and_then(|outcome| outcome.rank)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Phase {
    NameEntry,
    Ready { player_name: String },
    Running { player_name: String },
    Stopped(StopResult),
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Self::NameEntry => "name_entry",
            Self::Ready { .. } => "ready",
            Self::Running { .. } => "running",
            Self::Stopped(_) => "stopped",
        }
    }
}

#[derive(Clone, Debug)]
pub struct GameSession {
    config: GateConfig,
    phase: Phase,
    centis: u32,
    attempts: u32,
    consecutive_misses: u32,
    gate: Gate,
    slow_mode_credit: bool,
    slow_mode: bool,
    top_player: Option<Player>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(GateConfig::default())
    }
}

impl GameSession {
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            phase: Phase::NameEntry,
            centis: 0,
            attempts: 0,
            consecutive_misses: 0,
            gate: Gate::Open,
            slow_mode_credit: false,
            slow_mode: false,
            top_player: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn player_name(&self) -> Option<&str> {
        match &self.phase {
            Phase::NameEntry => None,
            Phase::Ready { player_name } | Phase::Running { player_name } => {
                Some(player_name.as_str())
            }
            Phase::Stopped(result) => Some(result.player_name.as_str()),
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn gate(&self) -> Gate {
        self.gate
    }

    pub fn is_slow_mode(&self) -> bool {
        self.slow_mode
    }

    pub fn top_player(&self) -> Option<&Player> {
        self.top_player.as_ref()
    }

    pub fn elapsed_seconds(&self) -> f64 {
        centis_to_seconds(self.centis)
    }

    fn wrong_phase(&self, action: &'static str) -> GameError {
        GameError::WrongPhase {
            action,
            phase: self.phase.name(),
        }
    }

    pub fn submit_name(&mut self, raw: &str) -> Result<(), GameError> {
        if self.phase != Phase::NameEntry {
            return Err(self.wrong_phase("submit a name"));
        }
        let name = normalize_name(raw).map_err(GameError::InvalidName)?;
        self.phase = Phase::Ready {
            player_name: name.to_string(),
        };
        Ok(())
    }

    /// Reset the clock and start running. Rejected while gated.
    pub fn start(&mut self) -> Result<(), GameError> {
        let player_name = match &self.phase {
            Phase::Ready { player_name } => player_name.clone(),
            Phase::Stopped(result) => result.player_name.clone(),
            _ => return Err(self.wrong_phase("start")),
        };
        if let Gate::Closed { cooldown_remaining } = self.gate {
            return Err(GameError::Gated { cooldown_remaining });
        }

        self.centis = 0;
        self.slow_mode = std::mem::take(&mut self.slow_mode_credit);
        self.phase = Phase::Running { player_name };
        Ok(())
    }

    /// Advance one tick: the clock while running, the cooldown while gated.
    pub fn tick(&mut self) {
        if matches!(self.phase, Phase::Running { .. }) {
            self.centis = self.centis.saturating_add(1);
            return;
        }

        if let Gate::Closed { cooldown_remaining } = self.gate {
            let remaining = cooldown_remaining.saturating_sub(1);
            if remaining == 0 {
                self.open_gate();
            } else {
                self.gate = Gate::Closed {
                    cooldown_remaining: remaining,
                };
            }
        }
    }

    /// Freeze the clock and return the submission for this attempt.
    pub fn stop(&mut self) -> Result<AttemptRequest, GameError> {
        let Phase::Running { player_name } = &self.phase else {
            return Err(self.wrong_phase("stop"));
        };
        let player_name = player_name.clone();

        self.attempts = self.attempts.saturating_add(1);
        let locally_perfect = is_perfect_centis(self.centis);
        if locally_perfect {
            self.consecutive_misses = 0;
        } else {
            self.consecutive_misses = self.consecutive_misses.saturating_add(1);
            if self.config.misses_before_gate > 0
                && self.consecutive_misses >= self.config.misses_before_gate
            {
                self.gate = Gate::Closed {
                    cooldown_remaining: self.config.cooldown_ticks,
                };
            }
        }

        let time = self.elapsed_seconds();
        self.slow_mode = false;
        self.phase = Phase::Stopped(StopResult {
            player_name: player_name.clone(),
            centis: self.centis,
            time,
            attempt: self.attempts,
            locally_perfect,
            outcome: None,
            submission_failed: false,
        });

        Ok(AttemptRequest {
            player_name,
            time,
            attempts: self.attempts,
            message: None,
        })
    }

    pub fn apply_result(&mut self, outcome: AttemptOutcome) -> Result<(), GameError> {
        let Phase::Stopped(result) = &mut self.phase else {
            return Err(self.wrong_phase("apply a result"));
        };
        self.top_player = outcome.top_player.clone();
        result.outcome = Some(outcome);
        result.submission_failed = false;
        Ok(())
    }

    /// The request failed: stay stopped with no rank. No retry is scheduled.
    pub fn mark_submission_failed(&mut self) -> Result<(), GameError> {
        let Phase::Stopped(result) = &mut self.phase else {
            return Err(self.wrong_phase("fail a submission"));
        };
        result.submission_failed = true;
        Ok(())
    }

    /// Clear the gate after an ad. Also grants slow mode for the next run.
    pub fn complete_ad(&mut self) -> Result<(), GameError> {
        if self.gate == Gate::Open {
            return Err(GameError::NotGated);
        }
        self.open_gate();
        self.slow_mode_credit = true;
        Ok(())
    }

    fn open_gate(&mut self) {
        self.gate = Gate::Open;
        self.consecutive_misses = 0;
    }

    pub fn display_time(&self) -> String {
        let seconds = self.elapsed_seconds();
        let shown = if self.slow_mode {
            (seconds * SLOW_MODE_STEPS_PER_SECOND).floor() / SLOW_MODE_STEPS_PER_SECOND
        } else {
            seconds
        };
        format!("{shown:.2}")
    }

    /// A new record unlocks the taunt-message prompt.
    pub fn should_prompt_message(&self) -> bool {
        match &self.phase {
            Phase::Stopped(result) => result
                .outcome
                .as_ref()
                .is_some_and(|outcome| outcome.is_new_record == Some(true)),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_session(config: GateConfig) -> GameSession {
        let mut session = GameSession::new(config);
        session.submit_name("  Ada ").unwrap();
        session
    }

    fn run_for(session: &mut GameSession, ticks: u32) -> AttemptRequest {
        session.start().unwrap();
        for _ in 0..ticks {
            session.tick();
        }
        session.stop().unwrap()
    }

    #[test]
    fn thousand_ticks_is_exactly_ten_seconds() {
        let mut session = ready_session(GateConfig::default());
        let submission = run_for(&mut session, 1_000);
        assert_eq!(submission.player_name, "Ada");
        assert_eq!(submission.time, 10.0);
        assert_eq!(submission.attempts, 1);
        assert_eq!(session.display_time(), "10.00");
        match session.phase() {
            Phase::Stopped(result) => assert!(result.locally_perfect),
            other => panic!("unexpected phase {other:?}"),
        }
    }

    #[test]
    fn attempts_accumulate_across_runs() {
        let mut session = ready_session(GateConfig::default());
        assert_eq!(run_for(&mut session, 987).time, 9.87);
        let second = run_for(&mut session, 1_012);
        assert_eq!(second.time, 10.12);
        assert_eq!(second.attempts, 2);
    }

    #[test]
    fn start_requires_a_name() {
        let mut session = GameSession::default();
        assert!(matches!(
            session.start(),
            Err(GameError::WrongPhase { .. })
        ));
        assert!(matches!(
            session.submit_name(""),
            Err(GameError::InvalidName(_))
        ));
    }

    #[test]
    fn stop_only_while_running() {
        let mut session = ready_session(GateConfig::default());
        assert!(session.stop().is_err());
        assert!(GameSession::default().stop().is_err());
    }

    #[test]
    fn name_travels_with_the_phase() {
        let mut session = GameSession::default();
        assert_eq!(session.player_name(), None);
        session.submit_name(" Ada ").unwrap();
        assert_eq!(
            session.phase(),
            &Phase::Ready {
                player_name: "Ada".to_string()
            }
        );

        session.start().unwrap();
        assert_eq!(session.player_name(), Some("Ada"));
        session.stop().unwrap();
        match session.phase() {
            Phase::Stopped(result) => assert_eq!(result.player_name, "Ada"),
            other => panic!("unexpected phase {other:?}"),
        }

        // A restart keeps the same player.
        let submission = run_for(&mut session, 10);
        assert_eq!(submission.player_name, "Ada");
        assert_eq!(submission.attempts, 2);
    }

    #[test]
    fn misses_close_the_gate_until_cooldown_elapses() {
        let mut session = ready_session(GateConfig {
            misses_before_gate: 2,
            cooldown_ticks: 3,
        });
        run_for(&mut session, 5);
        run_for(&mut session, 5);
        assert_eq!(
            session.start(),
            Err(GameError::Gated {
                cooldown_remaining: 3
            })
        );

        session.tick();
        session.tick();
        assert_eq!(
            session.gate(),
            Gate::Closed {
                cooldown_remaining: 1
            }
        );
        session.tick();
        assert_eq!(session.gate(), Gate::Open);
        assert!(session.start().is_ok());
        assert!(!session.is_slow_mode());
    }

    #[test]
    fn perfect_stop_resets_the_miss_streak() {
        let mut session = ready_session(GateConfig {
            misses_before_gate: 2,
            cooldown_ticks: 3,
        });
        run_for(&mut session, 5);
        run_for(&mut session, 1_000);
        run_for(&mut session, 5);
        assert_eq!(session.gate(), Gate::Open);
    }

    #[test]
    fn ad_opens_gate_and_grants_one_slow_run() {
        let mut session = ready_session(GateConfig {
            misses_before_gate: 1,
            cooldown_ticks: 100,
        });
        assert_eq!(session.complete_ad(), Err(GameError::NotGated));
        run_for(&mut session, 5);
        session.complete_ad().unwrap();

        session.start().unwrap();
        assert!(session.is_slow_mode());
        for _ in 0..1_037 {
            session.tick();
        }
        assert_eq!(session.display_time(), "10.20");
        session.stop().unwrap();
        assert!(!session.is_slow_mode());
        assert_eq!(session.display_time(), "10.37");
    }

    #[test]
    fn applied_result_drives_the_message_prompt() {
        let mut session = ready_session(GateConfig::default());
        run_for(&mut session, 1_000);
        assert!(!session.should_prompt_message());

        session
            .apply_result(AttemptOutcome {
                is_perfect: true,
                rank: Some(1),
                top_player: None,
                player: None,
                is_new_record: Some(true),
            })
            .unwrap();
        assert!(session.should_prompt_message());
        match session.phase() {
            Phase::Stopped(result) => assert_eq!(result.rank(), Some(1)),
            other => panic!("unexpected phase {other:?}"),
        }
    }

    #[test]
    fn failed_submission_leaves_no_rank() {
        let mut session = ready_session(GateConfig::default());
        run_for(&mut session, 400);
        session.mark_submission_failed().unwrap();
        match session.phase() {
            Phase::Stopped(result) => {
                assert!(result.submission_failed);
                assert_eq!(result.rank(), None);
            }
            other => panic!("unexpected phase {other:?}"),
        }
    }
}
