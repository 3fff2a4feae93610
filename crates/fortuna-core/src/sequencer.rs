//! The animation sequencer: a finite-state machine over spin phases.
//!
//! One spin runs through a fixed sequence of timed phases:
//!
//! ```text
//! Idle -> CoarseSpinning -> Settling -> Idle                 (direct pick)
//! Idle -> CoarseSpinning -> Settling -> FineTuning -> Idle   (corrected pick)
//! ```
//!
//! The sequencer owns the cumulative rotation and the highlighted-sector
//! index, and is advanced by exactly one step function: [`SpinSequencer::advance`]
//! returns either the delay to wait before calling it again or the final
//! selection. Timers live entirely in the driver, so the machine is
//! deterministic and cancellation is a matter of dropping the driver's
//! future -- no phase ever has more than one pending transition.
//!
//! # Invariants
//!
//! - The cumulative rotation never decreases; every spin adds rotation on
//!   top of the previous resting value so the visual motion is continuous.
//! - A spin only starts from `Idle`; anything else declines as busy.
//! - Whatever happens, the machine comes to rest in `Idle` with no
//!   highlighted sector.

use std::time::Duration;

use fortuna_types::{Participant, ParticipantId};
use rand::Rng;
use tracing::debug;

use crate::spin::{self, SpinPlan};

/// Length of the coarse randomized spin phase.
pub const COARSE_SPIN_DURATION: Duration = Duration::from_millis(4000);

/// Cadence of the sector-highlight cycling during the coarse phase.
pub const HIGHLIGHT_TICK: Duration = Duration::from_millis(100);

/// Settle delay before a direct (uncorrected) selection is reported.
pub const DIRECT_SETTLE_DELAY: Duration = Duration::from_millis(1000);

/// Pause between the coarse phase ending on a chosen participant and the
/// corrective rotation starting.
pub const CORRECTION_SETTLE_DELAY: Duration = Duration::from_millis(1000);

/// Length of the corrective fine-tune rotation phase.
pub const FINE_TUNE_DURATION: Duration = Duration::from_millis(1500);

/// Why a spin request was declined. Declines are silent no-ops at the
/// boundary: no rotation is applied and no callback fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SpinDecline {
    /// A spin sequence is already in flight.
    #[error("a spin is already in progress")]
    Busy,

    /// The wheel needs at least two participants to spin.
    #[error("at least two participants are required")]
    TooFewParticipants,

    /// Every participant has already been chosen this round.
    #[error("every participant has already been chosen")]
    NoneEligible,
}

/// The externally visible phase of the spin sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinPhase {
    /// No spin in flight; a new spin may start.
    Idle,
    /// The large randomized rotation is playing.
    CoarseSpinning,
    /// The wheel has stopped on its geometric landing and is pausing
    /// before either reporting the pick or starting the correction.
    Settling,
    /// The corrective rotation toward the nearest eligible participant
    /// is playing.
    FineTuning,
}

/// What the settling pause leads into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettleKind {
    /// Report the landed participant directly.
    Select,
    /// Apply the corrective rotation first.
    Correct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    CoarseSpinning,
    Settling(SettleKind),
    FineTuning,
}

/// One step of the sequence, as seen by the timer-owning driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Sleep this long, then call [`SpinSequencer::advance`] again.
    Wait(Duration),
    /// The sequence is over. Carries the selected participant, or `None`
    /// when the sequence aborted without a selection.
    Finished(Option<ParticipantId>),
}

/// State machine driving one wheel instance through its spin sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinSequencer {
    rotation_degrees: f64,
    phase: Phase,
    highlighted_sector: Option<usize>,
    sector_count: usize,
    plan: Option<SpinPlan>,
}

impl Default for SpinSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpinSequencer {
    /// Create a resting sequencer with zero accumulated rotation.
    pub const fn new() -> Self {
        Self {
            rotation_degrees: 0.0,
            phase: Phase::Idle,
            highlighted_sector: None,
            sector_count: 0,
            plan: None,
        }
    }

    /// The wheel's cumulative rotation in degrees. Monotonically
    /// non-decreasing for the lifetime of the instance; the renderer
    /// interpolates toward this value continuously.
    pub const fn rotation_degrees(&self) -> f64 {
        self.rotation_degrees
    }

    /// The sector currently highlighted for visual feedback, if any.
    pub const fn highlighted_sector(&self) -> Option<usize> {
        self.highlighted_sector
    }

    /// The current phase of the sequence.
    pub const fn phase(&self) -> SpinPhase {
        match self.phase {
            Phase::Idle => SpinPhase::Idle,
            Phase::CoarseSpinning => SpinPhase::CoarseSpinning,
            Phase::Settling(_) => SpinPhase::Settling,
            Phase::FineTuning => SpinPhase::FineTuning,
        }
    }

    /// Whether the sequencer is at rest and may accept a new spin.
    pub const fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    /// Start a spin with a freshly drawn random rotation.
    ///
    /// On success the coarse rotation has already been applied to the
    /// cumulative rotation, and the returned duration is how long the
    /// coarse phase lasts before [`advance`] should be called.
    ///
    /// # Errors
    ///
    /// Declines with [`SpinDecline`] when a spin is in flight or the
    /// snapshot fails the preconditions; no state changes on decline.
    ///
    /// [`advance`]: SpinSequencer::advance
    pub fn start_spin(
        &mut self,
        participants: &[Participant],
        rng: &mut impl Rng,
    ) -> Result<Duration, SpinDecline> {
        self.start_spin_with_rotation(participants, spin::draw_total_rotation(rng))
    }

    /// Start a spin with an explicit coarse rotation (deterministic
    /// variant of [`start_spin`], for tests and replays).
    ///
    /// # Errors
    ///
    /// Declines with [`SpinDecline`] when a spin is in flight or the
    /// snapshot fails the preconditions; no state changes on decline.
    ///
    /// [`start_spin`]: SpinSequencer::start_spin
    pub fn start_spin_with_rotation(
        &mut self,
        participants: &[Participant],
        total_rotation: f64,
    ) -> Result<Duration, SpinDecline> {
        if !self.is_idle() {
            return Err(SpinDecline::Busy);
        }
        if participants.len() < 2 {
            return Err(SpinDecline::TooFewParticipants);
        }

        // Rotation never decreases.
        let total_rotation = total_rotation.max(0.0);
        let plan = spin::plan_with_rotation(self.rotation_degrees, total_rotation, participants);
        if plan == SpinPlan::NoneEligible {
            return Err(SpinDecline::NoneEligible);
        }

        debug!(
            total_rotation,
            sectors = participants.len(),
            "coarse spin starting"
        );
        self.rotation_degrees += total_rotation;
        self.sector_count = participants.len();
        self.highlighted_sector = None;
        self.plan = Some(plan);
        self.phase = Phase::CoarseSpinning;
        Ok(COARSE_SPIN_DURATION)
    }

    /// Advance the highlight by one sector, wrapping. Only meaningful
    /// during the coarse phase; any other phase ignores the tick.
    ///
    /// The driver calls this on the [`HIGHLIGHT_TICK`] cadence for the
    /// cycling-highlight visual while the wheel is spinning fast.
    pub fn advance_highlight(&mut self) {
        if self.phase != Phase::CoarseSpinning || self.sector_count == 0 {
            return;
        }
        let next = match self.highlighted_sector {
            Some(current) => current
                .checked_add(1)
                .and_then(|n| n.checked_rem(self.sector_count))
                .unwrap_or(0),
            None => 0,
        };
        self.highlighted_sector = Some(next);
    }

    /// Abandon any in-flight sequence and return to rest.
    ///
    /// The accumulated rotation is kept -- it never decreases -- while
    /// the phase, highlight, and pending plan are discarded. This is the
    /// disposal path: a driver whose timers were cancelled mid-sequence
    /// calls this so the wheel rests consistently and can spin again.
    pub fn reset(&mut self) {
        if !self.is_idle() {
            debug!("spin sequence abandoned before settling");
        }
        self.rest();
    }

    /// Run the transition scheduled for the current phase.
    ///
    /// The driver alternates `advance` with sleeping the returned
    /// [`Step::Wait`] duration until the sequence reports
    /// [`Step::Finished`]. Calling this while `Idle` is a no-op finish.
    pub fn advance(&mut self) -> Step {
        match self.phase {
            Phase::Idle => Step::Finished(None),
            Phase::CoarseSpinning => self.finish_coarse(),
            Phase::Settling(SettleKind::Select) => self.finish(),
            Phase::Settling(SettleKind::Correct) => self.apply_correction(),
            Phase::FineTuning => self.finish(),
        }
    }

    /// The coarse phase has elapsed: stop cycling and settle on the plan.
    fn finish_coarse(&mut self) -> Step {
        match self.plan {
            Some(SpinPlan::Direct { landed_sector, .. }) => {
                self.highlighted_sector = Some(landed_sector);
                self.phase = Phase::Settling(SettleKind::Select);
                Step::Wait(DIRECT_SETTLE_DELAY)
            }
            Some(SpinPlan::FineTune { landed_sector, .. }) => {
                self.highlighted_sector = Some(landed_sector);
                self.phase = Phase::Settling(SettleKind::Correct);
                Step::Wait(CORRECTION_SETTLE_DELAY)
            }
            // A started spin always holds a selectable plan; anything
            // else aborts cleanly with no selection.
            Some(SpinPlan::NoneEligible) | None => {
                debug!("no eligible participant at settle time, aborting");
                self.rest();
                Step::Finished(None)
            }
        }
    }

    /// The pre-correction pause has elapsed: turn the extra sectors and
    /// highlight the actual target.
    fn apply_correction(&mut self) -> Step {
        match self.plan {
            Some(SpinPlan::FineTune {
                target_sector,
                correction_degrees,
                ..
            }) => {
                debug!(correction_degrees, target_sector, "fine-tuning");
                self.rotation_degrees += correction_degrees;
                self.highlighted_sector = Some(target_sector);
                self.phase = Phase::FineTuning;
                Step::Wait(FINE_TUNE_DURATION)
            }
            _ => {
                self.rest();
                Step::Finished(None)
            }
        }
    }

    /// The final settle has elapsed: report the pick and come to rest.
    fn finish(&mut self) -> Step {
        let target = self.plan.take().as_ref().and_then(SpinPlan::target);
        self.rest();
        Step::Finished(target)
    }

    fn rest(&mut self) {
        self.phase = Phase::Idle;
        self.highlighted_sector = None;
        self.plan = None;
    }
}
