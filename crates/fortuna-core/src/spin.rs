//! Spin planning: mapping a random rotation to a selected participant.
//!
//! A spin adds a large random clockwise rotation (the coarse spin) to the
//! wheel's cumulative rotation. Whichever sector then sits under the
//! pointer is the geometric landing. If that participant has already been
//! chosen this round, the plan includes a correction: the wheel scans
//! counter-clockwise (decreasing index, wrapping through the end of the
//! list) for the nearest still-eligible participant and turns the extra
//! sectors needed to align the pointer with them.
//!
//! The counter-clockwise scan is the canonical resolution policy; a
//! forward scan would pick a different participant for the same landing.
//!
//! Randomness is injected so callers can seed it: production code passes
//! a thread RNG, tests pass a seeded [`SmallRng`].
//!
//! [`SmallRng`]: rand::rngs::SmallRng

use fortuna_types::{Participant, ParticipantId};
use rand::Rng;
use tracing::debug;

use crate::geometry::{self, FULL_TURN_DEGREES};

/// Minimum number of full turns in a coarse spin.
pub const MIN_SPINS: f64 = 3.0;

/// Exclusive upper bound on the number of full turns in a coarse spin.
pub const MAX_SPINS: f64 = 6.0;

/// The outcome of planning one spin against a participant snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum SpinPlan {
    /// The geometric landing is eligible; no correction needed.
    Direct {
        /// Degrees of coarse rotation to add to the cumulative rotation.
        total_rotation: f64,
        /// Sector index the pointer lands on.
        landed_sector: usize,
        /// The participant to report once the sequence settles.
        target: ParticipantId,
    },
    /// The geometric landing was already chosen; a corrective rotation
    /// aligns the pointer with the nearest prior eligible participant.
    FineTune {
        /// Degrees of coarse rotation to add to the cumulative rotation.
        total_rotation: f64,
        /// Sector index the pointer lands on before correction.
        landed_sector: usize,
        /// Sector index the correction aligns the pointer with.
        target_sector: usize,
        /// Sectors traversed counter-clockwise to reach the target.
        steps_back: usize,
        /// Additional clockwise rotation, `steps_back * sector_angle`.
        correction_degrees: f64,
        /// The participant to report once the correction settles.
        target: ParticipantId,
    },
    /// No participant can be selected (fewer than two participants, or
    /// every participant has already been chosen).
    NoneEligible,
}

impl SpinPlan {
    /// Return the participant this plan selects, if any.
    pub const fn target(&self) -> Option<ParticipantId> {
        match self {
            Self::Direct { target, .. } | Self::FineTune { target, .. } => Some(*target),
            Self::NoneEligible => None,
        }
    }

    /// Return the coarse rotation this plan applies, if any.
    pub const fn total_rotation(&self) -> Option<f64> {
        match self {
            Self::Direct { total_rotation, .. } | Self::FineTune { total_rotation, .. } => {
                Some(*total_rotation)
            }
            Self::NoneEligible => None,
        }
    }
}

/// Draw the coarse rotation for one spin: between [`MIN_SPINS`] and
/// [`MAX_SPINS`] full turns plus a uniform final angle in `[0, 360)`.
pub fn draw_total_rotation(rng: &mut impl Rng) -> f64 {
    let spins = rng.random_range(MIN_SPINS..MAX_SPINS);
    let final_angle = rng.random_range(0.0..FULL_TURN_DEGREES);
    spins * FULL_TURN_DEGREES + final_angle
}

/// Plan one spin: draw a coarse rotation and resolve the landing against
/// the participant snapshot.
///
/// `current_rotation` is the wheel's accumulated rotation so far (any
/// real number of degrees). The snapshot's order fixes the
/// sector-to-participant mapping for this spin.
pub fn compute_spin(
    current_rotation: f64,
    participants: &[Participant],
    rng: &mut impl Rng,
) -> SpinPlan {
    plan_with_rotation(current_rotation, draw_total_rotation(rng), participants)
}

/// Resolve a spin for an already-drawn coarse rotation.
///
/// This is the deterministic half of [`compute_spin`]: given the same
/// rotation and snapshot it always produces the same plan, which is what
/// makes landings testable and replayable.
pub fn plan_with_rotation(
    current_rotation: f64,
    total_rotation: f64,
    participants: &[Participant],
) -> SpinPlan {
    let count = participants.len();
    if count < 2 || !participants.iter().any(|p| !p.chosen) {
        return SpinPlan::NoneEligible;
    }

    let Some(landed_sector) = sector_for(current_rotation, total_rotation, count) else {
        return SpinPlan::NoneEligible;
    };

    if let Some(landed) = participants.get(landed_sector) {
        if !landed.chosen {
            return SpinPlan::Direct {
                total_rotation,
                landed_sector,
                target: landed.id,
            };
        }
    }

    // Landed on an already-chosen participant: scan counter-clockwise
    // (decreasing index, wrapping) for the nearest eligible one.
    for steps_back in 1..count {
        // landed_sector < count and steps_back < count, so this cannot
        // overflow or divide by zero.
        #[allow(clippy::arithmetic_side_effects)]
        let candidate_sector = (landed_sector + count - steps_back) % count;
        let Some(candidate) = participants.get(candidate_sector) else {
            continue;
        };
        if candidate.chosen {
            continue;
        }

        let sector_angle = geometry::sector_angle_degrees(count);
        #[allow(clippy::cast_precision_loss)] // steps_back < count, tiny
        let correction_degrees = steps_back as f64 * sector_angle;
        debug!(
            landed_sector,
            target_sector = candidate_sector,
            steps_back,
            correction_degrees,
            "landed on a chosen participant, correcting counter-clockwise"
        );
        return SpinPlan::FineTune {
            total_rotation,
            landed_sector,
            target_sector: candidate_sector,
            steps_back,
            correction_degrees,
            target: candidate.id,
        };
    }

    // The scan visited every other sector, so reaching this point means
    // the snapshot had no eligible participant after all.
    SpinPlan::NoneEligible
}

/// Compute the sector under the pointer once `total_rotation` has been
/// added on top of `current_rotation`.
fn sector_for(current_rotation: f64, total_rotation: f64, count: usize) -> Option<usize> {
    geometry::sector_under_pointer(current_rotation + total_rotation, count)
}
