//! Wheel selection and animation-sequencing core for Fortuna.
//!
//! Everything here is pure and synchronous: sector math, spin planning,
//! the owning participant registry, and the phase state machine that a
//! timer-owning driver (see `fortuna-engine`) walks through one spin.
//!
//! # Modules
//!
//! - [`geometry`] -- Sector widths and pointer-to-sector inversion
//! - [`spin`] -- Random coarse-rotation draw and landing resolution
//! - [`registry`] -- Ordered participant list with chosen-flag ownership
//! - [`sequencer`] -- The `Idle -> CoarseSpinning -> Settling ->
//!   [FineTuning] -> Idle` state machine and its phase durations

pub mod geometry;
pub mod registry;
pub mod sequencer;
pub mod spin;

pub use registry::{ParticipantRegistry, RegistryError};
pub use sequencer::{
    COARSE_SPIN_DURATION, CORRECTION_SETTLE_DELAY, DIRECT_SETTLE_DELAY, FINE_TUNE_DURATION,
    HIGHLIGHT_TICK, SpinDecline, SpinPhase, SpinSequencer, Step,
};
pub use spin::{SpinPlan, compute_spin, draw_total_rotation, plan_with_rotation};
