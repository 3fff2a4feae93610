//! The selection-callback boundary.
//!
//! The core never mutates participant state on its own; it reports spins
//! through this trait and the owning side (the UI layer) reacts --
//! clearing prior highlights on start, playing the confetti effect and
//! recording the pick on selection.

use fortuna_types::ParticipantId;

/// Callbacks fired by the spin driver.
///
/// `on_spin_start` fires synchronously at spin invocation, before any
/// timer is scheduled, and only when the spin actually starts (declined
/// spins fire nothing). `on_person_selected` fires at most once per
/// spin, after the full timed sequence has settled.
pub trait SpinObserver: Send {
    /// A new spin sequence is starting; clear any prior selection
    /// indicator.
    fn on_spin_start(&mut self);

    /// The sequence settled on this participant.
    fn on_person_selected(&mut self, participant: ParticipantId);
}

/// An observer that ignores every callback, for testing and headless use.
pub struct NoOpObserver;

impl SpinObserver for NoOpObserver {
    fn on_spin_start(&mut self) {}

    fn on_person_selected(&mut self, _participant: ParticipantId) {}
}
