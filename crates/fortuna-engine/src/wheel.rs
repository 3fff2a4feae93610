//! The timed spin driver: walks the sequencer through its phases.
//!
//! [`Wheel`] owns the participant registry, the phase state machine, and
//! the persisted settings, and is the piece a UI event handler talks to.
//! All timing lives here: the sequencer decides *what* happens next and
//! for how long, this driver sleeps those durations on the tokio clock
//! and fires the observer callbacks at the boundaries.
//!
//! Phases run strictly in sequence -- each timer callback runs to
//! completion and schedules the next, so at most one spin sequence is in
//! flight per wheel. Cancellation is dropping the in-flight [`Wheel::spin`]
//! future: every pending timer is owned by that future, and a drop guard
//! rests the sequencer, so an abandoned sequence leaves the wheel idle
//! and ready to spin again.

use std::time::Duration;

use rand::Rng;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use fortuna_core::registry::ParticipantRegistry;
use fortuna_core::sequencer::{HIGHLIGHT_TICK, SpinDecline, SpinPhase, SpinSequencer, Step};
use fortuna_core::spin;
use fortuna_types::{ParticipantId, WheelSettings};

use crate::observer::SpinObserver;
use crate::store::WheelDocument;

/// How a spin request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinOutcome {
    /// The sequence completed and this participant was reported.
    Selected(ParticipantId),
    /// The spin never started (or aborted without a selection).
    Declined(SpinDecline),
}

/// One wheel instance: registry, sequencer, and settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wheel {
    registry: ParticipantRegistry,
    sequencer: SpinSequencer,
    settings: WheelSettings,
}

impl Wheel {
    /// Create an empty wheel with default settings.
    pub const fn new() -> Self {
        Self {
            registry: ParticipantRegistry::new(),
            sequencer: SpinSequencer::new(),
            settings: WheelSettings {
                description: String::new(),
                confetti_enabled: true,
            },
        }
    }

    /// Restore a wheel from a persisted document. The sequencer starts
    /// at rest with zero rotation; only participants and settings
    /// persist across reloads.
    pub fn from_document(document: WheelDocument) -> Self {
        Self {
            registry: ParticipantRegistry::from_participants(document.participants),
            sequencer: SpinSequencer::new(),
            settings: WheelSettings {
                description: document.description,
                confetti_enabled: document.confetti_enabled,
            },
        }
    }

    /// Snapshot the wheel into a persistable document.
    pub fn to_document(&self) -> WheelDocument {
        WheelDocument {
            participants: self.registry.snapshot(),
            description: self.settings.description.clone(),
            confetti_enabled: self.settings.confetti_enabled,
            saved_at: chrono::Utc::now(),
        }
    }

    /// The participant registry.
    pub const fn registry(&self) -> &ParticipantRegistry {
        &self.registry
    }

    /// Mutable access to the registry for list editing between spins.
    pub const fn registry_mut(&mut self) -> &mut ParticipantRegistry {
        &mut self.registry
    }

    /// The persisted wheel settings.
    pub const fn settings(&self) -> &WheelSettings {
        &self.settings
    }

    /// Mutable access to the settings.
    pub const fn settings_mut(&mut self) -> &mut WheelSettings {
        &mut self.settings
    }

    /// The cumulative rotation the renderer interpolates toward.
    pub const fn rotation_degrees(&self) -> f64 {
        self.sequencer.rotation_degrees()
    }

    /// The sector currently highlighted, if any.
    pub const fn highlighted_sector(&self) -> Option<usize> {
        self.sequencer.highlighted_sector()
    }

    /// The current phase of the spin sequence.
    pub const fn phase(&self) -> SpinPhase {
        self.sequencer.phase()
    }

    /// Spin the wheel with a freshly drawn random rotation and run the
    /// full timed sequence to completion.
    ///
    /// See [`spin_with_rotation`] for the sequencing contract.
    ///
    /// [`spin_with_rotation`]: Wheel::spin_with_rotation
    pub async fn spin(
        &mut self,
        rng: &mut impl Rng,
        observer: &mut dyn SpinObserver,
    ) -> SpinOutcome {
        let total_rotation = spin::draw_total_rotation(rng);
        self.spin_with_rotation(total_rotation, observer).await
    }

    /// Spin the wheel with an explicit coarse rotation (deterministic
    /// variant of [`spin`], for tests and replays).
    ///
    /// Guards run first: a spin while another is in flight, with fewer
    /// than two participants, or with nobody left to choose declines
    /// silently -- no callback fires and no rotation is applied. A spin
    /// that starts fires `on_spin_start` before the first timer, runs
    /// coarse spin, settle, and (when the landing was already chosen)
    /// the fine-tune correction, then fires `on_person_selected` and
    /// marks the participant chosen in the registry.
    ///
    /// [`spin`]: Wheel::spin
    pub async fn spin_with_rotation(
        &mut self,
        total_rotation: f64,
        observer: &mut dyn SpinObserver,
    ) -> SpinOutcome {
        let snapshot = self.registry.snapshot();
        let coarse_delay = match self
            .sequencer
            .start_spin_with_rotation(&snapshot, total_rotation)
        {
            Ok(delay) => delay,
            Err(decline) => {
                debug!(%decline, "spin declined");
                return SpinOutcome::Declined(decline);
            }
        };

        // Fires before any timer so the consumer can clear prior
        // highlights ahead of the new cycle.
        observer.on_spin_start();
        info!(
            rotation = self.sequencer.rotation_degrees(),
            participants = snapshot.len(),
            "spin started"
        );

        // Dropping this future mid-sequence must not strand the machine:
        // the guard rests the sequencer unless the sequence finishes.
        let mut guard = RestOnDrop::new(&mut self.sequencer);

        sleep_through_coarse(guard.sequencer, coarse_delay).await;

        loop {
            match guard.sequencer.advance() {
                Step::Wait(delay) => tokio::time::sleep(delay).await,
                Step::Finished(selection) => {
                    guard.finished = true;
                    drop(guard);
                    return match selection {
                        Some(participant) => {
                            observer.on_person_selected(participant);
                            if let Err(err) = self.registry.mark_chosen(participant) {
                                warn!(%err, "selection could not be recorded");
                            }
                            info!(%participant, "participant selected");
                            SpinOutcome::Selected(participant)
                        }
                        None => {
                            debug!("spin ended without a selection");
                            SpinOutcome::Declined(SpinDecline::NoneEligible)
                        }
                    };
                }
            }
        }
    }
}

/// Rests the sequencer when the spin future is dropped before the
/// sequence finishes, so cancellation never strands the wheel in a
/// non-idle phase.
struct RestOnDrop<'a> {
    sequencer: &'a mut SpinSequencer,
    finished: bool,
}

impl<'a> RestOnDrop<'a> {
    const fn new(sequencer: &'a mut SpinSequencer) -> Self {
        Self {
            sequencer,
            finished: false,
        }
    }
}

impl Drop for RestOnDrop<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.sequencer.reset();
        }
    }
}

/// Sleep out the coarse phase while cycling the sector highlight on the
/// fixed tick cadence.
async fn sleep_through_coarse(sequencer: &mut SpinSequencer, duration: Duration) {
    let sleep = tokio::time::sleep(duration);
    tokio::pin!(sleep);

    let first_tick = tokio::time::Instant::now() + HIGHLIGHT_TICK;
    let mut ticker = tokio::time::interval_at(first_tick, HIGHLIGHT_TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            () = &mut sleep => break,
            _ = ticker.tick() => sequencer.advance_highlight(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::observer::NoOpObserver;

    /// What a recording observer saw, in order.
    #[derive(Debug, PartialEq, Eq)]
    enum Seen {
        Started,
        Selected(ParticipantId),
    }

    #[derive(Default)]
    struct Recording {
        events: Vec<Seen>,
    }

    impl SpinObserver for Recording {
        fn on_spin_start(&mut self) {
            self.events.push(Seen::Started);
        }

        fn on_person_selected(&mut self, participant: ParticipantId) {
            self.events.push(Seen::Selected(participant));
        }
    }

    fn wheel_of(names: &[&str]) -> Wheel {
        let mut wheel = Wheel::new();
        for name in names {
            wheel.registry_mut().add(name).unwrap();
        }
        wheel
    }

    #[tokio::test(start_paused = true)]
    async fn direct_spin_reports_the_landed_participant() {
        let mut wheel = wheel_of(&["Ada", "Grace", "Edsger"]);
        let expected = wheel.registry().participants().get(1).unwrap().id;
        let mut observer = Recording::default();

        // 4 full turns plus 180 degrees lands sector 1 (Grace).
        let outcome = wheel
            .spin_with_rotation(4.0 * 360.0 + 180.0, &mut observer)
            .await;

        assert_eq!(outcome, SpinOutcome::Selected(expected));
        assert_eq!(
            observer.events,
            [Seen::Started, Seen::Selected(expected)]
        );
        let grace = wheel.registry().participants().get(1).unwrap();
        assert!(grace.chosen);
        assert_eq!(wheel.phase(), SpinPhase::Idle);
        assert_eq!(wheel.highlighted_sector(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn landing_on_a_chosen_participant_corrects_before_reporting() {
        let mut wheel = wheel_of(&["Ada", "Grace", "Edsger"]);
        let ada = wheel.registry().participants().first().unwrap().id;
        let edsger = wheel.registry().participants().get(2).unwrap().id;
        wheel.registry_mut().mark_chosen(ada).unwrap();

        // 4 whole turns land on Ada (chosen); one counter-clockwise step
        // wraps to Edsger.
        let mut observer = Recording::default();
        let outcome = wheel.spin_with_rotation(4.0 * 360.0, &mut observer).await;

        assert_eq!(outcome, SpinOutcome::Selected(edsger));
        assert_eq!(
            observer.events,
            [Seen::Started, Seen::Selected(edsger)]
        );
        // Coarse rotation plus one sector of correction.
        assert!((wheel.rotation_degrees() - 1560.0).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn declined_spin_fires_no_callbacks() {
        let mut wheel = wheel_of(&["Ada"]);
        let mut observer = Recording::default();

        let outcome = wheel.spin_with_rotation(1440.0, &mut observer).await;

        assert_eq!(
            outcome,
            SpinOutcome::Declined(SpinDecline::TooFewParticipants)
        );
        assert!(observer.events.is_empty());
        assert!((wheel.rotation_degrees()).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_wheel_declines() {
        let mut wheel = wheel_of(&["Ada", "Grace"]);
        for id in wheel.registry().snapshot().iter().map(|p| p.id) {
            wheel.registry_mut().mark_chosen(id).unwrap();
        }
        let mut observer = Recording::default();

        let outcome = wheel.spin_with_rotation(1440.0, &mut observer).await;

        assert_eq!(outcome, SpinOutcome::Declined(SpinDecline::NoneEligible));
        assert!(observer.events.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_spin_fires_no_selection() {
        let mut wheel = wheel_of(&["Ada", "Grace", "Edsger"]);
        let mut observer = Recording::default();

        // Tear the sequence down mid-coarse-phase; dropping the future
        // cancels every pending timer.
        let result = tokio::time::timeout(
            Duration::from_millis(500),
            wheel.spin_with_rotation(1620.0, &mut observer),
        )
        .await;

        assert!(result.is_err(), "the spin should have been cut short");
        assert_eq!(observer.events, [Seen::Started]);

        // The dropped future leaves the machine at rest with the
        // rotation it had already applied, so a fresh spin can start.
        assert_eq!(wheel.phase(), SpinPhase::Idle);
        assert_eq!(wheel.highlighted_sector(), None);
        assert!((wheel.rotation_degrees() - 1620.0).abs() < 1e-9);

        // From 1620 degrees, another 1620 rests on a whole turn: Ada.
        let ada = wheel.registry().participants().first().unwrap().id;
        let outcome = wheel.spin_with_rotation(1620.0, &mut observer).await;
        assert_eq!(outcome, SpinOutcome::Selected(ada));
        assert_eq!(
            observer.events,
            [Seen::Started, Seen::Started, Seen::Selected(ada)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn seeded_spins_accumulate_rotation_and_never_repeat_a_pick() {
        let mut wheel = wheel_of(&["Ada", "Grace", "Edsger"]);
        let mut rng = SmallRng::seed_from_u64(11);
        let mut observer = NoOpObserver;

        let SpinOutcome::Selected(first) = wheel.spin(&mut rng, &mut observer).await else {
            panic!("first spin should select someone");
        };
        let rotation_after_first = wheel.rotation_degrees();
        assert!(rotation_after_first >= 3.0 * 360.0);

        let SpinOutcome::Selected(second) = wheel.spin(&mut rng, &mut observer).await else {
            panic!("second spin should select someone");
        };
        assert_ne!(first, second, "a chosen participant must not repeat");
        assert!(wheel.rotation_degrees() > rotation_after_first);
        assert_eq!(wheel.phase(), SpinPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn highlight_rests_after_every_sequence() {
        let mut wheel = wheel_of(&["Ada", "Grace"]);
        let mut rng = SmallRng::seed_from_u64(3);

        let _ = wheel.spin(&mut rng, &mut NoOpObserver).await;
        assert_eq!(wheel.highlighted_sector(), None);
        assert_eq!(wheel.phase(), SpinPhase::Idle);
    }

    #[test]
    fn document_round_trip_preserves_list_and_settings() {
        let mut wheel = wheel_of(&["Ada", "Grace"]);
        wheel.settings_mut().description = String::from("Friday standup order");
        wheel.settings_mut().confetti_enabled = false;
        let ada = wheel.registry().participants().first().unwrap().id;
        wheel.registry_mut().mark_chosen(ada).unwrap();

        let document = wheel.to_document();
        let restored = Wheel::from_document(document);

        assert_eq!(restored.registry(), wheel.registry());
        assert_eq!(restored.settings(), wheel.settings());
        // Rotation is visual state, not persisted.
        assert!((restored.rotation_degrees()).abs() < 1e-9);
    }
}
