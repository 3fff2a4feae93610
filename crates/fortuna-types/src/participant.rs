//! Participant records and persisted wheel settings.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::ParticipantId;

/// A single entry on the wheel.
///
/// The `chosen` flag transitions false to true exactly once per round;
/// a bulk reset (new round) is the only way back to false. The selection
/// core receives participants as an immutable ordered snapshot and never
/// flips the flag itself -- that happens in the owning registry after the
/// selection callback fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Participant {
    /// Opaque unique identifier. Identity lives here, not in the name.
    pub id: ParticipantId,
    /// Display name shown on the wheel sector. Mutable.
    pub name: String,
    /// Whether this participant has already been picked this round.
    pub chosen: bool,
}

impl Participant {
    /// Create a not-yet-chosen participant with a fresh ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ParticipantId::new(),
            name: name.into(),
            chosen: false,
        }
    }
}

/// User-facing wheel settings persisted alongside the participant list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WheelSettings {
    /// Free-form description text shown next to the wheel.
    pub description: String,
    /// Whether the celebratory confetti effect plays on selection.
    pub confetti_enabled: bool,
}

impl Default for WheelSettings {
    fn default() -> Self {
        Self {
            description: String::new(),
            confetti_enabled: true,
        }
    }
}
