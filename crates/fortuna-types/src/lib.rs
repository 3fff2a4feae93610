//! Shared type definitions for the Fortuna wheel picker.
//!
//! This crate is the single source of truth for the types that cross the
//! boundary between the selection core and the browser renderer. Types
//! defined here flow downstream to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for participant identifiers
//! - [`participant`] -- Participant records and persisted wheel settings

pub mod ids;
pub mod participant;

pub use ids::ParticipantId;
pub use participant::{Participant, WheelSettings};

#[cfg(test)]
mod tests {
    //! Integration tests for type exports and `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs generates TypeScript bindings when types with
        // #[ts(export)] are used. Importing them here triggers generation.
        // The actual files are written to the `bindings/` directory
        // relative to the crate root.
        use ts_rs::TS;

        let _ = crate::ids::ParticipantId::export_all();
        let _ = crate::participant::Participant::export_all();
        let _ = crate::participant::WheelSettings::export_all();
    }
}
