//! Timed spin driver and persistence for the Fortuna wheel.
//!
//! `fortuna-core` is pure and clock-free; this crate supplies the clock.
//! [`Wheel`] drives the sequencer's phases on tokio timers, fires the
//! [`SpinObserver`] callbacks at the boundaries, and bridges to the
//! single-document JSON [`WheelStore`].
//!
//! # Modules
//!
//! - [`observer`] -- The selection-callback boundary
//! - [`wheel`] -- The timer-owning spin driver
//! - [`store`] -- Single-document JSON persistence

pub mod observer;
pub mod store;
pub mod wheel;

pub use observer::{NoOpObserver, SpinObserver};
pub use store::{StoreError, WheelDocument, WheelStore};
pub use wheel::{SpinOutcome, Wheel};
