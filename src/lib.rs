//! GrowHub controller firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod bus;
pub mod config;
pub mod engine;
pub mod error;
pub mod menu;
pub mod profiles;
pub mod protocol;
pub mod telemetry;
pub mod zone;

mod pins;

// The hardware-facing modules compile on every target; the actual
// implementations are guarded by cfg attributes inside.
pub mod adapters;
pub mod drivers;
