//! Tempociclo firmware library.
//!
//! Exposes the dispatch core and its adapters for integration testing.
//! All ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module; every other target gets simulated peripherals.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod dispatcher;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod sensors;
pub mod tasks;
pub mod tick;
