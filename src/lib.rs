//! Heading-to-ring rendering and grid raycasting engine for a handheld
//! compass gadget.
//!
//! A magnetometer heading is turned into a position on a ring of addressable
//! LEDs, and one of several games is drawn onto that ring every tick: a plain
//! compass pointer, a shrinking-arc timing game, and a first-person raycast
//! view of a fixed maze.
//!
//! The library is `no_std` and hardware agnostic. The firmware binary wires it
//! to a micro:bit v2 (LSM303AGR magnetometer, WS2812 ring on PWM0, 5x5 status
//! matrix, telemetry over UARTE).

#![cfg_attr(not(test), no_std)]

// Must stay first so the logging macros are visible to the other modules.
mod fmt;

pub mod config;
pub mod engine;
pub mod error;
pub mod frame;
pub mod game;
pub mod grid;
pub mod heading;
pub mod input;
pub mod math;
pub mod mqtt;
pub mod player;
pub mod raycast;
pub mod render;
pub mod runner;
pub mod telemetry;
pub mod ui;

pub use config::Config;
pub use engine::Engine;
pub use error::Error;
pub use frame::RingFrame;
pub use game::GameMode;
pub use heading::{Calibration, Heading, HeadingSample};
pub use runner::Runner;
