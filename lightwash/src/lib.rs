//! Control engine for a two-zone RGB light bar driven over DMX.
//!
//! A front end drives the [`state::DeskState`] surface; the engine
//! interpolates the two zone colors across the rig and streams universe
//! frames to the configured output devices at a fixed rate.

#![deny(clippy::all)]
#![warn(clippy::perf)]
#![warn(clippy::complexity)]
#![deny(clippy::style)]
#![deny(clippy::print_stdout)]
#![deny(clippy::cast_lossless)]

pub mod color;
pub mod config;
pub mod devices;
pub mod events;
pub mod frame;
pub mod frame_resolver;
pub mod id;
pub mod presets;
pub mod rig;
pub mod state;
pub mod universe;
pub mod wash;
