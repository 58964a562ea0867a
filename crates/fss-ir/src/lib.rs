//! Core IR types for the it2fss converter.
//!
//! The format parser emits this IR and the converter consumes it. Only the
//! data of a single tracker channel is kept per pattern.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod effects;
mod pattern;
pub mod song;

pub use effects::TempoCommand;
pub use pattern::{Cell, Note, Pattern, MAX_VOLUME};
pub use song::{Module, OrderEntry};
