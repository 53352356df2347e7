//! Capability layer for the Murmur pendant
//!
//! This crate defines the narrow trait interfaces the streaming pipeline
//! consumes, so the pipeline can be developed and tested without microphone
//! hardware or a radio.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate)
//!         ↓
//! Pipeline Layer (streamer crate)
//!         ↓
//! Capability traits (this crate)
//!         ↓
//! Hardware Layer (Embassy HAL + BLE stack)
//! ```
//!
//! # Interfaces
//!
//! - [`CaptureSource`] - Microphone sample blocks
//! - [`AudioEncoder`] - Raw PCM → compressed frames
//! - [`PacketSink`] - One-packet-at-a-time unreliable notification channel
//! - [`LinkEvent`] - Discrete connection events driving the session gate
//!
//! # Features
//!
//! - `std`: Enable standard library support (for testing)
//! - `defmt`: Enable defmt logging derives (hardware builds)

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::must_use_candidate)] // capability accessors — callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

pub mod capture;
pub mod config;
pub mod encoder;
pub mod mocks;
pub mod transport;

// Re-export the capability traits and their companion types
pub use capture::CaptureSource;
pub use encoder::{AudioEncoder, EncoderConfig, EncoderConfigError, FrameSizes};
pub use transport::{LinkEvent, PacketSink, SendError};
