//! Streaming pipeline — capture → encode → fragment → notify
//!
//! The [`driver::StreamDriver`] owns one cycle of the pipeline and all of its
//! buffers; [`session::StreamSession`] is the connection gate and sequence
//! state; [`encoders`] holds the concrete codecs behind the
//! `platform::AudioEncoder` trait.
#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]

pub mod driver;
pub mod encoders;
pub mod session;

pub use driver::{ConfigError, CycleOutcome, StreamConfig, StreamDriver};
pub use session::{LinkState, StreamSession};
