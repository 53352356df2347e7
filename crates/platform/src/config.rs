//! Application configuration and constants
//!
//! This module defines central configuration values used across the
//! application. All naming, timing, and sizing should reference these
//! constants rather than hardcoding values.

/// The application name
pub const APP_NAME: &str = "Murmur Pendant";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Largest notification payload the transport will accept, in bytes.
///
/// Matches the iOS ATT MTU of 185 minus the 3-byte ATT header, the smallest
/// ceiling among supported peers. Android peers negotiate larger MTUs but a
/// single fixed budget keeps the packetizer deterministic.
pub const MAX_NOTIFY_PAYLOAD: usize = 182;

/// Minimum gap between consecutive notifications, in milliseconds.
///
/// Keeps the sender under the radio's sustainable notification rate. This is
/// a flat per-packet constant, not derived from payload size.
pub const INTER_PACKET_GAP_MS: u64 = 4;

/// How often the pipeline re-checks the session gate while disconnected,
/// in milliseconds.
pub const IDLE_POLL_MS: u64 = 50;

/// Microphone sample rate in Hz.
pub const SAMPLE_RATE_HZ: u32 = 16_000;

/// Microphone channel count (mono).
pub const CHANNELS: u8 = 1;

/// Microphone sample width in bits.
pub const BITS_PER_SAMPLE: u8 = 16;
