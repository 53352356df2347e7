//! Audio encoder abstraction — PCM-in, compressed-frame-out codec trait.
//!
//! Every codec variant sits behind the same contract: construction validates
//! a config (the open step), [`AudioEncoder::frame_sizes`] reports the fixed
//! input size and worst-case output size, [`AudioEncoder::encode`] turns one
//! input frame into zero or more output bytes, and `Drop` releases whatever
//! the codec holds. The pipeline driver is codec-agnostic; variants are
//! selected once at configuration time, not through a registry.
//!
//! # Codec selection rationale
//!
//! * **ADPCM** (fixed-rate differential, 4:1): pure Rust IMA implementation
//!   in the streamer crate. Self-contained blocks, so a lost frame never
//!   desynchronises the receiver. The default codec.
//!
//! * **PCM** (lossless waveform pass-through): trivial, used for bring-up
//!   and link debugging; 16 kHz × 16-bit mono fits the radio budget only
//!   with a generous connection interval.
//!
//! * **AAC** (perceptual lossy): the original hardware rides a vendor DSP
//!   library for this. No suitable `no_std` pure-Rust encoder exists; an
//!   FFI binding would slot behind this same trait. Not linked yet.

/// Fixed buffer sizes a codec requires, reported after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameSizes {
    /// Bytes of raw PCM consumed per `encode` call.
    pub input: usize,
    /// Worst-case bytes produced per `encode` call.
    pub output: usize,
}

/// Stateful frame-by-frame audio encoder.
///
/// Implementations must be `no_std`-safe and must not allocate.
pub trait AudioEncoder {
    /// Error type produced by this encoder.
    type Error: core::fmt::Debug;

    /// Buffer sizes this encoder requires.
    fn frame_sizes(&self) -> FrameSizes;

    /// Encode exactly one input frame into `output`.
    ///
    /// `input` must be exactly `frame_sizes().input` bytes (the caller
    /// zero-pads a short final chunk); `output` must hold at least
    /// `frame_sizes().output` bytes.
    ///
    /// # Returns
    ///
    /// `Ok(bytes_written)` on success. `Ok(0)` is a normal outcome, not an
    /// error: codecs that buffer internally emit frames only periodically.
    ///
    /// # Errors
    ///
    /// Returns `Err(Self::Error)` when the codec rejects the frame; the
    /// caller abandons the current frame and continues with the next one.
    fn encode(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Audio encoder configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels (1 = mono)
    pub channels: u8,
    /// Sample width in bits (16 only, for now)
    pub bits_per_sample: u8,
}

impl EncoderConfig {
    /// Validate the configuration against what the capture path produces.
    ///
    /// # Errors
    ///
    /// Returns [`EncoderConfigError`] for rates outside 8–48 kHz, non-mono
    /// channel counts, or widths other than 16 bits.
    pub fn validate(&self) -> Result<(), EncoderConfigError> {
        if !(8_000..=48_000).contains(&self.sample_rate) {
            return Err(EncoderConfigError::UnsupportedSampleRate(self.sample_rate));
        }
        if self.channels != 1 {
            return Err(EncoderConfigError::UnsupportedChannelCount(self.channels));
        }
        if self.bits_per_sample != 16 {
            return Err(EncoderConfigError::UnsupportedSampleWidth(self.bits_per_sample));
        }
        Ok(())
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            sample_rate: crate::config::SAMPLE_RATE_HZ,
            channels: crate::config::CHANNELS,
            bits_per_sample: crate::config::BITS_PER_SAMPLE,
        }
    }
}

/// Rejected encoder configuration — fatal at setup, the pipeline never runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncoderConfigError {
    /// Sample rate outside the supported 8–48 kHz range.
    #[error("unsupported sample rate: {0} Hz")]
    UnsupportedSampleRate(u32),
    /// Only mono capture is supported.
    #[error("unsupported channel count: {0}")]
    UnsupportedChannelCount(u8),
    /// Only 16-bit samples are supported.
    #[error("unsupported sample width: {0} bits")]
    UnsupportedSampleWidth(u8),
    /// The requested frame size does not fit the codec's framing rules.
    #[error("invalid frame size: {0} bytes")]
    InvalidFrameSize(usize),
}
