//! Lossless waveform pass-through encoder.
//!
//! Emits capture bytes unchanged, one frame per `encode` call. Used for
//! bring-up and link debugging; at 16 kHz × 16-bit mono the raw stream only
//! fits the radio budget with a generous connection interval.

use platform::{AudioEncoder, EncoderConfig, EncoderConfigError, FrameSizes};

/// Pass-through "codec": output frame == input frame.
pub struct PcmEncoder {
    frame_bytes: usize,
}

impl PcmEncoder {
    /// Create a pass-through encoder emitting `frame_bytes` per frame.
    ///
    /// # Errors
    ///
    /// Returns [`EncoderConfigError`] for an invalid capture config, or for
    /// a frame size of zero or one not aligned to whole 16-bit samples.
    pub fn new(config: EncoderConfig, frame_bytes: usize) -> Result<Self, EncoderConfigError> {
        config.validate()?;
        if frame_bytes == 0 || frame_bytes % 2 != 0 {
            return Err(EncoderConfigError::InvalidFrameSize(frame_bytes));
        }
        Ok(Self { frame_bytes })
    }
}

/// Errors from [`PcmEncoder::encode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PcmError {
    /// The input slice is not exactly one frame.
    BadInputLength {
        /// Bytes the encoder expects per frame.
        expected: usize,
        /// Bytes it was given.
        got: usize,
    },
    /// The output buffer cannot hold one frame.
    OutputTooSmall {
        /// Bytes required.
        needed: usize,
    },
}

impl AudioEncoder for PcmEncoder {
    type Error = PcmError;

    fn frame_sizes(&self) -> FrameSizes {
        FrameSizes { input: self.frame_bytes, output: self.frame_bytes }
    }

    fn encode(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, Self::Error> {
        if input.len() != self.frame_bytes {
            return Err(PcmError::BadInputLength { expected: self.frame_bytes, got: input.len() });
        }
        let Some(dest) = output.get_mut(..self.frame_bytes) else {
            return Err(PcmError::OutputTooSmall { needed: self.frame_bytes });
        };
        dest.copy_from_slice(input);
        Ok(self.frame_bytes)
    }
}
