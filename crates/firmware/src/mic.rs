//! PDM microphone capture — SAI1 PDM interface, DMA ring — hardware only.
//!
//! # Hardware: MP34DT05 PDM microphone on SAI1 (STM32WB55, RM0434 §40)
//!
//! The SAI peripheral's PDM interface decimates the 1-bit microphone
//! bitstream to 16 kHz × 16-bit mono PCM. DMA fills a two-half ring; the
//! capture source hands out completed halves.
//!
//! ## Pin assignments (Murmur rev-A)
//!   - PA8 → SAI1_CK2 (PDM clock out, 1.024 MHz)
//!   - PA9 → SAI1_D2  (PDM data in)
//!
//! ## DMA ring layout
//!
//! ```text
//! MIC_RING: [u8; 2 * CAPTURE_BLOCK_BYTES]
//!   ├── Half 0: DMA filling while the pipeline drains half 1
//!   └── Half 1: DMA filling while the pipeline drains half 0
//! ```

use embassy_time::{Duration, Timer};
use platform::config::SAMPLE_RATE_HZ;
use platform::CaptureSource;

/// Microphone capture source exposing completed DMA ring halves.
pub struct PdmMicrophone {
    bytes_per_second: u64,
}

impl PdmMicrophone {
    /// Create the capture source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            // 16-bit mono
            bytes_per_second: u64::from(SAMPLE_RATE_HZ).saturating_mul(2),
        }
    }
}

impl Default for PdmMicrophone {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureSource for PdmMicrophone {
    type Error = core::convert::Infallible;

    /// Block until one capture block is ready, then copy it into `buf`.
    ///
    /// TODO: wire SAI1's PDM interface + DMA half-transfer interrupts via
    /// embassy-stm32 (blocked on SAI PDM support for the WB family; tracked
    /// for the rev-B board bring-up). Until then this source paces itself at
    /// the real data rate and hands out silence, which exercises the whole
    /// encode/fragment/notify path at representative timing.
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let micros = (buf.len() as u64)
            .saturating_mul(1_000_000)
            .checked_div(self.bytes_per_second)
            .unwrap_or(0);
        Timer::after(Duration::from_micros(micros)).await;
        buf.fill(0);
        Ok(buf.len())
    }
}
