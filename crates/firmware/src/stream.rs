//! Stream task — link-event drain, pipeline cycles, diagnostics.
//!
//! The pipeline driver itself is silent; this task is where cycle outcomes
//! meet the defmt diagnostic channel. Events are drained before every cycle,
//! so a disconnect is always observed between cycles, never mid-frame.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use platform::{AudioEncoder, CaptureSource, LinkEvent, PacketSink};
use streamer::StreamDriver;

/// Channel the radio task uses to hand connection events to the stream task.
///
/// Four slots is plenty: events only arrive at human timescales and the
/// stream task drains the channel every cycle.
pub type LinkEventChannel = Channel<CriticalSectionRawMutex, LinkEvent, 4>;

/// Feed every pending link event into the driver's session gate.
pub fn drain_link_events<Cap, Enc, Sink, const BLOCK: usize, const FRAME_OUT: usize>(
    driver: &mut StreamDriver<Cap, Enc, Sink, BLOCK, FRAME_OUT>,
    events: &LinkEventChannel,
) where
    Cap: CaptureSource,
    Enc: AudioEncoder,
    Sink: PacketSink,
{
    while let Ok(event) = events.try_receive() {
        driver.handle_link_event(event);
    }
}

#[cfg(feature = "hardware")]
pub use hardware::{stream_task, PendantDriver, ADPCM_SAMPLES_PER_BLOCK, CAPTURE_BLOCK_BYTES};

#[cfg(feature = "hardware")]
mod hardware {
    use streamer::encoders::AdpcmEncoder;
    use streamer::{CycleOutcome, StreamDriver};

    use super::LinkEventChannel;
    use crate::ble::BleNotifySink;
    use crate::mic::PdmMicrophone;

    /// ADPCM block length in samples. Odd by framing rule; 505 samples is
    /// ~31.6 ms of audio and encodes to a 256-byte frame (two packets).
    pub const ADPCM_SAMPLES_PER_BLOCK: usize = 505;

    /// One capture read per encoder frame: 505 samples × 2 bytes.
    pub const CAPTURE_BLOCK_BYTES: usize = ADPCM_SAMPLES_PER_BLOCK * 2;

    /// Worst-case encoded frame: 4-byte block header + 252 code bytes.
    const FRAME_OUT_BYTES: usize = 256;

    /// The concrete pipeline this device runs.
    pub type PendantDriver =
        StreamDriver<PdmMicrophone, AdpcmEncoder, BleNotifySink, CAPTURE_BLOCK_BYTES, FRAME_OUT_BYTES>;

    /// Pipeline loop: drain events, run one cycle, log the outcome.
    #[embassy_executor::task]
    pub async fn stream_task(
        driver: &'static mut PendantDriver,
        events: &'static LinkEventChannel,
    ) -> ! {
        defmt::info!("stream task up");
        loop {
            super::drain_link_events(driver, events);
            match driver.run_cycle().await {
                CycleOutcome::Idle => {}
                CycleOutcome::CaptureFailed => {
                    defmt::warn!("capture read returned no data; skipping cycle");
                }
                CycleOutcome::EncodeFailed => {
                    defmt::warn!("encoder rejected a frame; block abandoned");
                }
                CycleOutcome::LinkLost { packets_sent } => {
                    defmt::debug!("link down mid-cycle after {=u16} packets", packets_sent);
                }
                CycleOutcome::SinkFailed { packets_sent } => {
                    defmt::warn!("notify failed after {=u16} packets", packets_sent);
                }
                CycleOutcome::Streamed { frames, packets_sent } => {
                    defmt::trace!(
                        "streamed {=u8} frames in {=u16} packets",
                        frames,
                        packets_sent
                    );
                }
            }
        }
    }
}
