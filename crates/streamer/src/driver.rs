//! Pipeline driver — one cooperative loop over capture, encode, and notify.
//!
//! The driver owns every buffer the pipeline touches: one reusable capture
//! block, one encoder input frame, one encoded output frame, and one
//! outbound packet. All four are overwritten each cycle; nothing is shared,
//! because there is only one logical thread of control. The only suspension
//! points are the capture read, the per-packet pacing gap, and the idle
//! poll while disconnected.
//!
//! The driver performs no logging. Each cycle returns a [`CycleOutcome`]
//! and the firmware task decides what to put on the diagnostic channel.

use embassy_time::{Duration, Timer};
use platform::config::MAX_NOTIFY_PAYLOAD;
use platform::{AudioEncoder, CaptureSource, LinkEvent, PacketSink, SendError};
use protocol::{fragment, HEADER_SIZE, MAX_PACKETS_PER_FRAME};

use crate::session::StreamSession;

/// Tunable pipeline parameters, validated once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    /// Largest packet handed to the sink, header included. Must exceed
    /// [`HEADER_SIZE`] and fit both the sink's budget and the driver's
    /// outbound buffer.
    pub max_packet_size: usize,
    /// Bytes requested from the capture source per cycle. Usually a multiple
    /// of the encoder's input frame size; a short tail is zero-padded, never
    /// dropped.
    pub capture_block: usize,
    /// Flat pause after every notification, keeping the sender under the
    /// radio's sustainable rate.
    pub inter_packet_gap: Duration,
    /// How often the gate is re-checked while disconnected.
    pub idle_poll: Duration,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            max_packet_size: MAX_NOTIFY_PAYLOAD,
            capture_block: 0, // set from the encoder's input frame size
            inter_packet_gap: Duration::from_millis(platform::config::INTER_PACKET_GAP_MS),
            idle_poll: Duration::from_millis(platform::config::IDLE_POLL_MS),
        }
    }
}

/// Rejected pipeline configuration — fatal at setup, the pipeline never runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// `max_packet_size` leaves no room for payload after the header.
    #[error("packet size {0} leaves no payload after the {HEADER_SIZE}-byte header")]
    PayloadTooSmall(usize),
    /// `max_packet_size` exceeds the driver's outbound buffer.
    #[error("packet size {0} exceeds the outbound buffer ({MAX_NOTIFY_PAYLOAD})")]
    PacketBufferTooSmall(usize),
    /// `max_packet_size` exceeds what the sink will accept.
    #[error("packet size {configured} exceeds the sink's budget {sink}")]
    PacketExceedsSink {
        /// Configured packet size.
        configured: usize,
        /// The sink's reported maximum.
        sink: usize,
    },
    /// The encoder reported a zero input frame size.
    #[error("encoder reports a zero-byte input frame")]
    ZeroInputFrame,
    /// `capture_block` is zero.
    #[error("capture block size is zero")]
    ZeroCaptureBlock,
    /// The capture block or encoder input frame exceeds the block buffer.
    #[error("block of {needed} bytes exceeds the {capacity}-byte buffer")]
    BlockTooLarge {
        /// Bytes required.
        needed: usize,
        /// Compile-time buffer capacity.
        capacity: usize,
    },
    /// The encoder's worst-case output exceeds the frame buffer.
    #[error("encoded frame of {needed} bytes exceeds the {capacity}-byte buffer")]
    FrameBufferTooSmall {
        /// Bytes required.
        needed: usize,
        /// Compile-time buffer capacity.
        capacity: usize,
    },
    /// The encoder's worst-case output would fragment into more packets
    /// than the header's 4-bit count field can describe.
    #[error("worst-case frame needs {packets} packets; the header carries at most {MAX_PACKETS_PER_FRAME}")]
    FrameTooLarge {
        /// Packets the worst-case frame would need.
        packets: usize,
    },
}

/// What one pipeline cycle did. The firmware task logs these; every failure
/// variant means "this unit of work was skipped, the loop continues".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleOutcome {
    /// Gate closed; slept one idle-poll interval, issued no capture read.
    Idle,
    /// The capture read returned zero bytes or failed; nothing was encoded,
    /// no sequence number was consumed.
    CaptureFailed,
    /// The codec rejected a frame; the rest of the capture block was
    /// abandoned with no partial packets sent.
    EncodeFailed,
    /// The sink reported the link down mid-cycle; the remainder was dropped.
    /// Expected between a disconnect and the gate observing it.
    LinkLost {
        /// Packets that were accepted before the link dropped.
        packets_sent: u16,
    },
    /// The transport failed for a reason other than a down link.
    SinkFailed {
        /// Packets that were accepted before the failure.
        packets_sent: u16,
    },
    /// The cycle completed. `frames` may be zero when the codec buffered
    /// the whole block internally.
    Streamed {
        /// Non-empty encoded frames emitted (and sequence numbers consumed).
        frames: u8,
        /// Notifications accepted by the sink.
        packets_sent: u16,
    },
}

/// The pipeline driver.
///
/// `BLOCK` sizes the capture block and encoder input buffers; `FRAME_OUT`
/// sizes the encoded frame buffer. Both are checked against the encoder's
/// reported requirements and the configuration in [`StreamDriver::new`].
pub struct StreamDriver<Cap, Enc, Sink, const BLOCK: usize, const FRAME_OUT: usize> {
    capture: Cap,
    encoder: Enc,
    sink: Sink,
    session: StreamSession,
    config: StreamConfig,
    /// Per-packet payload capacity: `max_packet_size - HEADER_SIZE`.
    chunk_size: usize,
    block: [u8; BLOCK],
    input_frame: [u8; BLOCK],
    encoded_frame: [u8; FRAME_OUT],
    packet: [u8; MAX_NOTIFY_PAYLOAD],
}

impl<Cap, Enc, Sink, const BLOCK: usize, const FRAME_OUT: usize>
    StreamDriver<Cap, Enc, Sink, BLOCK, FRAME_OUT>
where
    Cap: CaptureSource,
    Enc: AudioEncoder,
    Sink: PacketSink,
{
    /// Build a driver, validating the configuration against the encoder's
    /// reported frame sizes and the sink's packet budget.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for any combination the pipeline could not
    /// run safely: a packet budget at or below the header size, buffers
    /// smaller than the encoder requires, or a worst-case encoded frame the
    /// 4-bit packet-count field cannot describe.
    pub fn new(
        capture: Cap,
        encoder: Enc,
        sink: Sink,
        config: StreamConfig,
    ) -> Result<Self, ConfigError> {
        let chunk_size = match config.max_packet_size.checked_sub(HEADER_SIZE) {
            Some(chunk) if chunk > 0 => chunk,
            _ => return Err(ConfigError::PayloadTooSmall(config.max_packet_size)),
        };
        if config.max_packet_size > MAX_NOTIFY_PAYLOAD {
            return Err(ConfigError::PacketBufferTooSmall(config.max_packet_size));
        }
        let sink_budget = sink.max_packet_size();
        if config.max_packet_size > sink_budget {
            return Err(ConfigError::PacketExceedsSink {
                configured: config.max_packet_size,
                sink: sink_budget,
            });
        }

        let sizes = encoder.frame_sizes();
        if sizes.input == 0 {
            return Err(ConfigError::ZeroInputFrame);
        }
        if config.capture_block == 0 {
            return Err(ConfigError::ZeroCaptureBlock);
        }
        let block_needed = config.capture_block.max(sizes.input);
        if block_needed > BLOCK {
            return Err(ConfigError::BlockTooLarge { needed: block_needed, capacity: BLOCK });
        }
        if sizes.output > FRAME_OUT {
            return Err(ConfigError::FrameBufferTooSmall {
                needed: sizes.output,
                capacity: FRAME_OUT,
            });
        }
        let worst_case_packets = sizes.output.div_ceil(chunk_size);
        if worst_case_packets > MAX_PACKETS_PER_FRAME {
            return Err(ConfigError::FrameTooLarge { packets: worst_case_packets });
        }

        Ok(Self {
            capture,
            encoder,
            sink,
            session: StreamSession::new(),
            config,
            chunk_size,
            block: [0; BLOCK],
            input_frame: [0; BLOCK],
            encoded_frame: [0; FRAME_OUT],
            packet: [0; MAX_NOTIFY_PAYLOAD],
        })
    }

    /// Feed one link event from the transport into the session gate.
    ///
    /// The firmware task drains pending events before each cycle, so a
    /// disconnect is observed between cycles, never mid-frame.
    pub fn handle_link_event(&mut self, event: LinkEvent) {
        self.session.handle_event(event);
    }

    /// The session gate and sequence state.
    #[must_use]
    pub fn session(&self) -> &StreamSession {
        &self.session
    }

    /// The capture source (diagnostics).
    #[must_use]
    pub fn capture(&self) -> &Cap {
        &self.capture
    }

    /// The encoder (diagnostics).
    #[must_use]
    pub fn encoder(&self) -> &Enc {
        &self.encoder
    }

    /// The packet sink (diagnostics).
    #[must_use]
    pub fn sink(&self) -> &Sink {
        &self.sink
    }

    /// Run one pipeline cycle: gate check, one capture read, encode each
    /// input-sized chunk (zero-padding the tail), fragment and send every
    /// non-empty encoded frame with a paced gap after each notification.
    #[allow(clippy::arithmetic_side_effects)] // offsets bounded by captured <= BLOCK; counters bounded by 15 packets * (BLOCK / input) frames
    #[allow(clippy::indexing_slicing)] // ranges bounded by lengths validated in new(): capture_block, sizes.input <= BLOCK; encoded_len <= FRAME_OUT
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        if !self.session.is_connected() {
            Timer::after(self.config.idle_poll).await;
            return CycleOutcome::Idle;
        }

        let block = &mut self.block[..self.config.capture_block];
        let captured = match self.capture.read(block).await {
            Ok(0) | Err(_) => return CycleOutcome::CaptureFailed,
            Ok(n) => n.min(self.config.capture_block),
        };

        let in_size = self.encoder.frame_sizes().input;
        let mut frames: u8 = 0;
        let mut packets_sent: u16 = 0;
        let mut offset = 0;

        while offset < captured {
            // Re-slice the capture block; the final short chunk is padded
            // with silence so no capture byte is ever dropped.
            let take = in_size.min(captured - offset);
            self.input_frame[..take].copy_from_slice(&self.block[offset..offset + take]);
            self.input_frame[take..in_size].fill(0);
            offset += take;

            let encoded_len = match self
                .encoder
                .encode(&self.input_frame[..in_size], &mut self.encoded_frame)
            {
                Ok(n) => n.min(FRAME_OUT),
                Err(_) => return CycleOutcome::EncodeFailed,
            };
            if encoded_len == 0 {
                continue; // codec buffered internally; no sequence number consumed
            }

            let frame = &self.encoded_frame[..encoded_len];
            let Ok(packets) = fragment(frame, self.session.frame_seq(), self.chunk_size) else {
                // Encoder wrote more than its declared worst case.
                return CycleOutcome::EncodeFailed;
            };
            for packet in packets {
                let Ok(len) = packet.write_into(&mut self.packet) else {
                    return CycleOutcome::EncodeFailed;
                };
                match self.sink.send(&self.packet[..len]).await {
                    Ok(()) => packets_sent += 1,
                    Err(SendError::NotConnected) => {
                        return CycleOutcome::LinkLost { packets_sent };
                    }
                    Err(SendError::Transport(_)) => {
                        return CycleOutcome::SinkFailed { packets_sent };
                    }
                }
                Timer::after(self.config.inter_packet_gap).await;
            }

            self.session.advance_frame();
            frames += 1;
        }

        CycleOutcome::Streamed { frames, packets_sent }
    }
}
