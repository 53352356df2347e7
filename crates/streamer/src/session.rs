//! Stream session — connection gate and sequence state.
//!
//! `StreamSession` is a pure, `no_std`, allocation-free state machine. It
//! consumes the transport's discrete [`LinkEvent`]s between pipeline cycles
//! and owns the inter-frame sequence counter, so no sequence state lives in
//! globals. It deliberately has **no** I/O — the radio stack raises the
//! events, the pipeline driver reads the gate.

use platform::LinkEvent;
use protocol::FrameSeq;

/// Current link state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// No central is connected; the pipeline must not capture, encode, or
    /// send. Advertising is active so a peer can connect.
    Disconnected,
    /// A central is connected and subscribed; the pipeline runs.
    Connected,
}

/// Connection gate plus sequence counters for one audio stream.
///
/// Sequence counters are intentionally **not** reset by link transitions:
/// the receiver keys on relative 4-bit ids only, and preserving the counter
/// keeps a quick reconnect from reusing the id of a frame that was cut off
/// mid-transmission.
pub struct StreamSession {
    link: LinkState,
    peer_address: Option<[u8; 6]>,
    frame_seq: FrameSeq,
}

impl StreamSession {
    /// Create a new session: disconnected, sequence counter at zero.
    #[must_use]
    pub fn new() -> Self {
        StreamSession {
            link: LinkState::Disconnected,
            peer_address: None,
            frame_seq: FrameSeq::new(),
        }
    }

    /// Apply one link event from the transport.
    pub fn handle_event(&mut self, event: LinkEvent) {
        match event {
            LinkEvent::Connected { peer } => {
                self.link = LinkState::Connected;
                self.peer_address = Some(peer);
            }
            LinkEvent::Disconnected => {
                self.link = LinkState::Disconnected;
                self.peer_address = None;
            }
        }
    }

    /// Returns `true` while a peer is connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.link == LinkState::Connected
    }

    /// Current link state.
    #[must_use]
    pub fn link(&self) -> LinkState {
        self.link
    }

    /// The peer's 6-byte Bluetooth address, or `None` when disconnected.
    #[must_use]
    pub fn peer_address(&self) -> Option<[u8; 6]> {
        self.peer_address
    }

    /// Sequence number the next non-empty encoded frame will carry.
    #[must_use]
    pub fn frame_seq(&self) -> FrameSeq {
        self.frame_seq
    }

    /// Consume one sequence number after a frame's packets were emitted.
    pub fn advance_frame(&mut self) {
        self.frame_seq.advance();
    }
}

impl Default for StreamSession {
    fn default() -> Self {
        Self::new()
    }
}
