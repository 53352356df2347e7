//! Notification transport abstraction

/// Single-writer, one-packet-at-a-time unreliable notification channel.
///
/// The link is best-effort: no acknowledgment, no retransmission. A send
/// either reaches the radio or is dropped; the only distinguished failure
/// is [`SendError::NotConnected`], expected during the window between a
/// disconnect and the session gate observing it.
pub trait PacketSink {
    /// Error type for transport faults other than a down link.
    type Error: core::fmt::Debug;

    /// Largest packet this sink will accept, in bytes.
    fn max_packet_size(&self) -> usize;

    /// Queue one packet as a notification.
    async fn send(&mut self, packet: &[u8]) -> Result<(), SendError<Self::Error>>;
}

/// Failure modes of [`PacketSink::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendError<E> {
    /// The link is down; the packet was dropped. Not an error to report —
    /// the session gate catches up on its next check.
    NotConnected,
    /// The transport itself failed (stack fault, queue exhaustion).
    Transport(E),
}

/// Discrete connection event raised by the transport's own stack.
///
/// The session gate consumes these between pipeline cycles; there are no
/// callbacks. A `Disconnected` event also means advertising has been
/// re-enabled so a new peer can connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// A central connected and subscribed to notifications.
    Connected {
        /// The peer's 6-byte Bluetooth address.
        peer: [u8; 6],
    },
    /// The central dropped the connection.
    Disconnected,
}
