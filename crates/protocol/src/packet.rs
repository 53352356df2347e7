//! Packet header layout and frame fragmentation.
//!
//! Every notification carries a 2-byte header followed by a contiguous slice
//! of one encoded frame:
//!
//! ```text
//!         bit 7    4 3    0
//!         +------+------+
//! byte 0  | rsvd | seq  |   seq:   inter-frame sequence number (0..=15)
//!         +------+------+
//! byte 1  | cnt  | idx  |   cnt:   total packets in this frame (1..=15)
//!         +------+------+   idx:   this packet's position, 0..cnt
//! byte 2.. payload          payload: frame bytes [idx*chunk .. idx*chunk+len)
//! ```
//!
//! Packets of a frame concatenated in index order reproduce the frame
//! byte-for-byte; only the last packet may be short. The receiver reassembles
//! by collecting indices `0..cnt` for one `seq` value — there is no
//! out-of-order recovery, so the sender must emit packets in index order.

#[cfg(test)]
// Tests use expect() for readable assertions; indexing/arithmetic on fixed
// test vectors is intentional.
#[allow(
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation
)]
mod tests {
    use super::{fragment, FragmentError, HeaderError, PacketHeader, HEADER_SIZE};
    use crate::seq::FrameSeq;

    // ---- Fragmentation tests -------------------------------------------------

    #[test]
    fn test_fragment_30_bytes_into_chunk_14() {
        // 16-byte notification budget, 2-byte header → 14-byte chunks.
        // A 30-byte frame at seq 3 must yield exactly [14, 14, 2] with
        // headers 0x03/0x30, 0x03/0x31, 0x03/0x32.
        let frame: [u8; 30] = core::array::from_fn(|i| i as u8);
        let packets: heapless::Vec<_, 4> =
            fragment(&frame, FrameSeq::from_raw(3), 14).expect("config is valid").collect();

        assert_eq!(packets.len(), 3);
        assert_eq!(packets[0].header.encode(), [0x03, 0x30]);
        assert_eq!(packets[1].header.encode(), [0x03, 0x31]);
        assert_eq!(packets[2].header.encode(), [0x03, 0x32]);
        assert_eq!(packets[0].payload, &frame[0..14]);
        assert_eq!(packets[1].payload, &frame[14..28]);
        assert_eq!(packets[2].payload, &frame[28..30]);
    }

    #[test]
    fn test_fragment_round_trip_all_lengths() {
        // Concatenating payloads in index order must reproduce the frame
        // exactly, for every length up to several chunks.
        let frame: [u8; 64] = core::array::from_fn(|i| (i * 7) as u8);
        for len in 0..=frame.len() {
            let mut rebuilt: heapless::Vec<u8, 64> = heapless::Vec::new();
            for packet in fragment(&frame[..len], FrameSeq::new(), 14).expect("valid") {
                rebuilt.extend_from_slice(packet.payload).expect("fits");
            }
            assert_eq!(&rebuilt[..], &frame[..len], "length {len}");
        }
    }

    #[test]
    fn test_fragment_count_formula() {
        for len in 1..=60usize {
            let frame = [0xAB_u8; 60];
            let n = fragment(&frame[..len], FrameSeq::new(), 14).expect("valid").len();
            assert_eq!(n, len.div_ceil(14), "length {len}");
        }
    }

    #[test]
    fn test_fragment_empty_frame_yields_no_packets() {
        let mut packets = fragment(&[], FrameSeq::new(), 14).expect("valid");
        assert_eq!(packets.len(), 0);
        assert!(packets.next().is_none());
    }

    #[test]
    fn test_fragment_exact_multiple_has_full_last_packet() {
        let frame = [0u8; 28];
        let last = fragment(&frame, FrameSeq::new(), 14).expect("valid").last().expect("2 packets");
        assert_eq!(last.payload.len(), 14);
    }

    #[test]
    fn test_fragment_is_restartable() {
        let frame = [0u8; 30];
        let packets = fragment(&frame, FrameSeq::new(), 14).expect("valid");
        let first_pass: heapless::Vec<u8, 4> = packets.clone().map(|p| p.header.packet_index).collect();
        let second_pass: heapless::Vec<u8, 4> = packets.map(|p| p.header.packet_index).collect();
        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn test_fragment_zero_chunk_rejected() {
        let result = fragment(&[1, 2, 3], FrameSeq::new(), 0);
        assert_eq!(result.err(), Some(FragmentError::ZeroChunkSize));
    }

    #[test]
    fn test_fragment_more_than_15_packets_rejected() {
        // 16 chunks of 14 bytes — one more than the count nibble can carry.
        let frame = [0u8; 14 * 16];
        let result = fragment(&frame, FrameSeq::new(), 14);
        assert_eq!(result.err(), Some(FragmentError::TooManyPackets { packets: 16 }));
    }

    #[test]
    fn test_fragment_exactly_15_packets_accepted() {
        let frame = [0u8; 14 * 15];
        let packets = fragment(&frame, FrameSeq::new(), 14).expect("15 packets is the ceiling");
        assert_eq!(packets.len(), 15);
    }

    // ---- Serialisation tests -------------------------------------------------

    #[test]
    fn test_packet_write_into_prepends_header() {
        let frame = [0x11_u8, 0x22, 0x33];
        let packet = fragment(&frame, FrameSeq::from_raw(5), 14)
            .expect("valid")
            .next()
            .expect("one packet");
        let mut out = [0u8; 16];
        let len = packet.write_into(&mut out).expect("buffer is large enough");
        assert_eq!(len, HEADER_SIZE + 3);
        assert_eq!(&out[..len], &[0x05, 0x10, 0x11, 0x22, 0x33]);
    }

    #[test]
    fn test_packet_write_into_small_buffer_fails() {
        let frame = [0u8; 14];
        let packet = fragment(&frame, FrameSeq::new(), 14)
            .expect("valid")
            .next()
            .expect("one packet");
        let mut out = [0u8; 4];
        assert!(packet.write_into(&mut out).is_err());
    }

    // ---- Header parse tests (receiver contract) ------------------------------

    #[test]
    fn test_header_parse_round_trip() {
        let header = PacketHeader { frame_seq: 9, packet_count: 4, packet_index: 2 };
        let mut wire = [0u8; 6];
        wire[..2].copy_from_slice(&header.encode());
        let (parsed, payload) = PacketHeader::parse(&wire).expect("well-formed");
        assert_eq!(parsed, header);
        assert_eq!(payload.len(), 4);
    }

    #[test]
    fn test_header_parse_too_short() {
        assert_eq!(PacketHeader::parse(&[0x01]), Err(HeaderError::PacketTooShort));
    }

    #[test]
    fn test_header_parse_reserved_bits_rejected() {
        assert_eq!(
            PacketHeader::parse(&[0x83, 0x10, 0xFF]),
            Err(HeaderError::ReservedBitsSet(0x83))
        );
    }

    #[test]
    fn test_header_parse_zero_count_rejected() {
        // cnt = 0 never appears on the wire: empty frames produce no packets.
        assert_eq!(PacketHeader::parse(&[0x03, 0x00]), Err(HeaderError::ZeroPacketCount));
    }

    #[test]
    fn test_header_parse_index_beyond_count_rejected() {
        // cnt = 2, idx = 2 — indices are 0..cnt.
        assert_eq!(
            PacketHeader::parse(&[0x03, 0x22]),
            Err(HeaderError::IndexBeyondCount { index: 2, count: 2 })
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Public types
// ─────────────────────────────────────────────────────────────────────────────

/// Bytes of sequence header at the start of every packet.
pub const HEADER_SIZE: usize = 2;

/// Largest packet count the 4-bit count nibble can carry.
///
/// Configurations whose maximum encoder output could fragment into more
/// packets than this must be rejected at setup; [`fragment`] enforces the
/// same ceiling per frame rather than truncating the nibble.
pub const MAX_PACKETS_PER_FRAME: usize = 15;

/// Decoded 2-byte packet header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    /// Inter-frame sequence number (`0..=15`).
    pub frame_seq: u8,
    /// Total number of packets in this frame (`1..=15`).
    pub packet_count: u8,
    /// This packet's position within the frame (`0..packet_count`).
    pub packet_index: u8,
}

impl PacketHeader {
    /// Serialise to the 2-byte wire form.
    ///
    /// Byte 0 carries the frame sequence in its low nibble (high nibble
    /// reserved, zero); byte 1 carries `(count << 4) | index`.
    #[must_use]
    pub const fn encode(self) -> [u8; HEADER_SIZE] {
        [
            self.frame_seq & 0x0F,
            (self.packet_count << 4) | (self.packet_index & 0x0F),
        ]
    }

    /// Parse a received packet, returning the header and the payload slice.
    ///
    /// This is the receiver's reassembly contract: collect payloads for
    /// indices `0..packet_count` of one `frame_seq` value, concatenate in
    /// index order, and hand the result to a decoder as one complete frame.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError`] when the packet is shorter than the header,
    /// when the reserved high nibble of byte 0 is set, or when the count and
    /// index nibbles are mutually inconsistent.
    pub fn parse(packet: &[u8]) -> Result<(Self, &[u8]), HeaderError> {
        let (&seq_byte, rest) = match packet.split_first() {
            Some(split) => split,
            None => return Err(HeaderError::PacketTooShort),
        };
        let (&pos_byte, payload) = match rest.split_first() {
            Some(split) => split,
            None => return Err(HeaderError::PacketTooShort),
        };

        if seq_byte & 0xF0 != 0 {
            return Err(HeaderError::ReservedBitsSet(seq_byte));
        }
        let packet_count = pos_byte >> 4;
        let packet_index = pos_byte & 0x0F;
        if packet_count == 0 {
            return Err(HeaderError::ZeroPacketCount);
        }
        if packet_index >= packet_count {
            return Err(HeaderError::IndexBeyondCount { index: packet_index, count: packet_count });
        }

        Ok((
            PacketHeader { frame_seq: seq_byte, packet_count, packet_index },
            payload,
        ))
    }
}

/// Errors that can occur when parsing a received packet header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    /// The packet is shorter than the 2-byte header.
    PacketTooShort,
    /// The reserved high nibble of byte 0 is non-zero.
    ReservedBitsSet(u8),
    /// The count nibble is zero; empty frames are never sent.
    ZeroPacketCount,
    /// The index nibble is not below the count nibble.
    IndexBeyondCount {
        /// The offending index.
        index: u8,
        /// The frame's declared packet count.
        count: u8,
    },
}

/// Errors that prevent a frame from being fragmented at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentError {
    /// The per-packet payload capacity is zero; the notification budget must
    /// exceed [`HEADER_SIZE`].
    ZeroChunkSize,
    /// The frame would fragment into more packets than the count nibble can
    /// describe (see [`MAX_PACKETS_PER_FRAME`]).
    TooManyPackets {
        /// Packets the frame would have needed.
        packets: usize,
    },
}

/// The payload-too-small error from [`Packet::write_into`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferTooSmall {
    /// Bytes the packet needs, header included.
    pub needed: usize,
}

/// One packet: a header plus a borrowed slice of the frame's bytes.
#[derive(Debug, Clone, Copy)]
pub struct Packet<'a> {
    /// Sequence header for this packet.
    pub header: PacketHeader,
    /// Contiguous, non-overlapping slice of the encoded frame.
    pub payload: &'a [u8],
}

impl Packet<'_> {
    /// Total wire length of this packet, header included.
    #[must_use]
    pub fn wire_len(&self) -> usize {
        HEADER_SIZE.saturating_add(self.payload.len())
    }

    /// Serialise header + payload into `out`, returning the bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`BufferTooSmall`] when `out` cannot hold the whole packet.
    pub fn write_into(&self, out: &mut [u8]) -> Result<usize, BufferTooSmall> {
        let needed = self.wire_len();
        let Some(dest) = out.get_mut(..needed) else {
            return Err(BufferTooSmall { needed });
        };
        let (header_bytes, body) = dest.split_at_mut(HEADER_SIZE);
        header_bytes.copy_from_slice(&self.header.encode());
        body.copy_from_slice(self.payload);
        Ok(needed)
    }
}

/// Fragment one encoded frame into an ordered sequence of packets.
///
/// `chunk_size` is the per-packet payload capacity (notification budget minus
/// [`HEADER_SIZE`]). The returned iterator is lazy, finite, exact-size, and
/// restartable via `Clone`; it borrows `frame` and keeps no other state, so
/// fragmenting retains no frame history. A zero-length frame yields zero
/// packets — no empty packet is ever emitted.
///
/// Packets must be handed to the transport in iteration (index) order; the
/// receiver has no out-of-order reassembly.
///
/// # Errors
///
/// Returns [`FragmentError::ZeroChunkSize`] for a zero `chunk_size` and
/// [`FragmentError::TooManyPackets`] when the frame would need more than
/// [`MAX_PACKETS_PER_FRAME`] packets.
pub fn fragment(
    frame: &[u8],
    frame_seq: crate::seq::FrameSeq,
    chunk_size: usize,
) -> Result<Fragments<'_>, FragmentError> {
    if chunk_size == 0 {
        return Err(FragmentError::ZeroChunkSize);
    }
    let packets = frame.len().div_ceil(chunk_size);
    if packets > MAX_PACKETS_PER_FRAME {
        return Err(FragmentError::TooManyPackets { packets });
    }
    Ok(Fragments {
        frame,
        frame_seq: frame_seq.get(),
        // Count fits a nibble: packets <= 15 checked above.
        packet_count: packets as u8,
        next_index: 0,
        chunk_size,
    })
}

/// Iterator over the packets of one frame, produced by [`fragment`].
#[derive(Debug, Clone)]
pub struct Fragments<'a> {
    frame: &'a [u8],
    frame_seq: u8,
    packet_count: u8,
    next_index: u8,
    chunk_size: usize,
}

impl<'a> Iterator for Fragments<'a> {
    type Item = Packet<'a>;

    #[allow(clippy::arithmetic_side_effects)] // index < count <= 15; offsets bounded by frame.len()
    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index >= self.packet_count {
            return None;
        }
        let start = usize::from(self.next_index) * self.chunk_size;
        let end = (start + self.chunk_size).min(self.frame.len());
        let payload = self.frame.get(start..end)?;

        let header = PacketHeader {
            frame_seq: self.frame_seq,
            packet_count: self.packet_count,
            packet_index: self.next_index,
        };
        self.next_index += 1;
        Some(Packet { header, payload })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::from(self.packet_count.saturating_sub(self.next_index));
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Fragments<'_> {}
