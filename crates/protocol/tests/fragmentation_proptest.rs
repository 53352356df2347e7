//! Property-based tests for the fragmentation protocol.
//! Verifies invariants hold for ALL valid inputs, not just fixed examples.
// Integration test file: expect/unwrap/panic/indexing/arithmetic are
// intentional test mechanisms.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation
)]

use protocol::{fragment, FrameSeq, PacketHeader, HEADER_SIZE, MAX_PACKETS_PER_FRAME};

proptest::proptest! {
    /// Concatenating payloads in index order reproduces the frame exactly,
    /// for every frame length and every packet budget above the header size.
    #[test]
    fn fragment_round_trip_reproduces_frame(
        frame in proptest::collection::vec(proptest::num::u8::ANY, 0..=512),
        max_packet_size in (HEADER_SIZE + 1)..=256usize,
    ) {
        let chunk = max_packet_size - HEADER_SIZE;
        // Skip budget/length pairs the count nibble cannot describe; those
        // are rejected at setup by design.
        proptest::prop_assume!(frame.len().div_ceil(chunk) <= MAX_PACKETS_PER_FRAME);

        let mut rebuilt = Vec::new();
        for packet in fragment(&frame, FrameSeq::new(), chunk).unwrap() {
            rebuilt.extend_from_slice(packet.payload);
        }
        assert_eq!(rebuilt, frame);
    }

    /// Packet count is ceil(L / chunk) for non-empty frames and 0 for empty ones.
    #[test]
    fn fragment_count_matches_formula(
        len in 0usize..=512,
        chunk in 1usize..=256,
    ) {
        let frame = vec![0x5A_u8; len];
        proptest::prop_assume!(len.div_ceil(chunk) <= MAX_PACKETS_PER_FRAME);

        let count = fragment(&frame, FrameSeq::new(), chunk).unwrap().count();
        if len == 0 {
            assert_eq!(count, 0);
        } else {
            assert_eq!(count, len.div_ceil(chunk));
        }
    }

    /// Every header carries the frame's sequence number, its own index, and
    /// the shared total count; every packet fits the notification budget.
    #[test]
    fn fragment_headers_are_consistent(
        len in 1usize..=512,
        chunk in 1usize..=256,
        seq in 0u8..=15,
    ) {
        let frame = vec![0xC3_u8; len];
        let total = len.div_ceil(chunk);
        proptest::prop_assume!(total <= MAX_PACKETS_PER_FRAME);

        for (i, packet) in fragment(&frame, FrameSeq::from_raw(seq), chunk).unwrap().enumerate() {
            assert_eq!(packet.header.frame_seq, seq);
            assert_eq!(usize::from(packet.header.packet_index), i);
            assert_eq!(usize::from(packet.header.packet_count), total);
            assert!(packet.wire_len() <= chunk + HEADER_SIZE);

            // The last packet is the only one allowed to be short.
            if i + 1 < total {
                assert_eq!(packet.payload.len(), chunk);
            }
        }
    }

    /// Serialised packets parse back to the same header and payload — the
    /// sender and the receiver contract agree.
    #[test]
    fn fragment_then_parse_round_trips_header(
        len in 1usize..=256,
        seq in 0u8..=15,
    ) {
        let frame: Vec<u8> = (0..len).map(|i| i as u8).collect();
        for packet in fragment(&frame, FrameSeq::from_raw(seq), 20).unwrap() {
            let mut wire = [0u8; 22];
            let n = packet.write_into(&mut wire).unwrap();
            let (header, payload) = PacketHeader::parse(&wire[..n]).unwrap();
            assert_eq!(header, packet.header);
            assert_eq!(payload, packet.payload);
        }
    }
}
