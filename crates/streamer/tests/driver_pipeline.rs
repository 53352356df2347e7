//! Pipeline integration tests — one driver cycle over scripted mocks.
//!
//! Exercises the capture → encode → fragment → notify path end to end:
//! gate behavior, failure recovery, zero-padding, pacing-free assertions on
//! packet bytes, and sequence-number bookkeeping.
//!
//! Run with: cargo test -p streamer --test driver_pipeline
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

use embassy_time::Duration;
use platform::mocks::{MockCapture, MockEncoder, MockSink};
use platform::LinkEvent;
use streamer::{CycleOutcome, StreamConfig, StreamDriver};

const PEER: [u8; 6] = [0x10, 0x20, 0x30, 0x40, 0x50, 0x60];

/// 16-byte notifications (14-byte chunks), 16-byte capture blocks.
fn small_config() -> StreamConfig {
    StreamConfig {
        max_packet_size: 16,
        capture_block: 16,
        inter_packet_gap: Duration::from_micros(10),
        idle_poll: Duration::from_micros(10),
    }
}

type SmallDriver = StreamDriver<MockCapture, MockEncoder, MockSink, 64, 64>;

fn small_driver(capture: MockCapture, encoder: MockEncoder) -> SmallDriver {
    StreamDriver::new(capture, encoder, MockSink::new(182), small_config())
        .expect("config is valid")
}

#[tokio::test]
async fn test_disconnected_driver_issues_no_capture_reads() {
    let mut capture = MockCapture::new();
    capture.push_block(&[0u8; 16]);
    let mut driver = small_driver(capture, MockEncoder::new(16, 16));

    for _ in 0..3 {
        assert_eq!(driver.run_cycle().await, CycleOutcome::Idle);
    }
    assert_eq!(driver.capture().reads(), 0);
}

#[tokio::test]
async fn test_connected_driver_streams_one_block() {
    let mut capture = MockCapture::new();
    let block: [u8; 16] = core::array::from_fn(|i| i as u8);
    capture.push_block(&block);
    let mut driver = small_driver(capture, MockEncoder::new(16, 16));
    driver.handle_link_event(LinkEvent::Connected { peer: PEER });

    let outcome = driver.run_cycle().await;
    assert_eq!(outcome, CycleOutcome::Streamed { frames: 1, packets_sent: 2 });

    // 16 encoded bytes at 14-byte chunks: [14, 2], seq 0.
    let sent = driver.sink().sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(&sent[0][..2], &[0x00, 0x20]);
    assert_eq!(&sent[0][2..], &block[..14]);
    assert_eq!(&sent[1][..2], &[0x00, 0x21]);
    assert_eq!(&sent[1][2..], &block[14..]);
    assert_eq!(driver.session().frame_seq().get(), 1);
}

#[tokio::test]
async fn test_capture_failure_skips_cycle_without_encoding() {
    // Empty capture queue ⇒ read returns 0.
    let mut driver = small_driver(MockCapture::new(), MockEncoder::new(16, 16));
    driver.handle_link_event(LinkEvent::Connected { peer: PEER });

    assert_eq!(driver.run_cycle().await, CycleOutcome::CaptureFailed);
    assert!(driver.encoder().inputs().is_empty());
    assert!(driver.sink().sent().is_empty());
    assert_eq!(driver.session().frame_seq().get(), 0);
}

#[tokio::test]
async fn test_short_capture_is_zero_padded_to_frame_size() {
    let mut capture = MockCapture::new();
    capture.push_block(&[0xAA; 10]); // 10 of 16 bytes
    let mut encoder = MockEncoder::new(16, 16);
    encoder.script_empty(); // output doesn't matter here
    let mut driver = small_driver(capture, encoder);
    driver.handle_link_event(LinkEvent::Connected { peer: PEER });

    driver.run_cycle().await;

    let inputs = driver.encoder().inputs();
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].len(), 16, "encoder must see a full frame");
    assert_eq!(&inputs[0][..10], &[0xAA; 10], "captured prefix unmodified");
    assert_eq!(&inputs[0][10..], &[0x00; 6], "tail padded with silence");
}

#[tokio::test]
async fn test_empty_encode_result_is_not_a_frame() {
    let mut capture = MockCapture::new();
    capture.push_block(&[1u8; 16]);
    let mut encoder = MockEncoder::new(16, 16);
    encoder.script_empty();
    let mut driver = small_driver(capture, encoder);
    driver.handle_link_event(LinkEvent::Connected { peer: PEER });

    let outcome = driver.run_cycle().await;
    assert_eq!(outcome, CycleOutcome::Streamed { frames: 0, packets_sent: 0 });
    assert!(driver.sink().sent().is_empty());
    assert_eq!(driver.session().frame_seq().get(), 0, "no sequence number consumed");
}

#[tokio::test]
async fn test_encode_failure_abandons_frame_without_partial_packets() {
    let mut capture = MockCapture::new();
    capture.push_block(&[1u8; 16]);
    let mut encoder = MockEncoder::new(16, 16);
    encoder.script_fail();
    let mut driver = small_driver(capture, encoder);
    driver.handle_link_event(LinkEvent::Connected { peer: PEER });

    assert_eq!(driver.run_cycle().await, CycleOutcome::EncodeFailed);
    assert!(driver.sink().sent().is_empty());
    assert_eq!(driver.session().frame_seq().get(), 0);

    // The failure is transient: the next cycle streams normally.
    let mut capture = MockCapture::new();
    capture.push_block(&[2u8; 16]);
    let mut driver = small_driver(capture, MockEncoder::new(16, 16));
    driver.handle_link_event(LinkEvent::Connected { peer: PEER });
    assert_eq!(
        driver.run_cycle().await,
        CycleOutcome::Streamed { frames: 1, packets_sent: 2 }
    );
}

#[tokio::test]
async fn test_multi_chunk_block_advances_sequence_per_frame() {
    // 48-byte capture block = three 16-byte encoder frames.
    let mut capture = MockCapture::new();
    capture.push_block(&[7u8; 48]);
    let config = StreamConfig { capture_block: 48, ..small_config() };
    let mut driver: StreamDriver<_, _, _, 64, 64> =
        StreamDriver::new(capture, MockEncoder::new(16, 16), MockSink::new(182), config)
            .expect("valid");
    driver.handle_link_event(LinkEvent::Connected { peer: PEER });

    let outcome = driver.run_cycle().await;
    assert_eq!(outcome, CycleOutcome::Streamed { frames: 3, packets_sent: 6 });
    assert_eq!(driver.session().frame_seq().get(), 3);

    // Frames carry sequence numbers 0, 1, 2 in emission order.
    let sent = driver.sink().sent();
    let seqs: Vec<u8> = sent.iter().map(|p| p[0]).collect();
    assert_eq!(seqs, [0, 0, 1, 1, 2, 2]);
}

#[tokio::test]
async fn test_sequence_wraps_mod_16_across_cycles() {
    let mut capture = MockCapture::new();
    for _ in 0..18 {
        capture.push_block(&[3u8; 16]);
    }
    let mut driver = small_driver(capture, MockEncoder::new(16, 16));
    driver.handle_link_event(LinkEvent::Connected { peer: PEER });

    for expected in 0u8..18 {
        assert_eq!(driver.session().frame_seq().get(), expected % 16);
        let outcome = driver.run_cycle().await;
        assert_eq!(outcome, CycleOutcome::Streamed { frames: 1, packets_sent: 2 });
    }
}

#[tokio::test]
async fn test_disconnect_mid_frame_drops_remainder_silently() {
    let mut capture = MockCapture::new();
    capture.push_block(&[9u8; 16]);
    let mut sink = MockSink::new(182);
    sink.drop_after(1); // link dies after the first notification
    let mut driver: StreamDriver<_, _, _, 64, 64> =
        StreamDriver::new(capture, MockEncoder::new(16, 16), sink, small_config())
            .expect("valid");
    driver.handle_link_event(LinkEvent::Connected { peer: PEER });

    let outcome = driver.run_cycle().await;
    assert_eq!(outcome, CycleOutcome::LinkLost { packets_sent: 1 });
    // The cut-off frame did not consume a sequence number.
    assert_eq!(driver.session().frame_seq().get(), 0);
}

#[tokio::test]
async fn test_gate_reopens_after_reconnect_and_counters_persist() {
    let mut capture = MockCapture::new();
    capture.push_block(&[4u8; 16]);
    capture.push_block(&[5u8; 16]);
    let mut driver = small_driver(capture, MockEncoder::new(16, 16));

    driver.handle_link_event(LinkEvent::Connected { peer: PEER });
    driver.run_cycle().await;
    assert_eq!(driver.session().frame_seq().get(), 1);

    driver.handle_link_event(LinkEvent::Disconnected);
    assert_eq!(driver.run_cycle().await, CycleOutcome::Idle);

    driver.handle_link_event(LinkEvent::Connected { peer: PEER });
    driver.run_cycle().await;
    // Second frame picked up at sequence 1 — no reset on reconnect.
    let sent = driver.sink().sent();
    assert_eq!(sent.len(), 4);
    assert_eq!(sent[2][0], 0x01);
    assert_eq!(driver.session().frame_seq().get(), 2);
}

#[tokio::test]
async fn test_scripted_frame_fragments_like_the_wire_example() {
    // A 30-byte encoded frame at 14-byte chunks: packets of 14, 14, 2.
    let mut capture = MockCapture::new();
    capture.push_block(&[0u8; 16]);
    let mut encoder = MockEncoder::new(16, 30);
    let frame: Vec<u8> = (0u8..30).collect();
    encoder.script_emit(&frame);
    let mut driver = small_driver(capture, encoder);
    driver.handle_link_event(LinkEvent::Connected { peer: PEER });

    let outcome = driver.run_cycle().await;
    assert_eq!(outcome, CycleOutcome::Streamed { frames: 1, packets_sent: 3 });

    let sent = driver.sink().sent();
    assert_eq!(sent[0][..2], [0x00, 0x30]);
    assert_eq!(sent[1][..2], [0x00, 0x31]);
    assert_eq!(sent[2][..2], [0x00, 0x32]);
    assert_eq!(sent[2].len(), 2 + 2);
    let rebuilt: Vec<u8> = sent.iter().flat_map(|p| p[2..].iter().copied()).collect();
    assert_eq!(rebuilt, frame);
}
