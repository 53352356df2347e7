//! Stream integration tests — verify the full event + pipeline stack.
// Integration test file: expect/unwrap/panic are intentional test mechanisms.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//!
//! Tests the interaction between the firmware's link-event plumbing
//! (`LinkEventChannel`, `drain_link_events`) and the pipeline driver, using
//! the platform mocks in place of the microphone and the radio.
//!
//! Run with: cargo test -p firmware --test integration_stream

use embassy_time::Duration;
use firmware::stream::{drain_link_events, LinkEventChannel};
use platform::mocks::{MockCapture, MockEncoder, MockSink};
use platform::LinkEvent;
use streamer::{CycleOutcome, StreamConfig, StreamDriver};

const PEER: [u8; 6] = [2, 4, 6, 8, 10, 12];

fn test_driver(capture: MockCapture) -> StreamDriver<MockCapture, MockEncoder, MockSink, 64, 64> {
    let config = StreamConfig {
        max_packet_size: 16,
        capture_block: 16,
        inter_packet_gap: Duration::from_micros(10),
        idle_poll: Duration::from_micros(10),
    };
    StreamDriver::new(capture, MockEncoder::new(16, 16), MockSink::new(182), config)
        .expect("config is valid")
}

/// A connect event queued on the channel opens the gate and the next cycle
/// streams.
#[tokio::test]
async fn test_connect_event_flows_from_channel_to_pipeline() {
    let events = LinkEventChannel::new();
    let mut capture = MockCapture::new();
    capture.push_block(&[0x42; 16]);
    let mut driver = test_driver(capture);

    // Gate closed: the cycle idles without touching the microphone.
    drain_link_events(&mut driver, &events);
    assert_eq!(driver.run_cycle().await, CycleOutcome::Idle);
    assert_eq!(driver.capture().reads(), 0);

    events.try_send(LinkEvent::Connected { peer: PEER }).expect("channel has room");
    drain_link_events(&mut driver, &events);
    assert_eq!(
        driver.run_cycle().await,
        CycleOutcome::Streamed { frames: 1, packets_sent: 2 }
    );
    assert_eq!(driver.session().peer_address(), Some(PEER));
}

/// A disconnect queued mid-stream is observed between cycles: the following
/// cycle idles and issues no capture read.
#[tokio::test]
async fn test_disconnect_event_closes_gate_between_cycles() {
    let events = LinkEventChannel::new();
    let mut capture = MockCapture::new();
    capture.push_block(&[0x42; 16]);
    capture.push_block(&[0x43; 16]);
    let mut driver = test_driver(capture);

    events.try_send(LinkEvent::Connected { peer: PEER }).expect("room");
    drain_link_events(&mut driver, &events);
    driver.run_cycle().await;
    let reads_while_connected = driver.capture().reads();

    events.try_send(LinkEvent::Disconnected).expect("room");
    drain_link_events(&mut driver, &events);
    for _ in 0..3 {
        assert_eq!(driver.run_cycle().await, CycleOutcome::Idle);
    }
    assert_eq!(driver.capture().reads(), reads_while_connected);
}

/// Coalesced events drain in order: a connect immediately followed by a
/// disconnect leaves the gate closed.
#[tokio::test]
async fn test_event_burst_drains_in_order() {
    let events = LinkEventChannel::new();
    let mut driver = test_driver(MockCapture::new());

    events.try_send(LinkEvent::Connected { peer: PEER }).expect("room");
    events.try_send(LinkEvent::Disconnected).expect("room");
    drain_link_events(&mut driver, &events);

    assert!(!driver.session().is_connected());
    assert_eq!(driver.run_cycle().await, CycleOutcome::Idle);
}
