//! Mock implementations for testing
//!
//! This module provides mock implementations of all platform traits
//! for use in unit and integration tests. Each mock is scriptable so tests
//! can inject the failure modes the pipeline must recover from: capture
//! underruns, buffered/failed encodes, and mid-frame link loss.

#![cfg(any(test, feature = "std"))]

use crate::{AudioEncoder, CaptureSource, FrameSizes, PacketSink, SendError};

/// Mock capture source fed from a queue of pre-recorded blocks.
///
/// When the queue runs dry, `read` returns `Ok(0)` — the capture-failure
/// signal — so tests can verify the skip-and-retry path.
pub struct MockCapture {
    blocks: heapless::Deque<heapless::Vec<u8, 2048>, 32>,
    reads: usize,
}

impl MockCapture {
    /// Create a mock with an empty block queue.
    pub fn new() -> Self {
        Self {
            blocks: heapless::Deque::new(),
            reads: 0,
        }
    }

    /// Queue one block of capture bytes.
    pub fn push_block(&mut self, block: &[u8]) {
        let mut stored = heapless::Vec::new();
        stored.extend_from_slice(block).ok();
        self.blocks.push_back(stored).ok();
    }

    /// Number of `read` calls made so far.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl Default for MockCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureSource for MockCapture {
    type Error = core::convert::Infallible;

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.reads = self.reads.saturating_add(1);
        let Some(block) = self.blocks.pop_front() else {
            return Ok(0); // underrun
        };
        let n = block.len().min(buf.len());
        if let (Some(dest), Some(src)) = (buf.get_mut(..n), block.get(..n)) {
            dest.copy_from_slice(src);
        }
        Ok(n)
    }
}

/// One scripted response from [`MockEncoder::encode`].
pub enum MockEncodeStep {
    /// Emit these exact bytes as the encoded frame.
    Emit(heapless::Vec<u8, 1024>),
    /// Report success with zero output (codec buffered internally).
    Empty,
    /// Report an encode failure.
    Fail,
}

/// Error type returned by a scripted [`MockEncodeStep::Fail`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockEncodeError;

/// Mock encoder with fixed frame sizes and an optional response script.
///
/// With an empty script it behaves as a pass-through codec (output bytes ==
/// input bytes), which keeps fragmentation tests byte-exact. Every input
/// frame handed to `encode` is captured for later inspection, so tests can
/// assert the zero-padding contract.
pub struct MockEncoder {
    sizes: FrameSizes,
    script: heapless::Deque<MockEncodeStep, 16>,
    inputs: heapless::Vec<heapless::Vec<u8, 256>, 16>,
}

impl MockEncoder {
    /// Create a pass-through mock with the given frame sizes.
    pub fn new(input: usize, output: usize) -> Self {
        Self {
            sizes: FrameSizes { input, output },
            script: heapless::Deque::new(),
            inputs: heapless::Vec::new(),
        }
    }

    /// Script the next `encode` call to emit `bytes`.
    pub fn script_emit(&mut self, bytes: &[u8]) {
        let mut stored = heapless::Vec::new();
        stored.extend_from_slice(bytes).ok();
        self.script.push_back(MockEncodeStep::Emit(stored)).ok();
    }

    /// Script the next `encode` call to succeed with zero output.
    pub fn script_empty(&mut self) {
        self.script.push_back(MockEncodeStep::Empty).ok();
    }

    /// Script the next `encode` call to fail.
    pub fn script_fail(&mut self) {
        self.script.push_back(MockEncodeStep::Fail).ok();
    }

    /// Input frames captured so far, in call order.
    pub fn inputs(&self) -> &[heapless::Vec<u8, 256>] {
        &self.inputs
    }
}

impl AudioEncoder for MockEncoder {
    type Error = MockEncodeError;

    fn frame_sizes(&self) -> FrameSizes {
        self.sizes
    }

    fn encode(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, Self::Error> {
        let mut captured = heapless::Vec::new();
        captured.extend_from_slice(input).ok();
        self.inputs.push(captured).ok();

        match self.script.pop_front() {
            Some(MockEncodeStep::Emit(bytes)) => {
                let n = bytes.len().min(output.len());
                if let (Some(dest), Some(src)) = (output.get_mut(..n), bytes.get(..n)) {
                    dest.copy_from_slice(src);
                }
                Ok(n)
            }
            Some(MockEncodeStep::Empty) => Ok(0),
            Some(MockEncodeStep::Fail) => Err(MockEncodeError),
            None => {
                // Pass-through default
                let n = input.len().min(output.len());
                if let (Some(dest), Some(src)) = (output.get_mut(..n), input.get(..n)) {
                    dest.copy_from_slice(src);
                }
                Ok(n)
            }
        }
    }
}

/// Mock notification sink recording every packet it accepts.
pub struct MockSink {
    max_packet_size: usize,
    connected: bool,
    sent: heapless::Vec<heapless::Vec<u8, 256>, 64>,
    drop_after: Option<usize>,
}

impl MockSink {
    /// Create a connected mock accepting packets up to `max_packet_size`.
    pub fn new(max_packet_size: usize) -> Self {
        Self {
            max_packet_size,
            connected: true,
            sent: heapless::Vec::new(),
            drop_after: None,
        }
    }

    /// Simulate the link going up or down.
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    /// Start rejecting with `NotConnected` after `n` accepted packets,
    /// simulating a disconnect that lands mid-frame.
    pub fn drop_after(&mut self, n: usize) {
        self.drop_after = Some(n);
    }

    /// Packets accepted so far, in send order.
    pub fn sent(&self) -> &[heapless::Vec<u8, 256>] {
        &self.sent
    }
}

impl PacketSink for MockSink {
    type Error = core::convert::Infallible;

    fn max_packet_size(&self) -> usize {
        self.max_packet_size
    }

    async fn send(&mut self, packet: &[u8]) -> Result<(), SendError<Self::Error>> {
        if let Some(limit) = self.drop_after {
            if self.sent.len() >= limit {
                return Err(SendError::NotConnected);
            }
        }
        if !self.connected {
            return Err(SendError::NotConnected);
        }
        let mut stored = heapless::Vec::new();
        stored.extend_from_slice(packet).ok();
        self.sent.push(stored).ok();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)] // fixed-size test vectors
mod tests {
    use super::{MockCapture, MockEncoder, MockSink};
    use crate::{AudioEncoder, CaptureSource, PacketSink, SendError};

    #[tokio::test]
    async fn test_mock_capture_replays_blocks_then_underruns() {
        let mut capture = MockCapture::new();
        capture.push_block(&[1, 2, 3]);
        let mut buf = [0u8; 8];
        assert_eq!(capture.read(&mut buf).await, Ok(3));
        assert_eq!(&buf[..3], &[1, 2, 3]);
        assert_eq!(capture.read(&mut buf).await, Ok(0));
        assert_eq!(capture.reads(), 2);
    }

    #[test]
    fn test_mock_encoder_pass_through_by_default() {
        let mut encoder = MockEncoder::new(4, 4);
        let mut out = [0u8; 4];
        let n = encoder.encode(&[9, 8, 7, 6], &mut out).unwrap_or(0);
        assert_eq!(n, 4);
        assert_eq!(out, [9, 8, 7, 6]);
        assert_eq!(encoder.inputs().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_sink_rejects_when_disconnected() {
        let mut sink = MockSink::new(16);
        sink.set_connected(false);
        assert_eq!(sink.send(&[1, 2]).await, Err(SendError::NotConnected));
        assert!(sink.sent().is_empty());
    }
}
