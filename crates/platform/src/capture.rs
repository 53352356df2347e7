//! Microphone capture abstraction

/// Source of raw PCM sample blocks.
///
/// A live microphone feed has no end-of-stream: `read` blocks until a block
/// of samples is available. The pendant has no other useful work while it
/// waits, so implementations may block indefinitely in normal operation.
pub trait CaptureSource {
    /// Error type
    type Error: core::fmt::Debug;

    /// Fill `buf` with captured bytes, returning the number written.
    ///
    /// A return of `Ok(0)` signals a capture failure (DMA underrun, driver
    /// restart) — not end-of-stream. The caller recovers by skipping the
    /// current pipeline cycle and reading again on the next one.
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}
