//! Concrete codecs behind the `platform::AudioEncoder` trait.
//!
//! Selection happens once, at configuration time in firmware; the pipeline
//! driver never learns which codec it is driving. See the trait module for
//! the codec selection rationale.

pub mod adpcm;
pub mod pcm;

pub use adpcm::AdpcmEncoder;
pub use pcm::PcmEncoder;
