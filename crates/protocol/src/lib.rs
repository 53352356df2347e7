//! Notification-link framing for compressed audio frames.
//!
//! One encoded audio frame is larger than one BLE notification payload, so
//! frames are sliced into packets carrying a 2-byte sequence header. This
//! crate owns that wire format: the header layout, the fragmentation
//! iterator the sender drives, and the header parser that defines the
//! receiver's reassembly contract.
//!
//! This crate is `no_std` by default; the library itself uses only `core`
//! (fragmentation borrows the frame and serialises into caller buffers).

#![cfg_attr(not(test), no_std)]

pub mod packet;
pub mod seq;

pub use packet::{
    fragment, FragmentError, Fragments, HeaderError, Packet, PacketHeader, HEADER_SIZE,
    MAX_PACKETS_PER_FRAME,
};
pub use seq::FrameSeq;
