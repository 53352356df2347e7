//! BLE audio service — UUIDs, advertising policy, and the notify sink.
//!
//! The pendant exposes one primary service with two characteristics: a
//! notify characteristic carrying the packetized audio stream (TX, pendant →
//! phone) and a write-without-response characteristic reserved for control
//! messages (RX, phone → pendant, currently unused). The service and
//! characteristic UUIDs are fixed; paired apps discover the service by UUID
//! from the advertisement.
//!
//! Connection events from the radio stack are forwarded as discrete
//! [`platform::LinkEvent`]s to the stream task; a disconnect also restarts
//! advertising so a new peer can connect.

/// A 128-bit UUID, stored in the textual (big-endian) byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uuid128([u8; 16]);

impl Uuid128 {
    /// Create a UUID from bytes in textual order.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Uuid128(bytes)
    }

    /// The UUID bytes in textual order.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// The UUID bytes in the little-endian order GATT tables expect.
    #[must_use]
    pub fn to_le_bytes(self) -> [u8; 16] {
        let mut out = self.0;
        out.reverse();
        out
    }
}

/// Primary audio service: `03d5d5c4-a86c-11ee-9d89-8f2089a49e7e`.
pub const AUDIO_SERVICE_UUID: Uuid128 = Uuid128::from_bytes([
    0x03, 0xd5, 0xd5, 0xc4, 0xa8, 0x6c, 0x11, 0xee, 0x9d, 0x89, 0x8f, 0x20, 0x89, 0xa4, 0x9e,
    0x7e,
]);

/// Audio TX characteristic (notify): `b189a505-a86c-11ee-a5fb-8f2089a49e7e`.
pub const AUDIO_TX_UUID: Uuid128 = Uuid128::from_bytes([
    0xb1, 0x89, 0xa5, 0x05, 0xa8, 0x6c, 0x11, 0xee, 0xa5, 0xfb, 0x8f, 0x20, 0x89, 0xa4, 0x9e,
    0x7e,
]);

/// Control RX characteristic (write without response):
/// `ff000353-a872-11ee-b751-8f2089a49e7e`.
pub const CONTROL_RX_UUID: Uuid128 = Uuid128::from_bytes([
    0xff, 0x00, 0x03, 0x53, 0xa8, 0x72, 0x11, 0xee, 0xb7, 0x51, 0x8f, 0x20, 0x89, 0xa4, 0x9e,
    0x7e,
]);

/// Minimum advertising interval, in 0.625 ms units (20 ms).
pub const ADV_INTERVAL_MIN: u16 = 0x20;

/// Maximum advertising interval, in 0.625 ms units (40 ms).
pub const ADV_INTERVAL_MAX: u16 = 0x40;

#[cfg(feature = "hardware")]
pub use hardware::{radio_task, BleNotifySink};

#[cfg(feature = "hardware")]
mod hardware {
    use core::sync::atomic::{AtomicBool, Ordering};

    use platform::config::MAX_NOTIFY_PAYLOAD;
    use platform::{PacketSink, SendError};

    use crate::stream::LinkEventChannel;

    /// `PacketSink` over the audio TX notify characteristic.
    ///
    /// `link_up` mirrors the radio task's view of the connection; a send
    /// that races a disconnect reports [`SendError::NotConnected`] and the
    /// packet is dropped, which the pipeline treats as expected.
    pub struct BleNotifySink {
        link_up: &'static AtomicBool,
    }

    impl BleNotifySink {
        /// Create a sink sharing the radio task's connection flag.
        #[must_use]
        pub fn new(link_up: &'static AtomicBool) -> Self {
            Self { link_up }
        }
    }

    impl PacketSink for BleNotifySink {
        type Error = core::convert::Infallible;

        fn max_packet_size(&self) -> usize {
            MAX_NOTIFY_PAYLOAD
        }

        async fn send(&mut self, packet: &[u8]) -> Result<(), SendError<Self::Error>> {
            if !self.link_up.load(Ordering::Relaxed) {
                return Err(SendError::NotConnected);
            }
            // TODO: push the packet to the CPU2 BLE stack as a GATT
            // notification on AUDIO_TX_UUID once the IPCC mailbox driver
            // lands (see radio_task below). Until then packets stop here.
            defmt::trace!("notify: {=usize} bytes", packet.len());
            Ok(())
        }
    }

    /// Radio bring-up and connection-event pump — hardware target only.
    ///
    /// Owns the CPU2 (BLE co-processor) lifecycle: mailbox init, GATT table
    /// registration, advertising, and translating stack events into
    /// [`platform::LinkEvent`]s for the stream task. On every disconnect it
    /// restarts advertising so a new central can pair.
    ///
    /// # Bring-up sequence (STM32WB55, RM0434 §37 + AN5289)
    ///
    /// 1. Start CPU2 via PWR_CR4.C2BOOT after the IPCC clocks are enabled
    /// 2. Exchange the system/BLE channel buffers over the IPCC mailbox
    /// 3. Register the audio service GATT table
    ///    (`AUDIO_SERVICE_UUID`, `AUDIO_TX_UUID` notify, `CONTROL_RX_UUID`
    ///    write-no-response)
    /// 4. Advertise with `ADV_INTERVAL_MIN..=ADV_INTERVAL_MAX`
    /// 5. Forward HCI LE Connection Complete / Disconnection Complete as
    ///    `LinkEvent`s; set `link_up` before the event so a racing send
    ///    fails closed
    #[embassy_executor::task]
    pub async fn radio_task(
        events: &'static LinkEventChannel,
        link_up: &'static AtomicBool,
    ) -> ! {
        // TODO: implement the sequence above with the ipcc peripheral from
        // embassy-stm32 (blocked on the mailbox driver; tracked for the
        // rev-B board bring-up).
        let _ = (events, link_up);
        loop {
            embassy_time::Timer::after_secs(1).await;
        }
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)] // fixed-size UUID arrays
mod tests {
    use super::{AUDIO_SERVICE_UUID, AUDIO_TX_UUID, CONTROL_RX_UUID};

    #[test]
    fn test_uuids_are_distinct() {
        assert_ne!(AUDIO_SERVICE_UUID, AUDIO_TX_UUID);
        assert_ne!(AUDIO_SERVICE_UUID, CONTROL_RX_UUID);
        assert_ne!(AUDIO_TX_UUID, CONTROL_RX_UUID);
    }

    #[test]
    fn test_uuid_le_order_is_reversed() {
        let le = AUDIO_SERVICE_UUID.to_le_bytes();
        assert_eq!(le[15], 0x03);
        assert_eq!(le[0], 0x7e);
    }

    #[test]
    fn test_uuids_share_the_vendor_suffix() {
        // All three UUIDs come from the same generation run and share the
        // node portion.
        assert_eq!(&AUDIO_SERVICE_UUID.as_bytes()[10..], &AUDIO_TX_UUID.as_bytes()[10..]);
        assert_eq!(&AUDIO_SERVICE_UUID.as_bytes()[10..], &CONTROL_RX_UUID.as_bytes()[10..]);
    }
}
