//! Murmur Pendant Firmware - Main Entry Point
//!
//! Hardware-only entry point for STM32WB55.

#![no_std]
#![no_main]

use core::sync::atomic::AtomicBool;

use embassy_executor::Spawner;
use embassy_time::Timer;
use platform::config::{APP_NAME, APP_VERSION, MAX_NOTIFY_PAYLOAD};
use platform::EncoderConfig;
use static_cell::StaticCell;
use streamer::encoders::AdpcmEncoder;
use streamer::{StreamConfig, StreamDriver};

use firmware::ble::{radio_task, BleNotifySink};
use firmware::mic::PdmMicrophone;
use firmware::stream::{
    stream_task, LinkEventChannel, PendantDriver, ADPCM_SAMPLES_PER_BLOCK, CAPTURE_BLOCK_BYTES,
};

// Panic handler + RTT logging transport
use defmt_rtt as _;
use panic_probe as _;

static LINK_EVENTS: LinkEventChannel = LinkEventChannel::new();
static LINK_UP: AtomicBool = AtomicBool::new(false);
static DRIVER: StaticCell<PendantDriver> = StaticCell::new();

/// Invalid setup is fatal: signal it on the diagnostic channel forever and
/// never start the pipeline.
async fn halt_on_setup_error(err: impl defmt::Format) -> ! {
    loop {
        defmt::error!("fatal setup error: {}", err);
        Timer::after_secs(1).await;
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    defmt::info!("{=str} firmware v{=str}", APP_NAME, APP_VERSION);

    // Default clock tree (MSI) is sufficient for bring-up; the SAI kernel
    // clock configuration lands together with the PDM capture driver.
    let _p = embassy_stm32::init(embassy_stm32::Config::default());

    let encoder = match AdpcmEncoder::new(EncoderConfig::default(), ADPCM_SAMPLES_PER_BLOCK) {
        Ok(encoder) => encoder,
        Err(err) => halt_on_setup_error(err).await,
    };

    let config = StreamConfig {
        capture_block: CAPTURE_BLOCK_BYTES,
        ..StreamConfig::default()
    };
    let driver = match StreamDriver::new(
        PdmMicrophone::new(),
        encoder,
        BleNotifySink::new(&LINK_UP),
        config,
    ) {
        Ok(driver) => driver,
        Err(err) => halt_on_setup_error(err).await,
    };
    let driver = DRIVER.init(driver);

    spawner.must_spawn(radio_task(&LINK_EVENTS, &LINK_UP));
    spawner.must_spawn(stream_task(driver, &LINK_EVENTS));

    defmt::info!(
        "pipeline armed: {=usize}-byte notifications, {=usize}-byte capture blocks",
        MAX_NOTIFY_PAYLOAD,
        CAPTURE_BLOCK_BYTES
    );
}
