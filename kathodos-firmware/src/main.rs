//! Kathodos - USB Potentiostat/Galvanostat Firmware
//!
//! Main firmware binary for RP2040-based potentiostat boards. Brings
//! the analog front end up (DAC reset, configuration, persisted
//! calibration), then serves the ASCII command protocol over a
//! vendor-specific USB bulk endpoint pair.
//!
//! Named after the Greek "kathodos" meaning "the way down" - the
//! electrode where reduction current flows.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::join::join;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::USB;
use embassy_rp::usb::{Driver, InterruptHandler};
use embassy_time::Delay;
use embassy_usb::{Builder, Config};
use {defmt_rtt as _, panic_probe as _};

use kathodos_core::{CalibrationStore, FrontPanel, Instrument};
use kathodos_drivers::{AnalogFrontEnd, Dac1220, Mcp3550, SoftSpi};
use kathodos_hal_rp2040::flash::CalFlash;
use kathodos_hal_rp2040::gpio::{RpFlex, RpInput, RpOutput};

mod link;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => InterruptHandler<USB>;
});

/// USB identity the host-side tooling probes for.
const USB_VID: u16 = 0xa0a0;
const USB_PID: u16 = 0x0002;

/// Instrument as wired on this board.
pub(crate) type BoardAfe = AnalogFrontEnd<RpOutput, RpFlex, RpInput, Delay, RpOutput, RpOutput>;
pub(crate) type BoardInstrument = Instrument<RpOutput, BoardAfe, CalFlash, Delay>;

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Kathodos firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());

    // Board net map. Relay drives sit on the low GPIO bank, the
    // converter bus and chip selects on the next bank up. All relay
    // drives come up released; both chip selects come up deasserted.
    let cell = RpOutput::new(p.PIN_2, false);
    let mode = RpOutput::new(p.PIN_3, false);
    let ranges = [
        RpOutput::new(p.PIN_4, false),
        RpOutput::new(p.PIN_5, false),
        RpOutput::new(p.PIN_6, false),
    ];
    let sclk = RpOutput::new(p.PIN_10, false);
    let data1 = RpFlex::new(p.PIN_11);
    let data2 = RpInput::new(p.PIN_12);
    let dac_cs = RpOutput::new(p.PIN_13, true);
    let adc_cs = RpOutput::new(p.PIN_14, true);

    let bus = SoftSpi::new(sclk, data1, data2, Delay);
    let afe = AnalogFrontEnd::new(bus, Dac1220::new(dac_cs), Mcp3550::new(adc_cs));
    let panel = FrontPanel::new(cell, mode, ranges);
    let store = CalibrationStore::new(CalFlash::new(p.FLASH));

    // The power-up sequence (converter reset, configuration, stored
    // calibration) runs to completion here, before the device ever
    // attaches to the host.
    let mut instrument: BoardInstrument = Instrument::new(panel, afe, store, Delay);
    info!("Analog front end up, panel {}", instrument.state());

    // USB device: one vendor-specific interface carrying the bulk
    // command pipe.
    let driver = Driver::new(p.USB, Irqs);

    let mut config = Config::new(USB_VID, USB_PID);
    config.manufacturer = Some("Kathodos");
    config.product = Some("Kathodos potentiostat");
    config.serial_number = Some("0001");
    config.max_power = 100;
    config.max_packet_size_0 = 64;

    let mut config_descriptor = [0; 256];
    let mut bos_descriptor = [0; 256];
    let mut control_buf = [0; 64];

    let mut builder = Builder::new(
        driver,
        config,
        &mut config_descriptor,
        &mut bos_descriptor,
        &mut [],
        &mut control_buf,
    );

    let mut function = builder.function(0xFF, 0, 0);
    let mut interface = function.interface();
    let mut alt = interface.alt_setting(0xFF, 0, 0, None);
    let mut read_ep = alt.endpoint_bulk_out(link::PACKET_LEN);
    let mut write_ep = alt.endpoint_bulk_in(link::PACKET_LEN);
    drop(function);

    let mut usb = builder.build();

    join(
        usb.run(),
        link::serve(&mut instrument, &mut read_ep, &mut write_ep),
    )
    .await;
}
