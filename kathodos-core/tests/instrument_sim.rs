//! Instrument end to end against the simulated board
//!
//! Boots a full instrument (front panel, bit-bang bus, both chip
//! drivers, calibration storage) on the simulated converter board and
//! exercises it through raw command frames only, the way the USB
//! transport does.

use kathodos_core::{CalibrationStore, FrontPanel, Instrument};
use kathodos_drivers::{AnalogFrontEnd, Dac1220, Mcp3550, SoftSpi};
use kathodos_hal_sim::{Net, RamStorage, SimBoard, SimDelay, SimFlexPin, SimPin};
use kathodos_protocol::Reply;

type SimAfe = AnalogFrontEnd<SimPin, SimFlexPin, SimPin, SimDelay, SimPin, SimPin>;
type SimInstrument = Instrument<SimPin, SimAfe, RamStorage, SimDelay>;

fn boot_with_storage(storage: RamStorage) -> (SimBoard, SimInstrument) {
    let board = SimBoard::new();
    let bus = SoftSpi::new(
        board.pin(Net::Clock),
        board.data1(),
        board.pin(Net::Data2),
        board.delay(),
    );
    let afe = AnalogFrontEnd::new(
        bus,
        Dac1220::new(board.pin(Net::DacSelect)),
        Mcp3550::new(board.pin(Net::AdcSelect)),
    );
    let panel = FrontPanel::new(
        board.pin(Net::Cell),
        board.pin(Net::ModeSelect),
        [
            board.pin(Net::Range1),
            board.pin(Net::Range2),
            board.pin(Net::Range3),
        ],
    );
    let instrument = Instrument::new(panel, afe, CalibrationStore::new(storage), board.delay());
    (board, instrument)
}

fn boot() -> (SimBoard, SimInstrument) {
    boot_with_storage(RamStorage::new())
}

#[test]
fn boot_resets_and_configures_the_dac() {
    let (board, _instrument) = boot();
    assert_eq!(board.dac_reset_count(), 1);
    assert_eq!(board.dac_output_code(), [0x80, 0x00, 0x00]);
    // Erased flash is applied verbatim, exactly as a real board with
    // never-written calibration behaves
    assert_eq!(board.dac_calibration(), [0xFF; 6]);
    // Two power-up settle waits plus bus traffic
    assert!(board.now_us() >= 50_000);
}

#[test]
fn boot_leaves_the_panel_in_the_power_on_state() {
    let (board, _instrument) = boot();
    assert!(!board.level(Net::Cell));
    assert!(!board.level(Net::ModeSelect));
    assert!(board.level(Net::Range1));
    assert!(!board.level(Net::Range2));
    assert!(!board.level(Net::Range3));
}

#[test]
fn dacset_reaches_the_output_register() {
    let (board, mut instrument) = boot();
    assert_eq!(instrument.handle(b"DACSET \x10\x20\x30"), Reply::Ok);
    assert_eq!(board.dac_output_code(), [0x10, 0x20, 0x30]);
}

#[test]
fn range_switch_is_make_before_break_on_the_wire() {
    let (board, mut instrument) = boot();
    board.clear_trace();
    assert_eq!(instrument.handle(b"RANGE 2"), Reply::Ok);

    let trace = board.trace();
    let range2_on = trace
        .iter()
        .find(|e| e.net == Net::Range2 && e.high)
        .unwrap();
    let range1_off = trace
        .iter()
        .find(|e| e.net == Net::Range1 && !e.high)
        .unwrap();
    assert!(range2_on.at_us < range1_off.at_us);
    assert!(range1_off.at_us - range2_on.at_us >= 10_000);

    assert!(!board.level(Net::Range1));
    assert!(board.level(Net::Range2));
    assert!(!board.level(Net::Range3));
}

#[test]
fn adcread_waits_then_delivers_then_retriggers() {
    let (board, mut instrument) = boot();
    assert_eq!(instrument.handle(b"ADCREAD"), Reply::Wait);
    assert_eq!(board.adc_retriggers(), 0);

    board.load_adc_sample([0xA5, 0x12, 0xFF], [0x00, 0xC3, 0x7E]);
    assert_eq!(
        instrument.handle(b"ADCREAD"),
        Reply::Data([0xA5, 0x12, 0xFF, 0x00, 0xC3, 0x7E])
    );
    assert_eq!(board.adc_retriggers(), 1);

    // Consumed; the next poll waits for the retriggered conversion
    assert_eq!(instrument.handle(b"ADCREAD"), Reply::Wait);
}

#[test]
fn daccal_runs_the_chip_and_persists_what_it_measured() {
    let (board, mut instrument) = boot();
    board.set_dac_selfcal_result([0x0C, 0xAF, 0xFE, 0x0B, 0xEE, 0xF5]);
    let before_us = board.now_us();
    assert_eq!(instrument.handle(b"DACCAL"), Reply::Ok);
    assert_eq!(board.dac_selfcal_count(), 1);
    // The fixed calibration wait really elapsed
    assert!(board.now_us() - before_us >= 500_000);
    assert_eq!(
        instrument.handle(b"DACCALGET"),
        Reply::Data([0x0C, 0xAF, 0xFE, 0x0B, 0xEE, 0xF5])
    );
}

#[test]
fn daccalset_applies_to_the_chip_and_survives_a_reboot() {
    let storage = RamStorage::new();
    {
        let (board, mut instrument) = boot_with_storage(storage.clone());
        assert_eq!(
            instrument.handle(b"DACCALSET \x21\x22\x23\x24\x25\x26"),
            Reply::Ok
        );
        assert_eq!(board.dac_calibration(), [0x21, 0x22, 0x23, 0x24, 0x25, 0x26]);
    }
    let (board, _instrument) = boot_with_storage(storage);
    assert_eq!(board.dac_calibration(), [0x21, 0x22, 0x23, 0x24, 0x25, 0x26]);
}

#[test]
fn rejected_frames_never_touch_storage() {
    let storage = RamStorage::new();
    let (_board, mut instrument) = boot_with_storage(storage.clone());
    assert_eq!(storage.writes(), 0);

    assert_eq!(instrument.handle(b"BOGUS"), Reply::Unknown);
    assert_eq!(instrument.handle(b"OFFSETSAVE \x01\x02\x03\x04\x05"), Reply::Unknown);
    assert_eq!(instrument.handle(b"SHUNTCALSAVE \x01\x02\x03\x04\x05\x06\x07"), Reply::Unknown);
    assert_eq!(storage.writes(), 0);

    assert_eq!(instrument.handle(b"OFFSETSAVE \x01\x02\x03\x04\x05\x06"), Reply::Ok);
    assert_eq!(storage.writes(), 1);
}

#[test]
fn full_session_walkthrough() {
    let (board, mut instrument) = boot();

    assert_eq!(instrument.handle(b"RANGE 3"), Reply::Ok);
    assert_eq!(instrument.handle(b"GALVANOSTATIC"), Reply::Ok);
    assert_eq!(instrument.handle(b"DACSET \x7F\xFF\xFF"), Reply::Ok);
    assert_eq!(instrument.handle(b"CELL ON"), Reply::Ok);
    assert!(board.level(Net::Cell));
    assert!(board.level(Net::ModeSelect));
    assert!(board.level(Net::Range3));

    assert_eq!(instrument.handle(b"ADCREAD"), Reply::Wait);
    board.load_adc_sample([1, 2, 3], [4, 5, 6]);
    assert_eq!(instrument.handle(b"ADCREAD"), Reply::Data([1, 2, 3, 4, 5, 6]));

    assert_eq!(instrument.handle(b"OFFSETSAVE \x01\x02\x03\x04\x05\x06"), Reply::Ok);
    assert_eq!(
        instrument.handle(b"OFFSETREAD"),
        Reply::Data([0x01, 0x02, 0x03, 0x04, 0x05, 0x06])
    );
    assert_eq!(instrument.handle(b"SHUNTCALSAVE \x61\x62\x63\x64\x65\x66"), Reply::Ok);
    assert_eq!(
        instrument.handle(b"SHUNTCALREAD"),
        Reply::Data([0x61, 0x62, 0x63, 0x64, 0x65, 0x66])
    );

    assert_eq!(instrument.handle(b"BOGUS"), Reply::Unknown);
    assert_eq!(instrument.handle(b"CELL OFF"), Reply::Ok);
    assert!(!board.level(Net::Cell));
    assert_eq!(instrument.handle(b"POTENTIOSTATIC"), Reply::Ok);
    assert!(!board.level(Net::ModeSelect));
}
