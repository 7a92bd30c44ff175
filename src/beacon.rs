//! Payload constants and advertising-data construction for the on/off beacon.
//!
//! Observers recognize the device state by scanning for one of two 128-bit
//! service UUIDs that differ in a single byte. Everything here is plain data
//! and encoding; the radio side lives in the `state_beacon` binary.

use embassy_time::Duration;
use trouble_host::prelude::*;

/// Device identity, in over-the-air (little endian) byte order.
///
/// Applied once at startup as the static device address, before any
/// advertising is configured. The two most significant bits of the last
/// byte are set, as static addresses require.
pub const DEVICE_ADDRESS: [u8; 6] = [0x00, 0x00, 0x00, 0x00, 0x51, 0xe4];

/// Complete local name carried in every advertisement. Five bytes, so the
/// full payload still fits a 31-byte legacy PDU.
pub const DEVICE_NAME: &[u8] = b"OnOff";

/// Service UUID broadcast while the state is "on". Byte 3 is the state byte.
pub const SERVICE_UUID_ON: [u8; 16] = [
    0x00, 0x01, 0x00, 0xff, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc,
];

/// Service UUID broadcast while the state is "off". Identical to
/// [`SERVICE_UUID_ON`] except for the state byte.
pub const SERVICE_UUID_OFF: [u8; 16] = [
    0x00, 0x01, 0x00, 0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc,
];

/// How long each payload is broadcast before switching to the other one.
pub const CYCLE: Duration = Duration::from_millis(5000);

// Advertising interval bounds in 0.625 ms controller ticks.
const ADV_INTERVAL_MIN_TICKS: u64 = 0x20;
const ADV_INTERVAL_MAX_TICKS: u64 = 0x40;
const ADV_TICK_US: u64 = 625;

/// The one piece of mutable state in the firmware: which payload is live.
#[derive(Clone, Copy, PartialEq, Eq, Debug, defmt::Format)]
pub enum BeaconState {
    On,
    Off,
}

impl BeaconState {
    /// The other state. Transitions strictly alternate, nothing else ever
    /// writes the state.
    pub const fn toggled(self) -> Self {
        match self {
            BeaconState::On => BeaconState::Off,
            BeaconState::Off => BeaconState::On,
        }
    }

    /// Payload for this state, selected by reference.
    pub const fn service_uuid(self) -> &'static [u8; 16] {
        match self {
            BeaconState::On => &SERVICE_UUID_ON,
            BeaconState::Off => &SERVICE_UUID_OFF,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            BeaconState::On => "on",
            BeaconState::Off => "off",
        }
    }
}

/// Advertising parameters shared by every cycle: undirected connectable,
/// 20..40 ms interval, controller defaults for channels and filtering.
pub fn adv_params() -> AdvertisementParameters {
    let mut params = AdvertisementParameters::default();
    params.interval_min = Duration::from_micros(ADV_INTERVAL_MIN_TICKS * ADV_TICK_US);
    params.interval_max = Duration::from_micros(ADV_INTERVAL_MAX_TICKS * ADV_TICK_US);
    params
}

/// Encode the advertising data for one payload into `buf`.
///
/// Layout: Flags (general discoverable, BR/EDR not supported), the complete
/// 128-bit service UUID list holding `uuid`, the complete local name and the
/// TX power level. No scan response data is used.
pub fn build_adv_data(buf: &mut [u8], uuid: &[u8; 16]) -> Result<usize, trouble_host::Error> {
    AdStructure::encode_slice(
        &[
            AdStructure::Flags(LE_GENERAL_DISCOVERABLE | BR_EDR_NOT_SUPPORTED),
            AdStructure::ServiceUuids128(&[*uuid]),
            AdStructure::CompleteLocalName(DEVICE_NAME),
            // TX Power Level (AD type 0x0a), 0 dBm
            AdStructure::Unknown {
                ty: 0x0a,
                data: &[0x00],
            },
        ],
        buf,
    )
}
