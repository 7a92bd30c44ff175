#![no_main]
#![no_std]

use defmt_rtt as _;
use embassy_nrf::{
    Peri,
    peripherals::{RNG, TIMER0},
};
use panic_probe as _;

pub mod beacon;
pub mod bsp {
    pub mod ble;
}

pub struct Board {
    /// TIMER0 peripheral
    pub timer0: Peri<'static, TIMER0>,
    /// Random number generator
    pub rng: Peri<'static, RNG>,
    /// Bluetooth Low Energy
    pub ble: bsp::ble::BleControllerBuilder<'static>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(Default::default())
    }
}

impl Board {
    pub fn new(config: embassy_nrf::config::Config) -> Self {
        let p = embassy_nrf::init(config);
        Self {
            timer0: p.TIMER0,
            rng: p.RNG,
            ble: bsp::ble::BleControllerBuilder::new(
                p.RTC0, p.TEMP, p.PPI_CH17, p.PPI_CH18, p.PPI_CH19, p.PPI_CH20, p.PPI_CH21,
                p.PPI_CH22, p.PPI_CH23, p.PPI_CH24, p.PPI_CH25, p.PPI_CH26, p.PPI_CH27, p.PPI_CH28,
                p.PPI_CH29, p.PPI_CH30, p.PPI_CH31,
            ),
        }
    }
}

#[defmt::panic_handler]
fn panic() -> ! {
    // same panicking *behavior* as `panic-probe` but doesn't print a panic message
    // this prevents the panic message being printed *twice* when `defmt::panic` is invoked
    cortex_m::asm::udf()
}

/// Terminates the application and makes a semihosting-capable debug tool exit
/// with status code 0.
pub fn exit() -> ! {
    semihosting::process::exit(0);
}

/// Hardfault handler.
///
/// Terminates the application and makes a semihosting-capable debug tool exit
/// with an error. This seems better than the default, which is to spin in a
/// loop.
#[cortex_m_rt::exception]
unsafe fn HardFault(_frame: &cortex_m_rt::ExceptionFrame) -> ! {
    semihosting::process::exit(1);
}

// defmt-test 0.3.0 has the limitation that this `#[tests]` attribute can only be used
// once within a crate. the module can be in any file but there can only be at most
// one `#[tests]` module in this library crate
#[cfg(test)]
#[defmt_test::tests]
mod unit_tests {
    use defmt::{assert, assert_eq};

    use crate::beacon::{BeaconState, DEVICE_ADDRESS, SERVICE_UUID_OFF, SERVICE_UUID_ON};

    #[test]
    fn payloads_differ_only_in_state_byte() {
        assert_eq!(SERVICE_UUID_ON[3], 0xff);
        assert_eq!(SERVICE_UUID_OFF[3], 0x00);
        for i in 0..16 {
            if i != 3 {
                assert_eq!(SERVICE_UUID_ON[i], SERVICE_UUID_OFF[i]);
            }
        }
    }

    #[test]
    fn state_alternates() {
        assert!(BeaconState::On.toggled() == BeaconState::Off);
        assert!(BeaconState::Off.toggled() == BeaconState::On);
        assert!(BeaconState::On.toggled().toggled() == BeaconState::On);
    }

    #[test]
    fn state_selects_matching_payload() {
        assert_eq!(BeaconState::On.service_uuid(), &SERVICE_UUID_ON);
        assert_eq!(BeaconState::Off.service_uuid(), &SERVICE_UUID_OFF);
    }

    #[test]
    fn device_address_is_static_random() {
        // the two most significant bits of a static device address must be set
        assert_eq!(DEVICE_ADDRESS[5] & 0xc0, 0xc0);
    }
}
