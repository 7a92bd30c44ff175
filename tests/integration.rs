#![no_std]
#![no_main]

use nrf52_state_beacon as _;

#[defmt_test::tests]
mod tests {
    use defmt::{assert, assert_eq};
    use nrf52_state_beacon::beacon::{self, BeaconState, DEVICE_NAME, SERVICE_UUID_ON};

    #[test]
    fn cycle_period_is_five_seconds() {
        assert_eq!(beacon::CYCLE.as_millis(), 5000);
    }

    #[test]
    fn advertising_interval_bounds() {
        // 0x20 and 0x40 controller ticks of 0.625 ms
        let params = beacon::adv_params();
        assert_eq!(params.interval_min.as_micros(), 0x20 * 625);
        assert_eq!(params.interval_max.as_micros(), 0x40 * 625);
    }

    #[test]
    fn adv_data_fills_legacy_pdu() {
        let mut buf = [0u8; 31];
        for state in [BeaconState::On, BeaconState::Off] {
            let len = beacon::build_adv_data(&mut buf, state.service_uuid()).unwrap();
            assert_eq!(len, 31);
        }
    }

    #[test]
    fn adv_data_layout() {
        let mut buf = [0u8; 31];
        let len = beacon::build_adv_data(&mut buf, &SERVICE_UUID_ON).unwrap();
        let data = &buf[..len];
        // Flags: general discoverable, BR/EDR not supported
        assert_eq!(&data[0..3], &[0x02, 0x01, 0x06]);
        // Complete list of 128-bit service UUIDs
        assert_eq!(data[3], 0x11);
        assert_eq!(data[4], 0x07);
        assert_eq!(&data[5..21], &SERVICE_UUID_ON[..]);
        // Complete local name
        assert_eq!(data[21], (DEVICE_NAME.len() + 1) as u8);
        assert_eq!(data[22], 0x09);
        assert_eq!(&data[23..28], DEVICE_NAME);
        // TX power level
        assert_eq!(&data[28..31], &[0x02, 0x0a, 0x00]);
    }

    #[test]
    fn encoding_too_small_buffer_is_an_error() {
        let mut buf = [0u8; 16];
        assert!(beacon::build_adv_data(&mut buf, &SERVICE_UUID_ON).is_err());
    }

    #[test]
    fn broadcast_sequence_alternates() {
        // the state byte of the advertised UUID over four consecutive cycles
        let mut state = BeaconState::On;
        let mut observed = [0u8; 4];
        for slot in observed.iter_mut() {
            *slot = state.service_uuid()[3];
            state = state.toggled();
        }
        assert_eq!(observed, [0xff, 0x00, 0xff, 0x00]);
    }
}
