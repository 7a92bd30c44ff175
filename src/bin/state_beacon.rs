//! Broadcast an "on" or "off" 128-bit service UUID, switching every five
//! seconds, under a fixed device address. Scanners track the device state
//! purely from the advertised UUID; no connections are serviced.

#![no_std]
#![no_main]

use defmt::{error, info};
use embassy_executor::Spawner;
use embassy_futures::join::join;
use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Timer;
use nrf_mpsl::MultiprotocolServiceLayer;
use nrf_sdc::SoftdeviceController;
use nrf52_state_beacon::beacon::{self, BeaconState};
use nrf52_state_beacon::{self as _, Board};
use trouble_host::prelude::*;

/// Max number of connections. The beacon never accepts one, but the
/// advertisement is connectable, so the host keeps a slot ready.
const CONNECTIONS_MAX: usize = 1;

/// Max number of L2CAP channels.
const L2CAP_CHANNELS_MAX: usize = 2; // Signal + att

/// Requests a clean stop of the broadcast cycle. Never signalled in normal
/// operation; the beacon runs until power-off.
static SHUTDOWN: Signal<CriticalSectionRawMutex, ()> = Signal::new();

#[embassy_executor::task]
async fn mpsl_task(mpsl: &'static MultiprotocolServiceLayer<'static>) -> ! {
    mpsl.run().await
}

#[embassy_executor::task]
async fn beacon_task(sdc: SoftdeviceController<'static>) {
    let address: Address = Address::random(beacon::DEVICE_ADDRESS);
    info!("Device address = {:?}", address);

    let mut resources: HostResources<DefaultPacketPool, CONNECTIONS_MAX, L2CAP_CHANNELS_MAX, 27> =
        HostResources::new();
    let stack = trouble_host::new(sdc, &mut resources).set_random_address(address);
    let Host {
        mut peripheral,
        mut runner,
        ..
    } = stack.build();

    let _ = join(runner.run(), broadcast_cycle(&mut peripheral)).await;
}

/// The toggle loop. On every state entry: rebuild the advertising data,
/// start advertising, hold it for the full cycle, then flip the state.
///
/// A failed rebuild is logged and the previous data is reused; a failed
/// start is logged and retried naturally on the next cycle. No transition
/// is ever skipped.
async fn broadcast_cycle(
    peripheral: &mut Peripheral<'_, SoftdeviceController<'static>, DefaultPacketPool>,
) {
    let params = beacon::adv_params();
    let mut adv_data = [0u8; 31];
    let mut adv_len = 0;
    let mut state = BeaconState::On;

    loop {
        info!("Broadcasting \"{}\" payload", state.label());
        match beacon::build_adv_data(&mut adv_data, state.service_uuid()) {
            Ok(len) => adv_len = len,
            Err(e) => error!("Failed to build advertising data: {:?}", e),
        }

        let advertiser = peripheral
            .advertise(
                &params,
                Advertisement::ConnectableScannableUndirected {
                    adv_data: &adv_data[..adv_len],
                    scan_data: &[],
                },
            )
            .await;
        match &advertiser {
            Ok(_) => info!("Advertising started"),
            Err(e) => error!("Failed to start advertising: {:?}", defmt::Debug2Format(e)),
        }

        // Cooperative suspend; the advertiser stays live for the whole cycle.
        match select(Timer::after(beacon::CYCLE), SHUTDOWN.wait()).await {
            Either::First(()) => {}
            Either::Second(()) => {
                info!("Shutdown requested, stopping broadcast");
                return;
            }
        }
        drop(advertiser);
        state = state.toggled();
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Booting on/off state beacon");
    let b = Board::default();
    let (sdc, mpsl) = match b.ble.init(b.timer0, b.rng) {
        Ok(parts) => parts,
        Err(e) => {
            // Fatal: without a controller there is nothing to broadcast.
            error!("BLE controller init failed: {:?}", defmt::Debug2Format(&e));
            return;
        }
    };
    info!("Initialized BLE.");
    spawner.must_spawn(mpsl_task(mpsl));
    spawner.must_spawn(beacon_task(sdc));
}
