//! Bring-up of the BLE controller: Multiprotocol Service Layer plus the
//! Nordic SoftDevice Controller, wired up for the nRF52840.
//!
//! Everything that can fail during radio bring-up is funneled through
//! [`BleInitError`]; a failure here means the firmware never advertises.

use embassy_nrf::peripherals::{
    PPI_CH17, PPI_CH18, PPI_CH19, PPI_CH20, PPI_CH21, PPI_CH22, PPI_CH23, PPI_CH24, PPI_CH25,
    PPI_CH26, PPI_CH27, PPI_CH28, PPI_CH29, PPI_CH30, PPI_CH31, RNG, RTC0, TEMP, TIMER0,
};
use embassy_nrf::{Peri, bind_interrupts, rng};
use nrf_mpsl::MultiprotocolServiceLayer;
use nrf_sdc::{self as sdc, SoftdeviceController};
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    RNG => rng::InterruptHandler<RNG>;
    EGU0_SWI0 => nrf_mpsl::LowPrioInterruptHandler;
    CLOCK_POWER => nrf_mpsl::ClockInterruptHandler;
    RADIO => nrf_mpsl::HighPrioInterruptHandler;
    TIMER0 => nrf_mpsl::HighPrioInterruptHandler;
    RTC0 => nrf_mpsl::HighPrioInterruptHandler;
});

/// Controller memory. Sized for a single peripheral link with default
/// buffer configuration.
const SDC_MEM_SIZE: usize = 3312;

/// Radio bring-up failure. Fatal: the caller is expected to log it and
/// abort startup.
#[derive(Debug)]
pub enum BleInitError {
    Mpsl(nrf_mpsl::Error),
    Sdc(nrf_sdc::Error),
}

impl From<nrf_mpsl::Error> for BleInitError {
    fn from(e: nrf_mpsl::Error) -> Self {
        BleInitError::Mpsl(e)
    }
}

impl From<nrf_sdc::Error> for BleInitError {
    fn from(e: nrf_sdc::Error) -> Self {
        BleInitError::Sdc(e)
    }
}

/// Holds the peripherals the BLE controller claims at board construction
/// time, so that `init` can be deferred until the executor is running.
pub struct BleControllerBuilder<'d> {
    rtc0: Peri<'d, RTC0>,
    temp: Peri<'d, TEMP>,
    ppi_ch17: Peri<'d, PPI_CH17>,
    ppi_ch18: Peri<'d, PPI_CH18>,
    ppi_ch19: Peri<'d, PPI_CH19>,
    ppi_ch20: Peri<'d, PPI_CH20>,
    ppi_ch21: Peri<'d, PPI_CH21>,
    ppi_ch22: Peri<'d, PPI_CH22>,
    ppi_ch23: Peri<'d, PPI_CH23>,
    ppi_ch24: Peri<'d, PPI_CH24>,
    ppi_ch25: Peri<'d, PPI_CH25>,
    ppi_ch26: Peri<'d, PPI_CH26>,
    ppi_ch27: Peri<'d, PPI_CH27>,
    ppi_ch28: Peri<'d, PPI_CH28>,
    ppi_ch29: Peri<'d, PPI_CH29>,
    ppi_ch30: Peri<'d, PPI_CH30>,
    ppi_ch31: Peri<'d, PPI_CH31>,
}

impl BleControllerBuilder<'static> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        rtc0: Peri<'static, RTC0>,
        temp: Peri<'static, TEMP>,
        ppi_ch17: Peri<'static, PPI_CH17>,
        ppi_ch18: Peri<'static, PPI_CH18>,
        ppi_ch19: Peri<'static, PPI_CH19>,
        ppi_ch20: Peri<'static, PPI_CH20>,
        ppi_ch21: Peri<'static, PPI_CH21>,
        ppi_ch22: Peri<'static, PPI_CH22>,
        ppi_ch23: Peri<'static, PPI_CH23>,
        ppi_ch24: Peri<'static, PPI_CH24>,
        ppi_ch25: Peri<'static, PPI_CH25>,
        ppi_ch26: Peri<'static, PPI_CH26>,
        ppi_ch27: Peri<'static, PPI_CH27>,
        ppi_ch28: Peri<'static, PPI_CH28>,
        ppi_ch29: Peri<'static, PPI_CH29>,
        ppi_ch30: Peri<'static, PPI_CH30>,
        ppi_ch31: Peri<'static, PPI_CH31>,
    ) -> Self {
        Self {
            rtc0,
            temp,
            ppi_ch17,
            ppi_ch18,
            ppi_ch19,
            ppi_ch20,
            ppi_ch21,
            ppi_ch22,
            ppi_ch23,
            ppi_ch24,
            ppi_ch25,
            ppi_ch26,
            ppi_ch27,
            ppi_ch28,
            ppi_ch29,
            ppi_ch30,
            ppi_ch31,
        }
    }

    /// Start the MPSL and build the SoftDevice Controller with advertising
    /// and peripheral support.
    ///
    /// The returned MPSL reference must be driven by a background task
    /// (`mpsl.run()`) for the controller to function.
    pub fn init(
        self,
        timer0: Peri<'static, TIMER0>,
        rng: Peri<'static, RNG>,
    ) -> Result<
        (
            SoftdeviceController<'static>,
            &'static MultiprotocolServiceLayer<'static>,
        ),
        BleInitError,
    > {
        let mpsl_p = nrf_mpsl::Peripherals::new(
            self.rtc0,
            timer0,
            self.temp,
            self.ppi_ch19,
            self.ppi_ch30,
            self.ppi_ch31,
        );
        // Low-frequency clock from the internal RC oscillator; no crystal
        // is required for advertising-only operation.
        let lfclk_cfg = nrf_mpsl::raw::mpsl_clock_lfclk_cfg_t {
            source: nrf_mpsl::raw::MPSL_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: nrf_mpsl::raw::MPSL_RECOMMENDED_RC_CTIV as u8,
            rc_temp_ctiv: nrf_mpsl::raw::MPSL_RECOMMENDED_RC_TEMP_CTIV as u8,
            accuracy_ppm: nrf_mpsl::raw::MPSL_DEFAULT_CLOCK_ACCURACY_PPM as u16,
            skip_wait_lfclk_started: nrf_mpsl::raw::MPSL_DEFAULT_SKIP_WAIT_LFCLK_STARTED != 0,
        };
        static MPSL: StaticCell<MultiprotocolServiceLayer<'static>> = StaticCell::new();
        let mpsl = &*MPSL.init(MultiprotocolServiceLayer::new(mpsl_p, Irqs, lfclk_cfg)?);

        let sdc_p = sdc::Peripherals::new(
            self.ppi_ch17,
            self.ppi_ch18,
            self.ppi_ch20,
            self.ppi_ch21,
            self.ppi_ch22,
            self.ppi_ch23,
            self.ppi_ch24,
            self.ppi_ch25,
            self.ppi_ch26,
            self.ppi_ch27,
            self.ppi_ch28,
            self.ppi_ch29,
        );
        static SDC_RNG: StaticCell<rng::Rng<'static, RNG>> = StaticCell::new();
        let sdc_rng = SDC_RNG.init(rng::Rng::new(rng, Irqs));
        static SDC_MEM: StaticCell<sdc::Mem<SDC_MEM_SIZE>> = StaticCell::new();
        let sdc_mem = SDC_MEM.init(sdc::Mem::new());

        let sdc = sdc::Builder::new()?
            .support_adv()?
            .support_peripheral()?
            .peripheral_count(1)?
            .build(sdc_p, sdc_rng, mpsl, sdc_mem)?;

        Ok((sdc, mpsl))
    }
}
