use num_traits::Float;

use super::mode::{POLL_INTERVAL_US, SETTLE_TIMEOUT};
use crate::{
    ll::{self, Register},
    maybe_async_attr, spi_type,
    synth::{self, RANGING_THRESHOLD},
    time::Clock,
    Error, Modulation, OperatingMode, AX5043,
};

/// VCO range the autoranging search starts from
const VCOR_RESET: u8 = 0x08;

/// AFSK space frequency, programmed with AFSK modulation
const AFSK_SPACE: u16 = 0x0024;
/// AFSK mark frequency, programmed with AFSK modulation
const AFSK_MARK: u16 = 0x0014;

/// Lowest output power in dBm
pub const OUTPUT_POWER_MIN: i8 = -10;
/// Highest output power in dBm
pub const OUTPUT_POWER_MAX: i8 = 16;

/// Outcome of a successful PLL ranging
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PllRangingResult {
    /// The PLL reported lock when ranging finished
    pub locked: bool,
    /// VCO range the search settled on
    pub range_value: u8,
}

/// TXPWRCOEFFB value for an output power in dBm
///
/// Full scale (0x0FFF) is 16 dBm; every other value is scaled in amplitude.
pub fn output_power_to_raw(power: i8) -> Option<u16> {
    if !(OUTPUT_POWER_MIN..=OUTPUT_POWER_MAX).contains(&power) {
        return None;
    }

    let scale = Float::powf(10.0_f64, f64::from(power - OUTPUT_POWER_MAX) / 20.0);
    Some(Float::round(f64::from(0x0FFF_u16) * scale) as u16)
}

impl<SPI, CLOCK, State> AX5043<SPI, CLOCK, State>
where
    SPI: spi_type::spi::SpiDevice<u8>,
    CLOCK: Clock + spi_type::delay::DelayNs,
{
    /// Program the carrier frequency, ranging the PLL if needed
    ///
    /// Ranging runs on `force`, on the first call, and whenever the new
    /// frequency is more than 2.5 MHz away from the last ranged one.
    #[maybe_async_attr]
    pub(super) async fn commit_frequency(
        &mut self,
        frequency: f64,
        force: bool,
    ) -> Result<Option<PllRangingResult>, Error<SPI>> {
        let raw = synth::frequency_to_raw(frequency, self.config.crystal_frequency)?;

        self.ll
            .write_registers(ll::FREQA3::ADDR, &raw.to_be_bytes())
            .await?;
        self.config.frequency = frequency;

        let needs_ranging = force
            || match self.ranged_frequency {
                Some(ranged) => Float::abs(ranged - frequency) > RANGING_THRESHOLD,
                None => true,
            };
        if !needs_ranging {
            return Ok(None);
        }

        let result = self.range_pll().await?;
        self.ranged_frequency = Some(frequency);

        Ok(Some(result))
    }

    /// Program the bit rate in kbps
    #[maybe_async_attr]
    pub(super) async fn commit_bit_rate(&mut self, bit_rate: f64) -> Result<(), Error<SPI>> {
        let raw = synth::bit_rate_to_raw(bit_rate, self.config.crystal_frequency)?;

        self.ll
            .write_registers(ll::TXRATE2::ADDR, &raw.to_be_bytes()[1..])
            .await?;
        self.config.bit_rate = bit_rate;

        Ok(())
    }

    /// Program the nominal deviation in kHz, scaled for the modulation
    #[maybe_async_attr]
    pub(super) async fn commit_frequency_deviation(
        &mut self,
        deviation: f64,
    ) -> Result<(), Error<SPI>> {
        synth::check_deviation(deviation)?;
        let scaled = deviation * self.config.modulation.deviation_scale();
        let raw = synth::deviation_to_raw(scaled, self.config.crystal_frequency)?;

        self.ll
            .write_registers(ll::FSKDEV2::ADDR, &raw.to_be_bytes()[1..])
            .await?;
        self.config.frequency_deviation = deviation;

        Ok(())
    }

    /// Program the modulation scheme
    ///
    /// The deviation is not rewritten here, callers take care of it.
    #[maybe_async_attr]
    pub(super) async fn commit_modulation(
        &mut self,
        modulation: Modulation,
    ) -> Result<(), Error<SPI>> {
        self.ll
            .modulation()
            .write_checked(0xFF, |w| w.modulation(modulation.register_value()))
            .await?;

        if modulation == Modulation::Afsk {
            self.ll
                .write_registers(ll::AFSKSPACE1::ADDR, &AFSK_SPACE.to_be_bytes())
                .await?;
            self.ll
                .write_registers(ll::AFSKMARK1::ADDR, &AFSK_MARK.to_be_bytes())
                .await?;
        }
        self.config.modulation = modulation;

        Ok(())
    }

    /// Program the output power in dBm
    ///
    /// Coefficient A, the constant term of the predistortion, is zeroed so
    /// the amplitude follows coefficient B alone.
    #[maybe_async_attr]
    pub(super) async fn commit_output_power(&mut self, power: i8) -> Result<(), Error<SPI>> {
        let raw = output_power_to_raw(power).ok_or(Error::InvalidOutputPower)?;

        self.ll
            .write_registers(ll::TXPWRCOEFFA1::ADDR, &[0x00, 0x00])
            .await?;
        self.ll
            .write_registers(ll::TXPWRCOEFFB1::ADDR, &raw.to_be_bytes())
            .await?;
        self.config.output_power = power;

        Ok(())
    }

    /// Run PLL autoranging for the programmed frequency
    ///
    /// The chip is put into standby first and is left in standby on every
    /// path, including failures.
    #[maybe_async_attr]
    pub(super) async fn range_pll(&mut self) -> Result<PllRangingResult, Error<SPI>> {
        self.set_mode(OperatingMode::Standby).await?;

        let result = self.run_ranging().await;
        let standby = self.set_mode(OperatingMode::Standby).await;

        let result = result?;
        standby?;

        log::debug!(
            "PLL ranged at {} MHz: range {}, locked {}",
            self.config.frequency,
            result.range_value,
            result.locked
        );

        Ok(result)
    }

    #[maybe_async_attr]
    async fn run_ranging(&mut self) -> Result<PllRangingResult, Error<SPI>> {
        self.wait_for_xtal().await?;

        self.ll
            .pllranginga()
            .write(|w| w.vcor(VCOR_RESET).rngstart(1))
            .await?;

        let start = self.clock.now();
        let ranging = loop {
            let ranging = self.ll.pllranginga().read().await?;
            if ranging.rngstart() == 0 {
                break ranging;
            }

            self.clock.yield_now();
            if self.expired(start, SETTLE_TIMEOUT) {
                log::debug!("PLL ranging did not finish");
                return Err(Error::RangingTimeout);
            }
            self.clock.delay_us(POLL_INTERVAL_US).await;
        };

        if ranging.rngerr() == 1 {
            log::debug!("PLL ranging failed: {:?}", ranging);
            return Err(Error::RangingTimeout);
        }

        Ok(PllRangingResult {
            locked: ranging.plllock() == 1,
            range_value: ranging.vcor(),
        })
    }
}
