use crate::{
    fifo::PREAMBLE_MAX,
    ll::{self, Register},
    maybe_async_attr, spi_type, synth,
    time::Clock,
    Config, Error, OperatingMode, Ready, Uninitialized, AX5043,
};

use super::synth::output_power_to_raw;

/// Silicon revision reported by production parts
const SILICON_REVISION: u8 = 0x51;

/// Attempts at reading the expected silicon revision
const IDENTITY_TRIES: usize = 10;

/// Pause between two identity attempts, in milliseconds
const IDENTITY_RETRY_MS: u32 = 10;

/// Reference frequency above which F35 needs the divided setting, in MHz
const F35_CRYSTAL_THRESHOLD: f64 = 24.8;

/// Fixed performance tuning, (register, value)
const PERFORMANCE_TUNING: [(u16, u8); 7] = [
    (ll::PERFTUNE0::ADDR, 0x0F),
    (ll::REFTUNE::ADDR, 0x03),
    (ll::PERFTUNE28::ADDR, 0x07),
    (ll::PERFTUNE68::ADDR, 0x24),
    (ll::PLLLOOP::ADDR, 0x0A),
    (ll::PLLCPI::ADDR, 0x10),
    (ll::PLLVCODIV::ADDR, 0x30),
];

impl<SPI, CLOCK> AX5043<SPI, CLOCK, Uninitialized> {
    /// Create a new instance of `AX5043`
    ///
    /// Requires the SPI device connected to the AX5043 and a clock used for
    /// every timed wait. Nothing is sent over the bus until [`init`] is
    /// called.
    ///
    /// [`init`]: #method.init
    pub fn new(spi: SPI, clock: CLOCK) -> Self {
        AX5043 {
            ll: ll::AX5043::new(spi),
            clock,
            config: Config::default(),
            mode: OperatingMode::PowerDown,
            ranged_frequency: None,
            state: Uninitialized,
        }
    }
}

impl<SPI, CLOCK> AX5043<SPI, CLOCK, Uninitialized>
where
    SPI: spi_type::spi::SpiDevice<u8>,
    CLOCK: Clock + spi_type::delay::DelayNs,
{
    /// Initialize the AX5043
    ///
    /// Checks the silicon revision, resets the chip, applies the performance
    /// tuning values from the programming manual and programs `config`. The
    /// PLL is ranged for the configured frequency, after which the chip is
    /// left in standby.
    ///
    /// The configuration is validated before anything is written. Any error
    /// after that leaves the chip in an unknown configuration.
    #[maybe_async_attr]
    pub async fn init(mut self, config: Config) -> Result<AX5043<SPI, CLOCK, Ready>, Error<SPI>> {
        validate(&config)?;

        self.detect().await?;

        self.config = config;
        self.reset_chip().await?;
        self.tune().await?;

        self.commit_modulation(config.modulation).await?;
        self.commit_frequency_deviation(config.frequency_deviation)
            .await?;
        self.commit_bit_rate(config.bit_rate).await?;
        self.commit_output_power(config.output_power).await?;
        self.commit_frequency(config.frequency, true).await?;

        log::debug!(
            "AX5043 ready at {} MHz, {} kbps",
            config.frequency,
            config.bit_rate
        );

        Ok(self.into_state(Ready))
    }

    /// Look for the expected silicon revision
    #[maybe_async_attr]
    async fn detect(&mut self) -> Result<(), Error<SPI>> {
        for attempt in 1..=IDENTITY_TRIES {
            let revision = self.ll.revision().read().await?.silicon_rev();
            if revision == SILICON_REVISION {
                return Ok(());
            }

            log::debug!(
                "AX5043 not found ({} of {} tries): revision {:#04x}, expected {:#04x}",
                attempt,
                IDENTITY_TRIES,
                revision,
                SILICON_REVISION
            );
            if attempt < IDENTITY_TRIES {
                self.clock.delay_ms(IDENTITY_RETRY_MS).await;
            }
        }

        Err(Error::ChipNotFound)
    }

    /// Write the performance tuning registers
    #[maybe_async_attr]
    async fn tune(&mut self) -> Result<(), Error<SPI>> {
        for (addr, value) in PERFORMANCE_TUNING {
            self.ll.write_register_checked(addr, value, 0xFF).await?;
        }

        let (xtalosc, xtalampl) = self
            .config
            .oscillator
            .tuning(self.config.crystal_frequency);
        self.ll
            .xtalosc()
            .write_checked(0xFF, |w| w.value(xtalosc))
            .await?;
        self.ll
            .xtalampl()
            .write_checked(0xFF, |w| w.value(xtalampl))
            .await?;

        // no RF divide-by-2
        self.ll
            .perftune52()
            .write_checked(0xFF, |w| w.value(0x08))
            .await?;

        let f35 = if self.config.crystal_frequency < F35_CRYSTAL_THRESHOLD {
            0x10
        } else {
            0x11
        };
        self.ll
            .perftune53()
            .write_checked(0xFF, |w| w.value(f35))
            .await?;

        Ok(())
    }
}

/// Check every value of `config` against its valid range
fn validate<SPI>(config: &Config) -> Result<(), Error<SPI>>
where
    SPI: spi_type::spi::ErrorType,
{
    let crystal = config.crystal_frequency;

    synth::frequency_to_raw(config.frequency, crystal)?;
    synth::bit_rate_to_raw(config.bit_rate, crystal)?;
    synth::check_deviation(config.frequency_deviation)?;
    synth::deviation_to_raw(
        config.frequency_deviation * config.modulation.deviation_scale(),
        crystal,
    )?;

    if config.preamble_length > PREAMBLE_MAX {
        return Err(Error::InvalidPreambleLength);
    }
    output_power_to_raw(config.output_power).ok_or(Error::InvalidOutputPower)?;

    Ok(())
}
