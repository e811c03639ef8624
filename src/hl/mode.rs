use crate::{
    maybe_async_attr, spi_type,
    time::{Clock, Duration, Instant},
    Error, AX5043,
};

/// PWRMODE bits compared after a mode write; WDS (bit 4) is read-only
const PWRMODE_CHECK_MASK: u8 = 0xEF;

/// Minimum time RST is held in either level during a reset, in microseconds
const RESET_HOLD_US: u32 = 100;

/// Sleep between two polls of a status register, in microseconds
pub(super) const POLL_INTERVAL_US: u32 = 100;

/// Upper bound for crystal start-up and PLL ranging
pub(super) const SETTLE_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Power modes of the chip, as written to PWRMODE
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatingMode {
    /// Everything off except the register file
    PowerDown,
    /// Crystal running, receiver and transmitter off
    Standby,
    /// Crystal running and the FIFO accessible
    FifoOn,
    /// Synthesizer and power amplifier running
    FullTx,
    /// RST held high
    ResetAsserted,
    /// RST released, chip not yet in a defined mode
    ResetCleared,
}

impl OperatingMode {
    /// Value of the PWRMODE.PWRMODE field
    pub fn pwrmode(&self) -> u8 {
        match self {
            OperatingMode::PowerDown
            | OperatingMode::ResetAsserted
            | OperatingMode::ResetCleared => 0x00,
            OperatingMode::Standby => 0x05,
            OperatingMode::FifoOn => 0x07,
            OperatingMode::FullTx => 0x0D,
        }
    }

    /// Value of the PWRMODE.RST bit
    pub fn rst(&self) -> u8 {
        (*self == OperatingMode::ResetAsserted) as u8
    }
}

impl<SPI, CLOCK, State> AX5043<SPI, CLOCK, State>
where
    SPI: spi_type::spi::SpiDevice<u8>,
    CLOCK: Clock + spi_type::delay::DelayNs,
{
    /// Write PWRMODE and verify it
    ///
    /// The crystal and reference enable bits are taken from the
    /// configuration.
    #[maybe_async_attr]
    pub(super) async fn set_mode(&mut self, mode: OperatingMode) -> Result<(), Error<SPI>> {
        let xoen = self.config.crystal_enabled as u8;
        let refen = self.config.reference_enabled as u8;

        self.ll
            .pwrmode()
            .write_checked(PWRMODE_CHECK_MASK, |w| {
                w.pwrmode(mode.pwrmode())
                    .rst(mode.rst())
                    .xoen(xoen)
                    .refen(refen)
            })
            .await?;

        log::trace!("mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;

        Ok(())
    }

    /// Reset the chip through PWRMODE.RST
    ///
    /// Always ends in `PowerDown`, whatever the mode before. Register contents
    /// are back at their reset values afterwards.
    #[maybe_async_attr]
    pub(super) async fn reset_chip(&mut self) -> Result<(), Error<SPI>> {
        self.set_mode(OperatingMode::ResetAsserted).await?;
        self.clock.delay_us(RESET_HOLD_US).await;

        self.set_mode(OperatingMode::ResetCleared).await?;
        self.clock.delay_us(RESET_HOLD_US).await;

        self.set_mode(OperatingMode::PowerDown).await?;
        self.ranged_frequency = None;

        Ok(())
    }

    /// Wait until the crystal oscillator runs
    #[maybe_async_attr]
    pub(super) async fn wait_for_xtal(&mut self) -> Result<(), Error<SPI>> {
        let start = self.clock.now();

        loop {
            if self.ll.xtalstatus().read().await?.xtalrun() == 1 {
                return Ok(());
            }

            self.clock.yield_now();
            if self.expired(start, SETTLE_TIMEOUT) {
                log::debug!("crystal did not start");
                return Err(Error::RangingTimeout);
            }
            self.clock.delay_us(POLL_INTERVAL_US).await;
        }
    }

    /// Whether more than `timeout` passed since `start`
    pub(super) fn expired(&mut self, start: Instant, timeout: Duration) -> bool {
        self.clock.now().duration_since(start) > timeout
    }
}

#[cfg(test)]
mod test {
    use embedded_hal_mock::eh1::spi::Mock as SpiMock;

    use crate::{
        ll::{Register, PWRMODE, XTALSTATUS},
        mock::{self, FakeClock},
        Config, OperatingMode, Ready, AX5043,
    };

    fn driver(
        expectations: &[embedded_hal_mock::eh1::spi::Transaction<u8>],
        step: u64,
    ) -> AX5043<SpiMock<u8>, FakeClock, Ready> {
        AX5043::new(SpiMock::new(expectations), FakeClock::new(step))
            .into_state(Ready)
    }

    #[tokio::test]
    async fn mode_write_ignores_wds() {
        // XOEN | REFEN | STANDBY, read back with WDS set
        let expectations = [
            mock::write(PWRMODE::ADDR, 0x65),
            mock::read(PWRMODE::ADDR, 0x75),
        ]
        .concat();

        let mut ax = driver(&expectations, 1);
        ax.set_mode(OperatingMode::Standby).await.unwrap();

        assert_eq!(ax.mode(), OperatingMode::Standby);
        ax.release().0.done();
    }

    #[tokio::test]
    async fn mode_write_mismatch() {
        let expectations = [
            mock::write(PWRMODE::ADDR, 0x6D),
            mock::read(PWRMODE::ADDR, 0x65),
        ]
        .concat();

        let mut ax = driver(&expectations, 1);
        let result = ax.set_mode(OperatingMode::FullTx).await;

        assert!(matches!(
            result,
            Err(crate::Error::Spi(crate::ll::Error::Verify { addr: 0x002, .. }))
        ));
        ax.release().0.done();
    }

    #[tokio::test]
    async fn reset_ends_in_power_down() {
        let _ = env_logger::builder().is_test(true).try_init();

        let expectations = [
            mock::write_checked(PWRMODE::ADDR, 0xE0),
            mock::write_checked(PWRMODE::ADDR, 0x60),
            mock::write_checked(PWRMODE::ADDR, 0x60),
        ]
        .concat();

        let mut ax = driver(&expectations, 0);
        ax.mode = OperatingMode::FullTx;
        ax.reset_chip().await.unwrap();

        assert_eq!(ax.mode(), OperatingMode::PowerDown);
        // two holds of at least 100 us each
        assert!(ax.clock.now >= 200);
        ax.release().0.done();
    }

    #[tokio::test]
    async fn crystal_wait_times_out() {
        // 2 s per clock read: start, then one read per poll
        let expectations = [
            mock::read(XTALSTATUS::ADDR, 0x00),
            mock::read(XTALSTATUS::ADDR, 0x00),
            mock::read(XTALSTATUS::ADDR, 0x00),
        ]
        .concat();

        let mut ax = driver(&expectations, 2_000_000);
        let result = ax.wait_for_xtal().await;

        assert!(matches!(result, Err(crate::Error::RangingTimeout)));
        assert_eq!(ax.clock.yields, 3);
        ax.release().0.done();
    }

    #[tokio::test]
    async fn crystal_wait_succeeds() {
        let expectations = [
            mock::read(XTALSTATUS::ADDR, 0x00),
            mock::read(XTALSTATUS::ADDR, 0x01),
        ]
        .concat();

        let mut ax = driver(&expectations, 10);
        ax.wait_for_xtal().await.unwrap();

        assert_eq!(ax.clock.yields, 1);
        ax.release().0.done();
    }

    #[test]
    fn default_config_enables_oscillator() {
        let config = Config::default();
        assert!(config.crystal_enabled && config.reference_enabled);
    }
}
