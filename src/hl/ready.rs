use num_traits::Float;

use super::mode::POLL_INTERVAL_US;
use crate::{
    fifo::{FifoCommand, CHUNK_PAYLOAD_MAX, PREAMBLE_MAX},
    maybe_async_attr, spi_type,
    time::{Clock, Duration, Instant},
    Error, Modulation, OperatingMode, PllRangingResult, Ready, Sending, Sleeping, Uninitialized,
    AX5043,
};

/// Fixed part of every transmit budget
const TX_TIMEOUT_BASE: Duration = Duration::from_millis(5_000);

/// Multiple of the time on air added to the transmit budget
const TX_TIMEOUT_AIRTIME_FACTOR: f64 = 5.0;

/// Time budget for sending `len` bytes at `bit_rate` kbps
///
/// Five seconds plus five times the nominal time on air.
///
/// # Example
///
/// ``` rust
/// use ax5043::hl::transmit_timeout;
///
/// assert_eq!(transmit_timeout(3, 1.2).value(), 5_100_000);
/// ```
pub fn transmit_timeout(len: usize, bit_rate: f64) -> Duration {
    let bits = (len * 8) as f64;
    let air_time_us = bits * 1_000_000.0 / (bit_rate * 1000.0);

    TX_TIMEOUT_BASE
        + Duration::from_micros(Float::round(air_time_us * TX_TIMEOUT_AIRTIME_FACTOR) as u64)
}

impl<SPI, CLOCK> AX5043<SPI, CLOCK, Ready>
where
    SPI: spi_type::spi::SpiDevice<u8>,
    CLOCK: Clock + spi_type::delay::DelayNs,
{
    /// Set the carrier frequency in MHz
    ///
    /// The PLL is ranged again if the frequency moved more than 2.5 MHz away
    /// from the last ranged frequency.
    #[maybe_async_attr]
    pub async fn set_frequency(&mut self, frequency: f64) -> Result<(), Error<SPI>> {
        self.commit_frequency(frequency, false).await?;

        Ok(())
    }

    /// Set the bit rate in kbps
    #[maybe_async_attr]
    pub async fn set_bit_rate(&mut self, bit_rate: f64) -> Result<(), Error<SPI>> {
        self.commit_bit_rate(bit_rate).await
    }

    /// Set the frequency deviation in kHz
    ///
    /// Out of range values are reported as `InvalidBitRate`.
    #[maybe_async_attr]
    pub async fn set_frequency_deviation(&mut self, deviation: f64) -> Result<(), Error<SPI>> {
        self.commit_frequency_deviation(deviation).await
    }

    /// Set the output power in dBm, -10 to 16
    #[maybe_async_attr]
    pub async fn set_output_power(&mut self, power: i8) -> Result<(), Error<SPI>> {
        self.commit_output_power(power).await
    }

    /// Switch the modulation, reprogramming the deviation for its scale
    #[maybe_async_attr]
    pub async fn set_modulation(&mut self, modulation: Modulation) -> Result<(), Error<SPI>> {
        self.commit_modulation(modulation).await?;
        self.commit_frequency_deviation(self.config.frequency_deviation)
            .await
    }

    /// Set the number of preamble bytes sent before each packet, at most 32
    pub fn set_preamble_length(&mut self, preamble_length: u8) -> Result<(), Error<SPI>> {
        if preamble_length > PREAMBLE_MAX {
            return Err(Error::InvalidPreambleLength);
        }
        self.config.preamble_length = preamble_length;

        Ok(())
    }

    /// Range the PLL for the current frequency
    ///
    /// Leaves the chip in standby.
    #[maybe_async_attr]
    pub async fn pll_ranging(&mut self) -> Result<PllRangingResult, Error<SPI>> {
        let result = self.range_pll().await?;
        self.ranged_frequency = Some(self.config.frequency);

        Ok(result)
    }

    /// Enter standby
    #[maybe_async_attr]
    pub async fn standby(&mut self) -> Result<(), Error<SPI>> {
        self.set_mode(OperatingMode::Standby).await
    }

    /// Reset the chip
    ///
    /// The chip ends up powered down with its reset configuration, so the
    /// driver needs to be initialized again.
    #[maybe_async_attr]
    pub async fn reset(mut self) -> Result<AX5043<SPI, CLOCK, Uninitialized>, Error<SPI>> {
        self.reset_chip().await?;

        Ok(self.into_state(Uninitialized))
    }

    /// Power the chip down
    ///
    /// Register contents are kept; [`wake_up`] brings the chip back.
    ///
    /// [`wake_up`]: #method.wake_up
    #[maybe_async_attr]
    pub async fn sleep(mut self) -> Result<AX5043<SPI, CLOCK, Sleeping>, Error<SPI>> {
        self.set_mode(OperatingMode::PowerDown).await?;

        Ok(self.into_state(Sleeping))
    }

    /// Send a packet and wait for it to go out
    ///
    /// `buffer` holds the packet with one reserved leading byte: it is
    /// overwritten with the packet flags before framing, so the bytes on air
    /// are `buffer[1..]`. `address` is accepted for API compatibility and not
    /// used by the raw framing.
    ///
    /// The chip is switched back to standby on every path once transmission
    /// was requested, including `TxTimeout` and bus errors.
    #[maybe_async_attr]
    pub async fn transmit(&mut self, buffer: &mut [u8], _address: u8) -> Result<(), Error<SPI>> {
        check_payload(buffer)?;

        let start = self.clock.now();
        let timeout = transmit_timeout(buffer.len(), self.config.bit_rate);

        let result = match self.load_and_commit(buffer, start, timeout).await {
            Ok(()) => self.wait_done(start, timeout).await,
            Err(error) => Err(error),
        };

        match result {
            Ok(()) => self.standby().await,
            Err(error) => Err(self.abort(error).await),
        }
    }

    /// Start sending a packet without waiting for it to finish
    ///
    /// The framing is the same as for [`transmit`]. This method consumes
    /// this instance and returns another one in the `Sending` state, which
    /// can be polled with `wait_transmit` or `wait_transmit_irq`.
    ///
    /// On error the chip is switched back to standby before the error is
    /// returned.
    ///
    /// [`transmit`]: #method.transmit
    #[maybe_async_attr]
    pub async fn start_transmit(
        mut self,
        buffer: &mut [u8],
        _address: u8,
    ) -> Result<AX5043<SPI, CLOCK, Sending>, Error<SPI>> {
        check_payload(buffer)?;

        let started = self.clock.now();
        let timeout = transmit_timeout(buffer.len(), self.config.bit_rate);

        if let Err(error) = self.load_and_commit(buffer, started, timeout).await {
            return Err(self.abort(error).await);
        }

        Ok(self.into_state(Sending {
            started,
            timeout,
            finished: false,
        }))
    }

    /// Everything from clearing the FIFO up to the commit
    #[maybe_async_attr]
    async fn load_and_commit(
        &mut self,
        buffer: &mut [u8],
        start: Instant,
        timeout: Duration,
    ) -> Result<(), Error<SPI>> {
        self.fifo_command(FifoCommand::CMD_CLEAR_FIFO).await?;
        self.set_mode(OperatingMode::FullTx).await?;

        loop {
            if self.ll.powstat().read().await?.ssum() == 1 {
                break;
            }

            self.clock.yield_now();
            if self.expired(start, timeout) {
                log::debug!("power domains not ready for transmit");
                return Err(Error::TxTimeout);
            }
            self.clock.delay_us(POLL_INTERVAL_US).await;
        }

        self.write_preamble().await?;
        self.write_payload(buffer).await?;

        self.wait_for_xtal().await?;

        // the done event is one-shot; drop a stale one before committing
        self.ll.radioeventreq0().read().await?;
        self.fifo_command(FifoCommand::CMD_COMMIT).await
    }

    #[maybe_async_attr]
    async fn wait_done(&mut self, start: Instant, timeout: Duration) -> Result<(), Error<SPI>> {
        loop {
            if self.ll.radioeventreq0().read().await?.done() == 1 {
                return Ok(());
            }

            self.clock.yield_now();
            if self.expired(start, timeout) {
                log::debug!("transmission did not finish within {:?}", timeout);
                return Err(Error::TxTimeout);
            }
            self.clock.delay_us(POLL_INTERVAL_US).await;
        }
    }

    /// Return to standby after a failed transmit, keeping its error
    #[maybe_async_attr]
    async fn abort(&mut self, error: Error<SPI>) -> Error<SPI> {
        if let Err(standby_error) = self.set_mode(OperatingMode::Standby).await {
            log::warn!("standby after failed transmit failed: {:?}", standby_error);
        }

        error
    }
}

fn check_payload<SPI>(buffer: &[u8]) -> Result<(), Error<SPI>>
where
    SPI: spi_type::spi::ErrorType,
{
    if buffer.is_empty() || buffer.len() > CHUNK_PAYLOAD_MAX {
        return Err(Error::InvalidPayloadLength);
    }

    Ok(())
}
