use super::Awake;
use crate::{
    ll, maybe_async_attr, spi_type, Config, Error, FifoCommand, OperatingMode, AX5043,
};

/// PINFUNCIRQ value routing the interrupt request to the IRQ pin
const PFIRQ_IRQ: u8 = 0x03;

impl<SPI, CLOCK, State> AX5043<SPI, CLOCK, State> {
    /// The configuration as currently programmed
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The power mode last written to the chip
    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    /// The carrier frequency in MHz
    pub fn frequency(&self) -> f64 {
        self.config.frequency
    }

    /// The bit rate in kbps
    pub fn bit_rate(&self) -> f64 {
        self.config.bit_rate
    }

    /// The reference frequency in MHz
    pub fn crystal_frequency(&self) -> f64 {
        self.config.crystal_frequency
    }

    /// Provides direct access to the register-level API
    ///
    /// Be aware that by using the register-level API, you can invalidate
    /// various assumptions that the high-level API makes about the operation
    /// of the AX5043. Don't use the register-level and high-level APIs in
    /// tandem, unless you know what you're doing.
    pub fn ll(&mut self) -> &mut ll::AX5043<SPI> {
        &mut self.ll
    }

    /// Release the SPI device and the clock
    pub fn release(self) -> (SPI, CLOCK) {
        (self.ll.release(), self.clock)
    }
}

impl<SPI, CLOCK, State> AX5043<SPI, CLOCK, State>
where
    SPI: spi_type::spi::SpiDevice<u8>,
    State: Awake,
{
    /// Read the silicon revision
    #[maybe_async_attr]
    pub async fn silicon_revision(&mut self) -> Result<u8, Error<SPI>> {
        Ok(self.ll.revision().read().await?.silicon_rev())
    }

    /// Route the transmit-done event to the IRQ pin
    ///
    /// Needed for `wait_transmit_irq`. The pin goes high once a committed
    /// packet has been sent, until the radio event register is read.
    #[maybe_async_attr]
    pub async fn enable_tx_interrupts(&mut self) -> Result<(), Error<SPI>> {
        self.ll.radioeventmask0().modify(|_, w| w.done(1)).await?;
        self.ll.irqmask0().modify(|_, w| w.radioctrl(1)).await?;
        self.ll.pinfuncirq().write(|w| w.pfirq(PFIRQ_IRQ)).await?;

        Ok(())
    }

    /// Disables all interrupts
    #[maybe_async_attr]
    pub async fn disable_interrupts(&mut self) -> Result<(), Error<SPI>> {
        self.ll.radioeventmask0().write(|w| w).await?;
        self.ll.irqmask0().write(|w| w).await?;

        Ok(())
    }

    /// Drop everything written to the FIFO since the last commit
    #[maybe_async_attr]
    pub async fn rollback(&mut self) -> Result<(), Error<SPI>> {
        self.fifo_command(FifoCommand::CMD_ROLLBACK).await
    }

    /// Clear the FIFO overrun and underrun flags
    #[maybe_async_attr]
    pub async fn clear_fifo_error(&mut self) -> Result<(), Error<SPI>> {
        self.fifo_command(FifoCommand::CMD_CLEAR_ERROR).await
    }

    /// Not implemented: the driver only covers the transmit path
    pub fn receive(&mut self, _buffer: &mut [u8]) -> Result<usize, Error<SPI>> {
        Err(Error::Unsupported)
    }

    /// Not implemented: the driver only covers the transmit path
    pub fn read_data(&mut self, _buffer: &mut [u8]) -> Result<usize, Error<SPI>> {
        Err(Error::Unsupported)
    }

    /// Not implemented: direct (FIFO-less) transmission
    pub fn transmit_direct(&mut self) -> Result<(), Error<SPI>> {
        Err(Error::Unsupported)
    }

    /// Not implemented: direct (FIFO-less) reception
    pub fn receive_direct(&mut self) -> Result<(), Error<SPI>> {
        Err(Error::Unsupported)
    }

    /// Not implemented: line coding is fixed to NRZ
    pub fn set_encoding(&mut self, _encoding: u8) -> Result<(), Error<SPI>> {
        Err(Error::Unsupported)
    }

    /// Not implemented: no pulse shaping is configured
    pub fn set_data_shaping(&mut self, _shaping: u8) -> Result<(), Error<SPI>> {
        Err(Error::Unsupported)
    }

    /// Not implemented: needs the receiver's RSSI
    pub fn random_byte(&mut self) -> Result<u8, Error<SPI>> {
        Err(Error::Unsupported)
    }
}

#[cfg(test)]
mod test {
    use crate::{
        hl::ready::test::ready_afsk,
        ll::{Register, FIFOSTAT, IRQMASK0, PINFUNCIRQ, RADIOEVENTMASK0, REVISION},
        mock, Error,
    };

    #[tokio::test]
    async fn tx_interrupts() {
        let rest = [
            mock::read(RADIOEVENTMASK0::ADDR, 0x00),
            mock::write(RADIOEVENTMASK0::ADDR, 0x01),
            mock::read(IRQMASK0::ADDR, 0x00),
            mock::write(IRQMASK0::ADDR, 0x40),
            mock::write(PINFUNCIRQ::ADDR, 0x03),
            mock::write(RADIOEVENTMASK0::ADDR, 0x00),
            mock::write(IRQMASK0::ADDR, 0x00),
        ]
        .concat();

        let mut ax = ready_afsk(rest).await;
        ax.enable_tx_interrupts().await.unwrap();
        ax.disable_interrupts().await.unwrap();

        ax.release().0.done();
    }

    #[tokio::test]
    async fn fifo_lifecycle_commands() {
        let rest = [
            mock::write(FIFOSTAT::ADDR, 0x05),
            mock::write(FIFOSTAT::ADDR, 0x02),
        ]
        .concat();

        let mut ax = ready_afsk(rest).await;
        ax.rollback().await.unwrap();
        ax.clear_fifo_error().await.unwrap();

        ax.release().0.done();
    }

    #[tokio::test]
    async fn getters_and_unsupported() {
        let mut ax = ready_afsk(mock::read(REVISION::ADDR, 0x51)).await;

        assert_eq!(ax.silicon_revision().await.unwrap(), 0x51);
        assert_eq!(ax.crystal_frequency(), 16.368);
        assert_eq!(ax.bit_rate(), 1.2);

        let mut buffer = [0; 8];
        assert!(matches!(ax.receive(&mut buffer), Err(Error::Unsupported)));
        assert!(matches!(ax.random_byte(), Err(Error::Unsupported)));
        assert!(matches!(ax.set_encoding(1), Err(Error::Unsupported)));

        ax.release().0.done();
    }
}
