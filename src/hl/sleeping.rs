use crate::{
    maybe_async_attr, spi_type, time::Clock, Error, OperatingMode, Ready, Sleeping, AX5043,
};

impl<SPI, CLOCK> AX5043<SPI, CLOCK, Sleeping>
where
    SPI: spi_type::spi::SpiDevice<u8>,
    CLOCK: Clock + spi_type::delay::DelayNs,
{
    /// Wakes the radio up
    ///
    /// Enters standby and waits for the crystal oscillator. The configuration
    /// survives power-down, so nothing is reprogrammed.
    #[maybe_async_attr]
    pub async fn wake_up(mut self) -> Result<AX5043<SPI, CLOCK, Ready>, Error<SPI>> {
        self.set_mode(OperatingMode::Standby).await?;
        self.wait_for_xtal().await?;

        Ok(self.into_state(Ready))
    }
}

#[cfg(test)]
mod test {
    use crate::{
        hl::ready::test::ready_afsk,
        ll::{Register, PWRMODE, XTALSTATUS},
        mock, OperatingMode,
    };

    #[tokio::test]
    async fn sleep_and_wake() {
        let rest = [
            mock::write_checked(PWRMODE::ADDR, 0x60),
            mock::write_checked(PWRMODE::ADDR, 0x65),
            mock::read(XTALSTATUS::ADDR, 0x00),
            mock::read(XTALSTATUS::ADDR, 0x01),
        ]
        .concat();

        let ax = ready_afsk(rest).await;

        let ax = ax.sleep().await.unwrap();
        assert_eq!(ax.mode(), OperatingMode::PowerDown);

        let ax = ax.wake_up().await.unwrap();
        assert_eq!(ax.mode(), OperatingMode::Standby);
        ax.release().0.done();
    }
}
