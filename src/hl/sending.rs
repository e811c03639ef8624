use embedded_hal::digital::InputPin;

use crate::{
    maybe_async_attr, spi_type, time::Clock, Error, OperatingMode, Ready, Sending, AX5043,
};

impl<SPI, CLOCK> AX5043<SPI, CLOCK, Sending>
where
    SPI: spi_type::spi::SpiDevice<u8>,
    CLOCK: Clock + spi_type::delay::DelayNs,
{
    /// Wait for the transmission to finish
    ///
    /// This method returns an `nb::Result` to indicate whether the transmission
    /// has finished, or whether it is still ongoing. You can use this to busily
    /// wait for the transmission to finish, for example using `nb`'s `block!`
    /// macro, or you can use it in tandem with [`AX5043::enable_tx_interrupts`]
    /// and the AX5043 IRQ output through [`wait_transmit_irq`].
    ///
    /// Once the time budget of the packet is used up, `TxTimeout` is returned.
    /// Call [`finish_transmit`] afterwards in either case.
    ///
    /// [`AX5043::enable_tx_interrupts`]: struct.AX5043.html#method.enable_tx_interrupts
    /// [`wait_transmit_irq`]: #method.wait_transmit_irq
    /// [`finish_transmit`]: #method.finish_transmit
    #[maybe_async_attr]
    pub async fn wait_transmit(&mut self) -> nb::Result<(), Error<SPI>> {
        if self.state.is_finished() {
            return Ok(());
        }

        let events = self
            .ll
            .radioeventreq0()
            .read()
            .await
            .map_err(|error| nb::Error::Other(Error::Spi(error)))?;

        if events.done() == 1 {
            self.state.mark_finished();
            return Ok(());
        }

        self.poll_deadline()
    }

    /// Wait for the transmission to finish, watching the IRQ line
    ///
    /// The IRQ pin is only read; the radio event register is read once the
    /// line is high, which also clears it. Requires the interrupts to be
    /// enabled with [`AX5043::enable_tx_interrupts`].
    ///
    /// [`AX5043::enable_tx_interrupts`]: struct.AX5043.html#method.enable_tx_interrupts
    #[maybe_async_attr]
    pub async fn wait_transmit_irq<IRQ>(&mut self, irq: &mut IRQ) -> nb::Result<(), Error<SPI>>
    where
        IRQ: InputPin,
    {
        if self.state.is_finished() {
            return Ok(());
        }

        if irq
            .is_high()
            .map_err(|_| nb::Error::Other(Error::IrqPin))?
        {
            self.ll
                .radioeventreq0()
                .read()
                .await
                .map_err(|error| nb::Error::Other(Error::Spi(error)))?;

            self.state.mark_finished();
            return Ok(());
        }

        self.poll_deadline()
    }

    fn poll_deadline(&mut self) -> nb::Result<(), Error<SPI>> {
        self.clock.yield_now();

        let (started, timeout) = (self.state.started, self.state.timeout);
        if self.expired(started, timeout) {
            log::debug!("transmission did not finish within {:?}", timeout);
            return Err(nb::Error::Other(Error::TxTimeout));
        }

        Err(nb::Error::WouldBlock)
    }

    #[allow(clippy::type_complexity)]
    /// Finishes sending and returns to the `Ready` state
    ///
    /// The chip is put into standby whether the transmission completed or not;
    /// an unfinished transmission is aborted.
    #[maybe_async_attr]
    pub async fn finish_transmit(
        mut self,
    ) -> Result<AX5043<SPI, CLOCK, Ready>, (Self, Error<SPI>)> {
        if !self.state.is_finished() {
            log::debug!("aborting unfinished transmission");
        }

        match self.set_mode(OperatingMode::Standby).await {
            Ok(()) => Ok(self.into_state(Ready)),
            Err(error) => Err((self, error)),
        }
    }
}

#[cfg(test)]
mod test {
    use embedded_hal_mock::eh1::pin::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    use crate::{
        block,
        hl::ready::test::{load, ready_afsk},
        ll::{Register, PWRMODE, RADIOEVENTREQ0},
        mock, Error, OperatingMode,
    };

    #[tokio::test]
    async fn split_transmit() {
        let rest = [
            load(&[1, 2, 3]),
            mock::read(RADIOEVENTREQ0::ADDR, 0x00),
            mock::read(RADIOEVENTREQ0::ADDR, 0x01),
            mock::write_checked(PWRMODE::ADDR, 0x65),
        ]
        .concat();

        let ax = ready_afsk(rest).await;
        let mut buffer = [1, 2, 3];
        let mut ax = ax.start_transmit(&mut buffer, 0).await.unwrap();

        assert!(matches!(ax.wait_transmit().await, Err(nb::Error::WouldBlock)));
        assert!(ax.wait_transmit().await.is_ok());
        // finished transmissions don't touch the bus again
        assert!(ax.wait_transmit().await.is_ok());

        let ax = ax.finish_transmit().await.unwrap();
        assert_eq!(ax.mode(), OperatingMode::Standby);
        ax.release().0.done();
    }

    #[tokio::test]
    async fn split_transmit_timeout() {
        let rest = [
            load(&[1, 2, 3]),
            (0..3)
                .flat_map(|_| mock::read(RADIOEVENTREQ0::ADDR, 0x00))
                .collect(),
            mock::write_checked(PWRMODE::ADDR, 0x65),
        ]
        .concat();

        let ax = ready_afsk(rest).await;
        let mut buffer = [1, 2, 3];
        let mut ax = ax.start_transmit(&mut buffer, 0).await.unwrap();
        ax.clock.step = 2_000_000;

        let mut result = Ok(());
        for _ in 0..3 {
            result = match ax.wait_transmit().await {
                Err(nb::Error::WouldBlock) => continue,
                Err(nb::Error::Other(error)) => Err(error),
                Ok(()) => Ok(()),
            };
        }

        assert!(matches!(result, Err(Error::TxTimeout)));
        let ax = ax.finish_transmit().await.unwrap();
        ax.release().0.done();
    }

    #[tokio::test]
    async fn irq_transmit() {
        let rest = [
            load(&[1, 2]),
            mock::read(RADIOEVENTREQ0::ADDR, 0x01),
            mock::write_checked(PWRMODE::ADDR, 0x65),
        ]
        .concat();

        let mut irq = PinMock::new(&[
            PinTransaction::get(PinState::Low),
            PinTransaction::get(PinState::High),
        ]);

        let ax = ready_afsk(rest).await;
        let mut buffer = [1, 2];
        let mut ax = ax.start_transmit(&mut buffer, 0).await.unwrap();

        assert!(matches!(
            ax.wait_transmit_irq(&mut irq).await,
            Err(nb::Error::WouldBlock)
        ));
        assert!(ax.wait_transmit_irq(&mut irq).await.is_ok());

        let ax = ax.finish_transmit().await.unwrap();
        ax.release().0.done();
        irq.done();
    }

    #[test]
    fn block_is_exported() {
        let mut polls = 0;
        let result: Result<(), ()> = block!({
            polls += 1;
            if polls < 3 {
                Err(nb::Error::WouldBlock)
            } else {
                Ok(())
            }
        });

        assert!(result.is_ok());
        assert_eq!(polls, 3);
    }
}
