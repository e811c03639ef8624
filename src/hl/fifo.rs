use crate::{
    fifo::{flags, header, FifoChunk, FifoCommand, PREAMBLE_BYTE, PREAMBLE_MAX},
    maybe_async_attr, spi_type, Error, AX5043,
};

impl<SPI, CLOCK, State> AX5043<SPI, CLOCK, State>
where
    SPI: spi_type::spi::SpiDevice<u8>,
{
    /// Issue a FIFO command
    #[maybe_async_attr]
    pub(super) async fn fifo_command(&mut self, command: FifoCommand) -> Result<(), Error<SPI>> {
        self.ll.fifocmd().write(|w| w.cmd(command as u8)).await?;

        Ok(())
    }

    /// Push one chunk into the FIFO, one byte per transaction
    #[maybe_async_attr]
    pub(super) async fn write_chunk(&mut self, chunk: FifoChunk<'_>) -> Result<(), Error<SPI>> {
        for byte in chunk.bytes() {
            self.ll.fifodata().write(|w| w.value(byte)).await?;
        }

        Ok(())
    }

    /// Push the preamble as a single DATA chunk
    #[maybe_async_attr]
    pub(super) async fn write_preamble(&mut self) -> Result<(), Error<SPI>> {
        let len = self.config.preamble_length.min(PREAMBLE_MAX) as usize;

        let mut buffer = [PREAMBLE_BYTE; PREAMBLE_MAX as usize + 1];
        buffer[0] = flags::UNENC | flags::PKTSTART;

        let chunk =
            FifoChunk::new(header::DATA, &buffer[..=len]).ok_or(Error::InvalidPreambleLength)?;
        self.write_chunk(chunk).await
    }

    /// Push the packet as a DATA chunk
    ///
    /// The first byte of `buffer` is overwritten with the packet flags.
    #[maybe_async_attr]
    pub(super) async fn write_payload(&mut self, buffer: &mut [u8]) -> Result<(), Error<SPI>> {
        let first = buffer.first_mut().ok_or(Error::InvalidPayloadLength)?;
        *first = flags::UNENC | flags::PKTEND;

        let chunk = FifoChunk::new(header::DATA, buffer).ok_or(Error::InvalidPayloadLength)?;
        self.write_chunk(chunk).await
    }
}
