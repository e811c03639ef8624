use core::fmt;
use core::fmt::{Display, Formatter};

use embedded_hal::spi;

#[cfg(feature = "defmt")]
use defmt::Format;

use crate::{ll, synth};

/// An error that can occur when configuring the AX5043 or sending data
pub enum Error<SPI>
where
    SPI: spi::ErrorType,
{
    /// Error occured while using SPI bus, or a register didn't read back
    /// what was written to it
    Spi(ll::Error<SPI>),

    /// The revision register never showed the expected silicon revision
    ChipNotFound,

    /// Carrier frequency outside of 27 to 1050 MHz
    InvalidFrequency,

    /// Bit rate or frequency deviation out of range
    InvalidBitRate,

    /// Preamble longer than 32 bytes
    InvalidPreambleLength,

    /// Output power outside of -10 to 16 dBm
    InvalidOutputPower,

    /// Payload empty or longer than 255 bytes
    InvalidPayloadLength,

    /// The configuration was not valid, e.g. a non-positive crystal frequency
    InvalidConfiguration,

    /// The crystal didn't start, or PLL ranging didn't finish or failed
    RangingTimeout,

    /// The transmission didn't complete in time
    ///
    /// The radio was put back into standby before this error was returned.
    TxTimeout,

    /// The IRQ pin could not be read
    IrqPin,

    /// The operation is not implemented by this driver
    Unsupported,
}

impl<SPI> From<ll::Error<SPI>> for Error<SPI>
where
    SPI: spi::ErrorType,
{
    fn from(error: ll::Error<SPI>) -> Self {
        Error::Spi(error)
    }
}

impl<SPI> From<synth::Error> for Error<SPI>
where
    SPI: spi::ErrorType,
{
    fn from(error: synth::Error) -> Self {
        match error {
            synth::Error::InvalidFrequency => Error::InvalidFrequency,
            synth::Error::InvalidBitRate => Error::InvalidBitRate,
            synth::Error::InvalidCrystalFrequency => Error::InvalidConfiguration,
        }
    }
}

impl<SPI> Display for Error<SPI>
where
    SPI: spi::ErrorType,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl<SPI> std::error::Error for Error<SPI> where SPI: spi::ErrorType {}

// We can't derive this implementation, as `Debug` is only implemented
// conditionally for `ll::Debug`.
impl<SPI> fmt::Debug for Error<SPI>
where
    SPI: spi::ErrorType,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Spi(error) => write!(f, "Spi({:?})", error),
            Error::ChipNotFound => write!(f, "ChipNotFound"),
            Error::InvalidFrequency => write!(f, "InvalidFrequency"),
            Error::InvalidBitRate => write!(f, "InvalidBitRate"),
            Error::InvalidPreambleLength => write!(f, "InvalidPreambleLength"),
            Error::InvalidOutputPower => write!(f, "InvalidOutputPower"),
            Error::InvalidPayloadLength => write!(f, "InvalidPayloadLength"),
            Error::InvalidConfiguration => write!(f, "InvalidConfiguration"),
            Error::RangingTimeout => write!(f, "RangingTimeout"),
            Error::TxTimeout => write!(f, "TxTimeout"),
            Error::IrqPin => write!(f, "IrqPin"),
            Error::Unsupported => write!(f, "Unsupported"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<SPI> Format for Error<SPI>
where
    SPI: spi::ErrorType,
    SPI::Error: defmt::Format,
{
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Spi(error) => defmt::write!(f, "Spi({:?})", error),
            Error::ChipNotFound => defmt::write!(f, "ChipNotFound"),
            Error::InvalidFrequency => defmt::write!(f, "InvalidFrequency"),
            Error::InvalidBitRate => defmt::write!(f, "InvalidBitRate"),
            Error::InvalidPreambleLength => defmt::write!(f, "InvalidPreambleLength"),
            Error::InvalidOutputPower => defmt::write!(f, "InvalidOutputPower"),
            Error::InvalidPayloadLength => defmt::write!(f, "InvalidPayloadLength"),
            Error::InvalidConfiguration => defmt::write!(f, "InvalidConfiguration"),
            Error::RangingTimeout => defmt::write!(f, "RangingTimeout"),
            Error::TxTimeout => defmt::write!(f, "TxTimeout"),
            Error::IrqPin => defmt::write!(f, "IrqPin"),
            Error::Unsupported => defmt::write!(f, "Unsupported"),
        }
    }
}
