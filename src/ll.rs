//! Low-level interface to the AX5043
//!
//! This module implements a register-level interface to the AX5043. Users of
//! this library should typically not need to use this. Please consider using
//! the [high-level interface] instead.
//!
//! The AX5043 exposes a 12-bit register address space. Registers below `0x70`
//! are reachable with a one-byte command, everything above uses the two-byte
//! long form. Every register is 8 bits wide; multi-byte quantities are spread
//! over consecutive addresses, most significant byte first.
//!
//! [high-level interface]: ../hl/index.html

use core::{fmt, marker::PhantomData};

use crate::{maybe_async_attr, spi_type};

/// Highest address reachable with the short, one-byte command
const SHORT_ADDRESS_LIMIT: u16 = 0x70;

/// Entry point to the AX5043 driver's low-level API
///
/// Please consider using [hl::AX5043] instead.
///
/// [hl::AX5043]: ../hl/struct.AX5043.html
pub struct AX5043<SPI> {
    bus: SPI,
}

impl<SPI> AX5043<SPI> {
    /// Create a new instance of `AX5043`
    ///
    /// Requires the SPI device connected to the AX5043. Chip select is owned
    /// by the `SpiDevice` implementation.
    pub fn new(bus: SPI) -> Self {
        AX5043 { bus }
    }

    /// Release the SPI device
    pub fn release(self) -> SPI {
        self.bus
    }
}

impl<SPI> AX5043<SPI>
where
    SPI: spi_type::spi::SpiDevice<u8>,
{
    /// Read a single register
    #[maybe_async_attr]
    pub async fn read_register(&mut self, addr: u16) -> Result<u8, Error<SPI>> {
        let mut buffer = [0; 3];
        let len = init_header(false, addr, &mut buffer);

        self.bus
            .transfer_in_place(&mut buffer[..=len])
            .await
            .map_err(Error::Transfer)?;

        Ok(buffer[len])
    }

    /// Write a single register without reading it back
    #[maybe_async_attr]
    pub async fn write_register(&mut self, addr: u16, value: u8) -> Result<(), Error<SPI>> {
        let mut buffer = [0; 3];
        let len = init_header(true, addr, &mut buffer);
        buffer[len] = value;

        self.bus
            .write(&buffer[..=len])
            .await
            .map_err(Error::Write)?;

        Ok(())
    }

    /// Write a register, then read it back once
    ///
    /// Only the bits set in `check_mask` are compared. A mismatch is reported
    /// as [`Error::Verify`] carrying the register address.
    #[maybe_async_attr]
    pub async fn write_register_checked(
        &mut self,
        addr: u16,
        value: u8,
        check_mask: u8,
    ) -> Result<(), Error<SPI>> {
        self.write_register(addr, value).await?;

        let actual = self.read_register(addr).await?;
        if actual & check_mask != value & check_mask {
            log::trace!(
                "register {:#05x} verify failed: wrote {:#04x}, read {:#04x}",
                addr,
                value,
                actual
            );
            return Err(Error::Verify {
                addr,
                expected: value,
                actual,
            });
        }

        Ok(())
    }

    /// Replace bits `msb..=lsb` of a register and verify them
    ///
    /// `value` is given in place, i.e. already shifted to `lsb`. When the
    /// field covers the whole register, the read before the write is skipped.
    #[maybe_async_attr]
    pub async fn write_register_masked(
        &mut self,
        addr: u16,
        value: u8,
        msb: u8,
        lsb: u8,
    ) -> Result<(), Error<SPI>> {
        let mask = field_mask(msb, lsb);

        let merged = if mask == 0xFF {
            value
        } else {
            let current = self.read_register(addr).await?;
            (current & !mask) | (value & mask)
        };

        self.write_register_checked(addr, merged, mask).await
    }

    /// Write consecutive registers starting at `first`, each one verified
    ///
    /// Stops at the first failing register; the error names its address.
    #[maybe_async_attr]
    pub async fn write_registers(&mut self, first: u16, values: &[u8]) -> Result<(), Error<SPI>> {
        for (addr, value) in (first..).zip(values.iter().copied()) {
            self.write_register_checked(addr, value, 0xFF).await?;
        }

        Ok(())
    }
}

/// Initializes the SPI message header
///
/// Initializes the SPI message header for accessing a given register, writing
/// the header directly into the provided buffer. Returns the length of the
/// header that was written.
pub fn init_header(write: bool, addr: u16, buffer: &mut [u8]) -> usize {
    let rw = (write as u8) << 7;

    if addr < SHORT_ADDRESS_LIMIT {
        buffer[0] = rw | addr as u8;
        1
    } else {
        buffer[0] = rw | 0x70 | ((addr >> 8) as u8 & 0x0F);
        buffer[1] = addr as u8;
        2
    }
}

/// Mask covering bits `msb..=lsb` of a byte
pub const fn field_mask(msb: u8, lsb: u8) -> u8 {
    let high = ((1u16 << (msb + 1)) - 1) as u8;
    let low = (1u8 << lsb) - 1;
    high & !low
}

/// Implemented for all registers
///
/// This is a mostly internal crate that should not be implemented or used
/// directly by users of this crate. It is exposed through the public API
/// though, so it can't be made private.
///
/// The AX5043 programming manual provides a full register map.
pub trait Register {
    /// The register address
    const ADDR: u16;
}

/// Marker trait for registers that can be read from
///
/// This is a mostly internal crate that should not be implemented or used
/// directly by users of this crate. It is exposed through the public API
/// though, so it can't be made private.
pub trait Readable {
    /// The type that is used to read from the register
    type Read;

    /// Wrap the raw register value
    fn read(bits: u8) -> Self::Read;
}

/// Marker trait for registers that can be written to
///
/// This is a mostly internal crate that should not be implemented or used
/// directly by users of this crate. It is exposed through the public API
/// though, so it can't be made private.
pub trait Writable {
    /// The type that is used to write to the register
    type Write;

    /// Create a writer starting from the given raw value
    fn write(bits: u8) -> Self::Write;

    /// Return the raw value held by a writer
    fn bits(w: &Self::Write) -> u8;
}

/// Generates register implementations
macro_rules! impl_register {
    (
        $(
            $addr:expr,
            $rw:tt,
            $name:ident($name_lower:ident) {
            #[$doc:meta]
            $(
                $field:ident,
                $first_bit:expr,
                $last_bit:expr;
                #[$field_doc:meta]
            )*
            }
        )*
    ) => {
        $(
            #[$doc]
            #[allow(non_camel_case_types)]
            pub struct $name;

            impl Register for $name {
                const ADDR: u16 = $addr;
            }

            #[$doc]
            pub mod $name_lower {
                use core::fmt;

                /// Used to read from the register
                pub struct R(pub(crate) u8);

                impl R {
                    /// Raw register value
                    #[inline(always)]
                    pub fn raw(&self) -> u8 {
                        self.0
                    }

                    $(
                        #[$field_doc]
                        #[inline(always)]
                        pub fn $field(&self) -> u8 {
                            const MASK: u8 = super::field_mask($last_bit, $first_bit);
                            (self.0 & MASK) >> $first_bit
                        }
                    )*
                }

                impl fmt::Debug for R {
                    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                        write!(f, "0x{:02x}", self.0)
                    }
                }

                #[cfg(feature = "defmt")]
                impl defmt::Format for R {
                    fn format(&self, f: defmt::Formatter) {
                        defmt::write!(f, "0x{=u8:02x}", self.0)
                    }
                }

                /// Used to write to the register
                pub struct W(pub(crate) u8);

                impl W {
                    /// Overwrite the whole register value
                    #[inline(always)]
                    pub fn raw(&mut self, value: u8) -> &mut Self {
                        self.0 = value;
                        self
                    }

                    $(
                        #[$field_doc]
                        #[inline(always)]
                        pub fn $field(&mut self, value: u8) -> &mut Self {
                            const MASK: u8 = super::field_mask($last_bit, $first_bit);
                            self.0 = (self.0 & !MASK) | ((value << $first_bit) & MASK);
                            self
                        }
                    )*
                }
            }

            impl_rw!($rw, $name, $name_lower);
        )*


        impl<SPI> AX5043<SPI> {
            $(
                #[$doc]
                pub fn $name_lower(&mut self) -> RegAccessor<$name, SPI> {
                    RegAccessor(self, PhantomData)
                }
            )*
        }
    }
}

// Helper macro, used internally by `impl_register!`
macro_rules! impl_rw {
    (RO, $name:ident, $name_lower:ident) => {
        impl_rw!(@R, $name, $name_lower);
    };
    (WO, $name:ident, $name_lower:ident) => {
        impl_rw!(@W, $name, $name_lower);
    };
    (RW, $name:ident, $name_lower:ident) => {
        impl_rw!(@R, $name, $name_lower);
        impl_rw!(@W, $name, $name_lower);
    };

    (@R, $name:ident, $name_lower:ident) => {
        impl Readable for $name {
            type Read = $name_lower::R;

            fn read(bits: u8) -> Self::Read {
                $name_lower::R(bits)
            }
        }
    };
    (@W, $name:ident, $name_lower:ident) => {
        impl Writable for $name {
            type Write = $name_lower::W;

            fn write(bits: u8) -> Self::Write {
                $name_lower::W(bits)
            }

            fn bits(w: &Self::Write) -> u8 {
                w.0
            }
        }
    };
}

// registers (AX5043 programming manual, register bank description)
impl_register! {
    0x000, RO, REVISION(revision) {
    /// Silicon revision
        silicon_rev, 0, 7;
        /// Silicon revision, 0x51 on production parts
    }
    0x001, RW, SCRATCH(scratch) {
    /// Scratch register
        value, 0, 7;
        /// Free for any use, resets to 0xC5
    }
    0x002, RW, PWRMODE(pwrmode) {
    /// Power mode
        pwrmode, 0, 3;
        /// Operating mode
        wds,     4, 4;
        /// Wakeup from deep sleep (read-only)
        xoen,    5, 5;
        /// Crystal oscillator enable
        refen,   6, 6;
        /// Reference circuitry enable
        rst,     7, 7;
        /// Chip reset
    }
    0x003, RO, POWSTAT(powstat) {
    /// Power management status
        svio,     0, 0;
        /// IO voltage large enough
        sbevmodem,1, 1;
        /// Modem domain brownout
        sbevana,  2, 2;
        /// Analog domain brownout
        svmodem,  3, 3;
        /// Modem domain voltage regulator ready
        svana,    4, 4;
        /// Analog domain voltage regulator ready
        svref,    5, 5;
        /// Reference voltage regulator ready
        sref,     6, 6;
        /// Reference ready
        ssum,     7, 7;
        /// Summary ready status
    }
    0x007, RW, IRQMASK0(irqmask0) {
    /// IRQ mask, low byte
        fifonotempty, 0, 0;
        /// FIFO not empty
        fifonotfull,  1, 1;
        /// FIFO not full
        fifothrcnt,   2, 2;
        /// FIFO count above threshold
        fifothrfree,  3, 3;
        /// FIFO free space above threshold
        fifoerror,    4, 4;
        /// FIFO error
        pllunlock,    5, 5;
        /// PLL lost lock
        radioctrl,    6, 6;
        /// Radio controller event
        power,        7, 7;
        /// Power event
    }
    0x009, RW, RADIOEVENTMASK0(radioeventmask0) {
    /// Radio event mask, low byte
        done,       0, 0;
        /// Transmit or receive done
        settled,    1, 1;
        /// PLL settled
        radiostatechg, 2, 2;
        /// Radio state changed
        rxparamsetchg, 3, 3;
        /// Receive parameter set changed
        frameclk,   4, 4;
        /// Frame clock
    }
    0x00F, RO, RADIOEVENTREQ0(radioeventreq0) {
    /// Radio event request, low byte (cleared on read)
        done,       0, 0;
        /// Transmit or receive done
        settled,    1, 1;
        /// PLL settled
        radiostatechg, 2, 2;
        /// Radio state changed
        rxparamsetchg, 3, 3;
        /// Receive parameter set changed
        frameclk,   4, 4;
        /// Frame clock
    }
    0x010, RW, MODULATION(modulation) {
    /// Modulation
        modulation, 0, 3;
        /// Modulation scheme
        rx_halfspeed, 4, 4;
        /// Receiver half speed
    }
    0x01D, RO, XTALSTATUS(xtalstatus) {
    /// Crystal oscillator status
        xtalrun, 0, 0;
        /// Crystal oscillator running
    }
    0x024, RW, PINFUNCIRQ(pinfuncirq) {
    /// IRQ pin function
        pfirq, 0, 2;
        /// Pin function, 3 = interrupt request
        pi,    6, 6;
        /// Pull-up enable
        inv,   7, 7;
        /// Invert output
    }
    0x028, RO, FIFOSTAT(fifostat) {
    /// FIFO status
        empty,   0, 0;
        /// FIFO empty
        full,    1, 1;
        /// FIFO full
        under,   2, 2;
        /// FIFO underrun
        over,    3, 3;
        /// FIFO overrun
        cnt_thr, 4, 4;
        /// FIFO count above threshold
        free_thr,5, 5;
        /// FIFO free space above threshold
        auto_commit, 7, 7;
        /// Automatic commit enabled
    }
    0x028, WO, FIFOCMD(fifocmd) {
    /// FIFO command (shares its address with FIFOSTAT)
        cmd, 0, 5;
        /// FIFO command
        auto_commit, 7, 7;
        /// Automatic commit
    }
    0x029, RW, FIFODATA(fifodata) {
    /// FIFO data port
        value, 0, 7;
        /// One byte pushed into or popped from the FIFO
    }
    0x030, RW, PLLLOOP(pllloop) {
    /// PLL loop filter configuration
        filter, 0, 1;
        /// External loop filter selection
        filten, 2, 2;
        /// Filter pin enable
        direct, 3, 3;
        /// Bypass external filter
        freqsel, 7, 7;
        /// FREQA or FREQB select
    }
    0x031, RW, PLLCPI(pllcpi) {
    /// PLL charge pump current
        value, 0, 7;
        /// Charge pump current in multiples of 8.5 uA
    }
    0x032, RW, PLLVCODIV(pllvcodiv) {
    /// PLL divider settings
        refdiv,  0, 1;
        /// Reference divider
        rfdiv,   2, 2;
        /// RF divide-by-2
        vcosel,  4, 4;
        /// VCO selection
        vco2int, 5, 5;
        /// VCO2 internal
    }
    0x033, RW, PLLRANGINGA(pllranginga) {
    /// PLL autoranging, synthesizer A
        vcor,       0, 3;
        /// VCO range
        rngstart,   4, 4;
        /// Start ranging; cleared by the chip when done
        rngerr,     5, 5;
        /// Ranging error
        plllock,    6, 6;
        /// PLL lock
        stickylock, 7, 7;
        /// Sticky PLL lock
    }
    0x034, RW, FREQA3(freqa3) {
    /// Synthesizer A frequency, bits 31..24
        value, 0, 7;
        /// Frequency word byte
    }
    0x035, RW, FREQA2(freqa2) {
    /// Synthesizer A frequency, bits 23..16
        value, 0, 7;
        /// Frequency word byte
    }
    0x036, RW, FREQA1(freqa1) {
    /// Synthesizer A frequency, bits 15..8
        value, 0, 7;
        /// Frequency word byte
    }
    0x037, RW, FREQA0(freqa0) {
    /// Synthesizer A frequency, bits 7..0
        value, 0, 7;
        /// Frequency word byte
    }
    0x110, RW, AFSKSPACE1(afskspace1) {
    /// AFSK space frequency, high byte
        value, 0, 7;
        /// Space frequency byte
    }
    0x111, RW, AFSKSPACE0(afskspace0) {
    /// AFSK space frequency, low byte
        value, 0, 7;
        /// Space frequency byte
    }
    0x112, RW, AFSKMARK1(afskmark1) {
    /// AFSK mark frequency, high byte
        value, 0, 7;
        /// Mark frequency byte
    }
    0x113, RW, AFSKMARK0(afskmark0) {
    /// AFSK mark frequency, low byte
        value, 0, 7;
        /// Mark frequency byte
    }
    0x161, RW, FSKDEV2(fskdev2) {
    /// FSK deviation, bits 23..16
        value, 0, 7;
        /// Deviation word byte
    }
    0x162, RW, FSKDEV1(fskdev1) {
    /// FSK deviation, bits 15..8
        value, 0, 7;
        /// Deviation word byte
    }
    0x163, RW, FSKDEV0(fskdev0) {
    /// FSK deviation, bits 7..0
        value, 0, 7;
        /// Deviation word byte
    }
    0x165, RW, TXRATE2(txrate2) {
    /// Transmit bit rate, bits 23..16
        value, 0, 7;
        /// Bit rate word byte
    }
    0x166, RW, TXRATE1(txrate1) {
    /// Transmit bit rate, bits 15..8
        value, 0, 7;
        /// Bit rate word byte
    }
    0x167, RW, TXRATE0(txrate0) {
    /// Transmit bit rate, bits 7..0
        value, 0, 7;
        /// Bit rate word byte
    }
    0x168, RW, TXPWRCOEFFA1(txpwrcoeffa1) {
    /// Transmit predistortion coefficient A, high byte
        value, 0, 7;
        /// Coefficient byte
    }
    0x169, RW, TXPWRCOEFFA0(txpwrcoeffa0) {
    /// Transmit predistortion coefficient A, low byte
        value, 0, 7;
        /// Coefficient byte
    }
    0x16A, RW, TXPWRCOEFFB1(txpwrcoeffb1) {
    /// Transmit power coefficient B, high byte
        value, 0, 7;
        /// Coefficient byte (bits 11..8 used)
    }
    0x16B, RW, TXPWRCOEFFB0(txpwrcoeffb0) {
    /// Transmit power coefficient B, low byte
        value, 0, 7;
        /// Coefficient byte
    }
    0xF00, RW, PERFTUNE0(perftune0) {
    /// Performance tuning register 0xF00
        value, 0, 7;
        /// Set to 0x0F
    }
    0xF0D, RW, REFTUNE(reftune) {
    /// Performance tuning register 0xF0D
        value, 0, 7;
        /// Set to 0x03
    }
    0xF10, RW, XTALOSC(xtalosc) {
    /// Crystal oscillator control
        value, 0, 7;
        /// 0x04 for a TCXO, 0x03 or 0x0D for a crystal
    }
    0xF11, RW, XTALAMPL(xtalampl) {
    /// Crystal oscillator amplitude control
        value, 0, 7;
        /// 0x00 for a TCXO, 0x07 for a crystal
    }
    0xF1C, RW, PERFTUNE28(perftune28) {
    /// Performance tuning register 0xF1C
        value, 0, 7;
        /// Set to 0x07
    }
    0xF34, RW, PERFTUNE52(perftune52) {
    /// Performance tuning register 0xF34
        value, 0, 7;
        /// 0x08 without, 0x28 with RF divide-by-2
    }
    0xF35, RW, PERFTUNE53(perftune53) {
    /// Performance tuning register 0xF35
        value, 0, 7;
        /// 0x10 below 24.8 MHz reference, 0x11 above
    }
    0xF44, RW, PERFTUNE68(perftune68) {
    /// Performance tuning register 0xF44
        value, 0, 7;
        /// Set to 0x24
    }
}

/// Provides access to a register
///
/// You can get an instance for a given register using one of the methods on
/// [`AX5043`].
pub struct RegAccessor<'s, R, SPI>(&'s mut AX5043<SPI>, PhantomData<R>);

impl<'s, R, SPI> RegAccessor<'s, R, SPI>
where
    SPI: spi_type::spi::SpiDevice<u8>,
{
    /// Read from the register
    #[maybe_async_attr]
    pub async fn read(&mut self) -> Result<R::Read, Error<SPI>>
    where
        R: Register + Readable,
    {
        let bits = self.0.read_register(R::ADDR).await?;
        Ok(R::read(bits))
    }

    /// Write to the register, starting from all bits cleared
    #[maybe_async_attr]
    pub async fn write<F>(&mut self, f: F) -> Result<(), Error<SPI>>
    where
        R: Register + Writable,
        F: FnOnce(&mut R::Write) -> &mut R::Write,
    {
        let mut w = R::write(0);
        f(&mut w);

        self.0.write_register(R::ADDR, R::bits(&w)).await
    }

    /// Write to the register and verify the bits in `check_mask`
    #[maybe_async_attr]
    pub async fn write_checked<F>(&mut self, check_mask: u8, f: F) -> Result<(), Error<SPI>>
    where
        R: Register + Writable,
        F: FnOnce(&mut R::Write) -> &mut R::Write,
    {
        let mut w = R::write(0);
        f(&mut w);

        self.0
            .write_register_checked(R::ADDR, R::bits(&w), check_mask)
            .await
    }

    /// Modify the register
    #[maybe_async_attr]
    pub async fn modify<F>(&mut self, f: F) -> Result<(), Error<SPI>>
    where
        R: Register + Readable + Writable,
        F: for<'r> FnOnce(&mut R::Read, &'r mut R::Write) -> &'r mut R::Write,
    {
        let bits = self.0.read_register(R::ADDR).await?;

        let mut r = R::read(bits);
        let mut w = R::write(bits);
        f(&mut r, &mut w);

        self.0.write_register(R::ADDR, R::bits(&w)).await
    }
}

/// An SPI error that can occur when communicating with the AX5043
pub enum Error<SPI>
where
    SPI: spi_type::spi::ErrorType,
{
    /// SPI error occured during a transfer transaction
    Transfer(<SPI as spi_type::spi::ErrorType>::Error),

    /// SPI error occured during a write transaction
    Write(<SPI as spi_type::spi::ErrorType>::Error),

    /// A register did not read back what was written to it
    Verify {
        /// Address of the failing register
        addr: u16,
        /// Value that was written
        expected: u8,
        /// Value that was read back
        actual: u8,
    },
}

// We can't derive this implementation, as the compiler will complain that the
// associated error type doesn't implement `Debug`.
impl<SPI> fmt::Debug for Error<SPI>
where
    SPI: spi_type::spi::ErrorType,
    <SPI as spi_type::spi::ErrorType>::Error: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Transfer(error) => write!(f, "Transfer({:?})", error),
            Error::Write(error) => write!(f, "Write({:?})", error),
            Error::Verify {
                addr,
                expected,
                actual,
            } => write!(
                f,
                "Verify {{ addr: {:#05x}, expected: {:#04x}, actual: {:#04x} }}",
                addr, expected, actual
            ),
        }
    }
}

#[cfg(feature = "defmt")]
impl<SPI> defmt::Format for Error<SPI>
where
    SPI: spi_type::spi::ErrorType,
    <SPI as spi_type::spi::ErrorType>::Error: defmt::Format,
{
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Transfer(error) => defmt::write!(f, "Transfer({:?})", error),
            Error::Write(error) => defmt::write!(f, "Write({:?})", error),
            Error::Verify {
                addr,
                expected,
                actual,
            } => defmt::write!(
                f,
                "Verify {{ addr: {=u16:#x}, expected: {=u8:#x}, actual: {=u8:#x} }}",
                addr,
                expected,
                actual
            ),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    #[test]
    fn header_short_and_long() {
        let mut buffer = [0; 3];

        assert_eq!(init_header(false, 0x002, &mut buffer), 1);
        assert_eq!(buffer[0], 0x02);

        assert_eq!(init_header(true, 0x029, &mut buffer), 1);
        assert_eq!(buffer[0], 0xA9);

        assert_eq!(init_header(false, 0x165, &mut buffer), 2);
        assert_eq!(&buffer[..2], &[0x71, 0x65]);

        assert_eq!(init_header(true, 0xF35, &mut buffer), 2);
        assert_eq!(&buffer[..2], &[0xFF, 0x35]);
    }

    #[test]
    fn masks() {
        assert_eq!(field_mask(7, 0), 0xFF);
        assert_eq!(field_mask(3, 0), 0x0F);
        assert_eq!(field_mask(6, 6), 0x40);
        assert_eq!(field_mask(7, 4), 0xF0);
    }

    #[test]
    fn register_fields() {
        let r = <PLLRANGINGA as Readable>::read(0x68);
        assert_eq!(r.vcor(), 0x08);
        assert_eq!(r.rngstart(), 0);
        assert_eq!(r.rngerr(), 1);
        assert_eq!(r.plllock(), 1);

        let mut w = <PWRMODE as Writable>::write(0);
        w.pwrmode(0x0D).xoen(1).refen(1);
        assert_eq!(<PWRMODE as Writable>::bits(&w), 0x6D);
    }

    #[tokio::test]
    async fn read_long_address() {
        let expectations = [
            SpiTransaction::transaction_start(),
            SpiTransaction::transfer_in_place(vec![0x71, 0x65, 0x00], vec![0x00, 0x00, 0x13]),
            SpiTransaction::transaction_end(),
        ];

        let mut ll = AX5043::new(SpiMock::new(&expectations));
        assert_eq!(ll.read_register(0x165).await.unwrap(), 0x13);

        ll.release().done();
    }

    #[tokio::test]
    async fn typed_read() {
        let expectations = [
            SpiTransaction::transaction_start(),
            SpiTransaction::transfer_in_place(vec![0x00, 0x00], vec![0x00, 0x51]),
            SpiTransaction::transaction_end(),
        ];

        let mut ll = AX5043::new(SpiMock::new(&expectations));
        assert_eq!(ll.revision().read().await.unwrap().silicon_rev(), 0x51);

        ll.release().done();
    }

    #[tokio::test]
    async fn checked_write_mismatch_names_register() {
        let expectations = [
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![0xF1, 0x66, 0x0A]),
            SpiTransaction::transaction_end(),
            SpiTransaction::transaction_start(),
            SpiTransaction::transfer_in_place(vec![0x71, 0x66, 0x00], vec![0x00, 0x00, 0x0B]),
            SpiTransaction::transaction_end(),
        ];

        let mut ll = AX5043::new(SpiMock::new(&expectations));
        let result = ll.write_registers(0x166, &[0x0A, 0x0B]).await;

        match result {
            Err(Error::Verify {
                addr,
                expected,
                actual,
            }) => {
                assert_eq!(addr, 0x166);
                assert_eq!(expected, 0x0A);
                assert_eq!(actual, 0x0B);
            }
            other => panic!("unexpected result: {:?}", other),
        }

        ll.release().done();
    }

    #[tokio::test]
    async fn masked_write_keeps_other_bits() {
        let expectations = [
            SpiTransaction::transaction_start(),
            SpiTransaction::transfer_in_place(vec![0x33, 0x00], vec![0x00, 0xC8]),
            SpiTransaction::transaction_end(),
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![0xB3, 0xD8]),
            SpiTransaction::transaction_end(),
            SpiTransaction::transaction_start(),
            SpiTransaction::transfer_in_place(vec![0x33, 0x00], vec![0x00, 0xD8]),
            SpiTransaction::transaction_end(),
        ];

        let mut ll = AX5043::new(SpiMock::new(&expectations));
        ll.write_register_masked(0x033, 0x10, 4, 4).await.unwrap();

        ll.release().done();
    }
}
