//! Fixed-point conversions for the frequency synthesizer and modulator
//!
//! The AX5043 expresses carrier frequency, bit rate and deviation as fractions
//! of the reference frequency with 24 fractional bits. These helpers perform
//! the conversions without touching the bus, so invalid values are rejected
//! before anything is written.

use fixed::types::U8F24;

#[cfg(feature = "defmt")]
use defmt::Format;

/// Lowest carrier frequency in MHz
pub const FREQUENCY_MIN: f64 = 27.0;
/// Highest carrier frequency in MHz
pub const FREQUENCY_MAX: f64 = 1050.0;
/// Lowest bit rate in kbps
pub const BIT_RATE_MIN: f64 = 0.1;
/// Highest bit rate in kbps
pub const BIT_RATE_MAX: f64 = 125.0;
/// Highest frequency deviation in kHz
pub const DEVIATION_MAX: f64 = 125.0;
/// Distance from the last ranged frequency, in MHz, beyond which the PLL is
/// ranged again
pub const RANGING_THRESHOLD: f64 = 2.5;

/// A value that can't be represented in the synthesizer registers
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum Error {
    /// Carrier frequency out of range
    InvalidFrequency,
    /// Bit rate or deviation out of range
    InvalidBitRate,
    /// Reference frequency is not a positive number
    InvalidCrystalFrequency,
}

/// Converts a carrier frequency to the FREQA register value
///
/// The ratio to the reference is rounded to 24 fractional bits and the low
/// bit is then forced on, which keeps the synthesizer off the reference
/// harmonics. Forcing the bit costs at most one LSB on top of rounding.
///
/// # Example
///
/// ``` rust
/// use ax5043::synth::frequency_to_raw;
///
/// let raw = frequency_to_raw(434.0, 16.368).unwrap();
/// assert_eq!(raw, 444_850_425);
/// assert!(frequency_to_raw(1051.0, 16.368).is_err());
/// ```
pub fn frequency_to_raw(frequency: f64, crystal: f64) -> Result<u32, Error> {
    if !(FREQUENCY_MIN..=FREQUENCY_MAX).contains(&frequency) {
        return Err(Error::InvalidFrequency);
    }
    let ratio = ratio(frequency, crystal)?;

    let raw = U8F24::checked_from_num(ratio)
        .ok_or(Error::InvalidFrequency)?
        .to_bits()
        | 1;

    Ok(raw)
}

/// Converts a FREQA register value back to MHz
pub fn raw_to_frequency(raw: u32, crystal: f64) -> f64 {
    U8F24::from_bits(raw).to_num::<f64>() * crystal
}

/// Converts a bit rate in kbps to the 24-bit TXRATE register value
pub fn bit_rate_to_raw(bit_rate: f64, crystal: f64) -> Result<u32, Error> {
    if !(BIT_RATE_MIN..=BIT_RATE_MAX).contains(&bit_rate) {
        return Err(Error::InvalidBitRate);
    }

    fraction_to_raw(ratio(bit_rate / 1000.0, crystal)?)
}

/// Converts a deviation in kHz to the 24-bit FSKDEV register value
///
/// The deviation is taken as is; scaling for the modulation happens in the
/// caller, which also range checks the unscaled value.
pub fn deviation_to_raw(deviation: f64, crystal: f64) -> Result<u32, Error> {
    check_deviation(deviation)?;

    fraction_to_raw(ratio(deviation / 1000.0, crystal)?)
}

/// Range check for a nominal frequency deviation in kHz
pub fn check_deviation(deviation: f64) -> Result<(), Error> {
    if (0.0..=DEVIATION_MAX).contains(&deviation) {
        Ok(())
    } else {
        Err(Error::InvalidBitRate)
    }
}

fn ratio(value: f64, crystal: f64) -> Result<f64, Error> {
    if crystal > 0.0 {
        Ok(value / crystal)
    } else {
        Err(Error::InvalidCrystalFrequency)
    }
}

fn fraction_to_raw(ratio: f64) -> Result<u32, Error> {
    let raw = U8F24::checked_from_num(ratio)
        .ok_or(Error::InvalidBitRate)?
        .to_bits();

    if raw > 0x00FF_FFFF {
        return Err(Error::InvalidBitRate);
    }

    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    const XTAL: f64 = 16.368;

    #[test]
    fn frequency_is_odd_and_close() {
        for crystal in [10.0, 16.0, XTAL, 19.2, 26.0] {
            let quantum = crystal * 1e6 / 16_777_216.0;
            let mut frequency = FREQUENCY_MIN;

            while frequency <= FREQUENCY_MAX {
                let raw = frequency_to_raw(frequency, crystal).unwrap();
                let error_hz = (raw_to_frequency(raw, crystal) - frequency).abs() * 1e6;

                assert_eq!(raw & 1, 1, "{} MHz @ {} MHz", frequency, crystal);
                assert!(
                    error_hz <= 1.5 * quantum + 1e-6,
                    "{} MHz off by {} Hz",
                    frequency,
                    error_hz
                );
                if crystal == XTAL {
                    assert!(error_hz <= 1.55);
                }

                frequency += 7.3;
            }
        }
    }

    #[test]
    fn frequency_reference_values() {
        assert_eq!(frequency_to_raw(434.0, XTAL), Ok(444_850_425));
        assert_eq!(frequency_to_raw(437.0, XTAL), Ok(447_925_427));
        assert_eq!(frequency_to_raw(27.0, XTAL), Ok(27_675_027));
        assert_eq!(frequency_to_raw(1050.0, XTAL), Ok(1_076_251_027));
        // rounds up to an even value, the forced bit moves it one further
        assert_eq!(frequency_to_raw(145.825, XTAL), Ok(149_470_769));
    }

    #[test]
    fn frequency_out_of_range() {
        assert_eq!(frequency_to_raw(26.9, XTAL), Err(Error::InvalidFrequency));
        assert_eq!(frequency_to_raw(1050.1, XTAL), Err(Error::InvalidFrequency));
        assert_eq!(frequency_to_raw(f64::NAN, XTAL), Err(Error::InvalidFrequency));
        assert_eq!(
            frequency_to_raw(434.0, 0.0),
            Err(Error::InvalidCrystalFrequency)
        );
        // ratio above 256 does not fit the register
        assert_eq!(frequency_to_raw(1050.0, 4.0), Err(Error::InvalidFrequency));
    }

    #[test]
    fn bit_rate() {
        assert_eq!(bit_rate_to_raw(1.2, XTAL), Ok(1230));
        assert_eq!(bit_rate_to_raw(4.8, XTAL), Ok(4920));
        assert_eq!(bit_rate_to_raw(0.05, XTAL), Err(Error::InvalidBitRate));
        assert_eq!(bit_rate_to_raw(125.5, XTAL), Err(Error::InvalidBitRate));
    }

    #[test]
    fn deviation() {
        assert_eq!(deviation_to_raw(5.0, XTAL), Ok(5125));
        assert_eq!(deviation_to_raw(3.0 * 0.858785, XTAL), Ok(2641));
        assert_eq!(deviation_to_raw(0.0, XTAL), Ok(0));
        assert_eq!(deviation_to_raw(200.0, XTAL), Err(Error::InvalidBitRate));
        assert_eq!(check_deviation(-1.0), Err(Error::InvalidBitRate));
    }
}
