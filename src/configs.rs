//! Configuration structs for the synthesizer, modulator and power amplifier
//!
//! A [`Config`] is handed to [`AX5043::init`] and describes everything the
//! driver programs into the chip. Individual values can be changed later
//! through the setters on a `Ready` driver.
//!
//! [`AX5043::init`]: ../hl/struct.AX5043.html#method.init

#[cfg(feature = "defmt")]
use defmt::Format;

/// Crystal frequency of the reference design, in MHz
pub const DEFAULT_CRYSTAL_FREQUENCY: f64 = 16.368;

/// Driver configuration
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Carrier frequency in MHz, 27.0 to 1050.0
    pub frequency: f64,
    /// Bit rate in kbps, 0.1 to 125.0
    pub bit_rate: f64,
    /// Frequency deviation in kHz, 0.0 to 125.0
    ///
    /// This is the nominal deviation. The driver applies the modulation's
    /// scale factor before programming it.
    pub frequency_deviation: f64,
    /// Receiver bandwidth in kHz
    ///
    /// Stored for completeness; reception is not implemented.
    pub rx_bandwidth: f64,
    /// Output power in dBm, -10 to 16
    pub output_power: i8,
    /// Number of 0xAA preamble bytes sent before every packet, at most 32
    pub preamble_length: u8,
    /// Modulation scheme
    pub modulation: Modulation,
    /// Kind of reference oscillator fitted to the board
    pub oscillator: Oscillator,
    /// Reference frequency in MHz, the base of every fixed-point conversion
    pub crystal_frequency: f64,
    /// Keep the crystal oscillator enabled (PWRMODE.XOEN)
    pub crystal_enabled: bool,
    /// Keep the reference circuitry enabled (PWRMODE.REFEN)
    pub reference_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            frequency: 434.0,
            bit_rate: 4.8,
            frequency_deviation: 5.0,
            rx_bandwidth: 125.0,
            output_power: 10,
            preamble_length: 16,
            modulation: Modulation::Fsk,
            oscillator: Default::default(),
            crystal_frequency: DEFAULT_CRYSTAL_FREQUENCY,
            crystal_enabled: true,
            reference_enabled: true,
        }
    }
}

impl Config {
    /// Default configuration for AFSK, e.g. 1200 baud APRS-style links
    pub fn afsk() -> Self {
        Config {
            bit_rate: 1.2,
            frequency_deviation: 3.0,
            modulation: Modulation::Afsk,
            ..Default::default()
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Modulation schemes supported by the transmit path
pub enum Modulation {
    /// Frequency shift keying
    #[default]
    Fsk,
    /// Audio frequency shift keying
    Afsk,
}

impl Modulation {
    /// Value of the MODULATION register
    pub fn register_value(&self) -> u8 {
        match self {
            Modulation::Fsk => 0x08,
            Modulation::Afsk => 0x0A,
        }
    }

    /// Factor applied to the nominal deviation before it is programmed
    pub fn deviation_scale(&self) -> f64 {
        match self {
            Modulation::Fsk => 1.0,
            Modulation::Afsk => 0.858785,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// The reference oscillator driving the synthesizer
pub enum Oscillator {
    /// Temperature compensated oscillator fed into the clock input
    #[default]
    Tcxo,
    /// Crystal between the two oscillator pins
    Crystal,
}

impl Oscillator {
    /// Values of the XTALOSC (0xF10) and XTALAMPL (0xF11) tuning registers
    pub fn tuning(&self, crystal_frequency: f64) -> (u8, u8) {
        match self {
            Oscillator::Tcxo => (0x04, 0x00),
            Oscillator::Crystal if crystal_frequency > 43.0 => (0x0D, 0x07),
            Oscillator::Crystal => (0x03, 0x07),
        }
    }
}
