//! FIFO commands and chunk framing
//!
//! Everything the AX5043 transmits goes through its FIFO as a sequence of
//! chunks. A chunk starts with a header byte whose top three bits give the
//! payload length class; variable-length chunks carry an explicit length byte
//! after the header.

#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Commands written to the FIFOSTAT register
pub enum FifoCommand {
    /// Clear FIFO overrun and underrun flags
    CMD_CLEAR_ERROR = 0x02,
    /// Discard the FIFO contents
    CMD_CLEAR_FIFO = 0x03,
    /// Commit the written data; starts the transmission
    CMD_COMMIT = 0x04,
    /// Drop everything written since the last commit
    CMD_ROLLBACK = 0x05,
}

/// Length class of a chunk without payload
pub const LENGTH_NONE: u8 = 0x00;
/// Length class of a chunk with one payload byte
pub const LENGTH_SINGLE: u8 = 0x20;
/// Length class of a chunk with two payload bytes
pub const LENGTH_DOUBLE: u8 = 0x40;
/// Length class of a chunk with three payload bytes
pub const LENGTH_TRIPLE: u8 = 0x60;
/// Length class of a chunk followed by a length byte
pub const LENGTH_VARIABLE: u8 = 0xE0;
/// Bits of the header holding the length class
pub const LENGTH_MASK: u8 = 0xE0;

/// Chunk header bytes
pub mod header {
    use super::*;

    /// No operation
    pub const NOP: u8 = LENGTH_NONE;
    /// Received signal strength
    pub const RSSI: u8 = LENGTH_SINGLE | 0x11;
    /// Transmit control
    pub const TXCTRL: u8 = LENGTH_SINGLE | 0x1C;
    /// Frequency offset
    pub const FREQOFFS: u8 = LENGTH_DOUBLE | 0x12;
    /// Antenna RSSI, two antennas
    pub const ANTRSSI2: u8 = LENGTH_DOUBLE | 0x15;
    /// Repeated data byte
    pub const REPEATDATA: u8 = LENGTH_TRIPLE | 0x02;
    /// Timer value
    pub const TIMER: u8 = LENGTH_TRIPLE | 0x10;
    /// RF frequency offset
    pub const RFFREQOFFS: u8 = LENGTH_TRIPLE | 0x13;
    /// Data rate
    pub const DATARATE: u8 = LENGTH_TRIPLE | 0x14;
    /// Antenna RSSI, three antennas
    pub const ANTRSSI3: u8 = LENGTH_TRIPLE | 0x15;
    /// Packet data
    pub const DATA: u8 = LENGTH_VARIABLE | 0x01;
    /// Transmit power
    pub const TXPWR: u8 = LENGTH_VARIABLE | 0x1D;
}

/// Flag byte leading the payload of a DATA chunk
pub mod flags {
    /// Start of a packet
    pub const PKTSTART: u8 = 0x01;
    /// End of a packet
    pub const PKTEND: u8 = 0x02;
    /// Last byte only holds some valid bits
    pub const RESIDUE: u8 = 0x04;
    /// Don't append a CRC
    pub const NOCRC: u8 = 0x08;
    /// Bypass the framing unit
    pub const RAW: u8 = 0x10;
    /// Bypass the encoder
    pub const UNENC: u8 = 0x20;
}

/// Preamble byte, alternating ones and zeros
pub const PREAMBLE_BYTE: u8 = 0xAA;

/// Longest preamble the driver emits, in bytes
pub const PREAMBLE_MAX: u8 = 32;

/// Longest payload of a single chunk
pub const CHUNK_PAYLOAD_MAX: usize = 255;

/// A single FIFO chunk
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FifoChunk<'a> {
    header: u8,
    payload: &'a [u8],
}

impl<'a> FifoChunk<'a> {
    /// Create a chunk
    ///
    /// Returns `None` if the payload doesn't fit: more than 255 bytes for a
    /// variable-length header, or more bytes than the header's length class
    /// allows otherwise.
    pub fn new(header: u8, payload: &'a [u8]) -> Option<Self> {
        let fits = match header & LENGTH_MASK {
            LENGTH_VARIABLE => payload.len() <= CHUNK_PAYLOAD_MAX,
            class => payload.len() <= usize::from(class >> 5),
        };

        fits.then_some(FifoChunk { header, payload })
    }

    /// Whether the header is followed by a length byte
    pub fn is_variable_length(&self) -> bool {
        self.header & LENGTH_MASK == LENGTH_VARIABLE
    }

    /// The bytes pushed into the FIFO for this chunk, in order
    ///
    /// A chunk without payload is only its header.
    pub fn bytes(&self) -> impl Iterator<Item = u8> + 'a {
        let payload: &'a [u8] = self.payload;
        let length = (self.is_variable_length() && !payload.is_empty())
            .then_some(payload.len() as u8);

        core::iter::once(self.header)
            .chain(length)
            .chain(payload.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_values() {
        assert_eq!(header::DATA, 0xE1);
        assert_eq!(header::TXPWR, 0xFD);
        assert_eq!(header::RSSI, 0x31);
        assert_eq!(header::TIMER, 0x70);
        assert_eq!(flags::UNENC | flags::PKTSTART, 0x21);
        assert_eq!(flags::UNENC | flags::PKTEND, 0x22);
    }

    #[test]
    fn data_chunk_stream() {
        let payload = [0x22, 0x02, 0x03];
        let chunk = FifoChunk::new(header::DATA, &payload).unwrap();

        let stream: Vec<u8> = chunk.bytes().collect();
        assert_eq!(stream, vec![0xE1, 0x03, 0x22, 0x02, 0x03]);
    }

    #[test]
    fn empty_chunk_is_header_only() {
        let chunk = FifoChunk::new(header::DATA, &[]).unwrap();

        assert_eq!(chunk.bytes().collect::<Vec<_>>(), vec![0xE1]);
    }

    #[test]
    fn fixed_length_chunk_has_no_length_byte() {
        let chunk = FifoChunk::new(header::TXCTRL, &[0x40]).unwrap();

        assert!(!chunk.is_variable_length());
        assert_eq!(chunk.bytes().collect::<Vec<_>>(), vec![0x3C, 0x40]);
    }

    #[test]
    fn oversized_payloads_rejected() {
        let long = [0u8; 256];

        assert!(FifoChunk::new(header::DATA, &long).is_none());
        assert!(FifoChunk::new(header::DATA, &long[..255]).is_some());
        assert!(FifoChunk::new(header::RSSI, &[1, 2]).is_none());
    }
}
