//! TCP (Transmission Control Protocol) header access
//!
//! The receive filter only needs the fixed TCP fields to size-check a
//! segment before it is checksummed.

use byteorder::{BigEndian, ByteOrder};

use crate::buffer::field;
use crate::error::FrameError;

/// Minimum TCP header length in bytes
pub const TCP_HEADER_LEN: usize = 20;

/// TCP packet header structure
///
/// Represents the fixed 20-byte part of the TCP header as defined in RFC 793
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpHeader {
    pub src_port: u16,
    pub dst_port: u16,
    pub data_offset_and_flags: u16, // Data offset (4 bits) + Reserved (3 bits) + Flags (9 bits)
    pub checksum: u16,
}

impl TcpHeader {
    /// Parse TCP header from byte slice
    pub fn from_bytes(data: &[u8]) -> Result<Self, FrameError> {
        let data = field(data, 0, TCP_HEADER_LEN)?;

        Ok(TcpHeader {
            src_port: BigEndian::read_u16(&data[0..2]),
            dst_port: BigEndian::read_u16(&data[2..4]),
            data_offset_and_flags: BigEndian::read_u16(&data[12..14]),
            checksum: BigEndian::read_u16(&data[16..18]),
        })
    }

    /// Get the data offset (header length) in bytes
    pub fn data_offset(&self) -> usize {
        ((self.data_offset_and_flags >> 12) as usize) * 4
    }
}
