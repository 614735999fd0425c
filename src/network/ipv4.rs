//! IPv4 protocol implementation
//!
//! This module provides a bounds-checked view over a received IPv4 header
//! and the address classification the receive path needs.
//!
//! Features:
//! - Header field accessors over borrowed frame bytes
//! - In-place rewriting of the length fields
//! - Multicast and broadcast address classification

use byteorder::{BigEndian, ByteOrder};

use crate::buffer::field;
use crate::error::FrameError;

/// Minimum (option-less) IPv4 header length
pub const IPV4_HEADER_LEN: usize = 20;
/// Largest header length the 4-bit IHL field can express
pub const IPV4_MAX_HEADER_LEN: usize = 60;
pub const IPV4_VERSION: u8 = 4;

/// Smallest valid version/IHL byte: version 4, 20-byte header
pub const VERSION_HEADER_LENGTH_MIN: u8 = 0x45;
/// Largest valid version/IHL byte: version 4, 60-byte header
pub const VERSION_HEADER_LENGTH_MAX: u8 = 0x4F;

const FIRST_MULTICAST: u32 = 0xE000_0000; // 224.0.0.0
const LAST_MULTICAST: u32 = 0xF000_0000; // 240.0.0.0, exclusive

/// IPv4 protocol constants
pub mod protocol {
    pub const ICMP: u8 = 1;
    pub const IGMP: u8 = 2;
    pub const TCP: u8 = 6;
    pub const UDP: u8 = 17;
}

/// IPv4 flags constants
pub mod flags {
    pub const DONT_FRAGMENT: u16 = 0x4000;
    pub const MORE_FRAGMENTS: u16 = 0x2000;
    pub const FRAGMENT_OFFSET_MASK: u16 = 0x1FFF;
}

mod field_offset {
    pub const VERSION_IHL: usize = 0;
    pub const TOTAL_LEN: usize = 2;
    pub const FLAGS_FRAG_OFFSET: usize = 6;
    pub const PROTOCOL: usize = 9;
    pub const SRC_ADDR: usize = 12;
    pub const DST_ADDR: usize = 16;
}

/// Is `addr` (network byte order octets) inside 224.0.0.0/4?
pub fn is_multicast(addr: [u8; 4]) -> bool {
    let ip = BigEndian::read_u32(&addr);
    (FIRST_MULTICAST..LAST_MULTICAST).contains(&ip)
}

/// Does `addr` look like a subnet broadcast, i.e. `x.x.x.255`?
pub fn is_broadcast_pattern(addr: [u8; 4]) -> bool {
    let ip = BigEndian::read_u32(&addr);
    ip & 0xFF == 0xFF
}

/// IPv4 header view
///
/// Wraps the bytes starting at the IPv4 header. Construction guarantees the
/// fixed 20-byte part is present; anything beyond it (options, payload) is
/// reached through checked accessors.
#[derive(Debug, Clone, Copy)]
pub struct Ipv4Header<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> Ipv4Header<T> {
    /// Wrap `buffer`, which must contain at least the fixed 20-byte header.
    pub fn new(buffer: T) -> Result<Self, FrameError> {
        field(buffer.as_ref(), 0, IPV4_HEADER_LEN)?;
        Ok(Ipv4Header { buffer })
    }

    fn data(&self) -> &[u8] {
        self.buffer.as_ref()
    }

    pub fn version_ihl(&self) -> u8 {
        self.data()[field_offset::VERSION_IHL]
    }

    pub fn version(&self) -> u8 {
        self.version_ihl() >> 4
    }

    /// Internet Header Length in 32-bit words
    pub fn ihl(&self) -> u8 {
        self.version_ihl() & 0x0F
    }

    /// Get the header length in bytes
    pub fn header_len(&self) -> usize {
        (self.ihl() as usize) * 4
    }

    pub fn total_len(&self) -> u16 {
        BigEndian::read_u16(&self.data()[field_offset::TOTAL_LEN..])
    }

    pub fn flags_frag_offset(&self) -> u16 {
        BigEndian::read_u16(&self.data()[field_offset::FLAGS_FRAG_OFFSET..])
    }

    /// True for every piece of a fragmented datagram: all but the last carry
    /// "more fragments", all but the first carry a non-zero offset.
    pub fn is_fragment(&self) -> bool {
        let value = self.flags_frag_offset();
        value & flags::FRAGMENT_OFFSET_MASK != 0 || value & flags::MORE_FRAGMENTS != 0
    }

    pub fn protocol(&self) -> u8 {
        self.data()[field_offset::PROTOCOL]
    }

    pub fn src_addr(&self) -> [u8; 4] {
        addr_at(self.data(), field_offset::SRC_ADDR)
    }

    pub fn dst_addr(&self) -> [u8; 4] {
        addr_at(self.data(), field_offset::DST_ADDR)
    }

    /// The full header including options, as declared by the IHL field.
    pub fn header_bytes(&self) -> Result<&[u8], FrameError> {
        field(self.data(), 0, self.header_len())
    }

    /// Bytes following the declared header, up to the end of the buffer.
    pub fn payload(&self) -> Result<&[u8], FrameError> {
        let header_len = self.header_len();
        let data = self.data();
        field(data, header_len, data.len().saturating_sub(header_len))
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Ipv4Header<T> {
    pub fn set_version_ihl(&mut self, value: u8) {
        self.buffer.as_mut()[field_offset::VERSION_IHL] = value;
    }

    pub fn set_total_len(&mut self, value: u16) {
        BigEndian::write_u16(&mut self.buffer.as_mut()[field_offset::TOTAL_LEN..], value);
    }
}

fn addr_at(data: &[u8], offset: usize) -> [u8; 4] {
    let mut addr = [0u8; 4];
    addr.copy_from_slice(&data[offset..offset + 4]);
    addr
}
