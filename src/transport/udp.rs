//! UDP (User Datagram Protocol) header access
//!
//! This module provides UDP header parsing and locates the UDP checksum
//! field inside a received frame.

use byteorder::{BigEndian, ByteOrder};

use crate::buffer::field;
use crate::error::FrameError;
use crate::network::ethernet::{ethertype, EthernetFrame, ETHERNET_HEADER_LEN};
use crate::network::ipv4::{protocol, Ipv4Header};
use crate::network::ipv6::{self, IPV6_HEADER_LEN};

/// UDP header length in bytes
pub const UDP_HEADER_LEN: usize = 8;

/// UDP packet header structure
///
/// Represents the standard 8-byte UDP header as defined in RFC 768
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpHeader {
    pub src_port: u16,
    pub dst_port: u16,
    pub length: u16, // Length of UDP header and data
    pub checksum: u16,
}

impl UdpHeader {
    /// Parse UDP header from byte slice
    pub fn from_bytes(data: &[u8]) -> Result<Self, FrameError> {
        let data = field(data, 0, UDP_HEADER_LEN)?;

        Ok(UdpHeader {
            src_port: BigEndian::read_u16(&data[0..2]),
            dst_port: BigEndian::read_u16(&data[2..4]),
            length: BigEndian::read_u16(&data[4..6]),
            checksum: BigEndian::read_u16(&data[6..8]),
        })
    }
}

/// Find the UDP header of a received frame.
///
/// The frame type decides how the transport header is located: IPv4 uses the
/// protocol field and the declared header length, IPv6 the next-header field
/// behind the fixed 40-byte header. Returns `None` when the frame does not
/// carry UDP.
pub fn locate_udp_header(frame: &[u8]) -> Result<Option<UdpHeader>, FrameError> {
    let eth = EthernetFrame::new(frame)?;

    let (next_protocol, offset) = if eth.ethertype() == ethertype::IPV6 {
        let next = ipv6::next_header(eth.payload())?;
        (next, ETHERNET_HEADER_LEN + IPV6_HEADER_LEN)
    } else {
        let ip = Ipv4Header::new(eth.payload())?;
        (ip.protocol(), ETHERNET_HEADER_LEN + ip.header_len())
    };

    if next_protocol != protocol::UDP {
        return Ok(None);
    }

    let header = field(frame, offset, UDP_HEADER_LEN)?;
    UdpHeader::from_bytes(header).map(Some)
}
