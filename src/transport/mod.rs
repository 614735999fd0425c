//! Transport layer checks on received IPv4 datagrams
//!
//! This module contains the transport-aware parts of ingress validation:
//! - Size validation of the IP and transport headers against the frame
//! - Upper-layer (UDP, TCP, ICMP, IGMP) checksum verification

pub mod tcp;
pub mod udp;

// Re-export commonly used items
pub use tcp::{TcpHeader, TCP_HEADER_LEN};
pub use udp::{locate_udp_header, UdpHeader, UDP_HEADER_LEN};

use crate::buffer::field;
use crate::error::DiscardReason;
use crate::network::ethernet::ETHERNET_HEADER_LEN;
use crate::network::ipv4::{protocol, Ipv4Header, IPV4_HEADER_LEN};
use crate::network::{ones_complement_sum, CORRECT_CHECKSUM};

/// ICMP header length in bytes
pub const ICMP_HEADER_LEN: usize = 8;
/// IGMP message length in bytes
pub const IGMP_HEADER_LEN: usize = 8;

/// Verify that the size fields of an Ethernet + IPv4 frame agree with the
/// number of bytes actually received.
///
/// Checks, in order: the IHL-declared header is at least 20 bytes and fits
/// in the frame, the total length covers the header and fits in the frame,
/// and the IP payload holds a complete header of the carried protocol.
/// Unknown protocols are rejected. On success every later read of the IP or
/// transport header stays inside the frame.
pub fn check_size_fields(frame: &[u8]) -> Result<(), DiscardReason> {
    let ip_data = field(frame, ETHERNET_HEADER_LEN, frame.len().saturating_sub(ETHERNET_HEADER_LEN))
        .map_err(|_| DiscardReason::SizeMismatch)?;
    let ip = Ipv4Header::new(ip_data).map_err(|_| DiscardReason::SizeMismatch)?;

    let header_len = ip.header_len();
    if header_len < IPV4_HEADER_LEN || header_len > ip_data.len() {
        return Err(DiscardReason::SizeMismatch);
    }

    let total_len = ip.total_len() as usize;
    if total_len < header_len || total_len > ip_data.len() {
        return Err(DiscardReason::SizeMismatch);
    }

    let segment = &ip_data[header_len..total_len];
    let minimum = match ip.protocol() {
        protocol::UDP => {
            let udp = UdpHeader::from_bytes(segment).map_err(|_| DiscardReason::SizeMismatch)?;
            let length = udp.length as usize;
            if length < UDP_HEADER_LEN || length > segment.len() {
                return Err(DiscardReason::SizeMismatch);
            }
            UDP_HEADER_LEN
        }
        protocol::TCP => {
            let tcp = TcpHeader::from_bytes(segment).map_err(|_| DiscardReason::SizeMismatch)?;
            let data_offset = tcp.data_offset();
            if data_offset < TCP_HEADER_LEN {
                return Err(DiscardReason::SizeMismatch);
            }
            data_offset
        }
        protocol::ICMP => ICMP_HEADER_LEN,
        protocol::IGMP => IGMP_HEADER_LEN,
        other => return Err(DiscardReason::UnhandledProtocol(other)),
    };

    if segment.len() < minimum {
        return Err(DiscardReason::SizeMismatch);
    }

    Ok(())
}

/// Verify the upper-layer checksum of a datagram that passed
/// [`check_size_fields`]. `ip` starts at the IPv4 header.
///
/// UDP segments whose checksum field is zero were sent without a checksum;
/// they are accepted unverified when `pass_zero_udp_checksum` is set and
/// rejected with [`DiscardReason::ZeroUdpChecksum`] otherwise.
pub fn verify_protocol_checksum(
    ip: &Ipv4Header<&[u8]>,
    pass_zero_udp_checksum: bool,
) -> Result<(), DiscardReason> {
    let header_len = ip.header_len();
    let segment_len = (ip.total_len() as usize)
        .checked_sub(header_len)
        .ok_or(DiscardReason::SizeMismatch)?;
    let segment = field(ip.payload()?, 0, segment_len)?;

    let proto = ip.protocol();
    let sum = match proto {
        protocol::UDP => {
            if UdpHeader::from_bytes(segment)?.checksum == 0 {
                return if pass_zero_udp_checksum {
                    Ok(())
                } else {
                    Err(DiscardReason::ZeroUdpChecksum)
                };
            }
            // Summed over the whole IP payload, not the UDP length field.
            let pseudo = pseudo_header_sum(ip.src_addr(), ip.dst_addr(), proto, segment.len());
            ones_complement_sum(pseudo, segment)
        }
        protocol::TCP => {
            let pseudo = pseudo_header_sum(ip.src_addr(), ip.dst_addr(), proto, segment.len());
            ones_complement_sum(pseudo, segment)
        }
        protocol::ICMP | protocol::IGMP => ones_complement_sum(0, segment),
        other => return Err(DiscardReason::UnhandledProtocol(other)),
    };

    if sum != CORRECT_CHECKSUM {
        return Err(DiscardReason::ProtocolChecksum(proto));
    }

    Ok(())
}

/// Sum of the IPv4 pseudo header: source, destination, zero + protocol and
/// the segment length.
pub fn pseudo_header_sum(src: [u8; 4], dst: [u8; 4], proto: u8, segment_len: usize) -> u32 {
    let word = |hi: u8, lo: u8| u16::from_be_bytes([hi, lo]) as u32;

    word(src[0], src[1])
        + word(src[2], src[3])
        + word(dst[0], dst[1])
        + word(dst[2], dst[3])
        + proto as u32
        + (segment_len as u32 & 0xFFFF)
}
