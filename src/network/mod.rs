//! Network layer protocols implementation
//!
//! This module contains the header views the receive path reads:
//! - Ethernet: link-layer framing
//! - IPv4: Internet Protocol version 4
//! - IPv6: just enough to find the transport header

pub mod ethernet;
pub mod ipv4;
pub mod ipv6;

// Re-export commonly used items
pub use ethernet::{EthernetFrame, MacAddr, BROADCAST_MAC, ETHERNET_HEADER_LEN};
pub use ipv4::{flags, is_broadcast_pattern, is_multicast, protocol, Ipv4Header, IPV4_HEADER_LEN};

/// Folded one's complement sum of a header whose checksum field was correct.
///
/// Summing the header *including* its checksum field yields this value
/// (RFC 1624), so verification needs no field masking.
pub const CORRECT_CHECKSUM: u16 = 0xFFFF;

/// Folded 16-bit one's complement sum of `data`, continuing from `initial`.
///
/// Data is summed in big-endian 16-bit words; an odd trailing byte is padded
/// with zero. The result is not complemented.
pub fn ones_complement_sum(initial: u32, data: &[u8]) -> u16 {
    let mut sum = initial as u64;

    let mut chunks = data.chunks_exact(2);
    for chunk in &mut chunks {
        sum += u16::from_be_bytes([chunk[0], chunk[1]]) as u64;
    }

    if let [last_byte] = chunks.remainder() {
        sum += (*last_byte as u64) << 8;
    }

    // Add carry bits
    while (sum >> 16) > 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }

    sum as u16
}

/// Calculate Internet checksum
///
/// The one's complement of the one's complement sum, i.e. the value a sender
/// writes into a zeroed checksum field.
pub fn checksum(data: &[u8]) -> u16 {
    !ones_complement_sum(0, data)
}
