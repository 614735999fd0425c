//! Error types for frame access and admission decisions

use std::net::Ipv4Addr;

use thiserror::Error;

/// Errors raised by the bounds-checked header accessors and buffer primitives.
///
/// These describe a frame that cannot be read the way the caller asked,
/// not a policy decision about the packet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("read of {len} bytes at offset {offset} exceeds data length {available}")]
    OutOfBounds {
        offset: usize,
        len: usize,
        available: usize,
    },

    #[error("frame type {0:#06x} is not IPv4")]
    NotIpv4(u16),

    #[error("IPv4 total length {total} is shorter than header length {header_len}")]
    TotalLengthTooShort { total: u16, header_len: usize },

    #[error("data length can only shrink: current {current}, requested {requested}")]
    GrowNotAllowed { current: usize, requested: usize },
}

/// Why the admission filter dropped a frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscardReason {
    #[error("fragmented datagram")]
    Fragmented,

    #[error("invalid version/header length byte {0:#04x}")]
    InvalidVersionHeaderLength(u8),

    #[error("destination {} is not for this node", addr(.0))]
    NotForUs([u8; 4]),

    #[error("broadcast source address {}", addr(.0))]
    BroadcastSource([u8; 4]),

    #[error("link-layer broadcast carrying non-broadcast destination {}", addr(.0))]
    BroadcastMismatch([u8; 4]),

    #[error("broadcast source MAC address")]
    BroadcastSourceMac,

    #[error("multicast source address {}", addr(.0))]
    MulticastSource([u8; 4]),

    #[error("size fields inconsistent with data length")]
    SizeMismatch,

    #[error("unhandled protocol {0}")]
    UnhandledProtocol(u8),

    #[error("IP header checksum incorrect")]
    IpChecksum,

    #[error("protocol {0} checksum incorrect")]
    ProtocolChecksum(u8),

    #[error("UDP segment without checksum")]
    ZeroUdpChecksum,

    #[error("packet carries IP options")]
    IpOptions,

    #[error("malformed frame: {0}")]
    Malformed(#[from] FrameError),
}

fn addr(octets: &[u8; 4]) -> Ipv4Addr {
    Ipv4Addr::from(*octets)
}
