//! IPv4 ingress admission filter for a small TCP/IP stack
//!
//! This library decides, for every received Ethernet frame carrying IPv4,
//! whether the frame may be handed to upper-layer processing:
//! - Fragment, header length and address sanity checks
//! - IP header and TCP/UDP/ICMP checksum verification
//! - Zero-checksum UDP policy with rate-limited diagnostics
//! - In-place stripping of IPv4 header options

pub mod buffer;
pub mod error;
pub mod iface;
pub mod network;
pub mod transport;

// Re-export commonly used types
pub use buffer::NetworkBuffer;
pub use error::{DiscardReason, FrameError};
pub use iface::config::FilterConfig;
pub use iface::diagnostics::RateLimitedLog;
pub use iface::endpoint::{Endpoint, EndpointLookup, EndpointTable};
pub use iface::filter::{IngressFilter, Verdict};
pub use iface::options::normalize_options;
pub use network::ethernet::{EthernetFrame, MacAddr, BROADCAST_MAC};
pub use network::ipv4::{is_broadcast_pattern, is_multicast, Ipv4Header};
