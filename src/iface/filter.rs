//! IPv4 receive admission
//!
//! Every received frame classified as IPv4 runs through [`IngressFilter`]
//! before any upper-layer parsing. The filter runs two families of checks
//! in a fixed order and stops at the first failure:
//!
//! - packet filtering: fragments, header length, destination, source and
//!   broadcast sanity (skipped when the driver already filters)
//! - integrity: size fields against the received length, then IP header and
//!   protocol checksums (the checksums are skipped when the NIC verified them)
//!
//! Frames carrying IP options are then normalized or dropped, see
//! [`normalize_options`].

use std::net::Ipv4Addr;

use log::debug;

use crate::buffer::NetworkBuffer;
use crate::error::{DiscardReason, FrameError};
use crate::iface::config::FilterConfig;
use crate::iface::diagnostics::RateLimitedLog;
use crate::iface::endpoint::{Endpoint, EndpointLookup};
use crate::iface::options::normalize_options;
use crate::network::ethernet::{ethertype, EthernetFrame, BROADCAST_MAC, ETHERNET_HEADER_LEN};
use crate::network::ipv4::{
    is_broadcast_pattern, is_multicast, Ipv4Header, IPV4_HEADER_LEN, VERSION_HEADER_LENGTH_MAX,
    VERSION_HEADER_LENGTH_MIN,
};
use crate::network::{ones_complement_sum, CORRECT_CHECKSUM};
use crate::transport::{check_size_fields, locate_udp_header, verify_protocol_checksum};

/// Outcome of admission: hand the buffer on, or release it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Discard,
}

impl Verdict {
    pub fn is_accept(self) -> bool {
        self == Verdict::Accept
    }
}

/// Admission filter for one receive context.
///
/// The configuration is fixed at construction. The endpoint set is only
/// read, so several filters can share one table (see [`EndpointLookup`]
/// for `Arc<RwLock<_>>`). Each filter owns its diagnostic budget.
#[derive(Debug)]
pub struct IngressFilter<L> {
    config: FilterConfig,
    endpoints: L,
    diagnostics: RateLimitedLog,
}

impl<L: EndpointLookup> IngressFilter<L> {
    pub fn new(config: FilterConfig, endpoints: L) -> Self {
        IngressFilter {
            config,
            endpoints,
            diagnostics: RateLimitedLog::default(),
        }
    }

    /// Replace the diagnostic sink, e.g. to change its line budget.
    pub fn with_diagnostics(mut self, diagnostics: RateLimitedLog) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn endpoints(&self) -> &L {
        &self.endpoints
    }

    pub fn diagnostics(&self) -> &RateLimitedLog {
        &self.diagnostics
    }

    /// Run a received frame through the whole IPv4 ingress pipeline.
    ///
    /// Errors are reserved for frames that are not Ethernet + IPv4 of at
    /// least 34 bytes, which the caller should have classified already.
    /// Everything else, however hostile, yields a [`Verdict`]. On `Accept`
    /// the frame carries an option-less 20-byte IPv4 header.
    pub fn process(&mut self, buffer: &mut NetworkBuffer) -> Result<Verdict, FrameError> {
        let header_len = {
            let eth = EthernetFrame::new(buffer.data())?;
            if eth.ethertype() != ethertype::IPV4 {
                return Err(FrameError::NotIpv4(eth.ethertype()));
            }
            Ipv4Header::new(eth.payload())?.header_len()
        };

        if header_len < IPV4_HEADER_LEN || header_len > buffer.data_len() - ETHERNET_HEADER_LEN {
            debug!(
                "dropping IPv4 frame: header length {} does not fit in {} bytes",
                header_len,
                buffer.data_len()
            );
            return Ok(Verdict::Discard);
        }

        if self.admit(buffer) == Verdict::Discard {
            return Ok(Verdict::Discard);
        }

        if header_len > IPV4_HEADER_LEN {
            return Ok(normalize_options(buffer, header_len, &self.config));
        }

        Ok(Verdict::Accept)
    }

    /// Decide whether an IPv4 frame may be processed.
    pub fn admit(&mut self, buffer: &NetworkBuffer) -> Verdict {
        match self.check(buffer) {
            Ok(()) => Verdict::Accept,
            Err(reason) => {
                debug!("dropping IPv4 frame: {}", reason);
                Verdict::Discard
            }
        }
    }

    /// Like [`admit`](Self::admit), reporting the first failed check.
    pub fn check(&mut self, buffer: &NetworkBuffer) -> Result<(), DiscardReason> {
        let frame = buffer.data();
        let eth = EthernetFrame::new(frame)?;
        let ip = Ipv4Header::new(eth.payload())?;

        if !self.config.driver_filters_packets {
            filter_packet(&self.endpoints, buffer.endpoint(), &eth, &ip)?;
        }

        let result = verify_integrity(&self.config, &self.endpoints, frame, &eth, &ip);
        if let Err(DiscardReason::ZeroUdpChecksum) = result {
            self.diagnostics.emit(format_args!(
                "UDP packet from {} without checksum dropped",
                Ipv4Addr::from(ip.src_addr())
            ));
        }
        result
    }
}

/// Software packet filtering, for drivers that pass everything up.
fn filter_packet<L: EndpointLookup>(
    endpoints: &L,
    tagged: Option<&Endpoint>,
    eth: &EthernetFrame<'_>,
    ip: &Ipv4Header<&[u8]>,
) -> Result<(), DiscardReason> {
    let dst = ip.dst_addr();
    let src = ip.src_addr();

    // Fragments are never reassembled here.
    if ip.is_fragment() {
        return Err(DiscardReason::Fragmented);
    }

    let version_ihl = ip.version_ihl();
    if !(VERSION_HEADER_LENGTH_MIN..=VERSION_HEADER_LENGTH_MAX).contains(&version_ihl) {
        return Err(DiscardReason::InvalidVersionHeaderLength(version_ihl));
    }

    // While the network is down (DHCP in progress) there is no address to
    // match against yet.
    if tagged.is_none()
        && endpoints.find_by_ip(dst).is_none()
        && !is_broadcast_pattern(dst)
        && !is_multicast(dst)
        && endpoints.is_network_up()
    {
        return Err(DiscardReason::NotForUs(dst));
    }

    // Never answer a broadcast source.
    if is_broadcast_pattern(src) {
        return Err(DiscardReason::BroadcastSource(src));
    }

    if eth.dst_mac() == BROADCAST_MAC && !is_broadcast_pattern(dst) {
        return Err(DiscardReason::BroadcastMismatch(dst));
    }

    if eth.src_mac() == BROADCAST_MAC {
        return Err(DiscardReason::BroadcastSourceMac);
    }

    // RFC 1112 section 7.2
    if is_multicast(src) {
        return Err(DiscardReason::MulticastSource(src));
    }

    Ok(())
}

/// Size validation and checksum verification.
fn verify_integrity<L: EndpointLookup>(
    config: &FilterConfig,
    endpoints: &L,
    frame: &[u8],
    eth: &EthernetFrame<'_>,
    ip: &Ipv4Header<&[u8]>,
) -> Result<(), DiscardReason> {
    check_size_fields(frame)?;

    if config.driver_validates_checksums {
        if !config.pass_zero_udp_checksum {
            if let Some(udp) = locate_udp_header(frame)? {
                if udp.checksum == 0 {
                    return Err(DiscardReason::ZeroUdpChecksum);
                }
            }
        }
        return Ok(());
    }

    // Looped-back frames were built by this node.
    if endpoints.find_by_mac(&eth.src_mac()).is_some() {
        return Ok(());
    }

    if ones_complement_sum(0, ip.header_bytes()?) != CORRECT_CHECKSUM {
        return Err(DiscardReason::IpChecksum);
    }

    verify_protocol_checksum(ip, config.pass_zero_udp_checksum)
}
