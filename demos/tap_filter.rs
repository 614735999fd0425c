//! A TAP interface ingress filter example
//!
//! This example attaches the IPv4 ingress filter to a TAP device and logs the
//! verdict for every IPv4 frame the kernel sends towards it.
//!
//! To run this example:
//!
//! ```sh
//! RUST_LOG=debug cargo run --example tap_filter
//! ```
//!
//! Note: Root/sudo privileges are required to create and configure the TAP device.
//! Traffic sent from the host to 10.0.0.0/24 (for example `ping -b 10.0.0.255`)
//! shows up as frames on tap0.

use ipv4_ingress::network::ethernet::{ethertype, EthernetFrame};
use ipv4_ingress::{Endpoint, EndpointTable, FilterConfig, IngressFilter, NetworkBuffer};
use tun_tap::{Iface, Mode};

mod utils;
use utils::network::{configure_interface, parse_ipv4};

const LOCAL_MAC: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];

fn main() -> std::io::Result<()> {
    env_logger::init();

    // Create TAP interface
    let iface = Iface::without_packet_info("tap0", Mode::Tap)?;
    let iface_name = iface.name();
    log::info!("TAP device created: {}", iface_name);

    // Configure the host side and bring the interface up
    configure_interface(iface_name, "10.0.0.254/24")?;

    let mut endpoints = EndpointTable::new();
    endpoints.add(Endpoint::new(parse_ipv4("10.0.0.1")?, LOCAL_MAC));
    endpoints.set_network_up(true);

    let mut filter = IngressFilter::new(FilterConfig::default(), endpoints);
    let mut accepted = 0u64;
    let mut discarded = 0u64;
    let mut buf = [0u8; 1518];

    loop {
        let nbytes = iface.recv(&mut buf)?;
        let frame = &buf[..nbytes];

        // Only IPv4 frames are handed to the filter
        match EthernetFrame::new(frame) {
            Ok(eth) if eth.ethertype() == ethertype::IPV4 => {}
            _ => continue,
        }

        let mut buffer = NetworkBuffer::from_slice(frame);
        match filter.process(&mut buffer) {
            Ok(verdict) => {
                if verdict.is_accept() {
                    accepted += 1;
                } else {
                    discarded += 1;
                }
                log::info!(
                    "{:?} {} bytes (accepted {}, discarded {})",
                    verdict,
                    buffer.data_len(),
                    accepted,
                    discarded
                );
            }
            Err(e) => log::warn!("frame not handed to filter: {}", e),
        }
    }
}
