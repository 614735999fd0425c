//! Frame construction helpers shared by the integration tests.

#![allow(dead_code)]

use byteorder::{BigEndian, ByteOrder};

use ipv4_ingress::network::ethernet::{ethertype, MacAddr};
use ipv4_ingress::network::ipv4::protocol;
use ipv4_ingress::network::{checksum, ones_complement_sum};
use ipv4_ingress::transport::pseudo_header_sum;
use ipv4_ingress::{Endpoint, EndpointTable};

pub const LOCAL_MAC: MacAddr = [0x02, 0x00, 0x5e, 0x00, 0x00, 0x0a];
pub const PEER_MAC: MacAddr = [0x02, 0x00, 0x5e, 0x00, 0x00, 0x14];
pub const LOCAL_IP: [u8; 4] = [192, 168, 1, 10];
pub const PEER_IP: [u8; 4] = [192, 168, 1, 20];

pub const ETH_LEN: usize = 14;

/// Endpoint table holding the local node, network up.
pub fn local_table() -> EndpointTable {
    let mut table = EndpointTable::new();
    table.add(Endpoint::new(LOCAL_IP, LOCAL_MAC));
    table.set_network_up(true);
    table
}

/// Builder for Ethernet + IPv4 frames with correct checksums unless told
/// otherwise.
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    dst_mac: MacAddr,
    src_mac: MacAddr,
    ethertype: u16,
    src_ip: [u8; 4],
    dst_ip: [u8; 4],
    version_ihl: Option<u8>,
    ip_options: Vec<u8>,
    flags_frag_offset: u16,
    protocol: u8,
    payload: Vec<u8>,
    transport_checksum: Option<u16>,
}

impl FrameBuilder {
    /// UDP from the peer to the local endpoint.
    pub fn new() -> Self {
        FrameBuilder {
            dst_mac: LOCAL_MAC,
            src_mac: PEER_MAC,
            ethertype: ethertype::IPV4,
            src_ip: PEER_IP,
            dst_ip: LOCAL_IP,
            version_ihl: None,
            ip_options: Vec::new(),
            flags_frag_offset: 0,
            protocol: protocol::UDP,
            payload: b"ingress test payload".to_vec(),
            transport_checksum: None,
        }
    }

    pub fn macs(mut self, src: MacAddr, dst: MacAddr) -> Self {
        self.src_mac = src;
        self.dst_mac = dst;
        self
    }

    pub fn ipv4(mut self, src: [u8; 4], dst: [u8; 4]) -> Self {
        self.src_ip = src;
        self.dst_ip = dst;
        self
    }

    /// Override the version/IHL byte without changing the bytes written.
    pub fn version_ihl(mut self, value: u8) -> Self {
        self.version_ihl = Some(value);
        self
    }

    pub fn ip_options(mut self, options: Vec<u8>) -> Self {
        self.ip_options = options;
        self
    }

    pub fn flags_frag_offset(mut self, value: u16) -> Self {
        self.flags_frag_offset = value;
        self
    }

    pub fn protocol(mut self, proto: u8) -> Self {
        self.protocol = proto;
        self
    }

    pub fn payload(mut self, payload: &[u8]) -> Self {
        self.payload = payload.to_vec();
        self
    }

    /// Write this value instead of the computed transport checksum.
    pub fn transport_checksum(mut self, value: u16) -> Self {
        self.transport_checksum = Some(value);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut frame = Vec::new();
        frame.extend_from_slice(&self.dst_mac);
        frame.extend_from_slice(&self.src_mac);
        frame.extend_from_slice(&self.ethertype.to_be_bytes());

        let transport = self.build_transport();
        let header_len = 20 + self.ip_options.len();

        let mut ip = vec![0u8; 20];
        ip[0] = self
            .version_ihl
            .unwrap_or(0x40 | (header_len / 4) as u8);
        BigEndian::write_u16(&mut ip[2..4], (header_len + transport.len()) as u16);
        BigEndian::write_u16(&mut ip[4..6], 0x1c46);
        BigEndian::write_u16(&mut ip[6..8], self.flags_frag_offset);
        ip[8] = 64;
        ip[9] = self.protocol;
        ip[12..16].copy_from_slice(&self.src_ip);
        ip[16..20].copy_from_slice(&self.dst_ip);
        ip.extend_from_slice(&self.ip_options);
        let sum = checksum(&ip);
        BigEndian::write_u16(&mut ip[10..12], sum);

        frame.extend_from_slice(&ip);
        frame.extend_from_slice(&transport);
        frame
    }

    fn build_transport(&self) -> Vec<u8> {
        let mut segment = Vec::new();
        let checksum_at = match self.protocol {
            protocol::UDP => {
                segment.extend_from_slice(&5353u16.to_be_bytes());
                segment.extend_from_slice(&5353u16.to_be_bytes());
                segment.extend_from_slice(&((8 + self.payload.len()) as u16).to_be_bytes());
                segment.extend_from_slice(&[0, 0]);
                Some(6)
            }
            protocol::TCP => {
                segment.extend_from_slice(&49152u16.to_be_bytes());
                segment.extend_from_slice(&80u16.to_be_bytes());
                segment.extend_from_slice(&1u32.to_be_bytes());
                segment.extend_from_slice(&0u32.to_be_bytes());
                segment.push(0x50); // 20-byte header
                segment.push(0x02); // SYN
                segment.extend_from_slice(&65535u16.to_be_bytes());
                segment.extend_from_slice(&[0, 0, 0, 0]);
                Some(16)
            }
            protocol::ICMP => {
                segment.extend_from_slice(&[8, 0, 0, 0, 0x12, 0x34, 0x00, 0x01]);
                Some(2)
            }
            _ => None,
        };
        segment.extend_from_slice(&self.payload);

        if let Some(at) = checksum_at {
            let sum = match self.transport_checksum {
                Some(value) => value,
                None => {
                    let initial = match self.protocol {
                        protocol::ICMP => 0,
                        proto => pseudo_header_sum(self.src_ip, self.dst_ip, proto, segment.len()),
                    };
                    match !ones_complement_sum(initial, &segment) {
                        // A computed UDP checksum of zero goes on the wire as all ones.
                        0 if self.protocol == protocol::UDP => 0xFFFF,
                        sum => sum,
                    }
                }
            };
            BigEndian::write_u16(&mut segment[at..at + 2], sum);
        }
        segment
    }
}
