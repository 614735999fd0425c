//! Ethernet II framing
//!
//! Read-only view over the 14-byte Ethernet header at the start of a
//! received frame.

use byteorder::{BigEndian, ByteOrder};

use crate::buffer::field;
use crate::error::FrameError;

/// Ethernet header length in bytes
pub const ETHERNET_HEADER_LEN: usize = 14;

pub type MacAddr = [u8; 6];

/// The link-layer broadcast address
pub const BROADCAST_MAC: MacAddr = [0xFF; 6];

/// Frame type constants
pub mod ethertype {
    pub const IPV4: u16 = 0x0800;
    pub const ARP: u16 = 0x0806;
    pub const IPV6: u16 = 0x86DD;
}

/// Ethernet header view over a borrowed frame
#[derive(Debug, Clone, Copy)]
pub struct EthernetFrame<'a> {
    data: &'a [u8],
}

impl<'a> EthernetFrame<'a> {
    /// Wrap `data`, which must hold at least a full Ethernet header.
    pub fn new(data: &'a [u8]) -> Result<Self, FrameError> {
        field(data, 0, ETHERNET_HEADER_LEN)?;
        Ok(EthernetFrame { data })
    }

    pub fn dst_mac(&self) -> MacAddr {
        mac_at(self.data, 0)
    }

    pub fn src_mac(&self) -> MacAddr {
        mac_at(self.data, 6)
    }

    pub fn ethertype(&self) -> u16 {
        BigEndian::read_u16(&self.data[12..14])
    }

    /// Everything after the Ethernet header
    pub fn payload(&self) -> &'a [u8] {
        &self.data[ETHERNET_HEADER_LEN..]
    }
}

fn mac_at(data: &[u8], offset: usize) -> MacAddr {
    let mut mac = [0u8; 6];
    mac.copy_from_slice(&data[offset..offset + 6]);
    mac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_fixed_fields() {
        let mut frame = vec![0xFFu8; 6];
        frame.extend_from_slice(&[0x02, 0, 0, 0, 0, 0x01]);
        frame.extend_from_slice(&[0x08, 0x00, 0x45]);

        let eth = EthernetFrame::new(&frame).unwrap();
        assert_eq!(eth.dst_mac(), BROADCAST_MAC);
        assert_eq!(eth.src_mac(), [0x02, 0, 0, 0, 0, 0x01]);
        assert_eq!(eth.ethertype(), ethertype::IPV4);
        assert_eq!(eth.payload(), &[0x45]);
    }

    #[test]
    fn short_frame_is_refused() {
        assert!(EthernetFrame::new(&[0u8; 13]).is_err());
    }
}
