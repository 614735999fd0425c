//! Locally configured endpoints
//!
//! An endpoint is an IPv4 address plus MAC address this node answers to.
//! The receive filter only ever reads the endpoint set; it is populated and
//! changed by address configuration (static setup, DHCP).

use std::sync::{Arc, PoisonError, RwLock};

use crate::network::ethernet::MacAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub ip_addr: [u8; 4],
    pub mac_addr: MacAddr,
}

impl Endpoint {
    pub fn new(ip_addr: [u8; 4], mac_addr: MacAddr) -> Self {
        Endpoint { ip_addr, mac_addr }
    }
}

/// Read-only queries the receive filter makes against the endpoint set.
pub trait EndpointLookup {
    /// Endpoint owning `ip_addr`, if any.
    fn find_by_ip(&self, ip_addr: [u8; 4]) -> Option<Endpoint>;

    /// Endpoint owning `mac_addr`, if any. A hit on a frame's source MAC
    /// means the frame was looped back by this node.
    fn find_by_mac(&self, mac_addr: &MacAddr) -> Option<Endpoint>;

    /// False while the node is still acquiring an address.
    fn is_network_up(&self) -> bool;
}

/// Endpoint set backed by a small vector
#[derive(Debug, Clone, Default)]
pub struct EndpointTable {
    endpoints: Vec<Endpoint>,
    network_up: bool,
}

impl EndpointTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an endpoint, replacing any existing one with the same IP address.
    pub fn add(&mut self, endpoint: Endpoint) {
        self.endpoints.retain(|e| e.ip_addr != endpoint.ip_addr);
        self.endpoints.push(endpoint);
    }

    pub fn remove(&mut self, ip_addr: [u8; 4]) -> Option<Endpoint> {
        let index = self.endpoints.iter().position(|e| e.ip_addr == ip_addr)?;
        Some(self.endpoints.remove(index))
    }

    pub fn set_network_up(&mut self, up: bool) {
        self.network_up = up;
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }
}

impl EndpointLookup for EndpointTable {
    fn find_by_ip(&self, ip_addr: [u8; 4]) -> Option<Endpoint> {
        self.endpoints.iter().find(|e| e.ip_addr == ip_addr).copied()
    }

    fn find_by_mac(&self, mac_addr: &MacAddr) -> Option<Endpoint> {
        self.endpoints.iter().find(|e| &e.mac_addr == mac_addr).copied()
    }

    fn is_network_up(&self) -> bool {
        self.network_up
    }
}

impl<L: EndpointLookup + ?Sized> EndpointLookup for &L {
    fn find_by_ip(&self, ip_addr: [u8; 4]) -> Option<Endpoint> {
        (**self).find_by_ip(ip_addr)
    }

    fn find_by_mac(&self, mac_addr: &MacAddr) -> Option<Endpoint> {
        (**self).find_by_mac(mac_addr)
    }

    fn is_network_up(&self) -> bool {
        (**self).is_network_up()
    }
}

impl<L: EndpointLookup + ?Sized> EndpointLookup for Arc<L> {
    fn find_by_ip(&self, ip_addr: [u8; 4]) -> Option<Endpoint> {
        (**self).find_by_ip(ip_addr)
    }

    fn find_by_mac(&self, mac_addr: &MacAddr) -> Option<Endpoint> {
        (**self).find_by_mac(mac_addr)
    }

    fn is_network_up(&self) -> bool {
        (**self).is_network_up()
    }
}

/// Shared table: readers from several receive contexts, one writer on the
/// address configuration path. A poisoned lock is still read.
impl<L: EndpointLookup> EndpointLookup for RwLock<L> {
    fn find_by_ip(&self, ip_addr: [u8; 4]) -> Option<Endpoint> {
        self.read()
            .unwrap_or_else(PoisonError::into_inner)
            .find_by_ip(ip_addr)
    }

    fn find_by_mac(&self, mac_addr: &MacAddr) -> Option<Endpoint> {
        self.read()
            .unwrap_or_else(PoisonError::into_inner)
            .find_by_mac(mac_addr)
    }

    fn is_network_up(&self) -> bool {
        self.read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_network_up()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const MAC: MacAddr = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];

    #[test]
    fn lookups_by_ip_and_mac() {
        let mut table = EndpointTable::new();
        table.add(Endpoint::new([10, 0, 0, 1], MAC));

        assert_eq!(table.find_by_ip([10, 0, 0, 1]).map(|e| e.mac_addr), Some(MAC));
        assert!(table.find_by_ip([10, 0, 0, 2]).is_none());
        assert_eq!(table.find_by_mac(&MAC).map(|e| e.ip_addr), Some([10, 0, 0, 1]));
        assert!(!table.is_network_up());
    }

    #[test]
    fn add_replaces_same_address() {
        let mut table = EndpointTable::new();
        table.add(Endpoint::new([10, 0, 0, 1], MAC));
        table.add(Endpoint::new([10, 0, 0, 1], [0x02, 0, 0, 0, 0, 0x02]));
        assert_eq!(table.endpoints().len(), 1);
        assert!(table.find_by_mac(&MAC).is_none());
        assert!(table.remove([10, 0, 0, 1]).is_some());
        assert!(table.remove([10, 0, 0, 1]).is_none());
    }

    #[test]
    fn shared_table_sees_configuration_changes() {
        let shared = Arc::new(RwLock::new(EndpointTable::new()));

        let writer = Arc::clone(&shared);
        thread::spawn(move || {
            let mut table = writer.write().unwrap();
            table.add(Endpoint::new([192, 168, 1, 10], MAC));
            table.set_network_up(true);
        })
        .join()
        .unwrap();

        assert!(shared.is_network_up());
        assert!(shared.find_by_ip([192, 168, 1, 10]).is_some());
    }
}
