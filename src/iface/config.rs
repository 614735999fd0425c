//! Receive filter configuration
//!
//! Set once when the stack starts and read-only afterwards. Each flag
//! selects which family of checks the filter runs.

/// Which receive checks the driver already performs, and how strict the
/// filter is about optional IP features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterConfig {
    /// The driver drops fragments and frames not addressed to this node.
    /// Skips fragment, header length and address checks.
    pub driver_filters_packets: bool,
    /// The NIC verified the IP and protocol checksums.
    /// Size fields are still validated.
    pub driver_validates_checksums: bool,
    /// Strip IP options instead of dropping option-bearing packets.
    pub pass_ip_options: bool,
    /// Accept UDP segments sent without a checksum.
    pub pass_zero_udp_checksum: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            driver_filters_packets: false,
            driver_validates_checksums: false,
            pass_ip_options: true,
            pass_zero_udp_checksum: false,
        }
    }
}

impl FilterConfig {
    pub fn with_driver_filtering(mut self, enabled: bool) -> Self {
        self.driver_filters_packets = enabled;
        self
    }

    pub fn with_driver_checksums(mut self, enabled: bool) -> Self {
        self.driver_validates_checksums = enabled;
        self
    }

    pub fn with_ip_options(mut self, pass: bool) -> Self {
        self.pass_ip_options = pass;
        self
    }

    pub fn with_zero_udp_checksum(mut self, pass: bool) -> Self {
        self.pass_zero_udp_checksum = pass;
        self
    }
}
