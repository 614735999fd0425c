//! Minimal IPv6 header access
//!
//! The IPv4 receive path only needs to know where an IPv6 packet's transport
//! header starts and which protocol it carries.

use crate::buffer::field;
use crate::error::FrameError;

/// Fixed IPv6 header length
pub const IPV6_HEADER_LEN: usize = 40;

const NEXT_HEADER: usize = 6;

/// Next-header field of the IPv6 header at the start of `data`.
pub fn next_header(data: &[u8]) -> Result<u8, FrameError> {
    field(data, NEXT_HEADER, 1).map(|b| b[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_next_header() {
        let mut header = [0u8; IPV6_HEADER_LEN];
        header[0] = 0x60;
        header[NEXT_HEADER] = 17;
        assert_eq!(next_header(&header), Ok(17));
        assert!(next_header(&header[..6]).is_err());
    }
}
