//! IPv4 header options
//!
//! The rest of the stack expects a 20-byte IPv4 header. Frames whose header
//! carries options either have the options cut out in place, or are dropped,
//! depending on [`FilterConfig::pass_ip_options`].

use log::debug;

use crate::buffer::{field, NetworkBuffer};
use crate::error::{DiscardReason, FrameError};
use crate::iface::config::FilterConfig;
use crate::iface::filter::Verdict;
use crate::network::ethernet::ETHERNET_HEADER_LEN;
use crate::network::ipv4::{Ipv4Header, IPV4_HEADER_LEN, IPV4_MAX_HEADER_LEN};

/// Strip or reject the options of an admitted frame whose IPv4 header is
/// `header_len` bytes long.
///
/// On `Accept` the payload directly follows a 20-byte header, the data
/// length and IP total length are both reduced by the option length and the
/// IHL field reads 5. On `Discard` the buffer is left untouched.
pub fn normalize_options(
    buffer: &mut NetworkBuffer,
    header_len: usize,
    config: &FilterConfig,
) -> Verdict {
    if !config.pass_ip_options {
        debug!("dropping IPv4 frame: {}", DiscardReason::IpOptions);
        return Verdict::Discard;
    }

    match strip_options(buffer, header_len) {
        Ok(()) => Verdict::Accept,
        Err(e) => {
            debug!("dropping IPv4 frame: {}", DiscardReason::Malformed(e));
            Verdict::Discard
        }
    }
}

fn strip_options(buffer: &mut NetworkBuffer, header_len: usize) -> Result<(), FrameError> {
    if header_len <= IPV4_HEADER_LEN {
        return Ok(());
    }

    let data_len = buffer.data_len();
    if header_len > IPV4_MAX_HEADER_LEN {
        return Err(FrameError::OutOfBounds {
            offset: ETHERNET_HEADER_LEN,
            len: header_len,
            available: data_len,
        });
    }
    let option_len = header_len - IPV4_HEADER_LEN;

    // Validate before the first write so a failure leaves the frame as is.
    let new_total_len = {
        let ip_data = field(buffer.data(), ETHERNET_HEADER_LEN, header_len)?;
        let ip = Ipv4Header::new(ip_data)?;
        let total = ip.total_len();
        (total as usize)
            .checked_sub(header_len)
            .map(|payload_len| (payload_len + IPV4_HEADER_LEN) as u16)
            .ok_or(FrameError::TotalLengthTooShort { total, header_len })?
    };

    // From the old start of the transport header to the end of the data,
    // moved to where a 20-byte header ends.
    let source = ETHERNET_HEADER_LEN + header_len..data_len;
    buffer.copy_within(source, ETHERNET_HEADER_LEN + IPV4_HEADER_LEN)?;
    buffer.set_data_len(data_len - option_len)?;

    let mut ip = Ipv4Header::new(&mut buffer.data_mut()[ETHERNET_HEADER_LEN..])?;
    ip.set_total_len(new_total_len);
    // High nibble is the version.
    let version_ihl = ip.version_ihl();
    ip.set_version_ihl((version_ihl & 0xF0) | ((IPV4_HEADER_LEN >> 2) as u8 & 0x0F));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{BigEndian, ByteOrder};

    /// Ethernet header, IPv4 header with `options`, then `payload`.
    fn frame_with_options(options: &[u8], payload: &[u8]) -> Vec<u8> {
        let header_len = IPV4_HEADER_LEN + options.len();
        let mut frame = vec![0u8; ETHERNET_HEADER_LEN];
        BigEndian::write_u16(&mut frame[12..14], 0x0800);
        let mut ip = vec![0u8; IPV4_HEADER_LEN];
        ip[0] = 0x40 | (header_len / 4) as u8;
        BigEndian::write_u16(&mut ip[2..4], (header_len + payload.len()) as u16);
        ip[8] = 64;
        ip[9] = 17;
        frame.extend_from_slice(&ip);
        frame.extend_from_slice(options);
        frame.extend_from_slice(payload);
        frame
    }

    const ROUTER_ALERT: [u8; 4] = [0x94, 0x04, 0x00, 0x00];

    #[test]
    fn strips_options_in_place() {
        let payload: Vec<u8> = (0u8..32).collect();
        let frame = frame_with_options(&ROUTER_ALERT, &payload);
        let original_len = frame.len();
        let mut buffer = NetworkBuffer::new(frame);

        let config = FilterConfig::default().with_ip_options(true);
        assert_eq!(normalize_options(&mut buffer, 24, &config), Verdict::Accept);

        assert_eq!(buffer.data_len(), original_len - 4);
        let ip = Ipv4Header::new(&buffer.data()[ETHERNET_HEADER_LEN..]).unwrap();
        assert_eq!(ip.version(), 4);
        assert_eq!(ip.header_len(), 20);
        assert_eq!(ip.total_len() as usize, 20 + payload.len());
        assert_eq!(&buffer.data()[ETHERNET_HEADER_LEN + 20..], &payload[..]);
    }

    #[test]
    fn rejected_when_options_not_passed() {
        let frame = frame_with_options(&ROUTER_ALERT, b"payload!");
        let mut buffer = NetworkBuffer::new(frame.clone());

        let config = FilterConfig::default().with_ip_options(false);
        assert_eq!(normalize_options(&mut buffer, 24, &config), Verdict::Discard);
        assert_eq!(buffer.data(), &frame[..]);
    }

    #[test]
    fn inconsistent_total_length_leaves_buffer_untouched() {
        let mut frame = frame_with_options(&ROUTER_ALERT, b"payload!");
        BigEndian::write_u16(&mut frame[ETHERNET_HEADER_LEN + 2..], 22);
        let mut buffer = NetworkBuffer::new(frame.clone());

        assert_eq!(
            normalize_options(&mut buffer, 24, &FilterConfig::default()),
            Verdict::Discard
        );
        assert_eq!(buffer.data(), &frame[..]);
    }

    #[test]
    fn header_beyond_data_is_discarded() {
        let frame = frame_with_options(&ROUTER_ALERT, b"");
        let mut buffer = NetworkBuffer::new(frame);
        assert_eq!(
            normalize_options(&mut buffer, 40, &FilterConfig::default()),
            Verdict::Discard
        );
    }

    #[test]
    fn maximum_header_length() {
        let options = [0x01u8; 40]; // NOP padding
        let frame = frame_with_options(&options, b"tail");
        let mut buffer = NetworkBuffer::new(frame);

        assert_eq!(
            normalize_options(&mut buffer, 60, &FilterConfig::default()),
            Verdict::Accept
        );
        assert_eq!(buffer.data_len(), ETHERNET_HEADER_LEN + 20 + 4);
        assert_eq!(&buffer.data()[ETHERNET_HEADER_LEN + 20..], b"tail");
        assert_eq!(buffer.data()[ETHERNET_HEADER_LEN], 0x45);
    }
}
