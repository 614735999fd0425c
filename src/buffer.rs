//! Received frame storage
//!
//! A `NetworkBuffer` owns the bytes of one received Ethernet frame together
//! with its logical data length. The receive path may shrink the data length
//! (when IP options are stripped) but never grows or reallocates the storage.

use std::ops::Range;

use crate::error::FrameError;
use crate::iface::endpoint::Endpoint;

/// One received frame and the bookkeeping the receive path attaches to it.
#[derive(Debug, Clone)]
pub struct NetworkBuffer {
    storage: Vec<u8>,
    data_len: usize,
    endpoint: Option<Endpoint>,
}

impl NetworkBuffer {
    /// Wrap frame bytes handed over by the driver. The data length starts at
    /// the full length of `storage`.
    pub fn new(storage: Vec<u8>) -> Self {
        let data_len = storage.len();
        NetworkBuffer {
            storage,
            data_len,
            endpoint: None,
        }
    }

    pub fn from_slice(frame: &[u8]) -> Self {
        Self::new(frame.to_vec())
    }

    /// The valid frame bytes, `[0, data_len)`.
    pub fn data(&self) -> &[u8] {
        &self.storage[..self.data_len]
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.storage[..self.data_len]
    }

    pub fn data_len(&self) -> usize {
        self.data_len
    }

    /// Shrink the logical data length. Growing is refused.
    pub fn set_data_len(&mut self, len: usize) -> Result<(), FrameError> {
        if len > self.data_len {
            return Err(FrameError::GrowNotAllowed {
                current: self.data_len,
                requested: len,
            });
        }
        self.data_len = len;
        Ok(())
    }

    /// Overlap-safe move of `src` to `dest` inside `[0, data_len)`.
    pub fn copy_within(&mut self, src: Range<usize>, dest: usize) -> Result<(), FrameError> {
        let available = self.data_len;
        if src.start > src.end || src.end > available {
            return Err(FrameError::OutOfBounds {
                offset: src.start,
                len: src.end.saturating_sub(src.start),
                available,
            });
        }
        let len = src.end - src.start;
        match dest.checked_add(len) {
            Some(end) if end <= available => {}
            _ => {
                return Err(FrameError::OutOfBounds {
                    offset: dest,
                    len,
                    available,
                })
            }
        }
        self.storage.copy_within(src, dest);
        Ok(())
    }

    /// The endpoint the driver already associated with this frame, if any.
    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }

    pub fn set_endpoint(&mut self, endpoint: Option<Endpoint>) {
        self.endpoint = endpoint;
    }
}

/// Bounds-checked sub-slice of `data`.
pub(crate) fn field(data: &[u8], offset: usize, len: usize) -> Result<&[u8], FrameError> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or(FrameError::OutOfBounds {
            offset,
            len,
            available: data.len(),
        })
}
