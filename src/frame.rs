// ABOUTME: Defines the length-prefixed TLV wire frame shared by every connection
// ABOUTME: Provides check/parse for incremental reads and encode for outbound writes

use bytes::{Buf, Bytes};
use std::io::Cursor;
use thiserror::Error;

/// Chat text. Payload is UTF-8 carrying the `CHAT:` / `FROM:` sub-protocol.
pub const TYPE_CHAT: u8 = 0;
/// Control/command. Payload is UTF-8 carrying the command vocabulary (`SET_NAME:`, `GET_USERS`, ...).
pub const TYPE_CONTROL: u8 = 1;
/// Binary file payload, relayed opaquely except for its destination/sender header.
pub const TYPE_BINARY: u8 = 2;

const HEADER_LEN: usize = 5;

/// One TLV unit on the wire: a 1-byte type, a 4-byte big-endian length, and
/// exactly `length` payload bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub frame_type: u8,
    pub payload: Bytes,
}

impl Frame {
    /// Builds a frame for `frame_type` and `payload`, rejecting types outside
    /// `{0,1,2}` and payloads too large to fit the 4-byte length field.
    pub fn new(frame_type: u8, payload: impl Into<Bytes>) -> Result<Frame, FrameError> {
        if !matches!(frame_type, TYPE_CHAT | TYPE_CONTROL | TYPE_BINARY) {
            return Err(FrameError::InvalidType(frame_type));
        }
        let payload = payload.into();
        if payload.len() > u32::MAX as usize {
            return Err(FrameError::PayloadTooLarge {
                len: u32::try_from(payload.len()).unwrap_or(u32::MAX),
                max: u32::MAX,
            });
        }
        Ok(Frame { frame_type, payload })
    }

    /// Serializes this frame to its wire representation.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.payload.len());
        out.push(self.frame_type);
        out.extend_from_slice(&(self.payload.len() as u32).to_be_bytes());
        out.extend_from_slice(&self.payload);
        out
    }

    /// Checks whether `src` contains a complete frame without allocating the
    /// payload. Leaves the cursor position unspecified on success; callers
    /// reset it before calling [`Frame::parse`].
    pub fn check(src: &mut Cursor<&[u8]>) -> Result<(), FrameError> {
        if src.remaining() < HEADER_LEN {
            return Err(FrameError::Incomplete);
        }

        let frame_type = peek_u8(src, 0);
        if !matches!(frame_type, TYPE_CHAT | TYPE_CONTROL | TYPE_BINARY) {
            return Err(FrameError::InvalidType(frame_type));
        }

        let len = peek_u32(src, 1) as usize;
        if src.remaining() < HEADER_LEN + len {
            return Err(FrameError::Incomplete);
        }
        Ok(())
    }

    /// Parses a complete frame out of `src`, advancing the cursor past it.
    /// Callers must have already confirmed completeness with [`Frame::check`].
    pub fn parse(src: &mut Cursor<&[u8]>) -> Result<Frame, FrameError> {
        let frame_type = src.get_u8();
        let len = src.get_u32() as usize;
        let mut payload = vec![0u8; len];
        src.copy_to_slice(&mut payload);
        Ok(Frame {
            frame_type,
            payload: Bytes::from(payload),
        })
    }
}

fn peek_u8(src: &Cursor<&[u8]>, offset: usize) -> u8 {
    src.get_ref()[src.position() as usize + offset]
}

fn peek_u32(src: &Cursor<&[u8]>, offset: usize) -> u32 {
    let base = src.position() as usize + offset;
    let bytes = &src.get_ref()[base..base + 4];
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Errors produced while framing the wire protocol.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Not enough data buffered yet to parse a whole frame. Not a real
    /// error condition: it tells the caller to read more bytes.
    #[error("incomplete frame")]
    Incomplete,

    #[error("invalid frame type: {0}")]
    InvalidType(u8),

    #[error("payload too large: {len} bytes exceeds the {max} byte limit")]
    PayloadTooLarge { len: u32, max: u32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
