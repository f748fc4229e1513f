//! Reassembly of fragmented elements and sub-elements.
//!
//! An element whose body does not fit in 255 bytes is sent as a first
//! element of length 255 followed by continuation fragments:
//!
//! ```text
//! [eid][255][255 bytes] [fid][255][255 bytes] ... [fid][K][K bytes]
//! ```
//!
//! The chain ends at the first fragment shorter than 255 bytes or when the
//! byte after a full fragment is not `fid`.

use crate::reader::Reader;
use crate::WireError;
use bytes::{BufMut, Bytes, BytesMut};

/// Length of a full fragment
pub const FRAG_MAX_LEN: usize = 255;

/// Element id of a continuation fragment of a top-level element
pub const FRAGMENT_EID: u8 = 242;

/// Sub-element id of a continuation fragment inside a Multi-Link element
pub const MULTI_LINK_FRAGMENT_SUB_EID: u8 = 254;

/// Result of reassembling one fragment chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defragmented {
    /// Synthetic `[eid][255]` header followed by the concatenated fragment data
    pub bytes: Bytes,
    /// Bytes consumed from the source buffer, headers included
    pub bytes_read: usize,
}

impl Defragmented {
    /// Concatenated fragment data without the synthetic header
    pub fn payload(&self) -> &[u8] {
        &self.bytes[2..]
    }
}

/// Reassemble the fragment chain starting at `start`.
///
/// The byte at `start` must equal `eid`. Any bounds violation aborts the
/// whole chain; callers treat an error as "nothing could be read".
pub fn defragment(buf: &[u8], start: usize, eid: u8, fid: u8) -> Result<Defragmented, WireError> {
    let mut reader = Reader::at(buf, start);
    if reader.u8()? != eid {
        return Err(WireError::Malformed("fragment chain does not start with element id"));
    }

    let mut out = BytesMut::with_capacity(2 + FRAG_MAX_LEN);
    out.put_u8(eid);
    out.put_u8(FRAG_MAX_LEN as u8);

    loop {
        let len = reader.u8()? as usize;
        out.put_slice(reader.bytes(len)?);
        if len != FRAG_MAX_LEN {
            break;
        }
        match reader.peek_u8() {
            Some(next) if next == fid => reader.skip(1)?,
            _ => break,
        }
    }

    Ok(Defragmented {
        bytes: out.freeze(),
        bytes_read: reader.position() - start,
    })
}
