//! Raw information elements and the element id tables.
//!
//! An information element on the wire is
//!
//! ```text
//! +--------+--------+------------+----------------------+
//! | id: u8 | len:u8 | ext:u8 opt | payload (len bytes)  |
//! +--------+--------+------------+----------------------+
//! ```
//!
//! The extension byte is only present when `id == 255` and is counted in
//! `len`. [`RawElement::bytes`] never includes any header byte.

use crate::fragment::{FRAGMENT_EID, FRAG_MAX_LEN};
use crate::WireError;
use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;

/// Element ids
pub mod eid {
    /// SSID
    pub const SSID: u8 = 0;
    /// Supported rates
    pub const SUPPORTED_RATES: u8 = 1;
    /// Traffic indication map
    pub const TIM: u8 = 5;
    /// Country
    pub const COUNTRY: u8 = 7;
    /// BSS load
    pub const BSS_LOAD: u8 = 11;
    /// ERP information
    pub const ERP: u8 = 42;
    /// HT capabilities
    pub const HT_CAPABILITIES: u8 = 45;
    /// RSN
    pub const RSN: u8 = 48;
    /// Extended supported rates
    pub const EXTENDED_SUPPORTED_RATES: u8 = 50;
    /// HT operation
    pub const HT_OPERATION: u8 = 61;
    /// Interworking
    pub const INTERWORKING: u8 = 107;
    /// Roaming consortium
    pub const ROAMING_CONSORTIUM: u8 = 111;
    /// Extended capabilities
    pub const EXTENDED_CAPS: u8 = 127;
    /// VHT capabilities
    pub const VHT_CAPABILITIES: u8 = 191;
    /// VHT operation
    pub const VHT_OPERATION: u8 = 192;
    /// Reduced neighbor report
    pub const RNR: u8 = 201;
    /// Vendor specific
    pub const VSA: u8 = 221;
    /// Fragment
    pub const FRAGMENT: u8 = 242;
    /// RSN extension
    pub const RSN_EXTENSION: u8 = 244;
    /// Element extension present, the next byte is the extension id
    pub const EXTENSION_PRESENT: u8 = 255;
}

/// Extension ids, valid when the element id is [`eid::EXTENSION_PRESENT`]
pub mod eid_ext {
    /// HE capabilities
    pub const HE_CAPABILITIES: u8 = 35;
    /// HE operation
    pub const HE_OPERATION: u8 = 36;
    /// EHT operation
    pub const EHT_OPERATION: u8 = 106;
    /// Multi-link
    pub const MULTI_LINK: u8 = 107;
    /// EHT capabilities
    pub const EHT_CAPABILITIES: u8 = 108;
}

/// Whether an element with this id/extension may be split into fragments
pub fn is_fragmentable(id: u8, id_ext: u8) -> bool {
    id == eid::EXTENSION_PRESENT && id_ext == eid_ext::MULTI_LINK
}

/// One information element as found on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawElement {
    /// Element id
    pub id: u8,
    /// Extension id, 0 unless `id` is [`eid::EXTENSION_PRESENT`]
    pub id_ext: u8,
    /// Payload without the id, length and extension bytes
    #[serde(serialize_with = "hex::serde::serialize")]
    pub bytes: Bytes,
}

impl RawElement {
    /// Create a plain element
    pub fn new(id: u8, bytes: impl Into<Bytes>) -> Self {
        Self {
            id,
            id_ext: 0,
            bytes: bytes.into(),
        }
    }

    /// Create an extension element
    pub fn extension(id_ext: u8, bytes: impl Into<Bytes>) -> Self {
        Self {
            id: eid::EXTENSION_PRESENT,
            id_ext,
            bytes: bytes.into(),
        }
    }

    /// Whether this is an extension element
    pub fn is_extension(&self) -> bool {
        self.id == eid::EXTENSION_PRESENT
    }

    /// Whether this element has the given id (and extension id for extension elements)
    pub fn is(&self, id: u8, id_ext: u8) -> bool {
        self.id == id && (id != eid::EXTENSION_PRESENT || self.id_ext == id_ext)
    }

    /// Encode back to wire bytes.
    ///
    /// Fragmentable extension elements longer than one element are split
    /// into 255-byte fragments the way the scanner reassembles them. Any other
    /// element whose body does not fit the one-byte length fails with
    /// [`WireError::BadLength`].
    pub fn to_bytes(&self) -> Result<Bytes, WireError> {
        let ext_len = usize::from(self.is_extension());
        let body_len = self.bytes.len() + ext_len;
        let mut buf = BytesMut::with_capacity(body_len + 2);

        if body_len <= FRAG_MAX_LEN {
            buf.put_u8(self.id);
            buf.put_u8(body_len as u8);
            if self.is_extension() {
                buf.put_u8(self.id_ext);
            }
            buf.put_slice(&self.bytes);
            return Ok(buf.freeze());
        }

        if !is_fragmentable(self.id, self.id_ext) {
            return Err(WireError::BadLength(body_len));
        }

        // First fragment carries the extension id inside its 255 bytes
        let first = FRAG_MAX_LEN - ext_len;
        buf.put_u8(self.id);
        buf.put_u8(FRAG_MAX_LEN as u8);
        buf.put_u8(self.id_ext);
        buf.put_slice(&self.bytes[..first]);

        for chunk in self.bytes[first..].chunks(FRAG_MAX_LEN) {
            buf.put_u8(FRAGMENT_EID);
            buf.put_u8(chunk.len() as u8);
            buf.put_slice(chunk);
        }

        Ok(buf.freeze())
    }

    /// Encode back to a lowercase hex string
    pub fn to_hex_string(&self) -> Result<String, WireError> {
        Ok(hex::encode(self.to_bytes()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_encoding() {
        let ie = RawElement::new(eid::SSID, &b"lab"[..]);
        assert_eq!(ie.to_bytes().unwrap().as_ref(), &[0, 3, b'l', b'a', b'b']);
        assert_eq!(ie.to_hex_string().unwrap(), "00036c6162");
    }

    #[test]
    fn test_extension_encoding_counts_ext_byte() {
        let ie = RawElement::extension(eid_ext::HE_OPERATION, vec![1, 2]);
        assert_eq!(ie.to_bytes().unwrap().as_ref(), &[255, 3, 36, 1, 2]);
    }

    #[test]
    fn test_oversized_plain_element_rejected() {
        let ie = RawElement::new(eid::VSA, vec![0u8; 256]);
        assert_eq!(ie.to_bytes(), Err(WireError::BadLength(256)));

        let ie = RawElement::extension(eid_ext::HE_CAPABILITIES, vec![0u8; 255]);
        assert_eq!(ie.to_bytes(), Err(WireError::BadLength(256)));
    }

    #[test]
    fn test_multi_link_fragments() {
        let ie = RawElement::extension(eid_ext::MULTI_LINK, vec![0xAA; 300]);
        let wire = ie.to_bytes().unwrap();
        // 3 header + 254 payload, then fragment header + 46 payload
        assert_eq!(wire.len(), 3 + 254 + 2 + 46);
        assert_eq!(&wire[..3], &[255, 255, 107]);
        assert_eq!(&wire[257..259], &[FRAGMENT_EID, 46]);
    }

    #[test]
    fn test_is() {
        let ie = RawElement::extension(eid_ext::EHT_OPERATION, Bytes::new());
        assert!(ie.is(eid::EXTENSION_PRESENT, eid_ext::EHT_OPERATION));
        assert!(!ie.is(eid::EXTENSION_PRESENT, eid_ext::HE_OPERATION));
        let ie = RawElement::new(eid::RSN, Bytes::new());
        assert!(ie.is(eid::RSN, 9));
    }
}
