//! TLV scanner for the information-element body of a management frame.
//!
//! The scanner never fails on malformed trailing data: it stops at the first
//! element it cannot take and returns everything found up to that point.

use crate::element::{eid, is_fragmentable, RawElement};
use crate::fragment::{defragment, FRAGMENT_EID, FRAG_MAX_LEN};
use crate::reader::Reader;
use crate::WireError;
use bytes::Bytes;
use tracing::{debug, trace};

/// Split `buf` into its information elements.
///
/// Scanning stops without error when
/// - a declared length runs past the end of the buffer,
/// - a second SSID element appears (padding that happens to look like one),
/// - an extension element has length 0,
/// - a fragmented element cannot be reassembled.
pub fn scan(buf: &[u8]) -> Vec<RawElement> {
    let mut elements = Vec::new();
    let mut found_ssid = false;
    let mut reader = Reader::new(buf);

    while reader.remaining() > 1 {
        let start = reader.position();
        let (id, len) = match (reader.u8(), reader.u8()) {
            (Ok(id), Ok(len)) => (id, len as usize),
            _ => break,
        };

        if len > reader.remaining() {
            debug!("element {} length {} overruns buffer at {}", id, len, start);
            break;
        }
        if id == eid::SSID && found_ssid {
            debug!("duplicate SSID at {}, stopping", start);
            break;
        }

        let mut id_ext = 0;
        let mut payload_len = len;
        if id == eid::SSID {
            found_ssid = true;
        } else if id == eid::EXTENSION_PRESENT {
            if len == 0 {
                debug!("empty extension element at {}, stopping", start);
                break;
            }
            id_ext = match reader.u8() {
                Ok(ext) => ext,
                Err(_) => break,
            };
            payload_len -= 1;

            if is_fragmentable(id, id_ext) && len == FRAG_MAX_LEN {
                let defrag = match defragment(buf, start, id, FRAGMENT_EID) {
                    Ok(defrag) => defrag,
                    Err(e) => {
                        debug!("cannot reassemble element {}/{}: {}", id, id_ext, e);
                        break;
                    }
                };
                // Skip the synthetic header and the extension id
                let bytes = defrag.bytes.slice(3..);
                trace!(id, id_ext, len = bytes.len(), "reassembled element");
                elements.push(RawElement { id, id_ext, bytes });
                reader = Reader::at(buf, start + defrag.bytes_read);
                continue;
            }
        }

        let bytes = match reader.bytes(payload_len) {
            Ok(bytes) => Bytes::copy_from_slice(bytes),
            Err(_) => break,
        };
        trace!(id, id_ext, len = payload_len, "element");
        elements.push(RawElement { id, id_ext, bytes });
    }

    elements
}

/// Split a hex-encoded frame body into its information elements
pub fn scan_hex(data: &str) -> Result<Vec<RawElement>, WireError> {
    let buf = hex::decode(data.trim())?;
    Ok(scan(&buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::eid_ext;

    #[test]
    fn test_empty() {
        assert!(scan(&[]).is_empty());
        assert!(scan(&[0]).is_empty());
    }

    #[test]
    fn test_basic_elements() {
        let buf = [0, 2, b'h', b'i', 1, 1, 0x82, 221, 0];
        let ies = scan(&buf);
        assert_eq!(ies.len(), 3);
        assert_eq!(ies[0].id, eid::SSID);
        assert_eq!(ies[0].bytes.as_ref(), b"hi");
        assert_eq!(ies[1].bytes.as_ref(), &[0x82]);
        assert!(ies[2].bytes.is_empty());
    }

    #[test]
    fn test_extension_element() {
        let buf = [255, 3, eid_ext::HE_OPERATION, 0xAA, 0xBB];
        let ies = scan(&buf);
        assert_eq!(ies.len(), 1);
        assert_eq!(ies[0].id_ext, eid_ext::HE_OPERATION);
        assert_eq!(ies[0].bytes.as_ref(), &[0xAA, 0xBB]);
    }

    #[test]
    fn test_length_overrun_stops() {
        let buf = [1, 1, 0x82, 45, 10, 0, 0];
        let ies = scan(&buf);
        assert_eq!(ies.len(), 1);
    }

    #[test]
    fn test_duplicate_ssid_stops() {
        let buf = [0, 1, b'a', 1, 1, 0x82, 0, 0, 1, 1, 0x84];
        let ies = scan(&buf);
        assert_eq!(ies.len(), 2);
        assert_eq!(ies[1].id, eid::SUPPORTED_RATES);
    }

    #[test]
    fn test_empty_extension_stops() {
        let buf = [1, 1, 0x82, 255, 0, 1, 1, 0x84];
        assert_eq!(scan(&buf).len(), 1);
    }

    #[test]
    fn test_trailing_byte_ignored() {
        let buf = [1, 1, 0x82, 7];
        assert_eq!(scan(&buf).len(), 1);
    }

    #[test]
    fn test_fragmented_multi_link() {
        let mut buf = vec![255, 255, eid_ext::MULTI_LINK];
        buf.extend([0x11; 254]);
        buf.extend([FRAGMENT_EID, 4, 1, 2, 3, 4]);
        buf.extend([1, 1, 0x82]);
        let ies = scan(&buf);
        assert_eq!(ies.len(), 2);
        assert_eq!(ies[0].id_ext, eid_ext::MULTI_LINK);
        assert_eq!(ies[0].bytes.len(), 258);
        assert_eq!(&ies[0].bytes[254..], &[1, 2, 3, 4]);
        assert_eq!(ies[1].id, eid::SUPPORTED_RATES);
    }

    #[test]
    fn test_full_length_non_fragmentable_extension() {
        let mut buf = vec![255, 255, eid_ext::HE_CAPABILITIES];
        buf.extend([0; 254]);
        buf.extend([FRAGMENT_EID, 1, 9]);
        let ies = scan(&buf);
        assert_eq!(ies.len(), 2);
        assert_eq!(ies[0].bytes.len(), 254);
        assert_eq!(ies[1].id, FRAGMENT_EID);
    }

    #[test]
    fn test_scan_hex() {
        let ies = scan_hex("0003616263").unwrap();
        assert_eq!(ies.len(), 1);
        assert_eq!(ies[0].bytes.as_ref(), b"abc");
        assert!(scan_hex("0").is_err());
        assert!(scan_hex("zz").is_err());
    }
}
