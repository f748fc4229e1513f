//! Reduced Neighbor Report element.
//!
//! ```text
//! | TBTT Info Header | Op Class | Channel | TBTT Info Set          |
//!          2              1          1      count * tbtt_info_len
//! ```
//!
//! Only TBTT info entries carrying MLD parameters are decoded: the 4-byte
//! short form and the 16+ byte form with a BSSID.

use super::mlo::{MacAddress, MloLink};
use crate::band::band_from_op_class;
use crate::decode::Decode;
use crate::element::eid;
use crate::WireError;
use serde::Serialize;

const NEIGHBOR_HEADER_LEN: usize = 4;
const TBTT_INFO_COUNT_MASK: u8 = 0xF0;
const LINK_ID_MASK: u8 = 0x0F;

/// Affiliated links advertised through a reduced neighbor report
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Rnr {
    /// Element was well formed
    pub present: bool,
    /// Links with MLD id 0, i.e. affiliated with the reporting AP
    pub affiliated_mlo_links: Vec<MloLink>,
}

impl Decode for Rnr {
    const NAME: &'static str = "Reduced Neighbor Report";

    fn accepts(id: u8, _id_ext: u8) -> bool {
        id == eid::RNR
    }

    fn decode_payload(b: &[u8]) -> Result<Self, WireError> {
        let mut links = Vec::new();
        let mut start = 0;

        while b.len() > start + NEIGHBOR_HEADER_LEN {
            let count = usize::from((b[start] & TBTT_INFO_COUNT_MASK) >> 4) + 1;
            let info_len = usize::from(b[start + 1]);
            let mut info = start + NEIGHBOR_HEADER_LEN;

            let (mld_offset, bssid_offset) = match info_len {
                4 => (1, None),
                16.. => (13, Some(1)),
                _ => (0, None),
            };

            if mld_offset != 0 {
                let need = start + NEIGHBOR_HEADER_LEN + info_len * count;
                if b.len() < need {
                    return Err(WireError::TooShort {
                        need,
                        have: b.len(),
                    });
                }

                let op_class = b[start + 2];
                let channel = b[start + 3];
                // One bad record discards the whole element
                let band = band_from_op_class(op_class, channel)?;

                for _ in 0..count {
                    if b[info + mld_offset] == 0 {
                        links.push(MloLink {
                            link_id: b[info + mld_offset + 1] & LINK_ID_MASK,
                            band,
                            channel,
                            ap_mac_address: bssid_offset
                                .and_then(|off| MacAddress::from_slice(&b[info + off..])),
                        });
                    }
                    info += info_len;
                }
            }

            start += NEIGHBOR_HEADER_LEN + count * info_len;
        }

        Ok(Self {
            present: true,
            affiliated_mlo_links: links,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::band::Band;
    use crate::element::RawElement;

    #[test]
    fn test_short_form_links() {
        let ie = RawElement::new(
            eid::RNR,
            vec![
                0x00, 0x04, 81, 11, // first neighbor, one entry
                0x00, 0x00, 0x01, 0x00, //
                0x10, 0x04, 120, 149, // second neighbor, two entries
                0x00, 0x00, 0x02, 0x00, //
                0x00, 0x22, 0x01, 0x00,
            ],
        );
        let rnr = Rnr::decode(&ie).unwrap();
        assert!(rnr.present);
        assert_eq!(rnr.affiliated_mlo_links.len(), 2);
        assert_eq!(rnr.affiliated_mlo_links[0].link_id, 1);
        assert_eq!(rnr.affiliated_mlo_links[0].band, Band::Ghz2_4);
        assert_eq!(rnr.affiliated_mlo_links[0].channel, 11);
        assert_eq!(rnr.affiliated_mlo_links[1].link_id, 2);
        assert_eq!(rnr.affiliated_mlo_links[1].band, Band::Ghz5);
        assert!(rnr.affiliated_mlo_links[1].ap_mac_address.is_none());
    }

    #[test]
    fn test_long_form_with_bssid() {
        let mut payload = vec![0x00, 16, 131, 37];
        let mut info = vec![0u8; 16];
        info[1..7].copy_from_slice(&[0x02, 0x11, 0x22, 0x33, 0x44, 0x55]);
        info[13] = 0;
        info[14] = 0x03;
        payload.extend(info);
        let rnr = Rnr::decode(&RawElement::new(eid::RNR, payload)).unwrap();
        assert_eq!(rnr.affiliated_mlo_links.len(), 1);
        let link = &rnr.affiliated_mlo_links[0];
        assert_eq!(link.link_id, 3);
        assert_eq!(link.band, Band::Ghz6);
        assert_eq!(
            link.ap_mac_address.unwrap().to_string(),
            "02:11:22:33:44:55"
        );
    }

    #[test]
    fn test_other_lengths_skipped() {
        let payload = vec![0x00, 0x07, 200, 1, 0, 0, 0, 0, 0, 0, 0];
        let rnr = Rnr::decode(&RawElement::new(eid::RNR, payload)).unwrap();
        assert!(rnr.present);
        assert!(rnr.affiliated_mlo_links.is_empty());
    }

    #[test]
    fn test_unknown_band_discards_element() {
        let payload = vec![
            0x00, 0x04, 81, 6, 0x00, 0x00, 0x01, 0x00, // good record
            0x00, 0x04, 200, 6, 0x00, 0x00, 0x02, 0x00, // unknown class
        ];
        let err = Rnr::decode_payload(&payload).unwrap_err();
        assert_eq!(
            err,
            WireError::UnknownBand {
                op_class: 200,
                channel: 6
            }
        );
    }

    #[test]
    fn test_truncated_set_discards_element() {
        let payload = vec![0x10, 0x04, 81, 6, 0x00, 0x00, 0x01, 0x00, 0x00];
        assert!(matches!(
            Rnr::decode_payload(&payload),
            Err(WireError::TooShort { .. })
        ));
    }
}
