//! Basic Multi-Link element.
//!
//! ```text
//! | Control | Common Info                       | Link Info         |
//!      2      len(1) MLD MAC(6) [link id(1)] ...  sub-elements ...
//! ```
//!
//! Link Info holds `[id][len][body]` sub-elements. The walk advances by the
//! declared length alone, with the header counted inside it, so a profile
//! slice is `len` bytes from its id byte. Per-STA profiles (id 0) longer than
//! 255 bytes are fragmented with sub-element id 254. Any bounds failure
//! discards the whole element.

use super::mlo::{MacAddress, MloLink};
use crate::decode::Decode;
use crate::element::{eid, eid_ext};
use crate::fragment::{defragment, FRAG_MAX_LEN, MULTI_LINK_FRAGMENT_SUB_EID};
use crate::WireError;
use serde::Serialize;

const CONTROL_LEN: usize = 2;
const COMMON_INFO_MIN_LEN: usize = 7;
const TYPE_MASK: u8 = 0x07;
const TYPE_BASIC: u8 = 0;
const LINK_ID_PRESENT: u8 = 0x10;
const LINK_ID_MASK: u8 = 0x0F;

const PER_STA_PROFILE_SUB_EID: u8 = 0;
const SUB_ELEMENT_MIN_LEN: usize = 5;
const STA_CONTROL_OFFSET: usize = 2;
const STA_INFO_OFFSET: usize = 4;
const STA_MAC_PRESENT: u8 = 0x20;
const STA_INFO_MAC_MIN_LEN: usize = 7;

/// Basic Multi-Link element
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MultiLink {
    /// Element was a well formed Basic Multi-Link element
    pub present: bool,
    /// Link id of the reporting AP, if advertised
    pub link_id: Option<u8>,
    /// MLD MAC address
    pub mld_mac_address: Option<MacAddress>,
    /// Other links of the MLD, one per per-STA profile
    pub affiliated_links: Vec<MloLink>,
}

impl Decode for MultiLink {
    const NAME: &'static str = "Multi-Link";

    fn accepts(id: u8, id_ext: u8) -> bool {
        id == eid::EXTENSION_PRESENT && id_ext == eid_ext::MULTI_LINK
    }

    fn decode_payload(b: &[u8]) -> Result<Self, WireError> {
        if b.len() < CONTROL_LEN {
            return Err(WireError::TooShort {
                need: CONTROL_LEN,
                have: b.len(),
            });
        }
        if b[0] & TYPE_MASK != TYPE_BASIC {
            return Err(WireError::Malformed("multi-link element is not the basic type"));
        }
        let min_len = CONTROL_LEN + COMMON_INFO_MIN_LEN;
        if b.len() < min_len {
            return Err(WireError::TooShort {
                need: min_len,
                have: b.len(),
            });
        }

        let common_len = usize::from(b[CONTROL_LEN]);
        if common_len < COMMON_INFO_MIN_LEN {
            return Err(WireError::Malformed("common info shorter than 7 bytes"));
        }

        let mut ml = Self::default();
        if b[0] & LINK_ID_PRESENT != 0 {
            if b.len() < min_len + 1 {
                return Err(WireError::TooShort {
                    need: min_len + 1,
                    have: b.len(),
                });
            }
            ml.link_id = Some(b[CONTROL_LEN + COMMON_INFO_MIN_LEN] & LINK_ID_MASK);
        }
        ml.mld_mac_address = MacAddress::from_slice(&b[CONTROL_LEN + 1..]);

        ml.affiliated_links = parse_link_info(b, CONTROL_LEN + common_len)?;
        ml.present = true;
        Ok(ml)
    }
}

fn parse_link_info(b: &[u8], mut offset: usize) -> Result<Vec<MloLink>, WireError> {
    let mut links = Vec::new();

    while b.len() >= offset + SUB_ELEMENT_MIN_LEN {
        let sub_id = b[offset];
        let sub_len = usize::from(b[offset + 1]);
        if sub_len == 0 || b.len() < offset + sub_len {
            return Err(WireError::Malformed("invalid link info sub-element length"));
        }

        if sub_id != PER_STA_PROFILE_SUB_EID {
            offset += sub_len;
            continue;
        }

        if sub_len == FRAG_MAX_LEN {
            let defrag = defragment(b, offset, PER_STA_PROFILE_SUB_EID, MULTI_LINK_FRAGMENT_SUB_EID)?;
            links.push(parse_per_sta_profile(&defrag.bytes)?);
            offset += defrag.bytes_read;
        } else {
            links.push(parse_per_sta_profile(&b[offset..offset + sub_len])?);
            offset += sub_len;
        }
    }

    Ok(links)
}

/// `sub` starts at the sub-element id byte
fn parse_per_sta_profile(sub: &[u8]) -> Result<MloLink, WireError> {
    if sub.len() < SUB_ELEMENT_MIN_LEN {
        return Err(WireError::TooShort {
            need: SUB_ELEMENT_MIN_LEN,
            have: sub.len(),
        });
    }
    let sta_control = sub[STA_CONTROL_OFFSET];
    let sta_info_len = usize::from(sub[STA_INFO_OFFSET]);
    if sub.len() < STA_INFO_OFFSET + sta_info_len {
        return Err(WireError::Malformed("STA info overruns per-STA profile"));
    }

    let mut link = MloLink {
        link_id: sta_control & LINK_ID_MASK,
        ..MloLink::default()
    };
    if sta_control & STA_MAC_PRESENT != 0 {
        if sta_info_len < STA_INFO_MAC_MIN_LEN {
            return Err(WireError::Malformed("STA info too short for MAC address"));
        }
        link.ap_mac_address = MacAddress::from_slice(&sub[STA_INFO_OFFSET + 1..]);
    }
    Ok(link)
}
