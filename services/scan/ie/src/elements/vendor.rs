//! Vendor specific element.
//!
//! Only Wi-Fi Alliance payloads are decoded further: the Hotspot 2.0
//! indication and the MBO-OCE attribute list.

use crate::decode::Decode;
use crate::element::eid;
use crate::reader::Reader;
use crate::WireError;
use serde::Serialize;
use tracing::trace;

/// Wi-Fi Alliance OUI
pub const OUI_WFA: u32 = 0x50_6F9A;
/// Hotspot 2.0 indication OUI type
pub const OUI_TYPE_HS20: u8 = 0x10;
/// MBO-OCE OUI type
pub const OUI_TYPE_MBO_OCE: u8 = 0x16;

const HS20_MIN_LEN: usize = 5;
const HS20_DOMAIN_ID_PRESENT: u8 = 0x04;
const HS20_PPS_MO_ID_PRESENT: u8 = 0x02;

const MBO_AP_CAPABILITY_INDICATION: u8 = 0x01;
const MBO_ASSOCIATION_DISALLOWED: u8 = 0x04;
const OCE_AP_CAPABILITY_INDICATION: u8 = 0x65;
const MBO_CELLULAR_DATA_AWARE: u8 = 0x40;

/// Hotspot 2.0 release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HsRelease {
    /// Release 1
    R1,
    /// Release 2
    R2,
    /// Release 3
    R3,
    /// Newer or reserved
    Unknown,
}

/// Vendor specific element
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Vsa {
    /// Organisationally unique identifier, big-endian
    pub oui: Option<u32>,
    /// Hotspot 2.0 release from the HS2.0 indication
    pub hs_release: Option<HsRelease>,
    /// ANQP domain id, 0 when not advertised
    pub anqp_domain_id: u16,
    /// MBO AP capability indication present
    pub mbo_capable: bool,
    /// AP is cellular data aware
    pub mbo_cellular_data_aware: bool,
    /// OCE AP capability indication present
    pub oce_capable: bool,
    /// MBO association disallowed reason code
    pub mbo_association_disallowed_reason: Option<u8>,
}

impl Vsa {
    /// Whether this is a Hotspot 2.0 indication
    pub fn is_hs20(&self) -> bool {
        self.hs_release.is_some()
    }

    fn parse_hs20(&mut self, b: &[u8]) -> Result<(), WireError> {
        if b.len() < HS20_MIN_LEN {
            return Ok(());
        }
        let mut r = Reader::at(b, 4);
        let conf = r.u8()?;
        self.hs_release = Some(match (conf >> 4) & 0x0F {
            0 => HsRelease::R1,
            1 => HsRelease::R2,
            2 => HsRelease::R3,
            _ => HsRelease::Unknown,
        });

        if conf & HS20_DOMAIN_ID_PRESENT != 0 {
            let mut expected = HS20_MIN_LEN + 2;
            if conf & HS20_PPS_MO_ID_PRESENT != 0 {
                expected += 2;
                if b.len() < expected {
                    return Err(WireError::TooShort {
                        need: expected,
                        have: b.len(),
                    });
                }
                r.skip(2)?;
            }
            if b.len() < expected {
                return Err(WireError::TooShort {
                    need: expected,
                    have: b.len(),
                });
            }
            self.anqp_domain_id = r.u16_le()?;
        }
        Ok(())
    }

    fn parse_mbo_oce(&mut self, b: &[u8]) -> Result<(), WireError> {
        let mut r = Reader::at(b, 4);
        while r.remaining() > 1 {
            let id = r.u8()?;
            let len = usize::from(r.u8()?);
            if len == 0 || len > r.remaining() {
                break;
            }
            let attr = r.bytes(len)?;
            match id {
                MBO_AP_CAPABILITY_INDICATION => {
                    self.mbo_capable = true;
                    self.mbo_cellular_data_aware = attr[0] & MBO_CELLULAR_DATA_AWARE != 0;
                }
                MBO_ASSOCIATION_DISALLOWED => {
                    self.mbo_association_disallowed_reason = Some(attr[0]);
                }
                OCE_AP_CAPABILITY_INDICATION => self.oce_capable = true,
                _ => {}
            }
        }
        trace!(
            mbo = self.mbo_capable,
            cell_data_aware = self.mbo_cellular_data_aware,
            oce = self.oce_capable,
            "MBO-OCE attributes"
        );
        Ok(())
    }
}

impl Decode for Vsa {
    const NAME: &'static str = "Vendor Specific";

    fn accepts(id: u8, _id_ext: u8) -> bool {
        id == eid::VSA
    }

    fn decode_payload(b: &[u8]) -> Result<Self, WireError> {
        let mut vsa = Self::default();
        if b.len() < 3 {
            return Ok(vsa);
        }
        let oui = u32::from_be_bytes([0, b[0], b[1], b[2]]);
        vsa.oui = Some(oui);

        if oui == OUI_WFA && b.len() >= 4 {
            match b[3] {
                OUI_TYPE_HS20 => vsa.parse_hs20(b)?,
                OUI_TYPE_MBO_OCE => vsa.parse_mbo_oce(b)?,
                _ => {}
            }
        }
        Ok(vsa)
    }
}
