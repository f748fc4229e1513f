//! HT, VHT, HE and EHT capability elements.

use super::test_bit;
use crate::decode::Decode;
use crate::element::{eid, eid_ext};
use crate::WireError;
use serde::Serialize;
use tracing::{debug, trace};

/// Highest spatial stream count whose 2-bit MCS map entry is not `0b11`.
///
/// The map holds eight 2-bit entries, stream 1 in the low bits. Returns 1
/// when every entry is unsupported.
pub fn max_spatial_streams_from_mcs_map(mcs_map: u16) -> u8 {
    (1..=8u8)
        .rev()
        .find(|&streams| (mcs_map >> ((streams - 1) * 2)) & 0x03 != 0x03)
        .unwrap_or(1)
}

const HT_CAPABILITIES_MIN_LEN: usize = 26;

/// HT capabilities element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HtCapabilities {
    /// Element was long enough to decode
    pub present: bool,
    /// Streams from the Rx MCS bitmask
    pub max_spatial_streams: u8,
}

impl Default for HtCapabilities {
    fn default() -> Self {
        Self {
            present: false,
            max_spatial_streams: 1,
        }
    }
}

impl Decode for HtCapabilities {
    const NAME: &'static str = "HT Capabilities";

    fn accepts(id: u8, _id_ext: u8) -> bool {
        id == eid::HT_CAPABILITIES
    }

    fn decode_payload(b: &[u8]) -> Result<Self, WireError> {
        if b.len() < HT_CAPABILITIES_MIN_LEN {
            debug!("HT Capabilities length {} too short", b.len());
            return Ok(Self::default());
        }
        // Rx MCS bitmask, one byte per stream
        let mcs = &b[3..7];
        trace!(?mcs, "HT Rx MCS set");
        let max_spatial_streams = mcs[1..]
            .iter()
            .rposition(|&set| set > 0)
            .map(|i| i as u8 + 2)
            .unwrap_or(1);
        Ok(Self {
            present: true,
            max_spatial_streams,
        })
    }
}

const VHT_CAPABILITIES_MIN_LEN: usize = 12;

/// VHT capabilities element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VhtCapabilities {
    /// Element was long enough to decode
    pub present: bool,
    /// Streams from the Rx VHT-MCS map
    pub max_spatial_streams: u8,
}

impl Default for VhtCapabilities {
    fn default() -> Self {
        Self {
            present: false,
            max_spatial_streams: 1,
        }
    }
}

impl Decode for VhtCapabilities {
    const NAME: &'static str = "VHT Capabilities";

    fn accepts(id: u8, _id_ext: u8) -> bool {
        id == eid::VHT_CAPABILITIES
    }

    fn decode_payload(b: &[u8]) -> Result<Self, WireError> {
        if b.len() < VHT_CAPABILITIES_MIN_LEN {
            debug!("VHT Capabilities length {} too short", b.len());
            return Ok(Self::default());
        }
        let mcs_map = u16::from_le_bytes([b[4], b[5]]);
        Ok(Self {
            present: true,
            max_spatial_streams: max_spatial_streams_from_mcs_map(mcs_map),
        })
    }
}

const HE_CAPABILITIES_MIN_LEN: usize = 21;
const HE_MAC_CAPABILITIES_LEN: usize = 5;
const HE_TWT_REQUESTER_BIT: usize = 1;
const HE_TWT_RESPONDER_BIT: usize = 2;
const HE_BROADCAST_TWT_BIT: usize = 20;

/// HE capabilities element
///
/// ```text
/// | HE MAC Capabilities | HE PHY Capabilities | Supported HE-MCS and NSS Set |
///            6                    11                       4
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeCapabilities {
    /// Element was long enough to decode
    pub present: bool,
    /// Streams from the Rx HE-MCS map for <= 80 MHz
    pub max_spatial_streams: u8,
    /// TWT requester support
    pub twt_requester: bool,
    /// TWT responder support
    pub twt_responder: bool,
    /// Broadcast TWT support
    pub broadcast_twt: bool,
}

impl Default for HeCapabilities {
    fn default() -> Self {
        Self {
            present: false,
            max_spatial_streams: 1,
            twt_requester: false,
            twt_responder: false,
            broadcast_twt: false,
        }
    }
}

impl Decode for HeCapabilities {
    const NAME: &'static str = "HE Capabilities";

    fn accepts(id: u8, id_ext: u8) -> bool {
        id == eid::EXTENSION_PRESENT && id_ext == eid_ext::HE_CAPABILITIES
    }

    fn decode_payload(b: &[u8]) -> Result<Self, WireError> {
        if b.len() < HE_CAPABILITIES_MIN_LEN {
            debug!("HE Capabilities length {} too short", b.len());
            return Ok(Self::default());
        }
        let mcs_map = u16::from_le_bytes([b[17], b[18]]);
        let mac = &b[..HE_MAC_CAPABILITIES_LEN];
        Ok(Self {
            present: true,
            max_spatial_streams: max_spatial_streams_from_mcs_map(mcs_map),
            twt_requester: test_bit(mac, HE_TWT_REQUESTER_BIT),
            twt_responder: test_bit(mac, HE_TWT_RESPONDER_BIT),
            broadcast_twt: test_bit(mac, HE_BROADCAST_TWT_BIT),
        })
    }
}

const EHT_MAC_CAPABILITIES_LEN: usize = 1;
const EHT_EPCS_PRIORITY_ACCESS_BIT: usize = 0;
const EHT_RESTRICTED_TWT_BIT: usize = 4;

/// EHT capabilities element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EhtCapabilities {
    /// Always set once decoded
    pub present: bool,
    /// EPCS priority access support
    pub epcs_priority_access: bool,
    /// Restricted TWT support
    pub restricted_twt: bool,
}

impl Decode for EhtCapabilities {
    const NAME: &'static str = "EHT Capabilities";

    fn accepts(id: u8, id_ext: u8) -> bool {
        id == eid::EXTENSION_PRESENT && id_ext == eid_ext::EHT_CAPABILITIES
    }

    fn decode_payload(b: &[u8]) -> Result<Self, WireError> {
        let mac = &b[..b.len().min(EHT_MAC_CAPABILITIES_LEN)];
        Ok(Self {
            present: true,
            epcs_priority_access: test_bit(mac, EHT_EPCS_PRIORITY_ACCESS_BIT),
            restricted_twt: test_bit(mac, EHT_RESTRICTED_TWT_BIT),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::RawElement;

    const HE_CAPS: [u8; 25] = [
        0x09, 0x01, 0x00, 0x02, 0x40, 0x04, 0x70, 0x0c, 0x80, 0x00, 0x07, 0x80, 0x04, 0x00,
        0xaa, 0xaa, 0xaa, 0xaa, 0x7f, 0x1c, 0xc7, 0x71, 0x1c, 0xc7, 0x71,
    ];

    #[test]
    fn test_mcs_map_streams() {
        // streams 1-2 supported, 3 and up unsupported
        assert_eq!(max_spatial_streams_from_mcs_map(0xFFF0), 2);
        assert_eq!(max_spatial_streams_from_mcs_map(0xFFFF), 1);
        assert_eq!(max_spatial_streams_from_mcs_map(0x0000), 8);
        assert_eq!(max_spatial_streams_from_mcs_map(0xFFFE), 1);
        assert_eq!(max_spatial_streams_from_mcs_map(0xFFAA), 4);
    }

    #[test]
    fn test_ht_streams() {
        let mut payload = vec![0u8; 26];
        payload[3] = 0xFF;
        payload[4] = 0xFF;
        let ht = HtCapabilities::decode_payload(&payload).unwrap();
        assert!(ht.present);
        assert_eq!(ht.max_spatial_streams, 2);

        payload[6] = 0x01;
        assert_eq!(
            HtCapabilities::decode_payload(&payload).unwrap().max_spatial_streams,
            4
        );

        let ht = HtCapabilities::decode_payload(&payload[..25]).unwrap();
        assert!(!ht.present);
        assert_eq!(ht.max_spatial_streams, 1);
    }

    #[test]
    fn test_vht_streams() {
        let mut payload = vec![0u8; 12];
        payload[4] = 0xEA;
        payload[5] = 0xFF;
        let ie = RawElement::new(eid::VHT_CAPABILITIES, payload);
        let vht = VhtCapabilities::decode(&ie).unwrap();
        assert!(vht.present);
        assert_eq!(vht.max_spatial_streams, 3);
    }

    #[test]
    fn test_he_streams() {
        let ie = RawElement::extension(eid_ext::HE_CAPABILITIES, HE_CAPS.to_vec());
        let he = HeCapabilities::decode(&ie).unwrap();
        assert!(he.present);
        assert_eq!(he.max_spatial_streams, 8);
    }

    #[test]
    fn test_he_twt_bits() {
        let mut payload = HE_CAPS;
        payload[..3].copy_from_slice(&[0x06, 0x00, 0x10]);
        let he = HeCapabilities::decode_payload(&payload).unwrap();
        assert!(he.twt_requester);
        assert!(he.twt_responder);
        assert!(he.broadcast_twt);

        let he = HeCapabilities::decode_payload(&HE_CAPS).unwrap();
        assert!(!he.twt_requester);
        assert!(!he.broadcast_twt);
    }

    #[test]
    fn test_eht_capabilities() {
        let eht = EhtCapabilities::decode_payload(&[0x11, 0x00]).unwrap();
        assert!(eht.present);
        assert!(eht.epcs_priority_access);
        assert!(eht.restricted_twt);

        let eht = EhtCapabilities::decode_payload(&[0x00, 0x00]).unwrap();
        assert!(!eht.epcs_priority_access);
        assert!(!eht.restricted_twt);

        assert!(EhtCapabilities::decode_payload(&[]).unwrap().present);
    }
}
