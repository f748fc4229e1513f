//! Interworking and Roaming Consortium elements (Hotspot 2.0 discovery).

use crate::decode::Decode;
use crate::element::eid;
use crate::reader::Reader;
use crate::WireError;
use serde::Serialize;

/// Access network type advertised in the Interworking element
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AccessNetworkType {
    /// Private network
    #[default]
    Private = 0,
    /// Private network with guest access
    PrivateWithGuest = 1,
    /// Chargeable public network
    ChargeablePublic = 2,
    /// Free public network
    FreePublic = 3,
    /// Personal device network
    Personal = 4,
    /// Emergency services only
    EmergencyOnly = 5,
    /// Reserved
    Resvd6 = 6,
    /// Reserved
    Resvd7 = 7,
    /// Reserved
    Resvd8 = 8,
    /// Reserved
    Resvd9 = 9,
    /// Reserved
    Resvd10 = 10,
    /// Reserved
    Resvd11 = 11,
    /// Reserved
    Resvd12 = 12,
    /// Reserved
    Resvd13 = 13,
    /// Test or experimental
    TestOrExperimental = 14,
    /// Wildcard
    Wildcard = 15,
}

impl From<u8> for AccessNetworkType {
    fn from(value: u8) -> Self {
        match value & 0x0F {
            0 => Self::Private,
            1 => Self::PrivateWithGuest,
            2 => Self::ChargeablePublic,
            3 => Self::FreePublic,
            4 => Self::Personal,
            5 => Self::EmergencyOnly,
            6 => Self::Resvd6,
            7 => Self::Resvd7,
            8 => Self::Resvd8,
            9 => Self::Resvd9,
            10 => Self::Resvd10,
            11 => Self::Resvd11,
            12 => Self::Resvd12,
            13 => Self::Resvd13,
            14 => Self::TestOrExperimental,
            _ => Self::Wildcard,
        }
    }
}

/// Interworking element
///
/// Only four lengths are legal: options only (1), with venue info (3),
/// with HESSID (7), with both (9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Interworking {
    /// Access network type
    pub ant: AccessNetworkType,
    /// Network provides internet access
    pub internet: bool,
    /// Venue group and type
    pub venue_info: Option<u16>,
    /// Homogeneous ESS identifier, 0 when absent
    pub hessid: u64,
}

impl Decode for Interworking {
    const NAME: &'static str = "Interworking";

    fn accepts(id: u8, _id_ext: u8) -> bool {
        id == eid::INTERWORKING
    }

    fn decode_payload(b: &[u8]) -> Result<Self, WireError> {
        let mut r = Reader::new(b);
        let options = r.u8()?;
        if !matches!(b.len(), 1 | 3 | 7 | 9) {
            return Err(WireError::BadLength(b.len()));
        }

        let mut iw = Self {
            ant: AccessNetworkType::from(options),
            internet: options & 0x10 != 0,
            ..Self::default()
        };
        if matches!(b.len(), 3 | 9) {
            iw.venue_info = Some(r.u16_be()?);
        }
        if matches!(b.len(), 7 | 9) {
            iw.hessid = r.uint_be(6)?;
        }
        Ok(iw)
    }
}

/// Roaming Consortium element
///
/// ```text
/// | ANQP OI count | OI#1/#2 lengths | OI#1 | OI#2 | OI#3 |
///         1                1          var    var    var
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RoamingConsortium {
    /// OIs reachable through ANQP, not listed here
    pub anqp_oi_count: u8,
    /// Up to three organisation identifiers carried in the element
    pub roaming_consortiums: Vec<u64>,
}

impl Decode for RoamingConsortium {
    const NAME: &'static str = "Roaming Consortium";

    fn accepts(id: u8, _id_ext: u8) -> bool {
        id == eid::ROAMING_CONSORTIUM
    }

    fn decode_payload(b: &[u8]) -> Result<Self, WireError> {
        let mut r = Reader::new(b);
        let anqp_oi_count = r.u8()?;
        let lengths = r.u8()?;
        let oi1 = usize::from(lengths & 0x0F);
        let oi2 = usize::from(lengths >> 4);
        let oi3 = b.len().saturating_sub(2 + oi1 + oi2);

        // Each OI is only counted when every earlier one is present
        let mut widths = Vec::with_capacity(3);
        for width in [oi1, oi2, oi3] {
            if width == 0 {
                break;
            }
            widths.push(width);
        }

        let roaming_consortiums = widths
            .into_iter()
            .map(|width| r.uint_be(width))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            anqp_oi_count,
            roaming_consortiums,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::RawElement;

    #[test]
    fn test_interworking_options_only() {
        let iw = Interworking::decode(&RawElement::new(eid::INTERWORKING, vec![0x13])).unwrap();
        assert_eq!(iw.ant, AccessNetworkType::FreePublic);
        assert!(iw.internet);
        assert_eq!(iw.venue_info, None);
        assert_eq!(iw.hessid, 0);
    }

    #[test]
    fn test_interworking_full() {
        let payload = [0x0E, 0x02, 0x07, 0x00, 0x11, 0x22, 0x33, 0x44, 0x55];
        let iw = Interworking::decode_payload(&payload).unwrap();
        assert_eq!(iw.ant, AccessNetworkType::TestOrExperimental);
        assert!(!iw.internet);
        assert_eq!(iw.venue_info, Some(0x0207));
        assert_eq!(iw.hessid, 0x0011_2233_4455);

        let iw = Interworking::decode_payload(&payload[2..]).unwrap();
        assert_eq!(iw.venue_info, None);
        assert_eq!(iw.hessid, 0x0011_2233_4455);
    }

    #[test]
    fn test_interworking_bad_length() {
        assert_eq!(
            Interworking::decode_payload(&[0x00, 0x01]),
            Err(WireError::BadLength(2))
        );
        assert_eq!(Interworking::decode_payload(&[]), Err(WireError::Truncated));
    }

    #[test]
    fn test_roaming_consortium_three_ois() {
        let payload = [
            0x02, 0x53, // 3-byte and 5-byte OIs
            0x11, 0x22, 0x33, //
            0x44, 0x55, 0x66, 0x77, 0x88, //
            0x99, 0xAA, 0xBB,
        ];
        let rc = RoamingConsortium::decode_payload(&payload).unwrap();
        assert_eq!(rc.anqp_oi_count, 2);
        assert_eq!(rc.roaming_consortiums, vec![0x112233, 0x44_5566_7788, 0x99AABB]);
    }

    #[test]
    fn test_roaming_consortium_single_oi() {
        let rc = RoamingConsortium::decode_payload(&[0x00, 0x03, 0x50, 0x6F, 0x9A]).unwrap();
        assert_eq!(rc.roaming_consortiums, vec![0x506F9A]);
    }

    #[test]
    fn test_roaming_consortium_underflow() {
        assert_eq!(
            RoamingConsortium::decode_payload(&[0x00, 0x03, 0x50]),
            Err(WireError::Truncated)
        );
        assert_eq!(
            RoamingConsortium::decode_payload(&[0x00]),
            Err(WireError::Truncated)
        );
    }
}
