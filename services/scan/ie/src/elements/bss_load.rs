//! BSS Load element.

use crate::decode::Decode;
use crate::element::eid;
use crate::reader::Reader;
use crate::WireError;
use serde::Serialize;
use tracing::debug;

/// Highest channel utilization value
pub const MAX_CHANNEL_UTILIZATION: u8 = 255;
/// Channel utilization is expressed in 1/256ths
pub const CHANNEL_UTILIZATION_SCALE: u16 = 256;

const BSS_LOAD_LEN: usize = 5;

/// Station count, channel utilization and admission capacity of a BSS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BssLoad {
    /// Element was well formed
    pub present: bool,
    /// Associated stations
    pub station_count: u16,
    /// Fraction of time the medium was busy, out of 255
    pub channel_utilization: u8,
    /// Available admission capacity in 32 us/s units
    pub capacity: u16,
}

impl Decode for BssLoad {
    const NAME: &'static str = "BSS Load";

    fn accepts(id: u8, _id_ext: u8) -> bool {
        id == eid::BSS_LOAD
    }

    fn decode_payload(payload: &[u8]) -> Result<Self, WireError> {
        if payload.len() != BSS_LOAD_LEN {
            debug!("BSS Load length {} is not {}", payload.len(), BSS_LOAD_LEN);
            return Ok(Self::default());
        }
        let mut r = Reader::new(payload);
        Ok(Self {
            present: true,
            station_count: r.u16_le()?,
            channel_utilization: r.u8()?,
            capacity: r.u16_le()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::RawElement;
    use crate::DecodeError;

    #[test]
    fn test_decode() {
        let ie = RawElement::new(eid::BSS_LOAD, vec![0x03, 0x00, 0x80, 0x10, 0x27]);
        let load = BssLoad::decode(&ie).unwrap();
        assert!(load.present);
        assert_eq!(load.station_count, 3);
        assert_eq!(load.channel_utilization, 0x80);
        assert_eq!(load.capacity, 10000);
    }

    #[test]
    fn test_wrong_length_is_absent() {
        let ie = RawElement::new(eid::BSS_LOAD, vec![0x03, 0x00, 0x80, 0x10]);
        assert!(!BssLoad::decode(&ie).unwrap().present);
        let ie = RawElement::new(eid::BSS_LOAD, vec![0; 6]);
        assert!(!BssLoad::decode(&ie).unwrap().present);
    }

    #[test]
    fn test_wrong_id() {
        let ie = RawElement::new(eid::SSID, vec![0; 5]);
        assert!(matches!(BssLoad::decode(&ie), Err(DecodeError::Contract(_))));
    }
}
