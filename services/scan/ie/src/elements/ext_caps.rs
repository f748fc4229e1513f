//! Extended Capabilities element: a little-endian bit vector.

use super::test_bit;
use crate::decode::Decode;
use crate::element::eid;
use crate::WireError;
use bytes::Bytes;
use serde::Serialize;

const SSID_UTF8_BIT: usize = 48;
const RTT_RESPONDER_BIT: usize = 70;
const FILS_CAPABILITY_BIT: usize = 72;
const TWT_REQUESTER_BIT: usize = 77;
const TWT_RESPONDER_BIT: usize = 78;
const NON_TB_RANGING_RESPONDER_BIT: usize = 90;
const TB_RANGING_RESPONDER_BIT: usize = 91;

/// Extended Capabilities element
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ExtendedCapabilities {
    /// Capability bits, bit 0 is the low bit of the first byte
    #[serde(serialize_with = "hex::serde::serialize")]
    pub bits: Bytes,
}

impl ExtendedCapabilities {
    /// Read one capability bit; bits past the end are clear
    pub fn bit(&self, n: usize) -> bool {
        test_bit(&self.bits, n)
    }

    /// SSID is UTF-8 encoded
    pub fn is_strict_utf8(&self) -> bool {
        self.bit(SSID_UTF8_BIT)
    }

    /// 802.11mc fine timing measurement responder
    pub fn is_80211mc_rtt_responder(&self) -> bool {
        self.bit(RTT_RESPONDER_BIT)
    }

    /// FILS capable
    pub fn is_fils_capable(&self) -> bool {
        self.bit(FILS_CAPABILITY_BIT)
    }

    /// TWT requester support
    pub fn is_twt_requester_supported(&self) -> bool {
        self.bit(TWT_REQUESTER_BIT)
    }

    /// TWT responder support
    pub fn is_twt_responder_supported(&self) -> bool {
        self.bit(TWT_RESPONDER_BIT)
    }

    /// 802.11az non trigger-based ranging responder
    pub fn is_80211az_ntb_responder(&self) -> bool {
        self.bit(NON_TB_RANGING_RESPONDER_BIT)
    }

    /// 802.11az trigger-based ranging responder
    pub fn is_80211az_tb_responder(&self) -> bool {
        self.bit(TB_RANGING_RESPONDER_BIT)
    }
}

impl Decode for ExtendedCapabilities {
    const NAME: &'static str = "Extended Capabilities";

    fn accepts(id: u8, _id_ext: u8) -> bool {
        id == eid::EXTENDED_CAPS
    }

    fn decode_payload(b: &[u8]) -> Result<Self, WireError> {
        Ok(Self {
            bits: Bytes::copy_from_slice(b),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_bits() {
        let mut payload = [0u8; 12];
        payload[6] = 0x01; // bit 48
        payload[8] = 0x40; // bit 70
        payload[9] = 0x61; // bits 72, 77, 78
        payload[11] = 0x0C; // bits 90, 91
        let caps = ExtendedCapabilities::decode_payload(&payload).unwrap();
        assert!(caps.is_strict_utf8());
        assert!(caps.is_80211mc_rtt_responder());
        assert!(caps.is_fils_capable());
        assert!(caps.is_twt_requester_supported());
        assert!(caps.is_twt_responder_supported());
        assert!(caps.is_80211az_ntb_responder());
        assert!(caps.is_80211az_tb_responder());
        assert!(!caps.bit(49));
    }

    #[test]
    fn test_short_vector() {
        let caps = ExtendedCapabilities::decode_payload(&[0xFF; 4]).unwrap();
        assert!(caps.bit(31));
        assert!(!caps.is_strict_utf8());
        assert!(!caps.is_80211az_tb_responder());
    }
}
