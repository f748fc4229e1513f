//! Multi-link operation link descriptions shared by RNR and Multi-Link.

use crate::band::Band;
use serde::{Serialize, Serializer};
use std::fmt;

/// 48-bit MAC address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    /// Address from the first six bytes of `bytes`
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let octets: [u8; 6] = bytes.get(..6)?.try_into().ok()?;
        Some(Self(octets))
    }

    /// Raw octets
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One link of a multi-link device
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MloLink {
    /// 4-bit link id
    pub link_id: u8,
    /// Band of the link, when advertised
    pub band: Band,
    /// Channel of the link, 0 when not advertised
    pub channel: u8,
    /// BSSID of the affiliated AP
    pub ap_mac_address: Option<MacAddress>,
}
