//! Small fixed-format elements: TIM, Supported Rates, Country and RSNXE.

use super::test_bit;
use crate::decode::Decode;
use crate::element::eid;
use crate::reader::Reader;
use crate::WireError;
use serde::Serialize;
use std::fmt;

const MAX_TIM_LENGTH: usize = 254;

/// Traffic Indication Map element
///
/// ```text
/// | DTIM Count | DTIM Period | Bitmap Control | Partial Virtual Bitmap |
///        1            1              1                1 - 251
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TrafficIndicationMap {
    /// Element is well formed with a non-zero DTIM period
    pub valid: bool,
    /// Payload length
    pub length: usize,
    /// Beacons until the next DTIM
    pub dtim_count: Option<u8>,
    /// Beacon intervals between DTIMs
    pub dtim_period: Option<u8>,
    /// Bitmap control field
    pub bitmap_control: u8,
}

impl Decode for TrafficIndicationMap {
    const NAME: &'static str = "Traffic Indication Map";

    fn accepts(id: u8, _id_ext: u8) -> bool {
        id == eid::TIM
    }

    fn decode_payload(b: &[u8]) -> Result<Self, WireError> {
        let mut tim = Self {
            length: b.len(),
            ..Self::default()
        };
        let mut r = Reader::new(b);
        let (Ok(count), Ok(period), Ok(control)) = (r.u8(), r.u8(), r.u8()) else {
            return Ok(tim);
        };
        tim.dtim_count = Some(count);
        tim.dtim_period = Some(period);
        tim.bitmap_control = control;
        // At least one bitmap byte follows
        if r.is_empty() {
            return Ok(tim);
        }
        tim.valid = b.len() <= MAX_TIM_LENGTH && period > 0;
        Ok(tim)
    }
}

/// Rate in bits per second for a supported-rates byte, basic-rate flag ignored
pub fn rate_from_byte(byte: u8) -> Option<u32> {
    let rate = match byte & 0x7F {
        2 => 1_000_000,
        4 => 2_000_000,
        11 => 5_500_000,
        12 => 6_000_000,
        18 => 9_000_000,
        22 => 11_000_000,
        24 => 12_000_000,
        36 => 18_000_000,
        44 => 22_000_000,
        48 => 24_000_000,
        66 => 33_000_000,
        72 => 36_000_000,
        96 => 48_000_000,
        108 => 54_000_000,
        _ => return None,
    };
    Some(rate)
}

/// Supported Rates or Extended Supported Rates element
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SupportedRates {
    /// Element held 1-8 known rates
    pub valid: bool,
    /// Rates in bits per second, in advertised order
    pub rates: Vec<u32>,
}

impl SupportedRates {
    /// Highest advertised rate in bits per second
    pub fn max_rate(&self) -> Option<u32> {
        self.rates.iter().copied().max()
    }
}

impl fmt::Display for SupportedRates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rate in &self.rates {
            write!(f, "{:.1}, ", f64::from(*rate) / 1_000_000.0)?;
        }
        Ok(())
    }
}

impl Decode for SupportedRates {
    const NAME: &'static str = "Supported Rates";

    fn accepts(id: u8, _id_ext: u8) -> bool {
        id == eid::SUPPORTED_RATES || id == eid::EXTENDED_SUPPORTED_RATES
    }

    fn decode_payload(b: &[u8]) -> Result<Self, WireError> {
        let mut rates = SupportedRates::default();
        if b.is_empty() || b.len() > 8 {
            return Ok(rates);
        }
        for &byte in b {
            match rate_from_byte(byte) {
                Some(rate) => rates.rates.push(rate),
                None => return Ok(rates),
            }
        }
        rates.valid = true;
        Ok(rates)
    }
}

/// Country element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Country {
    /// Country string was well formed
    pub valid: bool,
    /// Upper-case two letter code, "00" when invalid
    pub country_code: String,
}

impl Default for Country {
    fn default() -> Self {
        Self {
            valid: false,
            country_code: "00".to_string(),
        }
    }
}

impl Decode for Country {
    const NAME: &'static str = "Country";

    fn accepts(id: u8, _id_ext: u8) -> bool {
        id == eid::COUNTRY
    }

    fn decode_payload(b: &[u8]) -> Result<Self, WireError> {
        let [first, second, env, ..] = *b else {
            return Ok(Self::default());
        };
        let (first, second) = (char::from(first), char::from(second));
        // ' ', 'O', 'I': any, outdoor, indoor environment
        let valid = matches!(env, b' ' | b'O' | b'I')
            && first.is_alphanumeric()
            && second.is_alphanumeric();
        if !valid {
            return Ok(Self::default());
        }
        Ok(Self {
            valid,
            country_code: first.to_uppercase().chain(second.to_uppercase()).collect(),
        })
    }
}

const SECURE_HE_LTF_BIT: usize = 8;
const URNM_MFPR_BIT: usize = 15;

/// RSN Extension element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Rsnxe {
    /// Secure HE-LTF supported
    pub secure_he_ltf: bool,
    /// Protection of ranging frames required
    pub urnm_mfpr: bool,
}

impl Decode for Rsnxe {
    const NAME: &'static str = "RSN Extension";

    fn accepts(id: u8, _id_ext: u8) -> bool {
        id == eid::RSN_EXTENSION
    }

    fn decode_payload(b: &[u8]) -> Result<Self, WireError> {
        Ok(Self {
            secure_he_ltf: test_bit(b, SECURE_HE_LTF_BIT),
            urnm_mfpr: test_bit(b, URNM_MFPR_BIT),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tim() {
        let tim = TrafficIndicationMap::decode_payload(&[0, 3, 0, 0]).unwrap();
        assert!(tim.valid);
        assert_eq!(tim.dtim_period, Some(3));

        let tim = TrafficIndicationMap::decode_payload(&[0, 0, 0, 0]).unwrap();
        assert!(!tim.valid);

        let tim = TrafficIndicationMap::decode_payload(&[0, 3, 0]).unwrap();
        assert!(!tim.valid);
        assert_eq!(tim.dtim_count, Some(0));

        let tim = TrafficIndicationMap::decode_payload(&[0, 3]).unwrap();
        assert!(!tim.valid);
        assert_eq!(tim.dtim_period, None);

        let tim = TrafficIndicationMap::decode_payload(&[1u8; 255]).unwrap();
        assert!(!tim.valid);
    }

    #[test]
    fn test_supported_rates() {
        let rates = SupportedRates::decode_payload(&[0x82, 0x84, 0x8b, 0x96, 0x0c, 0x12, 0x18, 0x24]).unwrap();
        assert!(rates.valid);
        assert_eq!(rates.rates.len(), 8);
        assert_eq!(rates.max_rate(), Some(18_000_000));
        assert_eq!(rates.rates[2], 5_500_000);
    }

    #[test]
    fn test_supported_rates_display() {
        let rates = SupportedRates::decode_payload(&[0x82, 0x0b]).unwrap();
        assert_eq!(rates.to_string(), "1.0, 5.5, ");
    }

    #[test]
    fn test_supported_rates_invalid() {
        assert!(!SupportedRates::decode_payload(&[]).unwrap().valid);
        assert!(!SupportedRates::decode_payload(&[0x82; 9]).unwrap().valid);
        let rates = SupportedRates::decode_payload(&[0x82, 0x05, 0x84]).unwrap();
        assert!(!rates.valid);
        assert_eq!(rates.rates, vec![1_000_000]);
    }

    #[test]
    fn test_country() {
        let c = Country::decode_payload(b"us \x01\x0b\x1e").unwrap();
        assert!(c.valid);
        assert_eq!(c.country_code, "US");

        let c = Country::decode_payload(b"DEI").unwrap();
        assert_eq!(c.country_code, "DE");

        let c = Country::decode_payload(b"US\x04").unwrap();
        assert!(!c.valid);
        assert_eq!(c.country_code, "00");

        let c = Country::decode_payload(b"U-O").unwrap();
        assert!(!c.valid);
        assert!(!Country::decode_payload(b"US").unwrap().valid);
    }

    #[test]
    fn test_rsnxe() {
        let x = Rsnxe::decode_payload(&[0x20, 0x81]).unwrap();
        assert!(x.secure_he_ltf);
        assert!(x.urnm_mfpr);
        let x = Rsnxe::decode_payload(&[0x20]).unwrap();
        assert!(!x.secure_he_ltf);
    }
}
