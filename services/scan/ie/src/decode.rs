//! Element dispatch.
//!
//! Every typed decoder implements [`Decode`]. [`Element`] is the closed set of
//! decoded kinds and [`Element::decode`] picks a decoder from a static
//! `(id, id_ext)` table. Elements with no decoder pass through as
//! [`Element::Other`].

use crate::element::{eid, eid_ext, RawElement};
use crate::elements::{
    BssLoad, Country, EhtCapabilities, EhtOperation, ExtendedCapabilities, HeCapabilities,
    HeOperation, HtCapabilities, HtOperation, Interworking, MultiLink, Rnr, RoamingConsortium,
    Rsnxe, SupportedRates, TrafficIndicationMap, VhtCapabilities, VhtOperation, Vsa,
};
use crate::error::{ContractViolation, DecodeError, WireError};
use serde::Serialize;
use tracing::{debug, error};

/// A typed decoder for one element kind
pub trait Decode: Sized {
    /// Human readable element name
    const NAME: &'static str;

    /// Whether this decoder handles the given id / extension id
    fn accepts(id: u8, id_ext: u8) -> bool;

    /// Decode a payload already known to be of this kind
    fn decode_payload(payload: &[u8]) -> Result<Self, WireError>;

    /// Decode an element, rejecting elements of another kind
    fn decode(ie: &RawElement) -> Result<Self, DecodeError> {
        if !Self::accepts(ie.id, ie.id_ext) {
            return Err(ContractViolation::WrongElementType {
                expected: Self::NAME,
                got_id: ie.id,
                got_ext: ie.id_ext,
            }
            .into());
        }
        Ok(Self::decode_payload(&ie.bytes)?)
    }
}

/// A decoded information element
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum Element {
    /// BSS Load
    BssLoad(BssLoad),
    /// Reduced Neighbor Report
    Rnr(Rnr),
    /// HT Operation
    HtOperation(HtOperation),
    /// VHT Operation
    VhtOperation(VhtOperation),
    /// HE Operation
    HeOperation(HeOperation),
    /// EHT Operation
    EhtOperation(EhtOperation),
    /// HT Capabilities
    HtCapabilities(HtCapabilities),
    /// VHT Capabilities
    VhtCapabilities(VhtCapabilities),
    /// HE Capabilities
    HeCapabilities(HeCapabilities),
    /// EHT Capabilities
    EhtCapabilities(EhtCapabilities),
    /// Basic Multi-Link
    MultiLink(MultiLink),
    /// Interworking
    Interworking(Interworking),
    /// Roaming Consortium
    RoamingConsortium(RoamingConsortium),
    /// Vendor Specific
    Vsa(Vsa),
    /// Extended Capabilities
    ExtendedCapabilities(ExtendedCapabilities),
    /// Traffic Indication Map
    TrafficIndicationMap(TrafficIndicationMap),
    /// Supported Rates
    SupportedRates(SupportedRates),
    /// Extended Supported Rates
    ExtendedSupportedRates(SupportedRates),
    /// Country
    Country(Country),
    /// RSN Extension
    Rsnxe(Rsnxe),
    /// Known kind whose payload could not be decoded
    Undecodable {
        /// The element as scanned
        element: RawElement,
        /// Why decoding failed
        #[serde(serialize_with = "serialize_display")]
        reason: WireError,
    },
    /// Kind without a decoder
    Other(RawElement),
}

type DecodeFn = fn(&RawElement) -> Result<Element, DecodeError>;

fn via<T: Decode>(ie: &RawElement, wrap: fn(T) -> Element) -> Result<Element, DecodeError> {
    T::decode(ie).map(wrap)
}

// (id, id_ext, decoder); id_ext is ignored for non-extension ids
static DECODERS: &[(u8, u8, DecodeFn)] = &[
    (eid::SUPPORTED_RATES, 0, |ie| via(ie, Element::SupportedRates)),
    (eid::TIM, 0, |ie| via(ie, Element::TrafficIndicationMap)),
    (eid::COUNTRY, 0, |ie| via(ie, Element::Country)),
    (eid::BSS_LOAD, 0, |ie| via(ie, Element::BssLoad)),
    (eid::HT_CAPABILITIES, 0, |ie| via(ie, Element::HtCapabilities)),
    (eid::EXTENDED_SUPPORTED_RATES, 0, |ie| {
        via(ie, Element::ExtendedSupportedRates)
    }),
    (eid::HT_OPERATION, 0, |ie| via(ie, Element::HtOperation)),
    (eid::INTERWORKING, 0, |ie| via(ie, Element::Interworking)),
    (eid::ROAMING_CONSORTIUM, 0, |ie| via(ie, Element::RoamingConsortium)),
    (eid::EXTENDED_CAPS, 0, |ie| via(ie, Element::ExtendedCapabilities)),
    (eid::VHT_CAPABILITIES, 0, |ie| via(ie, Element::VhtCapabilities)),
    (eid::VHT_OPERATION, 0, |ie| via(ie, Element::VhtOperation)),
    (eid::RNR, 0, |ie| via(ie, Element::Rnr)),
    (eid::VSA, 0, |ie| via(ie, Element::Vsa)),
    (eid::RSN_EXTENSION, 0, |ie| via(ie, Element::Rsnxe)),
    (eid::EXTENSION_PRESENT, eid_ext::HE_CAPABILITIES, |ie| {
        via(ie, Element::HeCapabilities)
    }),
    (eid::EXTENSION_PRESENT, eid_ext::HE_OPERATION, |ie| {
        via(ie, Element::HeOperation)
    }),
    (eid::EXTENSION_PRESENT, eid_ext::EHT_OPERATION, |ie| {
        via(ie, Element::EhtOperation)
    }),
    (eid::EXTENSION_PRESENT, eid_ext::MULTI_LINK, |ie| {
        via(ie, Element::MultiLink)
    }),
    (eid::EXTENSION_PRESENT, eid_ext::EHT_CAPABILITIES, |ie| {
        via(ie, Element::EhtCapabilities)
    }),
];

fn lookup(ie: &RawElement) -> Option<DecodeFn> {
    DECODERS
        .iter()
        .find(|(id, id_ext, _)| ie.is(*id, *id_ext))
        .map(|(_, _, f)| *f)
}

impl Element {
    /// Decode one element.
    ///
    /// Wire errors become [`Element::Undecodable`]; the element is kept so
    /// callers can still see it was advertised.
    pub fn decode(ie: &RawElement) -> Element {
        let Some(decoder) = lookup(ie) else {
            return Element::Other(ie.clone());
        };
        match decoder(ie) {
            Ok(element) => element,
            Err(DecodeError::Wire(reason)) => {
                debug!(id = ie.id, id_ext = ie.id_ext, %reason, "element treated as absent");
                Element::Undecodable {
                    element: ie.clone(),
                    reason,
                }
            }
            // The table only routes elements to the decoder that accepts them
            Err(DecodeError::Contract(violation)) => {
                error!(%violation, "decoder table mismatch");
                Element::Other(ie.clone())
            }
        }
    }

    /// Whether a decoder exists for this element kind
    pub fn is_known(ie: &RawElement) -> bool {
        lookup(ie).is_some()
    }
}

/// Decode every element of a frame independently
pub fn decode_all(ies: &[RawElement]) -> Vec<Element> {
    ies.iter().map(Element::decode).collect()
}

fn serialize_display<S: serde::Serializer>(v: &WireError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(v)
}

/// Roaming consortium of a frame, from the last well formed element
pub fn roaming_consortium(ies: &[RawElement]) -> Option<RoamingConsortium> {
    find_all::<RoamingConsortium>(ies).pop()
}

/// First vendor element carrying a Hotspot 2.0 indication
pub fn hs20_vendor_element(ies: &[RawElement]) -> Option<Vsa> {
    find_all::<Vsa>(ies).into_iter().find(Vsa::is_hs20)
}

/// All vendor elements of a frame
pub fn vendor_elements(ies: &[RawElement]) -> Vec<Vsa> {
    find_all(ies)
}

/// Interworking element of a frame, from the last well formed element
pub fn interworking(ies: &[RawElement]) -> Option<Interworking> {
    find_all::<Interworking>(ies).pop()
}

fn find_all<T: Decode>(ies: &[RawElement]) -> Vec<T> {
    ies.iter()
        .filter(|ie| T::accepts(ie.id, ie.id_ext))
        .filter_map(|ie| match T::decode(ie) {
            Ok(v) => Some(v),
            Err(e) => {
                error!(element = T::NAME, error = %e, "failed to decode element");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_element_type() {
        let ie = RawElement::new(eid::SSID, vec![0u8; 5]);
        let err = BssLoad::decode(&ie).unwrap_err();
        assert!(!err.is_recoverable());
        assert!(matches!(
            err,
            DecodeError::Contract(ContractViolation::WrongElementType { got_id: 0, .. })
        ));
    }

    #[test]
    fn test_extension_needs_matching_ext() {
        let ie = RawElement::extension(eid_ext::HE_CAPABILITIES, vec![0u8; 6]);
        assert!(HeOperation::decode(&ie).is_err());
        assert!(matches!(Element::decode(&ie), Element::HeCapabilities(_)));
    }

    #[test]
    fn test_dispatch() {
        let ie = RawElement::new(eid::BSS_LOAD, vec![3, 0, 128, 0, 0]);
        match Element::decode(&ie) {
            Element::BssLoad(load) => {
                assert!(load.present);
                assert_eq!(load.station_count, 3);
                assert_eq!(load.channel_utilization, 128);
            }
            other => panic!("unexpected {other:?}"),
        }

        let ie = RawElement::new(eid::EXTENDED_SUPPORTED_RATES, vec![0x30, 0x48]);
        assert!(matches!(Element::decode(&ie), Element::ExtendedSupportedRates(r) if r.valid));
    }

    #[test]
    fn test_unknown_element_passes_through() {
        let ie = RawElement::new(eid::SSID, &b"net"[..]);
        assert!(!Element::is_known(&ie));
        assert_eq!(Element::decode(&ie), Element::Other(ie));
    }

    #[test]
    fn test_decode_all_isolates_failures() {
        let ies = vec![
            RawElement::new(eid::RNR, vec![0x00, 0x04, 81, 11, 0x00]),
            RawElement::new(eid::BSS_LOAD, vec![1, 0, 2, 3, 0]),
        ];
        let decoded = decode_all(&ies);
        assert_eq!(decoded.len(), 2);
        assert!(matches!(&decoded[0], Element::Undecodable { .. }));
        assert!(matches!(&decoded[1], Element::BssLoad(l) if l.present));
    }

    #[test]
    fn test_frame_helpers() {
        let ies = vec![
            RawElement::new(eid::VSA, vec![0x00, 0x50, 0xF2, 0x01]),
            RawElement::new(eid::VSA, vec![0x50, 0x6F, 0x9A, 0x10, 0x00]),
            RawElement::new(eid::INTERWORKING, vec![]),
            RawElement::new(eid::INTERWORKING, vec![0x12]),
            RawElement::new(eid::ROAMING_CONSORTIUM, vec![0x00, 0x03, 0x50, 0x6F, 0x9A]),
        ];
        assert_eq!(vendor_elements(&ies).len(), 2);
        assert!(hs20_vendor_element(&ies).is_some());

        let iw = interworking(&ies).unwrap();
        assert!(iw.internet);

        let rc = roaming_consortium(&ies).unwrap();
        assert_eq!(rc.roaming_consortiums, vec![0x506F9A]);

        assert!(roaming_consortium(&[]).is_none());
    }
}
