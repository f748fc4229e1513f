//! Security capability synthesis for one frame.
//!
//! Every security-bearing element of a frame contributes zero or more
//! [`SecurityInstance`]s; beacon capability bits and vendor markers add the
//! trailing flags of the capability string.

use crate::config::DecoderConfig;
use crate::oem::OemSecurityParser;
use crate::rsn::{parse_rsn, parse_wpa, Pmf, SecurityInstance};
use crate::suites::{selector, Cipher, KeyManagement, Protocol, OUI_MICROSOFT, OUI_WFA};
use bitflags::bitflags;
use scan_ie::{eid, Band, RawElement};
use serde::Serialize;
use smallvec::smallvec;
use std::fmt;
use tracing::{debug, trace};

/// WPA v1 vendor element
pub const WPA_VENDOR_TYPE: u32 = selector(OUI_MICROSOFT, 0x01);
/// WPS vendor element
pub const WPS_VENDOR_TYPE: u32 = selector(OUI_MICROSOFT, 0x04);
/// OWE transition mode vendor element
pub const OWE_VENDOR_TYPE: u32 = selector(OUI_WFA, 0x1C);
/// RSNE override vendor element
pub const RSNE_OVERRIDE_VENDOR_TYPE: u32 = selector(OUI_WFA, 0x29);
/// RSNE override 2 vendor element
pub const RSNE_OVERRIDE2_VENDOR_TYPE: u32 = selector(OUI_WFA, 0x2A);

const VENDOR_HEADER_LEN: usize = 4;

bitflags! {
    /// Capability Information field of a beacon or probe response
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub struct CapabilityInfo: u16 {
        /// Infrastructure BSS
        const ESS = 1 << 0;
        /// Independent BSS
        const IBSS = 1 << 1;
        /// Data confidentiality required
        const PRIVACY = 1 << 4;
    }
}

// DMG beacons carry the BSS type in bits 0-1
const DMG_BSS_TYPE_MASK: u16 = 0x0003;
const DMG_ESS: u16 = 0x0003;
const DMG_IBSS: u16 = 0x0001;

/// OUI and OUI type of a vendor element, read as one big-endian word
fn vendor_type(ie: &RawElement) -> Option<u32> {
    let header: [u8; VENDOR_HEADER_LEN] = ie.bytes.get(..VENDOR_HEADER_LEN)?.try_into().ok()?;
    Some(u32::from_be_bytes(header))
}

/// Security capabilities advertised by one BSS
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SecurityCapabilities {
    /// One entry per advertised security configuration, in frame order
    pub instances: Vec<SecurityInstance>,
    /// Infrastructure BSS
    pub is_ess: bool,
    /// Independent BSS
    pub is_ibss: bool,
    /// Privacy bit set
    pub is_privacy: bool,
    /// WPS element present
    pub is_wps: bool,
    /// Management frame protection required
    pub is_mfp_required: bool,
    /// Management frame protection capable
    pub is_mfp_capable: bool,
    /// RSNE override element present
    pub is_rsne_override_present: bool,
    #[serde(skip)]
    mfp_required_cleared: bool,
}

impl SecurityCapabilities {
    /// Build the capabilities of a frame from its elements and capability field
    pub fn from_elements(
        ies: &[RawElement],
        beacon_cap: u16,
        frequency_mhz: u32,
        config: &DecoderConfig,
        oem: Option<&dyn OemSecurityParser>,
    ) -> Self {
        let mut caps = Self::default();
        caps.apply_capability_info(beacon_cap, Band::from_frequency(frequency_mhz) == Band::Ghz60);

        for ie in ies {
            if let Some(oem_type) = oem.and_then(|p| p.parse(ie.id, ie.id_ext, &ie.bytes)) {
                if oem_type.protocol != Protocol::None {
                    trace!(id = ie.id, "OEM security element");
                    caps.instances.push(SecurityInstance {
                        protocol: oem_type.protocol,
                        key_management: oem_type.key_management.into_iter().collect(),
                        pairwise_cipher: oem_type.pairwise_cipher.into_iter().collect(),
                        group_cipher: Some(oem_type.group_cipher),
                        group_management_cipher: None,
                    });
                }
            }

            if ie.id == eid::RSN {
                caps.add_rsn(&ie.bytes, config);
            }
            if ie.id == eid::VSA {
                caps.add_vendor(ie, config);
            }
        }
        caps
    }

    fn apply_capability_info(&mut self, beacon_cap: u16, is_dmg: bool) {
        let info = CapabilityInfo::from_bits_truncate(beacon_cap);
        self.is_privacy = info.contains(CapabilityInfo::PRIVACY);
        if is_dmg {
            let bss_type = beacon_cap & DMG_BSS_TYPE_MASK;
            if bss_type == DMG_ESS {
                self.is_ess = true;
            } else if bss_type & DMG_IBSS != 0 {
                self.is_ibss = true;
            }
        } else {
            self.is_ess = info.contains(CapabilityInfo::ESS);
            self.is_ibss = info.contains(CapabilityInfo::IBSS);
        }
    }

    fn add_rsn(&mut self, payload: &[u8], config: &DecoderConfig) {
        let Some(rsn) = parse_rsn(payload, &config.unknown_akm_map) else {
            debug!("RSN element with unsupported version ignored");
            return;
        };
        if let Some(pmf) = rsn.pmf {
            self.merge_pmf(pmf);
        }
        self.instances.push(rsn.instance);
    }

    fn add_vendor(&mut self, ie: &RawElement, config: &DecoderConfig) {
        let Some(vendor) = vendor_type(ie) else {
            debug!("Couldn't parse VSA IE, buffer underflow");
            return;
        };

        if config.rsn_overriding_supported
            && matches!(vendor, RSNE_OVERRIDE_VENDOR_TYPE | RSNE_OVERRIDE2_VENDOR_TYPE)
        {
            self.add_rsn(&ie.bytes[VENDOR_HEADER_LEN..], config);
            self.is_rsne_override_present = true;
        }
        if vendor == WPA_VENDOR_TYPE {
            if let Some(wpa) = parse_wpa(&ie.bytes, &config.unknown_akm_map) {
                self.instances.push(wpa);
            }
        }
        if vendor == WPS_VENDOR_TYPE {
            self.is_wps = true;
        }
        if config.owe_supported && vendor == OWE_VENDOR_TYPE {
            // Open BSS paired with a hidden OWE BSS
            self.instances.push(SecurityInstance {
                protocol: Protocol::Rsn,
                key_management: smallvec![KeyManagement::OweTransition],
                pairwise_cipher: smallvec![Cipher::Ccmp],
                group_cipher: Some(Cipher::Ccmp),
                group_management_cipher: None,
            });
        }
    }

    /// Fold in the PMF bits of one RSN-shaped element.
    ///
    /// Required stays false once any element clears it; capable stays true
    /// once any element sets it.
    fn merge_pmf(&mut self, pmf: Pmf) {
        if !pmf.required {
            self.mfp_required_cleared = true;
            self.is_mfp_required = false;
        } else if !self.mfp_required_cleared {
            self.is_mfp_required = true;
        }
        self.is_mfp_capable |= pmf.capable;
    }

    /// Protocol of each instance
    pub fn protocols(&self) -> Vec<Protocol> {
        self.instances.iter().map(|i| i.protocol).collect()
    }

    /// AKM list of each instance
    pub fn key_management(&self) -> Vec<&[KeyManagement]> {
        self.instances.iter().map(|i| &i.key_management[..]).collect()
    }

    /// Pairwise cipher list of each instance
    pub fn pairwise_ciphers(&self) -> Vec<&[Cipher]> {
        self.instances.iter().map(|i| &i.pairwise_cipher[..]).collect()
    }

    /// Group ciphers that were read
    pub fn group_ciphers(&self) -> Vec<Cipher> {
        self.instances.iter().filter_map(|i| i.group_cipher).collect()
    }

    /// Group management ciphers that were read
    pub fn group_management_ciphers(&self) -> Vec<Cipher> {
        self.instances
            .iter()
            .filter_map(|i| i.group_management_cipher)
            .collect()
    }

    /// Privacy bit without any RSN or WPA instance
    pub fn is_wep(&self) -> bool {
        self.instances.is_empty() && self.is_privacy
    }

    /// Capability string in the form scan tools print, e.g.
    /// `[WPA2-PSK-CCMP-128][RSN-PSK-CCMP-128][ESS]`
    pub fn capabilities_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SecurityCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wep() {
            f.write_str("[WEP]")?;
        }
        for instance in &self.instances {
            if let Some(wpa2) = instance.wpa2_entry() {
                write!(f, "{wpa2}")?;
            }
            write!(f, "{instance}")?;
        }
        let flags = [
            (self.is_ess, "[ESS]"),
            (self.is_ibss, "[IBSS]"),
            (self.is_wps, "[WPS]"),
            (self.is_mfp_required, "[MFPR]"),
            (self.is_mfp_capable, "[MFPC]"),
            (self.is_rsne_override_present, "[RSNO]"),
        ];
        for (_, flag) in flags.iter().filter(|(set, _)| *set) {
            f.write_str(flag)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rsn_ie(akm: u8, caps: [u8; 2]) -> RawElement {
        RawElement::new(
            eid::RSN,
            vec![
                0x01, 0x00, 0x00, 0x0F, 0xAC, 0x04, 0x01, 0x00, 0x00, 0x0F, 0xAC, 0x04, 0x01, 0x00,
                0x00, 0x0F, 0xAC, akm, caps[0], caps[1],
            ],
        )
    }

    #[test]
    fn test_capability_info() {
        let caps = SecurityCapabilities::from_elements(&[], 0x0002, 2412, &DecoderConfig::default(), None);
        assert_eq!(caps.to_string(), "[IBSS]");

        let caps = SecurityCapabilities::from_elements(&[], 0x0011, 2412, &DecoderConfig::default(), None);
        assert_eq!(caps.to_string(), "[WEP][ESS]");
    }

    #[test]
    fn test_dmg_bss_type() {
        let config = DecoderConfig::default();
        let caps = SecurityCapabilities::from_elements(&[], 0x0001, 58320, &config, None);
        assert_eq!(caps.to_string(), "[IBSS]");
        let caps = SecurityCapabilities::from_elements(&[], 0x0003, 58320, &config, None);
        assert_eq!(caps.to_string(), "[ESS]");
        let caps = SecurityCapabilities::from_elements(&[], 0x0002, 58320, &config, None);
        assert_eq!(caps.to_string(), "");
    }

    #[test]
    fn test_pmf_required_is_sticky_false() {
        let mut caps = SecurityCapabilities::default();
        caps.merge_pmf(Pmf {
            required: false,
            capable: false,
        });
        caps.merge_pmf(Pmf {
            required: true,
            capable: true,
        });
        assert!(!caps.is_mfp_required);
        assert!(caps.is_mfp_capable);

        let mut caps = SecurityCapabilities::default();
        caps.merge_pmf(Pmf {
            required: true,
            capable: true,
        });
        caps.merge_pmf(Pmf {
            required: true,
            capable: false,
        });
        assert!(caps.is_mfp_required);
        assert!(caps.is_mfp_capable);
    }

    #[test]
    fn test_rsn_override_needs_support() {
        let mut rsno = vec![0x50, 0x6F, 0x9A, 0x29];
        rsno.extend_from_slice(&rsn_ie(0x08, [0xC0, 0x00]).bytes);
        let ies = vec![rsn_ie(0x02, [0x00, 0x00]), RawElement::new(eid::VSA, rsno)];

        let mut config = DecoderConfig::default();
        let caps = SecurityCapabilities::from_elements(&ies, 0x0010, 2412, &config, None);
        assert_eq!(caps.to_string(), "[WPA2-PSK-CCMP-128][RSN-PSK-CCMP-128]");

        config.rsn_overriding_supported = true;
        let caps = SecurityCapabilities::from_elements(&ies, 0x0010, 2412, &config, None);
        assert_eq!(
            caps.to_string(),
            "[WPA2-PSK-CCMP-128][RSN-PSK-CCMP-128][RSN-SAE-CCMP-128][MFPC][RSNO]"
        );
        assert_eq!(caps.protocols(), vec![Protocol::Rsn, Protocol::Rsn]);
    }

    #[test]
    fn test_parallel_views() {
        let caps = SecurityCapabilities::from_elements(
            &[rsn_ie(0x02, [0x00, 0x00])],
            0x0011,
            5180,
            &DecoderConfig::default(),
            None,
        );
        assert_eq!(caps.key_management(), vec![&[KeyManagement::Psk][..]]);
        assert_eq!(caps.pairwise_ciphers(), vec![&[Cipher::Ccmp][..]]);
        assert_eq!(caps.group_ciphers(), vec![Cipher::Ccmp]);
        assert!(caps.group_management_ciphers().is_empty());
    }
}
