//! Protocol, key management and cipher suites.
//!
//! Suite selectors are written big-endian as they appear on the wire:
//! three OUI bytes followed by the suite type, so `00-0F-AC:2` is
//! `0x000F_AC02`.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// IEEE 802.11 OUI
pub const OUI_IEEE: u32 = 0x00_0FAC;
/// Microsoft OUI used by WPA v1
pub const OUI_MICROSOFT: u32 = 0x00_50F2;
/// Wi-Fi Alliance OUI
pub const OUI_WFA: u32 = 0x50_6F9A;

/// Build a suite selector from an OUI and a suite type
pub const fn selector(oui: u32, suite_type: u8) -> u32 {
    (oui << 8) | suite_type as u32
}

/// RSN AKM suite selectors
pub mod rsn_akm {
    use super::{selector, OUI_IEEE, OUI_WFA};

    /// 802.1X
    pub const EAP: u32 = selector(OUI_IEEE, 0x01);
    /// PSK
    pub const PSK: u32 = selector(OUI_IEEE, 0x02);
    /// FT over 802.1X
    pub const FT_EAP: u32 = selector(OUI_IEEE, 0x03);
    /// FT with PSK
    pub const FT_PSK: u32 = selector(OUI_IEEE, 0x04);
    /// 802.1X with SHA-256
    pub const EAP_SHA256: u32 = selector(OUI_IEEE, 0x05);
    /// PSK with SHA-256
    pub const PSK_SHA256: u32 = selector(OUI_IEEE, 0x06);
    /// SAE
    pub const SAE: u32 = selector(OUI_IEEE, 0x08);
    /// FT with SAE
    pub const FT_SAE: u32 = selector(OUI_IEEE, 0x09);
    /// 802.1X Suite B 192-bit
    pub const EAP_SUITE_B_192: u32 = selector(OUI_IEEE, 0x0C);
    /// FT over 802.1X with SHA-384
    pub const EAP_FT_SHA384: u32 = selector(OUI_IEEE, 0x0D);
    /// FILS with SHA-256
    pub const FILS_SHA256: u32 = selector(OUI_IEEE, 0x0E);
    /// FILS with SHA-384
    pub const FILS_SHA384: u32 = selector(OUI_IEEE, 0x0F);
    /// OWE
    pub const OWE: u32 = selector(OUI_IEEE, 0x12);
    /// FT with PSK and SHA-384
    pub const FT_PSK_SHA384: u32 = selector(OUI_IEEE, 0x13);
    /// PASN
    pub const PASN: u32 = selector(OUI_IEEE, 0x15);
    /// SAE with group-dependent hash
    pub const SAE_EXT_KEY: u32 = selector(OUI_IEEE, 0x18);
    /// FT with SAE and group-dependent hash
    pub const FT_SAE_EXT_KEY: u32 = selector(OUI_IEEE, 0x19);
    /// Hotspot 2.0 OSEN
    pub const OSEN: u32 = selector(OUI_WFA, 0x01);
    /// Device provisioning protocol
    pub const DPP: u32 = selector(OUI_WFA, 0x02);
}

/// WPA v1 AKM suite selectors
pub mod wpa_akm {
    use super::{selector, OUI_MICROSOFT};

    /// 802.1X
    pub const EAP: u32 = selector(OUI_MICROSOFT, 0x01);
    /// PSK
    pub const PSK: u32 = selector(OUI_MICROSOFT, 0x02);
}

/// Security protocol of one advertised instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Protocol {
    /// No protocol
    None,
    /// WPA v1
    Wpa,
    /// RSN (WPA2 / WPA3)
    Rsn,
    /// Hotspot 2.0 OSEN
    Osen,
    /// WAPI
    Wapi,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "None",
            Self::Wpa => "WPA",
            Self::Rsn => "RSN",
            Self::Osen => "OSEN",
            Self::Wapi => "WAPI",
        })
    }
}

/// Authentication and key management scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum KeyManagement {
    None,
    Psk,
    Eap,
    FtPsk,
    FtEap,
    PskSha256,
    EapSha256,
    Osen,
    Sae,
    Owe,
    EapSuiteB192,
    FtSae,
    OweTransition,
    WapiPsk,
    WapiCert,
    FilsSha256,
    FilsSha384,
    SaeExtKey,
    FtSaeExtKey,
    Dpp,
    FtPskSha384,
    EapFtSha384,
    Pasn,
    /// Suite not in any table and not mapped by configuration
    Unknown,
}

impl KeyManagement {
    /// Any SAE flavour
    pub fn is_sae(self) -> bool {
        matches!(
            self,
            Self::Sae | Self::FtSae | Self::SaeExtKey | Self::FtSaeExtKey
        )
    }

    /// Schemes an RSN instance may lead with to also be listed as WPA2
    pub(crate) fn is_wpa2_family(self) -> bool {
        matches!(
            self,
            Self::Eap
                | Self::EapSha256
                | Self::EapFtSha384
                | Self::FilsSha256
                | Self::FilsSha384
                | Self::FtEap
                | Self::Psk
                | Self::PskSha256
                | Self::FtPsk
                | Self::FtPskSha384
        )
    }

    /// RSN AKM from its suite selector
    pub fn from_rsn_selector(akm: u32) -> Option<Self> {
        let km = match akm {
            rsn_akm::EAP => Self::Eap,
            rsn_akm::PSK => Self::Psk,
            rsn_akm::FT_EAP => Self::FtEap,
            rsn_akm::FT_PSK => Self::FtPsk,
            rsn_akm::EAP_SHA256 => Self::EapSha256,
            rsn_akm::PSK_SHA256 => Self::PskSha256,
            rsn_akm::SAE => Self::Sae,
            rsn_akm::FT_SAE => Self::FtSae,
            rsn_akm::SAE_EXT_KEY => Self::SaeExtKey,
            rsn_akm::FT_SAE_EXT_KEY => Self::FtSaeExtKey,
            rsn_akm::OWE => Self::Owe,
            rsn_akm::EAP_SUITE_B_192 => Self::EapSuiteB192,
            rsn_akm::OSEN => Self::Osen,
            rsn_akm::FILS_SHA256 => Self::FilsSha256,
            rsn_akm::FILS_SHA384 => Self::FilsSha384,
            rsn_akm::DPP => Self::Dpp,
            rsn_akm::FT_PSK_SHA384 => Self::FtPskSha384,
            rsn_akm::EAP_FT_SHA384 => Self::EapFtSha384,
            rsn_akm::PASN => Self::Pasn,
            _ => return None,
        };
        Some(km)
    }

    /// WPA v1 AKM from its suite selector
    pub fn from_wpa_selector(akm: u32) -> Option<Self> {
        match akm {
            wpa_akm::EAP => Some(Self::Eap),
            wpa_akm::PSK => Some(Self::Psk),
            _ => None,
        }
    }
}

/// Key management scheme for an RSN or WPA AKM suite selector.
///
/// Returns [`KeyManagement::Unknown`] for selectors in neither table.
pub fn akm_to_key_management(akm: u32) -> KeyManagement {
    KeyManagement::from_rsn_selector(akm)
        .or_else(|| KeyManagement::from_wpa_selector(akm))
        .unwrap_or(KeyManagement::Unknown)
}

impl fmt::Display for KeyManagement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "None",
            Self::Psk => "PSK",
            Self::Eap => "EAP/SHA1",
            Self::FtEap => "FT/EAP",
            Self::FtPsk => "FT/PSK",
            Self::EapSha256 => "EAP/SHA256",
            Self::PskSha256 => "PSK-SHA256",
            Self::Owe => "OWE",
            Self::OweTransition => "OWE_TRANSITION",
            Self::Sae => "SAE",
            Self::FtSae => "FT/SAE",
            Self::SaeExtKey => "SAE_EXT_KEY",
            Self::FtSaeExtKey => "FT/SAE_EXT_KEY",
            Self::EapSuiteB192 => "EAP_SUITE_B_192",
            Self::Osen => "OSEN",
            Self::WapiPsk => "WAPI-PSK",
            Self::WapiCert => "WAPI-CERT",
            Self::FilsSha256 => "EAP-FILS-SHA256",
            Self::FilsSha384 => "EAP-FILS-SHA384",
            Self::Dpp => "DPP",
            Self::FtPskSha384 => "FT/PSK-SHA384",
            Self::EapFtSha384 => "EAP-FT-SHA384",
            Self::Pasn => "PASN",
            Self::Unknown => "?",
        })
    }
}

/// Data or management cipher suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum Cipher {
    None,
    Tkip,
    Ccmp,
    Ccmp256,
    Gcmp128,
    Gcmp256,
    NoGroupAddressed,
    BipGmac128,
    BipGmac256,
    BipCmac256,
    Sms4,
}

impl Cipher {
    /// RSN cipher from its suite selector; unknown suites map to `None`
    pub fn from_rsn_selector(cipher: u32) -> Self {
        match cipher {
            0x000F_AC00 => Self::None,
            0x000F_AC02 => Self::Tkip,
            0x000F_AC04 => Self::Ccmp,
            0x000F_AC07 => Self::NoGroupAddressed,
            0x000F_AC08 => Self::Gcmp128,
            0x000F_AC09 => Self::Gcmp256,
            0x000F_AC0A => Self::Ccmp256,
            0x000F_AC0B => Self::BipGmac128,
            0x000F_AC0C => Self::BipGmac256,
            0x000F_AC0D => Self::BipCmac256,
            _ => {
                warn!("Unknown RSN cipher suite: {:08x}", cipher);
                Self::None
            }
        }
    }

    /// WPA v1 cipher from its suite selector; unknown suites map to `None`
    pub fn from_wpa_selector(cipher: u32) -> Self {
        match cipher {
            0x0050_F200 => Self::None,
            0x0050_F202 => Self::Tkip,
            0x0050_F204 => Self::Ccmp,
            _ => {
                warn!("Unknown WPA cipher suite: {:08x}", cipher);
                Self::None
            }
        }
    }
}

impl fmt::Display for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "None",
            Self::Ccmp => "CCMP-128",
            Self::Ccmp256 => "CCMP-256",
            Self::Gcmp128 => "GCMP-128",
            Self::Gcmp256 => "GCMP-256",
            Self::Tkip => "TKIP",
            Self::Sms4 => "SMS4",
            Self::NoGroupAddressed | Self::BipGmac128 | Self::BipGmac256 | Self::BipCmac256 => "?",
        })
    }
}
