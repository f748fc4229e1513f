//! RSN-shaped and WPA v1 element parsers.
//!
//! ```text
//! | Version | Group Cipher | Pairwise Count | Pairwise List | AKM Count | AKM List |
//!      2           4              2              4 * m           2         4 * n
//! | RSN Capabilities | PMKID Count | PMKID List | Group Management Cipher |
//!          2                2          16 * s               4
//! ```
//!
//! Everything after the AKM list is optional. WPA v1 stops at the AKM list
//! and is preceded by its 4-byte OUI and type.
//!
//! A truncated element keeps whatever was read before the cut: the protocol
//! always, then the group cipher, pairwise list and AKM list as each completes.

use crate::suites::{Cipher, KeyManagement, Protocol};
use scan_ie::{Reader, WireError};
use serde::Serialize;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

const RSNE_VERSION: u16 = 1;
const WPA_VERSION: u16 = 1;
const PMKID_LEN: usize = 16;

const RSN_CAP_MFP_REQUIRED: u16 = 1 << 6;
const RSN_CAP_MFP_CAPABLE: u16 = 1 << 7;

/// One advertised security configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityInstance {
    /// Protocol
    pub protocol: Protocol,
    /// AKM schemes in advertised order
    pub key_management: SmallVec<[KeyManagement; 2]>,
    /// Pairwise ciphers in advertised order
    pub pairwise_cipher: SmallVec<[Cipher; 2]>,
    /// Group data cipher
    pub group_cipher: Option<Cipher>,
    /// Group management cipher, RSN only
    pub group_management_cipher: Option<Cipher>,
}

impl SecurityInstance {
    /// An instance with only the protocol known
    pub fn new(protocol: Protocol) -> Self {
        Self {
            protocol,
            key_management: SmallVec::new(),
            pairwise_cipher: SmallVec::new(),
            group_cipher: None,
            group_management_cipher: None,
        }
    }

    fn write_suites(&self, f: &mut fmt::Formatter<'_>, first_akm_only: bool) -> fmt::Result {
        let akms = if first_akm_only {
            &self.key_management[..self.key_management.len().min(1)]
        } else {
            &self.key_management[..]
        };
        for (i, akm) in akms.iter().enumerate() {
            write!(f, "{}{}", if i == 0 { "-" } else { "+" }, akm)?;
        }
        for (i, cipher) in self.pairwise_cipher.iter().enumerate() {
            write!(f, "{}{}", if i == 0 { "-" } else { "+" }, cipher)?;
        }
        Ok(())
    }

    /// Whether this RSN instance is also listed as WPA2 for older readers
    pub fn is_wpa2_compatible(&self) -> bool {
        self.protocol == Protocol::Rsn
            && self
                .key_management
                .first()
                .is_some_and(|akm| akm.is_wpa2_family())
            && !self.key_management.contains(&KeyManagement::EapSuiteB192)
    }

    /// The `[WPA2-...]` entry shown ahead of a WPA2 compatible instance.
    ///
    /// In SAE transition mode only the leading AKM is listed.
    pub fn wpa2_entry(&self) -> Option<Wpa2Entry<'_>> {
        self.is_wpa2_compatible().then_some(Wpa2Entry(self))
    }
}

impl fmt::Display for SecurityInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}", self.protocol)?;
        self.write_suites(f, false)?;
        f.write_str("]")
    }
}

/// Display adapter for the WPA2 duplicate of an RSN instance
pub struct Wpa2Entry<'a>(&'a SecurityInstance);

impl fmt::Display for Wpa2Entry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sae = self.0.key_management.iter().any(|akm| akm.is_sae());
        f.write_str("[WPA2")?;
        self.0.write_suites(f, sae)?;
        f.write_str("]")
    }
}

/// Management frame protection bits of the RSN capabilities field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Pmf {
    /// MFPR
    pub required: bool,
    /// MFPC
    pub capable: bool,
}

/// Result of parsing one RSN-shaped payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsnElement {
    /// Security instance
    pub instance: SecurityInstance,
    /// PMF bits, when the capabilities field was present
    pub pmf: Option<Pmf>,
}

fn read_akms(
    r: &mut Reader<'_>,
    known: fn(u32) -> Option<KeyManagement>,
    unknown_akms: &HashMap<u32, KeyManagement>,
) -> Result<SmallVec<[KeyManagement; 2]>, WireError> {
    let count = r.u16_le()?;
    let mut akms = SmallVec::new();
    for _ in 0..count {
        let akm = r.u32_be()?;
        let km = known(akm).unwrap_or_else(|| {
            unknown_akms
                .get(&akm)
                .copied()
                .unwrap_or(KeyManagement::Unknown)
        });
        akms.push(km);
    }
    if akms.is_empty() {
        akms.push(KeyManagement::Eap);
    }
    Ok(akms)
}

fn read_ciphers(
    r: &mut Reader<'_>,
    map: fn(u32) -> Cipher,
) -> Result<SmallVec<[Cipher; 2]>, WireError> {
    let count = r.u16_le()?;
    let mut ciphers = SmallVec::new();
    for _ in 0..count {
        ciphers.push(map(r.u32_be()?));
    }
    Ok(ciphers)
}

fn fill_rsn(
    r: &mut Reader<'_>,
    el: &mut RsnElement,
    unknown_akms: &HashMap<u32, KeyManagement>,
) -> Result<(), WireError> {
    let inst = &mut el.instance;
    inst.group_cipher = Some(Cipher::from_rsn_selector(r.u32_be()?));
    inst.pairwise_cipher = read_ciphers(r, Cipher::from_rsn_selector)?;
    inst.key_management = read_akms(r, KeyManagement::from_rsn_selector, unknown_akms)?;

    if r.remaining() < 2 {
        return Ok(());
    }
    let caps = r.u16_le()?;
    el.pmf = Some(Pmf {
        required: caps & RSN_CAP_MFP_REQUIRED != 0,
        capable: caps & RSN_CAP_MFP_CAPABLE != 0,
    });

    if r.remaining() < 2 {
        return Ok(());
    }
    let pmkids = usize::from(r.u16_le()?);
    r.skip(pmkids * PMKID_LEN)?;

    if r.remaining() < 4 {
        return Ok(());
    }
    el.instance.group_management_cipher = Some(Cipher::from_rsn_selector(r.u32_be()?));
    Ok(())
}

/// Parse an RSN-shaped payload.
///
/// Returns `None` when the version is missing or not 1.
pub fn parse_rsn(payload: &[u8], unknown_akms: &HashMap<u32, KeyManagement>) -> Option<RsnElement> {
    let mut r = Reader::new(payload);
    if r.u16_le().ok()? != RSNE_VERSION {
        return None;
    }
    let mut el = RsnElement {
        instance: SecurityInstance::new(Protocol::Rsn),
        pmf: None,
    };
    if let Err(e) = fill_rsn(&mut r, &mut el, unknown_akms) {
        debug!("Couldn't parse RSNE: {}", e);
    }
    Some(el)
}

fn fill_wpa(
    r: &mut Reader<'_>,
    inst: &mut SecurityInstance,
    unknown_akms: &HashMap<u32, KeyManagement>,
) -> Result<(), WireError> {
    inst.group_cipher = Some(Cipher::from_wpa_selector(r.u32_be()?));
    inst.pairwise_cipher = read_ciphers(r, Cipher::from_wpa_selector)?;
    inst.key_management = read_akms(r, KeyManagement::from_wpa_selector, unknown_akms)?;
    Ok(())
}

/// Parse a WPA v1 vendor element payload, OUI and type included.
///
/// Returns `None` when the version is missing or not 1.
pub fn parse_wpa(
    payload: &[u8],
    unknown_akms: &HashMap<u32, KeyManagement>,
) -> Option<SecurityInstance> {
    let mut r = Reader::at(payload, 4);
    if r.u16_le().ok()? != WPA_VERSION {
        return None;
    }
    let mut inst = SecurityInstance::new(Protocol::Wpa);
    if let Err(e) = fill_wpa(&mut r, &mut inst, unknown_akms) {
        debug!("Couldn't parse type 1 WPA: {}", e);
    }
    Some(inst)
}
