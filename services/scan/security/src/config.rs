//! Decoder configuration supplied by the caller.

use crate::suites::KeyManagement;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Device-side switches and lookup tables for the capability synthesizer.
///
/// Built once and only read afterwards; it may be shared across threads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Report an OWE transition instance for OWE vendor elements
    pub owe_supported: bool,
    /// Parse RSNE override vendor elements
    pub rsn_overriding_supported: bool,
    /// AKM suite selectors outside the standard tables and the scheme each stands for
    pub unknown_akm_map: HashMap<u32, KeyManagement>,
}

impl DecoderConfig {
    /// Scheme configured for an unknown AKM suite selector
    pub fn unknown_akm(&self, akm: u32) -> Option<KeyManagement> {
        self.unknown_akm_map.get(&akm).copied()
    }
}
