//! Hook for vendor security elements the standard tables do not cover.

use crate::suites::{Cipher, KeyManagement, Protocol};
use serde::Serialize;

/// Security scheme carried by an OEM-specific element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OemSecurityType {
    /// Protocol; [`Protocol::None`] means the element carries no security
    pub protocol: Protocol,
    /// AKM schemes
    pub key_management: Vec<KeyManagement>,
    /// Pairwise ciphers
    pub pairwise_cipher: Vec<Cipher>,
    /// Group cipher
    pub group_cipher: Cipher,
}

/// Recognises OEM security elements.
///
/// Called once for every element of a frame, before the standard RSN and
/// vendor element handling.
pub trait OemSecurityParser: Send + Sync {
    /// Parse an element, or `None` when it is not an OEM security element
    fn parse(&self, id: u8, id_ext: u8, bytes: &[u8]) -> Option<OemSecurityType>;
}
