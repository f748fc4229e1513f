//! Security capability synthesis for 802.11 scan results.
//!
//! Reads the RSN element, the RSNE override vendor elements, the WPA v1
//! vendor element and a few vendor markers of a frame, and folds them with
//! the beacon capability field into one [`SecurityCapabilities`] value and
//! its capability string:
//!
//! ```text
//! [WPA2-PSK-CCMP-128][RSN-PSK+SAE-CCMP-128][ESS][MFPC]
//! ```
//!
//! Suite selectors are carried as big-endian words, OUI in the top three
//! bytes and suite type in the low byte.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod capabilities;
pub mod config;
pub mod oem;
pub mod rsn;
pub mod suites;

// Re-export main types
pub use capabilities::{CapabilityInfo, SecurityCapabilities};
pub use config::DecoderConfig;
pub use oem::{OemSecurityParser, OemSecurityType};
pub use rsn::{parse_rsn, parse_wpa, Pmf, RsnElement, SecurityInstance};
pub use suites::{akm_to_key_management, selector, Cipher, KeyManagement, Protocol};
