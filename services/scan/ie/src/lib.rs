//! Information element scanning and decoding for 802.11 management frames.
//!
//! The body of a beacon or probe response is a run of information elements.
//! This crate splits that body into [`RawElement`]s, reassembles fragmented
//! elements, and decodes each known kind into a typed value.
//!
//! ## Pipeline
//!
//! - **Scanner**: [`scan`] walks the buffer, tolerating truncated tails
//! - **Defragmenter**: [`defragment`] joins 255-byte fragment chains
//! - **Decoders**: one [`Decode`] impl per element kind, dispatched by [`Element::decode`]
//!
//! ## Element Format
//!
//! ```text
//! +--------+--------+-------------------+------------------+
//! | id     | len    | id_ext (id = 255) | payload          |
//! +--------+--------+-------------------+------------------+
//! ```
//!
//! Decoding is pure: no element shares state with another, and a failure in
//! one element never affects its siblings.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod band;
pub mod decode;
pub mod element;
pub mod elements;
pub mod error;
pub mod fragment;
pub mod reader;
pub mod scanner;
pub mod wifi_mode;

// Re-export main types
pub use band::{band_from_op_class, Band};
pub use decode::{
    decode_all, hs20_vendor_element, interworking, roaming_consortium, vendor_elements, Decode,
    Element,
};
pub use element::{eid, eid_ext, is_fragmentable, RawElement};
pub use error::{ContractViolation, DecodeError, WireError};
pub use fragment::{
    defragment, Defragmented, FRAGMENT_EID, FRAG_MAX_LEN, MULTI_LINK_FRAGMENT_SUB_EID,
};
pub use reader::Reader;
pub use scanner::{scan, scan_hex};
pub use wifi_mode::{ModeElements, WifiMode};
