//! Typed decoders, one per information element kind.

pub mod basic;
pub mod bss_load;
pub mod capabilities;
pub mod ext_caps;
pub mod interworking;
pub mod mlo;
pub mod multi_link;
pub mod operation;
pub mod rnr;
pub mod vendor;

pub use basic::{rate_from_byte, Country, Rsnxe, SupportedRates, TrafficIndicationMap};
pub use bss_load::{BssLoad, CHANNEL_UTILIZATION_SCALE, MAX_CHANNEL_UTILIZATION};
pub use capabilities::{
    max_spatial_streams_from_mcs_map, EhtCapabilities, HeCapabilities, HtCapabilities,
    VhtCapabilities,
};
pub use ext_caps::ExtendedCapabilities;
pub use interworking::{AccessNetworkType, Interworking, RoamingConsortium};
pub use mlo::{MacAddress, MloLink};
pub use multi_link::MultiLink;
pub use operation::{
    ApType6Ghz, ChannelWidth, EhtOperation, He6GhzInfo, HeOperation, HtOperation, VhtOperation,
};
pub use rnr::Rnr;
pub use vendor::{HsRelease, Vsa, OUI_TYPE_HS20, OUI_TYPE_MBO_OCE, OUI_WFA};

/// Bit `n` of a little-endian bit vector; bits past the end read as clear
pub(crate) fn test_bit(bytes: &[u8], n: usize) -> bool {
    bytes.get(n / 8).map_or(false, |byte| byte & (1 << (n % 8)) != 0)
}
