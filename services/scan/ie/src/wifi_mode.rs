//! 802.11 generation of a BSS, derived from the elements it advertises.

use crate::band::Band;
use serde::Serialize;
use std::fmt;

const MIN_OFDM_RATE_BPS: u32 = 24_000_000;

/// Wi-Fi generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum WifiMode {
    /// Could not be determined
    #[default]
    Undefined,
    /// 802.11a
    A,
    /// 802.11b
    B,
    /// 802.11g
    G,
    /// 802.11n
    N,
    /// 802.11ac
    Ac,
    /// 802.11ax
    Ax,
    /// 802.11be
    Be,
}

/// Which capability elements a BSS advertised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeElements {
    /// EHT element seen
    pub eht: bool,
    /// HE element seen
    pub he: bool,
    /// VHT element seen
    pub vht: bool,
    /// HT element seen
    pub ht: bool,
    /// ERP element seen
    pub erp: bool,
}

impl WifiMode {
    /// Classify a BSS from its frequency, highest supported rate and advertised elements
    pub fn determine(frequency_mhz: u32, max_rate_bps: u32, seen: ModeElements) -> Self {
        let is_2ghz = Band::from_frequency(frequency_mhz) == Band::Ghz2_4;
        if seen.eht {
            Self::Be
        } else if seen.he {
            Self::Ax
        } else if seen.vht && !is_2ghz {
            Self::Ac
        } else if seen.ht {
            Self::N
        } else if seen.erp {
            Self::G
        } else if is_2ghz {
            if max_rate_bps < MIN_OFDM_RATE_BPS {
                Self::B
            } else {
                Self::G
            }
        } else {
            Self::A
        }
    }
}

impl fmt::Display for WifiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Undefined => "MODE_UNDEFINED",
            Self::A => "MODE_11A",
            Self::B => "MODE_11B",
            Self::G => "MODE_11G",
            Self::N => "MODE_11N",
            Self::Ac => "MODE_11AC",
            Self::Ax => "MODE_11AX",
            Self::Be => "MODE_11BE",
        };
        f.write_str(name)
    }
}
