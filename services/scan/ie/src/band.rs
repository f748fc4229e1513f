//! Bands, the global operating class table and channel/frequency conversion.

use crate::WireError;
use serde::Serialize;

/// Radio band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Band {
    /// Band not known
    #[default]
    Unspecified,
    /// 2.4 GHz
    Ghz2_4,
    /// 5 GHz
    Ghz5,
    /// 6 GHz
    Ghz6,
    /// 60 GHz (DMG)
    Ghz60,
}

impl Band {
    /// Band containing a centre frequency in MHz
    pub fn from_frequency(mhz: u32) -> Self {
        match mhz {
            2400..=2500 => Band::Ghz2_4,
            4900..=5900 => Band::Ghz5,
            5925..=7125 => Band::Ghz6,
            58320..=70200 => Band::Ghz60,
            _ => Band::Unspecified,
        }
    }

    /// Frequency in MHz of `channel` in this band, if the channel exists
    pub fn channel_to_frequency(self, channel: u8) -> Option<u32> {
        let ch = u32::from(channel);
        match self {
            Band::Ghz2_4 => match channel {
                14 => Some(2484),
                1..=13 => Some(2407 + 5 * ch),
                _ => None,
            },
            Band::Ghz5 => match channel {
                32..=177 => Some(5000 + 5 * ch),
                _ => None,
            },
            Band::Ghz6 => match channel {
                2 => Some(5935),
                1..=233 => Some(5950 + 5 * ch),
                _ => None,
            },
            Band::Ghz60 => match channel {
                1..=6 => Some(58320 + 2160 * (ch - 1)),
                _ => None,
            },
            Band::Unspecified => None,
        }
    }
}

/// Map a global operating class and channel to a band.
///
/// Four 2.4 GHz classes (81-84), sixteen 5 GHz classes (115-130) and six
/// 6 GHz classes (131-136) are known. Anything else is
/// [`WireError::UnknownBand`].
pub fn band_from_op_class(op_class: u8, channel: u8) -> Result<Band, WireError> {
    let band = match op_class {
        81..=84 if (1..=14).contains(&channel) => Band::Ghz2_4,
        115..=130 if (32..=177).contains(&channel) => Band::Ghz5,
        131..=136 if (1..=233).contains(&channel) => Band::Ghz6,
        _ => return Err(WireError::UnknownBand { op_class, channel }),
    };
    Ok(band)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_class_table() {
        assert_eq!(band_from_op_class(81, 6).unwrap(), Band::Ghz2_4);
        assert_eq!(band_from_op_class(84, 14).unwrap(), Band::Ghz2_4);
        assert_eq!(band_from_op_class(115, 36).unwrap(), Band::Ghz5);
        assert_eq!(band_from_op_class(130, 177).unwrap(), Band::Ghz5);
        assert_eq!(band_from_op_class(131, 1).unwrap(), Band::Ghz6);
        assert_eq!(band_from_op_class(136, 233).unwrap(), Band::Ghz6);
    }

    #[test]
    fn test_op_class_unknown() {
        assert!(band_from_op_class(80, 6).is_err());
        assert!(band_from_op_class(81, 36).is_err());
        assert!(band_from_op_class(137, 1).is_err());
        assert!(band_from_op_class(131, 0).is_err());
    }

    #[test]
    fn test_channel_to_frequency() {
        assert_eq!(Band::Ghz2_4.channel_to_frequency(1), Some(2412));
        assert_eq!(Band::Ghz2_4.channel_to_frequency(14), Some(2484));
        assert_eq!(Band::Ghz5.channel_to_frequency(50), Some(5250));
        assert_eq!(Band::Ghz5.channel_to_frequency(149), Some(5745));
        assert_eq!(Band::Ghz6.channel_to_frequency(20), Some(6050));
        assert_eq!(Band::Ghz6.channel_to_frequency(2), Some(5935));
        assert_eq!(Band::Ghz60.channel_to_frequency(2), Some(60480));
        assert_eq!(Band::Unspecified.channel_to_frequency(6), None);
        assert_eq!(Band::Ghz5.channel_to_frequency(6), None);
    }

    #[test]
    fn test_from_frequency() {
        assert_eq!(Band::from_frequency(2437), Band::Ghz2_4);
        assert_eq!(Band::from_frequency(5180), Band::Ghz5);
        assert_eq!(Band::from_frequency(5955), Band::Ghz6);
        assert_eq!(Band::from_frequency(60480), Band::Ghz60);
        assert_eq!(Band::from_frequency(900), Band::Unspecified);
    }
}
