//! HT, VHT, HE and EHT operation elements.
//!
//! Each element has a fixed-length prefix; a shorter payload decodes to an
//! absent element rather than an error.

use crate::band::Band;
use crate::decode::Decode;
use crate::element::{eid, eid_ext};
use crate::WireError;
use serde::Serialize;
use tracing::debug;

/// Operating channel width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ChannelWidth {
    /// Not advertised by this element
    #[default]
    Unspecified,
    /// 20 MHz
    Mhz20,
    /// 40 MHz
    Mhz40,
    /// 80 MHz
    Mhz80,
    /// 160 MHz contiguous
    Mhz160,
    /// 80+80 MHz non-contiguous
    Mhz80Plus80,
    /// 320 MHz
    Mhz320,
}

fn wide_width(seg0: u8, seg1: u8) -> ChannelWidth {
    if seg1.abs_diff(seg0) == 8 {
        ChannelWidth::Mhz160
    } else {
        ChannelWidth::Mhz80Plus80
    }
}

const HT_OPERATION_LEN: usize = 22;

/// HT operation element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HtOperation {
    /// Element was long enough to decode
    pub present: bool,
    /// Secondary channel offset: 0 none, 1 above, 3 below
    pub second_channel_offset: u8,
}

impl HtOperation {
    /// 40 MHz when a secondary channel is in use, else 20 MHz
    pub fn channel_width(&self) -> ChannelWidth {
        if self.second_channel_offset != 0 {
            ChannelWidth::Mhz40
        } else {
            ChannelWidth::Mhz20
        }
    }

    /// Centre frequency given the primary channel frequency, 0 if invalid
    pub fn center_freq0(&self, primary_mhz: u32) -> u32 {
        match self.second_channel_offset {
            0 => primary_mhz,
            1 => primary_mhz + 10,
            3 => primary_mhz.saturating_sub(10),
            other => {
                debug!("invalid HT secondary channel offset {}", other);
                0
            }
        }
    }
}

impl Decode for HtOperation {
    const NAME: &'static str = "HT Operation";

    fn accepts(id: u8, _id_ext: u8) -> bool {
        id == eid::HT_OPERATION
    }

    fn decode_payload(b: &[u8]) -> Result<Self, WireError> {
        if b.len() < HT_OPERATION_LEN {
            debug!("HT Operation length {} too short", b.len());
            return Ok(Self::default());
        }
        Ok(Self {
            present: true,
            second_channel_offset: b[1] & 0x03,
        })
    }
}

const VHT_OPERATION_LEN: usize = 5;

/// VHT operation element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct VhtOperation {
    /// Element was long enough to decode
    pub present: bool,
    /// 0 for 20/40 MHz, otherwise 80 MHz or wider
    pub channel_mode: u8,
    /// Centre frequency segment 0 channel index
    pub center_freq_index1: u8,
    /// Centre frequency segment 1 channel index
    pub center_freq_index2: u8,
}

impl VhtOperation {
    /// Width from the channel mode and the two centre indices
    pub fn channel_width(&self) -> ChannelWidth {
        if self.channel_mode == 0 {
            ChannelWidth::Unspecified
        } else if self.center_freq_index2 == 0 {
            ChannelWidth::Mhz80
        } else {
            wide_width(self.center_freq_index1, self.center_freq_index2)
        }
    }

    /// Segment 0 centre frequency in MHz, 0 when not applicable
    pub fn center_freq0(&self) -> u32 {
        self.segment_freq(self.center_freq_index1)
    }

    /// Segment 1 centre frequency in MHz, 0 when not applicable
    pub fn center_freq1(&self) -> u32 {
        self.segment_freq(self.center_freq_index2)
    }

    fn segment_freq(&self, index: u8) -> u32 {
        if index == 0 || self.channel_mode == 0 {
            return 0;
        }
        Band::Ghz5.channel_to_frequency(index).unwrap_or(0)
    }
}

impl Decode for VhtOperation {
    const NAME: &'static str = "VHT Operation";

    fn accepts(id: u8, _id_ext: u8) -> bool {
        id == eid::VHT_OPERATION
    }

    fn decode_payload(b: &[u8]) -> Result<Self, WireError> {
        if b.len() < VHT_OPERATION_LEN {
            debug!("VHT Operation length {} too short", b.len());
            return Ok(Self::default());
        }
        Ok(Self {
            present: true,
            channel_mode: b[0],
            center_freq_index1: b[1],
            center_freq_index2: b[2],
        })
    }
}

/// Regulatory type of a 6 GHz AP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ApType6Ghz {
    /// Not advertised or reserved value
    #[default]
    Unknown,
    /// Low power indoor
    Indoor,
    /// Standard power
    StandardPower,
}

/// 6 GHz operation information carried in the HE operation element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct He6GhzInfo {
    /// Primary channel
    pub primary_channel: u8,
    /// 2-bit width field
    pub channel_width: u8,
    /// Regulatory AP type
    pub ap_type: ApType6Ghz,
    /// Centre frequency segment 0 channel index
    pub center_freq_seg0: u8,
    /// Centre frequency segment 1 channel index
    pub center_freq_seg1: u8,
}

const HE_OPERATION_BASIC_LEN: usize = 6;
const HE_TWT_REQUIRED: u8 = 0x08;
const HE_VHT_INFO_PRESENT: u8 = 0x40;
const HE_CO_HOSTED_BSS_PRESENT: u8 = 0x80;
const HE_6GHZ_INFO_PRESENT: u8 = 0x02;
const HE_VHT_INFO_LEN: usize = 3;
const HE_CO_HOSTED_BSS_LEN: usize = 1;
const HE_6GHZ_INFO_LEN: usize = 5;

/// HE operation element
///
/// ```text
/// | HE Op Info | BSS Color | Basic HE-MCS | VHT Info | Co-hosted BSS | 6 GHz Info |
///       3           1            2           0/3           0/1           0/5
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HeOperation {
    /// Element was long enough for every advertised field
    pub present: bool,
    /// AP requires TWT
    pub twt_required: bool,
    /// Embedded VHT operation information
    pub vht_info: Option<VhtOperation>,
    /// 6 GHz operation information
    pub he_6ghz_info: Option<He6GhzInfo>,
}

impl HeOperation {
    /// VHT operation information was advertised
    pub fn is_vht_info_present(&self) -> bool {
        self.vht_info.is_some()
    }

    /// 6 GHz operation information was advertised
    pub fn is_6ghz_info_present(&self) -> bool {
        self.he_6ghz_info.is_some()
    }

    /// Regulatory AP type, unknown without 6 GHz information
    pub fn ap_type_6ghz(&self) -> ApType6Ghz {
        self.he_6ghz_info.map(|i| i.ap_type).unwrap_or_default()
    }

    /// Width from the 6 GHz information
    pub fn channel_width(&self) -> ChannelWidth {
        match self.he_6ghz_info {
            None => ChannelWidth::Unspecified,
            Some(info) => match info.channel_width {
                0 => ChannelWidth::Mhz20,
                1 => ChannelWidth::Mhz40,
                2 => ChannelWidth::Mhz80,
                _ => wide_width(info.center_freq_seg0, info.center_freq_seg1),
            },
        }
    }

    /// Primary channel frequency in MHz, 0 without 6 GHz information
    pub fn primary_freq(&self) -> u32 {
        self.he_6ghz_info
            .and_then(|i| Band::Ghz6.channel_to_frequency(i.primary_channel))
            .unwrap_or(0)
    }

    /// Segment 0 centre frequency in MHz, 0 when not applicable
    pub fn center_freq0(&self) -> u32 {
        self.he_6ghz_info
            .map(|i| seg_freq_6ghz(i.center_freq_seg0))
            .unwrap_or(0)
    }

    /// Segment 1 centre frequency in MHz, 0 when not applicable
    pub fn center_freq1(&self) -> u32 {
        self.he_6ghz_info
            .map(|i| seg_freq_6ghz(i.center_freq_seg1))
            .unwrap_or(0)
    }
}

fn seg_freq_6ghz(seg: u8) -> u32 {
    if seg == 0 {
        return 0;
    }
    Band::Ghz6.channel_to_frequency(seg).unwrap_or(0)
}

impl Decode for HeOperation {
    const NAME: &'static str = "HE Operation";

    fn accepts(id: u8, id_ext: u8) -> bool {
        id == eid::EXTENSION_PRESENT && id_ext == eid_ext::HE_OPERATION
    }

    fn decode_payload(b: &[u8]) -> Result<Self, WireError> {
        if b.len() < HE_OPERATION_BASIC_LEN {
            debug!("HE Operation length {} too short", b.len());
            return Ok(Self::default());
        }

        let vht_present = b[1] & HE_VHT_INFO_PRESENT != 0;
        let co_hosted = b[1] & HE_CO_HOSTED_BSS_PRESENT != 0;
        let info_6ghz = b[2] & HE_6GHZ_INFO_PRESENT != 0;

        let vht_len = if vht_present { HE_VHT_INFO_LEN } else { 0 };
        let co_hosted_len = if co_hosted { HE_CO_HOSTED_BSS_LEN } else { 0 };
        let expected = HE_OPERATION_BASIC_LEN
            + vht_len
            + co_hosted_len
            + if info_6ghz { HE_6GHZ_INFO_LEN } else { 0 };
        if b.len() < expected {
            debug!("HE Operation length {} below advertised {}", b.len(), expected);
            return Ok(Self::default());
        }

        let vht_info = if vht_present {
            let start = HE_OPERATION_BASIC_LEN;
            let mut synthetic = [0u8; VHT_OPERATION_LEN];
            synthetic[..HE_VHT_INFO_LEN].copy_from_slice(&b[start..start + HE_VHT_INFO_LEN]);
            Some(VhtOperation::decode_payload(&synthetic)?)
        } else {
            None
        };

        let he_6ghz_info = if info_6ghz {
            let s = HE_OPERATION_BASIC_LEN + vht_len + co_hosted_len;
            let control = b[s + 1];
            let ap_type = match (control & 0x38) >> 3 {
                0 => ApType6Ghz::Indoor,
                1 => ApType6Ghz::StandardPower,
                _ => ApType6Ghz::Unknown,
            };
            Some(He6GhzInfo {
                primary_channel: b[s],
                channel_width: control & 0x03,
                ap_type,
                center_freq_seg0: b[s + 2],
                center_freq_seg1: b[s + 3],
            })
        } else {
            None
        };

        Ok(Self {
            present: true,
            twt_required: b[0] & HE_TWT_REQUIRED != 0,
            vht_info,
            he_6ghz_info,
        })
    }
}

const EHT_OPERATION_BASIC_LEN: usize = 5;
const EHT_INFO_PRESENT: u8 = 0x01;
const EHT_DISABLED_BITMAP_PRESENT: u8 = 0x02;
const EHT_INFO_LEN: usize = 3;
const EHT_DISABLED_BITMAP_LEN: usize = 2;

/// EHT operation element
///
/// ```text
/// | EHT Op Params | Basic EHT-MCS | Control | CCFS0 | CCFS1 | Disabled Subchannel Bitmap |
///        1               4            1        1       1              0/2
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EhtOperation {
    /// Element was long enough for every advertised field
    pub present: bool,
    /// Control/CCFS fields were advertised
    pub info_present: bool,
    /// 4-bit width field
    pub channel_width_field: u8,
    /// Centre frequency segment 0 channel index
    pub center_freq_seg0: u8,
    /// Centre frequency segment 1 channel index
    pub center_freq_seg1: u8,
    /// Punctured 20 MHz subchannels
    pub disabled_subchannel_bitmap: Option<[u8; 2]>,
}

impl EhtOperation {
    /// Disabled subchannel bitmap was advertised
    pub fn is_disabled_subchannel_bitmap_present(&self) -> bool {
        self.disabled_subchannel_bitmap.is_some()
    }

    /// Width from the control field. Without operation info the field keeps
    /// its zero default and reads as 20 MHz.
    pub fn channel_width(&self) -> ChannelWidth {
        match self.channel_width_field {
            0 => ChannelWidth::Mhz20,
            1 => ChannelWidth::Mhz40,
            2 => ChannelWidth::Mhz80,
            3 => ChannelWidth::Mhz160,
            4 => ChannelWidth::Mhz320,
            _ => ChannelWidth::Unspecified,
        }
    }

    /// Segment 0 centre frequency in `band`, `None` when not applicable
    pub fn center_freq0(&self, band: Band) -> Option<u32> {
        Self::segment_freq(self.center_freq_seg0, band)
    }

    /// Segment 1 centre frequency in `band`, `None` when not applicable
    pub fn center_freq1(&self, band: Band) -> Option<u32> {
        Self::segment_freq(self.center_freq_seg1, band)
    }

    fn segment_freq(seg: u8, band: Band) -> Option<u32> {
        if seg == 0 {
            return None;
        }
        band.channel_to_frequency(seg)
    }
}

impl Decode for EhtOperation {
    const NAME: &'static str = "EHT Operation";

    fn accepts(id: u8, id_ext: u8) -> bool {
        id == eid::EXTENSION_PRESENT && id_ext == eid_ext::EHT_OPERATION
    }

    fn decode_payload(b: &[u8]) -> Result<Self, WireError> {
        if b.len() < EHT_OPERATION_BASIC_LEN {
            debug!("EHT Operation length {} too short", b.len());
            return Ok(Self::default());
        }

        let info_present = b[0] & EHT_INFO_PRESENT != 0;
        let bitmap_present = info_present && b[0] & EHT_DISABLED_BITMAP_PRESENT != 0;
        let expected = EHT_OPERATION_BASIC_LEN
            + match (info_present, bitmap_present) {
                (true, true) => EHT_INFO_LEN + EHT_DISABLED_BITMAP_LEN,
                (true, false) => EHT_INFO_LEN,
                _ => 0,
            };
        if b.len() < expected {
            debug!("EHT Operation length {} below advertised {}", b.len(), expected);
            return Ok(Self::default());
        }

        let mut op = Self {
            present: true,
            info_present,
            ..Self::default()
        };
        if info_present {
            let s = EHT_OPERATION_BASIC_LEN;
            op.channel_width_field = b[s] & 0x0F;
            op.center_freq_seg0 = b[s + 1];
            op.center_freq_seg1 = b[s + 2];
        }
        if bitmap_present {
            let s = EHT_OPERATION_BASIC_LEN + EHT_INFO_LEN;
            op.disabled_subchannel_bitmap = Some([b[s], b[s + 1]]);
        }
        Ok(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::RawElement;

    #[test]
    fn test_ht_operation() {
        let mut payload = vec![0u8; 22];
        payload[1] = 0x01;
        let ht = HtOperation::decode(&RawElement::new(eid::HT_OPERATION, payload)).unwrap();
        assert!(ht.present);
        assert_eq!(ht.channel_width(), ChannelWidth::Mhz40);
        assert_eq!(ht.center_freq0(2412), 2422);

        let ht = HtOperation {
            present: true,
            second_channel_offset: 3,
        };
        assert_eq!(ht.center_freq0(2437), 2427);
        let ht = HtOperation {
            present: true,
            second_channel_offset: 2,
        };
        assert_eq!(ht.center_freq0(2437), 0);
    }

    #[test]
    fn test_ht_operation_short() {
        let ht = HtOperation::decode_payload(&[0u8; 21]).unwrap();
        assert!(!ht.present);
        assert_eq!(ht.channel_width(), ChannelWidth::Mhz20);
    }

    #[test]
    fn test_vht_operation_widths() {
        let vht = VhtOperation::decode_payload(&[1, 42, 0, 0, 0]).unwrap();
        assert_eq!(vht.channel_width(), ChannelWidth::Mhz80);
        assert_eq!(vht.center_freq0(), 5210);
        assert_eq!(vht.center_freq1(), 0);

        let vht = VhtOperation::decode_payload(&[1, 42, 50, 0, 0]).unwrap();
        assert_eq!(vht.channel_width(), ChannelWidth::Mhz160);

        let vht = VhtOperation::decode_payload(&[1, 42, 155, 0, 0]).unwrap();
        assert_eq!(vht.channel_width(), ChannelWidth::Mhz80Plus80);
        assert_eq!(vht.center_freq1(), 5775);

        let vht = VhtOperation::decode_payload(&[0, 42, 50, 0, 0]).unwrap();
        assert_eq!(vht.channel_width(), ChannelWidth::Unspecified);
        assert_eq!(vht.center_freq0(), 0);

        assert!(!VhtOperation::decode_payload(&[1, 42, 50, 0]).unwrap().present);
    }

    #[test]
    fn test_he_operation_basic_boundary() {
        let he = HeOperation::decode_payload(&[0u8; 6]).unwrap();
        assert!(he.present);
        assert!(!he.is_vht_info_present());
        assert!(!he.is_6ghz_info_present());
        assert_eq!(he.channel_width(), ChannelWidth::Unspecified);

        assert!(!HeOperation::decode_payload(&[0u8; 5]).unwrap().present);
    }

    #[test]
    fn test_he_operation_6ghz_80mhz() {
        let payload = [0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x10, 0x02, 0x14, 0x00, 0x00];
        let he = HeOperation::decode_payload(&payload).unwrap();
        assert!(he.present);
        assert!(he.is_6ghz_info_present());
        assert!(!he.is_vht_info_present());
        assert_eq!(he.channel_width(), ChannelWidth::Mhz80);
        assert_eq!(he.center_freq0(), 6050);
        assert_eq!(he.center_freq1(), 0);
        assert_eq!(he.primary_freq(), 6030);
        assert_eq!(he.ap_type_6ghz(), ApType6Ghz::Indoor);
    }

    #[test]
    fn test_he_operation_vht_and_co_hosted() {
        // VHT info (3) + co-hosted (1) + 6 GHz info (5)
        let payload = [
            0x08, 0xC0, 0x02, 0x00, 0x00, 0x00, // basic
            0x01, 0x2A, 0x32, // VHT info
            0x05, // co-hosted BSS
            0x25, 0x0B, 0x27, 0x2F, 0x00, // 6 GHz info
        ];
        let he = HeOperation::decode_payload(&payload).unwrap();
        assert!(he.present);
        assert!(he.twt_required);
        let vht = he.vht_info.unwrap();
        assert_eq!(vht.channel_width(), ChannelWidth::Mhz160);
        assert_eq!(he.channel_width(), ChannelWidth::Mhz160);
        assert_eq!(he.ap_type_6ghz(), ApType6Ghz::StandardPower);

        // one byte short of the advertised layout
        assert!(!HeOperation::decode_payload(&payload[..14]).unwrap().present);
    }

    #[test]
    fn test_eht_operation() {
        let payload = [0x03, 0xfc, 0xff, 0xfc, 0xff, 0x03, 0x32, 0x32, 0x03, 0x00];
        let eht = EhtOperation::decode_payload(&payload).unwrap();
        assert!(eht.present);
        assert!(eht.info_present);
        assert_eq!(eht.disabled_subchannel_bitmap, Some([0x03, 0x00]));
        assert_eq!(eht.channel_width(), ChannelWidth::Mhz160);
        assert_eq!(eht.center_freq0(Band::Ghz5), Some(5250));

        let payload = [0x01, 0x44, 0x44, 0x44, 0x44, 0x04, 0x2f, 0x1f];
        let eht = EhtOperation::decode_payload(&payload).unwrap();
        assert!(!eht.is_disabled_subchannel_bitmap_present());
        assert_eq!(eht.channel_width(), ChannelWidth::Mhz320);
        assert_eq!(eht.center_freq0(Band::Ghz6), Some(6185));
        assert_eq!(eht.center_freq1(Band::Ghz6), Some(6105));
        assert_eq!(eht.center_freq1(Band::Unspecified), None);
    }

    #[test]
    fn test_eht_operation_short_info() {
        let payload = [0x03, 0, 0, 0, 0, 0x03, 0x32, 0x32, 0x03];
        assert!(!EhtOperation::decode_payload(&payload).unwrap().present);
        let eht = EhtOperation::decode_payload(&[0u8; 5]).unwrap();
        assert!(eht.present);
        assert!(!eht.info_present);
        assert_eq!(eht.channel_width(), ChannelWidth::Mhz20);
    }
}
