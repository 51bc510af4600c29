//! Audio format parameters and their register encodings
//!
//! Callers hand the driver raw enumeration indices. The enums below give
//! those indices names; each one converts back and forth with
//! [`from_index`](BitWidth::from_index) and `as u32`. Register codes come
//! from tables indexed by the validated enum.

use crate::ral::hdmi::TX3;
use crate::{Error, Result};

/// Number of PCM channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum ChannelNum {
    /// Mono; only valid with 16-bit samples.
    One = 0,
    /// Stereo.
    Two = 1,
    /// 4 channels.
    Four = 2,
    /// 5.1 surround.
    Six = 3,
    /// 7.1 surround.
    Eight = 4,
}

/// PCM sample width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum BitWidth {
    /// 16 bits per sample.
    Bits16 = 0,
    /// 17 bits per sample.
    Bits17 = 1,
    /// 18 bits per sample.
    Bits18 = 2,
    /// 19 bits per sample.
    Bits19 = 3,
    /// 20 bits per sample.
    Bits20 = 4,
    /// 21 bits per sample.
    Bits21 = 5,
    /// 22 bits per sample.
    Bits22 = 6,
    /// 23 bits per sample.
    Bits23 = 7,
    /// 24 bits per sample.
    Bits24 = 8,
}

/// Alignment of samples within the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum Align {
    /// Samples packed on 16-bit boundaries.
    Align16 = 0,
    /// Samples packed on 32-bit boundaries.
    Align32 = 1,
}

/// Sample rate signalled in the channel status words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum SampleRate {
    /// 44.1 kHz
    Khz44 = 0,
    /// 48 kHz
    Khz48 = 1,
    /// 32 kHz
    Khz32 = 2,
    /// 96 kHz
    Khz96 = 3,
}

// (channel count, register code)
const CHANNEL_NUM: [(u32, u32); 5] = [(1, 0x0), (2, 0x1), (4, 0x3), (6, 0x5), (8, 0x7)];

// (bits, register code)
const BIT_WIDTH: [(u32, u32); 9] = [
    (16, 0x0),
    (17, 0x1),
    (18, 0x2),
    (19, 0x3),
    (20, 0x4),
    (21, 0x5),
    (22, 0x6),
    (23, 0x7),
    (24, 0x8),
];

// (alignment bits, register code)
const ALIGN: [(u32, u32); 2] = [(16, 0x1), (32, 0x0)];

// (kHz, register code)
const SAMPLE_RATE: [(u32, u32); 4] = [(44, 0x00), (48, 0x02), (32, 0x03), (96, 0x0A)];

impl ChannelNum {
    /// Looks up the enumeration index, or `None` if it's out of range.
    pub const fn from_index(index: u32) -> Option<Self> {
        Some(match index {
            0 => ChannelNum::One,
            1 => ChannelNum::Two,
            2 => ChannelNum::Four,
            3 => ChannelNum::Six,
            4 => ChannelNum::Eight,
            _ => return None,
        })
    }

    /// Number of channels.
    pub const fn count(self) -> u32 {
        CHANNEL_NUM[self as usize].0
    }

    /// TX3 `CH_NUM` field value.
    pub const fn code(self) -> u32 {
        CHANNEL_NUM[self as usize].1
    }
}

impl BitWidth {
    /// Looks up the enumeration index, or `None` if it's out of range.
    pub const fn from_index(index: u32) -> Option<Self> {
        Some(match index {
            0 => BitWidth::Bits16,
            1 => BitWidth::Bits17,
            2 => BitWidth::Bits18,
            3 => BitWidth::Bits19,
            4 => BitWidth::Bits20,
            5 => BitWidth::Bits21,
            6 => BitWidth::Bits22,
            7 => BitWidth::Bits23,
            8 => BitWidth::Bits24,
            _ => return None,
        })
    }

    /// Bits per sample.
    pub const fn bits(self) -> u32 {
        BIT_WIDTH[self as usize].0
    }

    /// TX3 `BIT_WIDTH` field value.
    pub const fn code(self) -> u32 {
        BIT_WIDTH[self as usize].1
    }
}

impl Align {
    /// Looks up the enumeration index, or `None` if it's out of range.
    pub const fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Align::Align16),
            1 => Some(Align::Align32),
            _ => None,
        }
    }

    /// Alignment in bits.
    pub const fn bits(self) -> u32 {
        ALIGN[self as usize].0
    }

    /// TX3 `ALIGN` field value.
    pub const fn code(self) -> u32 {
        ALIGN[self as usize].1
    }
}

impl SampleRate {
    /// Looks up the enumeration index, or `None` if the rate isn't supported.
    pub const fn from_index(index: u32) -> Option<Self> {
        Some(match index {
            0 => SampleRate::Khz44,
            1 => SampleRate::Khz48,
            2 => SampleRate::Khz32,
            3 => SampleRate::Khz96,
            _ => return None,
        })
    }

    /// Nominal rate in kHz (44 for 44.1 kHz).
    pub const fn khz(self) -> u32 {
        SAMPLE_RATE[self as usize].0
    }

    /// Channel status `SAMPLE_RATE` field value.
    pub const fn code(self) -> u32 {
        SAMPLE_RATE[self as usize].1
    }
}

/// Transmit format, as enumeration indices.
///
/// Indices aren't checked until the parameters reach
/// [`encode_tx3`] or [`HdmiDma::tx3_config`](crate::HdmiDma::tx3_config).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tx3Params {
    /// [`ChannelNum`] index.
    pub channel_num: u32,
    /// [`BitWidth`] index.
    pub bit_width: u32,
    /// [`Align`] index.
    pub align_type: u32,
}

impl Tx3Params {
    /// Parameters from typed values.
    pub const fn new(channel_num: ChannelNum, bit_width: BitWidth, align_type: Align) -> Self {
        Self {
            channel_num: channel_num as u32,
            bit_width: bit_width as u32,
            align_type: align_type as u32,
        }
    }
}

/// Channel status configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SioParams {
    /// [`SampleRate`] index. Unsupported indices leave the rate untouched.
    pub sample_rate: u32,
    /// Signal copy protection.
    pub is_hdcp: bool,
    /// The transmit format this stream uses.
    pub tx3: Tx3Params,
}

/// Computes the TX3 register value for `params`.
///
/// The value carries the format fields, the fixed PCM ordering mode, and
/// the transmitter enable bit. Checks run in order (bit width, then
/// channels, then alignment) and the first failure is returned.
pub fn encode_tx3(params: &Tx3Params) -> Result<u32> {
    let bit_width =
        BitWidth::from_index(params.bit_width).ok_or(Error::UnsupportedBitWidth(params.bit_width))?;

    let channel_num = match ChannelNum::from_index(params.channel_num) {
        Some(ChannelNum::One) if bit_width != BitWidth::Bits16 => None,
        channel_num => channel_num,
    }
    .ok_or(Error::UnsupportedChannels {
        channel_num: params.channel_num,
        bit_width: params.bit_width,
    })?;

    let align =
        Align::from_index(params.align_type).ok_or(Error::UnsupportedAlignment(params.align_type))?;

    Ok(bit_width.code() << TX3::BIT_WIDTH::offset
        | TX3::ORDER::RW::MASTER << TX3::ORDER::offset
        | channel_num.code() << TX3::CH_NUM::offset
        | align.code() << TX3::ALIGN::offset
        | TX3::EN::mask)
}
