//! HDMI audio DMA register block and fields
//!
//! Offsets are relative to the start of the ASP HDMI window described by
//! the platform's first memory resource.

use super::{RORegister, RWRegister, WORegister};

/// HDMI audio DMA registers.
#[repr(C)]
pub struct RegisterBlock {
    /// Transmit format and transmitter enable
    pub TX3: RWRegister<u32>,
    /// DMA enable
    pub DMA_EN: RWRegister<u32>,
    /// Interrupt enable
    pub INT_EN: RWRegister<u32>,
    /// Raw interrupt state
    pub INT_STATE: RORegister<u32>,
    /// Interrupt state, after INT_EN masking
    pub INT_MSK_STATE: RORegister<u32>,
    /// Interrupt clear, write 1 to clear
    pub INT_CLR: WORegister<u32>,
    /// PCM buffer A source address
    pub A_ADDR: RWRegister<u32>,
    /// PCM buffer A length
    pub A_LEN: RWRegister<u32>,
    /// PCM buffer B source address
    pub B_ADDR: RWRegister<u32>,
    /// PCM buffer B length
    pub B_LEN: RWRegister<u32>,
    /// Audio interface set
    pub I2S_SET: WORegister<u32>,
    /// Audio interface clear
    pub I2S_CLR: WORegister<u32>,
    /// Audio interface select (I2S / S/PDIF)
    pub SPDIF_SEL: RWRegister<u32>,
    _reserved0: [u32; 3],
    /// Channel 0 status word 1, left subframe
    pub SIO_CH0_STATUS1_L: RWRegister<u32>,
    /// Channel 0 status word 1, right subframe
    pub SIO_CH0_STATUS1_R: RWRegister<u32>,
    /// Channel 0 status word 2, left subframe
    pub SIO_CH0_STATUS2_L: RWRegister<u32>,
    /// Channel 0 status word 2, right subframe
    pub SIO_CH0_STATUS2_R: RWRegister<u32>,
}

const _: () = assert!(core::mem::offset_of!(RegisterBlock, DMA_EN) == 0x04);
const _: () = assert!(core::mem::offset_of!(RegisterBlock, INT_CLR) == 0x14);
const _: () = assert!(core::mem::offset_of!(RegisterBlock, A_ADDR) == 0x18);
const _: () = assert!(core::mem::offset_of!(RegisterBlock, B_LEN) == 0x24);
const _: () = assert!(core::mem::offset_of!(RegisterBlock, SPDIF_SEL) == 0x30);
// Status words start on the next 16-byte boundary.
const _: () = assert!(core::mem::offset_of!(RegisterBlock, SIO_CH0_STATUS1_L) == 0x40);
const _: () = assert!(core::mem::offset_of!(RegisterBlock, SIO_CH0_STATUS2_R) == 0x4C);
const _: () = assert!(core::mem::size_of::<RegisterBlock>() == 0x50);

/// Defines a RAL field module: `offset`, `mask`, and the `R` / `W` / `RW`
/// value modules. Enumerated values land in `RW`.
macro_rules! field {
    ($name:ident, $offset:expr, $width:expr $(, $value:ident = $raw:expr)* $(,)?) => {
        pub mod $name {
            pub const offset: u32 = $offset;
            pub const mask: u32 = ((1 << $width) - 1) << offset;
            pub mod R {}
            pub mod W {}
            pub mod RW {
                $(pub const $value: u32 = $raw;)*
            }
        }
    };
}

/// Interrupt sources; shared by INT_EN, INT_STATE, INT_MSK_STATE and INT_CLR.
macro_rules! interrupt_fields {
    () => {
        field!(PCM_A, 0, 1);
        field!(PCM_B, 1, 1);
        field!(BUS_ERR, 2, 1);
    };
}

pub mod TX3 {
    field!(EN, 0, 1);
    field!(BIT_WIDTH, 3, 4);
    field!(ALIGN, 7, 1);
    field!(CH_NUM, 8, 3);
    field!(ORDER, 11, 1, MASTER = 1);
}

pub mod DMA_EN {
    field!(EN, 0, 1);
    field!(STOP, 1, 1);
}

pub mod INT_EN {
    interrupt_fields!();
}

pub mod INT_STATE {
    interrupt_fields!();
}

pub mod INT_MSK_STATE {
    interrupt_fields!();
}

pub mod INT_CLR {
    interrupt_fields!();
}

pub mod A_ADDR {}
pub mod A_LEN {}
pub mod B_ADDR {}
pub mod B_LEN {}

pub mod I2S_SET {
    field!(START, 0, 1);
}

pub mod I2S_CLR {
    field!(CLEAR, 0, 1);
}

pub mod SPDIF_SEL {
    field!(SEL, 0, 1, I2S = 0, SPDIF = 1);
}

pub mod SIO_CH0_STATUS1_L {
    field!(CHANNEL_TYPE, 0, 1);
    field!(HDCP, 2, 1);
    field!(SAMPLE_RATE, 24, 4);
}

pub mod SIO_CH0_STATUS1_R {
    pub use super::SIO_CH0_STATUS1_L::*;
}

pub mod SIO_CH0_STATUS2_L {
    field!(BIT_WIDTH, 0, 4, BITS_16 = 0x2);
}

pub mod SIO_CH0_STATUS2_R {
    pub use super::SIO_CH0_STATUS2_L::*;
}
