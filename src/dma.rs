//! Ping-pong buffer programming, start / stop, and interrupts.

use crate::ral::{self, hdmi};
use crate::{Error, HdmiDma, Result, WakeLock};

/// Buffer addresses must be 128 byte aligned.
const ADDR_ALIGN_MASK: u32 = 0x7F;
/// Buffer lengths must be a multiple of 64 bytes.
const LEN_ALIGN_MASK: u32 = 0x3F;

const DMA_EN_MASK: u32 = hdmi::DMA_EN::EN::mask;
const DMA_DISABLE_MASK: u32 = hdmi::DMA_EN::STOP::mask;
const INT_MASK: u32 =
    hdmi::INT_EN::PCM_A::mask | hdmi::INT_EN::PCM_B::mask | hdmi::INT_EN::BUS_ERR::mask;

/// Register values captured for diagnostics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterSnapshot {
    /// Transmit format.
    pub tx3: u32,
    /// DMA enable.
    pub dma_en: u32,
    /// Interrupt enable.
    pub int_en: u32,
    /// Buffer A address.
    pub a_addr: u32,
    /// Buffer A length.
    pub a_len: u32,
    /// Buffer B address.
    pub b_addr: u32,
    /// Buffer B length.
    pub b_len: u32,
}

impl<W: WakeLock> HdmiDma<W> {
    /// Enable the DMA engine.
    ///
    /// Only writes the DMA enable register; see [`dma_start`](Self::dma_start)
    /// for the full start sequence.
    pub fn enable(&self) {
        self.locked_write(|regs| ral::write_reg!(crate::ral::hdmi, regs, DMA_EN, DMA_EN_MASK));
    }

    /// Returns the raw, unmasked interrupt state.
    pub fn read_interrupt_status(&self) -> u32 {
        self.locked(|regs| ral::read_reg!(crate::ral::hdmi, regs, INT_STATE))
    }

    /// Program the ping-pong buffers.
    ///
    /// `addr` is the start of both halves, and `size` is the length of one
    /// half. Buffer A spans `addr..addr + size`, and buffer B follows it.
    /// Also selects the I2S interface and clears pending interrupts.
    ///
    /// Call this before [`dma_start`](Self::dma_start). The hardware doesn't
    /// check that you did.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBuffer`] without touching the hardware if
    /// `addr` isn't 128 byte aligned, `size` isn't a multiple of 64 bytes,
    /// or buffer B would wrap the 32-bit address space.
    pub fn dma_config(&self, addr: u32, size: u32) -> Result<()> {
        let b_addr = addr
            .checked_add(size)
            .filter(|_| addr & ADDR_ALIGN_MASK == 0 && size & LEN_ALIGN_MASK == 0)
            .ok_or_else(|| {
                error!("invalid dma buffer: addr {:#x}, size {:#x}", addr, size);
                Error::InvalidBuffer { addr, size }
            })?;

        self.locked_write(|regs| ral::write_reg!(crate::ral::hdmi, regs, I2S_CLR, CLEAR: 1));
        self.locked_write(|regs| ral::modify_reg!(crate::ral::hdmi, regs, SPDIF_SEL, SEL: I2S));

        self.locked_write(|regs| ral::write_reg!(crate::ral::hdmi, regs, A_ADDR, addr));
        self.locked_write(|regs| ral::write_reg!(crate::ral::hdmi, regs, A_LEN, size));

        self.locked_write(|regs| ral::write_reg!(crate::ral::hdmi, regs, B_ADDR, b_addr));
        self.locked_write(|regs| ral::write_reg!(crate::ral::hdmi, regs, B_LEN, size));

        self.locked_write(|regs| ral::write_reg!(crate::ral::hdmi, regs, INT_CLR, INT_MASK));

        info!("dma config: addr {:#x}, size {:#x}", addr, size);
        Ok(())
    }

    /// Acknowledge interrupts.
    ///
    /// Writes `mask` to the interrupt clear register as-is. Bit 0 is
    /// buffer A, bit 1 is buffer B, and bit 2 is a bus error.
    pub fn dma_clear_interrupt(&self, mask: u32) {
        self.locked_write(|regs| ral::write_reg!(crate::ral::hdmi, regs, INT_CLR, mask));
    }

    /// Start the DMA engine and its interrupts.
    ///
    /// Holds the wake lock until [`dma_stop`](Self::dma_stop). Doesn't wait
    /// for the hardware to acknowledge, so this always succeeds.
    pub fn dma_start(&self) -> Result<()> {
        self.locked_write(|regs| ral::write_reg!(crate::ral::hdmi, regs, DMA_EN, DMA_EN_MASK));
        self.locked_write(|regs| ral::write_reg!(crate::ral::hdmi, regs, INT_EN, INT_MASK));
        self.locked_write(|regs| ral::write_reg!(crate::ral::hdmi, regs, I2S_SET, START: 1));
        self.keep_active(true);

        self.dump();
        info!("dma start");
        Ok(())
    }

    /// Stop the DMA engine.
    ///
    /// Disables each interrupt source on its own, leaving other INT_EN bits
    /// as they are, then disables DMA and drops the wake lock. Poll
    /// [`dma_is_stop`](Self::dma_is_stop) to see when the engine settles.
    pub fn dma_stop(&self) {
        self.locked_write(|regs| ral::modify_reg!(crate::ral::hdmi, regs, INT_EN, PCM_A: 0));
        self.locked_write(|regs| ral::modify_reg!(crate::ral::hdmi, regs, INT_EN, PCM_B: 0));
        self.locked_write(|regs| ral::modify_reg!(crate::ral::hdmi, regs, INT_EN, BUS_ERR: 0));

        self.locked_write(|regs| ral::write_reg!(crate::ral::hdmi, regs, DMA_EN, DMA_DISABLE_MASK));
        self.keep_active(false);
        info!("dma stop");
    }

    /// Returns `true` once DMA is disabled and no masked interrupt is
    /// pending.
    ///
    /// Disabling DMA and draining interrupts don't happen together, so both
    /// registers are checked.
    pub fn dma_is_stop(&self) -> bool {
        let dma_en = self.locked(|regs| ral::read_reg!(crate::ral::hdmi, regs, DMA_EN));
        let int_mask_state = self.locked(|regs| ral::read_reg!(crate::ral::hdmi, regs, INT_MSK_STATE));
        (dma_en | int_mask_state) & DMA_EN_MASK == 0
    }

    /// Read the main configuration registers in one critical section.
    pub fn snapshot(&self) -> RegisterSnapshot {
        self.locked(|regs| RegisterSnapshot {
            tx3: ral::read_reg!(crate::ral::hdmi, regs, TX3),
            dma_en: ral::read_reg!(crate::ral::hdmi, regs, DMA_EN),
            int_en: ral::read_reg!(crate::ral::hdmi, regs, INT_EN),
            a_addr: ral::read_reg!(crate::ral::hdmi, regs, A_ADDR),
            a_len: ral::read_reg!(crate::ral::hdmi, regs, A_LEN),
            b_addr: ral::read_reg!(crate::ral::hdmi, regs, B_ADDR),
            b_len: ral::read_reg!(crate::ral::hdmi, regs, B_LEN),
        })
    }

    /// Log a [`snapshot`](Self::snapshot) at debug level.
    pub(crate) fn dump(&self) {
        if !crate::fmt::ENABLED {
            return;
        }
        let snapshot = self.snapshot();
        debug!(
            "tx3 {:#x} dma_en {:#x} int_en {:#x} a {:#x}+{:#x} b {:#x}+{:#x}",
            snapshot.tx3,
            snapshot.dma_en,
            snapshot.int_en,
            snapshot.a_addr,
            snapshot.a_len,
            snapshot.b_addr,
            snapshot.b_len
        );
    }
}
