//! HDMI audio DMA driver for HiSilicon ASP (audio subsystem processor) blocks.
//!
//! `asp-hdmi-dma` drives the ping-pong PCM DMA engine that feeds the HDMI
//! audio transmitter. It provides
//!
//! - transmit format configuration ([`HdmiDma::tx3_config`]) and channel
//!   status configuration ([`HdmiDma::sio_config`]).
//! - buffer programming, start, stop, and interrupt acknowledgement for the
//!   A / B buffer pair.
//! - platform binding through [`PlatformDevice`], and an optional
//!   [`DeviceSlot`] for sharing the attached device.
//!
//! # Getting started
//!
//! Attach the driver to a platform device. The device supplies the register
//! window and the wake lock that keeps the system awake while DMA runs.
//! Then configure and start a stream.
//!
//! ```no_run
//! use asp_hdmi_dma::{Align, BitWidth, ChannelNum, HdmiDma, PlatformDevice, SioParams, Tx3Params};
//!
//! fn play<P: PlatformDevice>(pdev: &P, buffer: u32, half_len: u32) -> asp_hdmi_dma::Result<()> {
//!     let dma = HdmiDma::attach(pdev)?;
//!
//!     let tx3 = Tx3Params::new(ChannelNum::Two, BitWidth::Bits16, Align::Align32);
//!     dma.tx3_config(&tx3)?;
//!     dma.sio_config(&SioParams { sample_rate: 1, is_hdcp: false, tx3 });
//!     dma.dma_config(buffer, half_len)?;
//!     dma.dma_start()?;
//!     Ok(())
//! }
//! ```
//!
//! # Locking
//!
//! Every register access runs in its own critical section, and
//! read-modify-write updates finish inside one. Operations that touch
//! several registers are *not* atomic as a whole: two callers configuring
//! the device at the same time may interleave. Use [`HdmiDma::exclusive`]
//! to run a sequence under one critical section.
//!
//! # Logging
//!
//! Enable the `defmt` feature to log through `defmt`, or the `tracing`
//! feature to log through `tracing`.
//!
//! ### License
//!
//! Licensed under either of
//!
//! - [Apache License, Version 2.0](http://www.apache.org/licenses/LICENSE-2.0) ([LICENSE-APACHE](./LICENSE-APACHE))
//! - [MIT License](http://opensource.org/licenses/MIT) ([LICENSE-MIT](./LICENSE-MIT))
//!
//! at your option.
//!
//! Unless you explicitly state otherwise, any contribution intentionally submitted
//! for inclusion in the work by you, as defined in the Apache-2.0 license, shall be
//! dual licensed as above, without any additional terms or conditions.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

mod dma;
mod error;
mod format;
#[cfg(test)]
mod mock;
mod platform;
mod ral;
mod tx;

pub use dma::RegisterSnapshot;
pub use error::Error;
pub use format::{encode_tx3, Align, BitWidth, ChannelNum, SampleRate, SioParams, Tx3Params};
pub use platform::{
    matches_compatible, DeviceSlot, PlatformDevice, Resource, WakeLock, COMPATIBLE, DRIVER_NAME,
    WAKE_LOCK_NAME,
};

use core::cell::Cell;
use critical_section::Mutex;

/// A driver result
pub type Result<T> = core::result::Result<T, Error>;

/// An HDMI audio DMA driver.
///
/// `HdmiDma` owns one register window and the wake lock `W`. Create it with
/// [`attach`](HdmiDma::attach), or with [`new`](HdmiDma::new) when you
/// already have the register address. There should be one `HdmiDma` per
/// physical engine.
pub struct HdmiDma<W: WakeLock> {
    registers: ral::Static<ral::hdmi::RegisterBlock>,
    wake_lock: W,
    /// Whether we're holding the wake lock for a running transfer.
    keep_active: Mutex<Cell<bool>>,
}

// Safety: the register window is device memory, reachable from every CPU.
// All access to it and to `keep_active` happens in a critical section.
unsafe impl<W: WakeLock + Send> Send for HdmiDma<W> {}
// Safety: see above; all methods take `&self` and lock internally.
unsafe impl<W: WakeLock + Sync> Sync for HdmiDma<W> {}

impl<W: WakeLock> HdmiDma<W> {
    /// Create the driver from a mapped register window.
    ///
    /// # Safety
    ///
    /// `registers` must point to the start of the mapped HDMI DMA register
    /// block, and stay mapped for the life of the driver. Caller must also
    /// make sure that there's no other driver for the same block.
    pub const unsafe fn new(registers: *const (), wake_lock: W) -> Self {
        Self {
            registers: ral::Static(registers.cast()),
            wake_lock,
            keep_active: Mutex::new(Cell::new(false)),
        }
    }

    /// Run `f` with exclusive access to the registers.
    ///
    /// This is the lock behind every register access: a critical section,
    /// which masks interrupts on the calling CPU. Keep `f` short.
    fn locked<R>(&self, f: impl FnOnce(&ral::hdmi::RegisterBlock) -> R) -> R {
        critical_section::with(|_| f(&self.registers))
    }

    /// [`locked`](Self::locked), for an access that writes a register.
    fn locked_write(&self, f: impl FnOnce(&ral::hdmi::RegisterBlock)) {
        self.locked(f);
        #[cfg(test)]
        mock::record_write();
    }

    /// Run `f` as one critical section.
    ///
    /// Individual driver calls only lock around each register access. Wrap
    /// a sequence of calls here to keep other callers, including interrupt
    /// handlers on this CPU, from interleaving with it.
    pub fn exclusive<R>(&self, f: impl FnOnce(&Self) -> R) -> R {
        critical_section::with(|_| f(self))
    }

    /// Acquire or release the wake lock, if that changes anything.
    fn keep_active(&self, active: bool) {
        critical_section::with(|cs| {
            if self.keep_active.borrow(cs).replace(active) != active {
                if active {
                    self.wake_lock.acquire();
                } else {
                    self.wake_lock.release();
                }
            }
        });
    }

    /// Returns `true` while the driver holds the wake lock.
    pub fn is_keeping_active(&self) -> bool {
        critical_section::with(|cs| self.keep_active.borrow(cs).get())
    }
}

impl<W: WakeLock> Drop for HdmiDma<W> {
    fn drop(&mut self) {
        self.keep_active(false);
    }
}
