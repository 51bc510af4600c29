//! Binding to the platform: register window, wake lock, and lifecycle.

use core::cell::RefCell;
use core::ptr::NonNull;

use critical_section::Mutex;

use crate::{Error, HdmiDma, Result};

/// Device tree compatible string for the HDMI audio DMA block.
pub const COMPATIBLE: &str = "hisilicon,asp-hdmi-dma";

/// Driver name to register with the platform bus.
pub const DRIVER_NAME: &str = "asp_hdmi_dma_drv";

/// Name of the wake lock requested during [`HdmiDma::attach`].
pub const WAKE_LOCK_NAME: &str = "asp_hdmi_dma";

/// Returns `true` if a device tree `compatible` property names this block.
///
/// `compatible` may be a single string, or a NUL-separated string list as
/// stored in the device tree.
pub fn matches_compatible(compatible: &str) -> bool {
    compatible.split('\0').any(|entry| entry == COMPATIBLE)
}

/// A memory resource of a platform device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Resource {
    /// Physical start address.
    pub start: usize,
    /// Size in bytes.
    pub size: usize,
}

/// Keeps the system out of suspend while audio DMA runs.
///
/// The driver acquires the lock in [`HdmiDma::dma_start`] and releases it in
/// [`HdmiDma::dma_stop`], or when the driver goes away. Calls are balanced:
/// the driver never acquires twice without releasing in between.
///
/// Both methods are called from a critical section.
pub trait WakeLock {
    /// Assert the wakeup source.
    fn acquire(&self);
    /// Drop the wakeup source.
    fn release(&self);
}

/// For systems without suspend.
impl WakeLock for () {
    fn acquire(&self) {}
    fn release(&self) {}
}

/// The platform device that the driver attaches to.
///
/// # Safety
///
/// A pointer returned by [`ioremap`](PlatformDevice::ioremap) must map
/// the whole `resource` as device memory, and stay mapped for as long as
/// the driver that uses it exists. Each mapping must be handed to only one
/// driver.
pub unsafe trait PlatformDevice {
    /// The wake lock this platform provides.
    type WakeLock: WakeLock;

    /// Returns the `index`th memory resource, if there is one.
    fn memory_resource(&self, index: usize) -> Option<Resource>;

    /// Map `resource` into the address space.
    fn ioremap(&self, resource: &Resource) -> Option<NonNull<()>>;

    /// Create a named wake lock, initially released.
    fn wake_lock(&self, name: &'static str) -> Self::WakeLock;
}

impl<W: crate::WakeLock> HdmiDma<W> {
    /// Attach to a platform device.
    ///
    /// Maps the device's first memory resource and creates the wake lock.
    /// Nothing is written to the hardware.
    ///
    /// # Errors
    ///
    /// - [`Error::NoResource`] if the device has no memory resource.
    /// - [`Error::WindowTooSmall`] if the resource can't hold the registers.
    /// - [`Error::MapFailed`] if mapping the resource fails.
    pub fn attach<P>(pdev: &P) -> Result<Self>
    where
        P: PlatformDevice<WakeLock = W>,
    {
        info!("probe begin");

        let resource = pdev.memory_resource(0).ok_or_else(|| {
            error!("get resource failed");
            Error::NoResource
        })?;

        if resource.size < core::mem::size_of::<crate::ral::hdmi::RegisterBlock>() {
            error!("register window too small: {:#x} bytes", resource.size);
            return Err(Error::WindowTooSmall(resource.size));
        }

        let base = pdev.ioremap(&resource).ok_or_else(|| {
            error!("ioremap of {:#x} failed", resource.start);
            Error::MapFailed
        })?;
        debug!("registers at {:#x} ({:#x} bytes)", resource.start, resource.size);

        let wake_lock = pdev.wake_lock(WAKE_LOCK_NAME);

        // Safety: PlatformDevice guarantees the mapping covers the
        // resource, which we checked is large enough for the block.
        let dma = unsafe { Self::new(base.as_ptr().cast_const(), wake_lock) };

        info!("probe end");
        Ok(dma)
    }

    /// Detach from the platform device.
    ///
    /// Releases the wake lock if a transfer still holds it. The hardware is
    /// left as it is; stop DMA first.
    pub fn detach(self) {
        self.keep_active(false);
        info!("remove");
    }
}

/// Holds the attached driver, for callers that share one device.
///
/// `DeviceSlot` can live in a `static`. [`probe`](DeviceSlot::probe) fills
/// it, [`remove`](DeviceSlot::remove) empties it, and
/// [`with`](DeviceSlot::with) runs driver calls on the attached device.
///
/// ```no_run
/// use asp_hdmi_dma::DeviceSlot;
///
/// static HDMI_DMA: DeviceSlot<()> = DeviceSlot::new();
///
/// fn on_interrupt() -> asp_hdmi_dma::Result<()> {
///     HDMI_DMA.with(|dma| {
///         let status = dma.read_interrupt_status();
///         dma.dma_clear_interrupt(status);
///     })
/// }
/// ```
pub struct DeviceSlot<W: crate::WakeLock> {
    device: Mutex<RefCell<Option<HdmiDma<W>>>>,
}

impl<W: crate::WakeLock> DeviceSlot<W> {
    /// Create an empty slot.
    pub const fn new() -> Self {
        Self {
            device: Mutex::new(RefCell::new(None)),
        }
    }

    /// Attach to `pdev` and publish the driver.
    ///
    /// The slot only changes once attaching succeeds. A driver that was
    /// already in the slot is detached and replaced.
    pub fn probe<P>(&self, pdev: &P) -> Result<()>
    where
        P: PlatformDevice<WakeLock = W>,
    {
        let dma = HdmiDma::attach(pdev)?;
        let previous = critical_section::with(|cs| self.device.borrow(cs).borrow_mut().replace(dma));
        if let Some(previous) = previous {
            warn!("replacing attached device");
            previous.detach();
        }
        Ok(())
    }

    /// Detach and drop the driver. Does nothing if the slot is empty.
    pub fn remove(&self) {
        let device = critical_section::with(|cs| self.device.borrow(cs).borrow_mut().take());
        if let Some(device) = device {
            device.detach();
        }
    }

    /// Returns `true` if a driver is attached.
    pub fn is_attached(&self) -> bool {
        critical_section::with(|cs| self.device.borrow(cs).borrow().is_some())
    }

    /// Run `f` on the attached driver.
    ///
    /// `f` runs inside one critical section, so the calls it makes don't
    /// interleave with other users of the slot. Don't call
    /// [`probe`](Self::probe) or [`remove`](Self::remove) from `f`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAttached`] if the slot is empty. That's a bug in
    /// the caller's lifecycle handling.
    pub fn with<R>(&self, f: impl FnOnce(&HdmiDma<W>) -> R) -> Result<R> {
        critical_section::with(|cs| {
            let device = self.device.borrow(cs).borrow();
            let dma = device.as_ref().ok_or_else(|| {
                error!("no device attached");
                Error::NotAttached
            })?;
            Ok(f(dma))
        })
    }
}

impl<W: crate::WakeLock> Default for DeviceSlot<W> {
    fn default() -> Self {
        Self::new()
    }
}
