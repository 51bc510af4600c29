//! Driver errors

/// Errors reported by the HDMI audio DMA driver.
///
/// The variants fall into three groups:
///
/// - a precondition violation ([`NotAttached`](Error::NotAttached)). This is a
///   programming error in the caller, not something to retry.
/// - rejected parameters. Nothing was written to the hardware.
/// - attach failures, raised while binding to the platform device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The operation needs an attached device, but none is attached.
    #[error("no HDMI DMA device attached")]
    NotAttached,
    /// The bit width index is outside the supported enumeration.
    #[error("unsupported bit width index {0}")]
    UnsupportedBitWidth(u32),
    /// The channel index is outside the enumeration, or it's mono with a
    /// sample width other than 16 bits.
    #[error("unsupported channel index {channel_num} with bit width index {bit_width}")]
    UnsupportedChannels {
        /// Requested channel index.
        channel_num: u32,
        /// Requested bit width index.
        bit_width: u32,
    },
    /// The alignment index is neither 16 nor 32 bit alignment.
    #[error("unsupported alignment index {0}")]
    UnsupportedAlignment(u32),
    /// The DMA buffer address or size is misaligned, or the second half
    /// of the buffer would wrap the 32-bit address space.
    #[error("invalid DMA buffer: addr {addr:#x}, size {size:#x}")]
    InvalidBuffer {
        /// Buffer base address.
        addr: u32,
        /// Size of one half-buffer.
        size: u32,
    },
    /// The platform device has no memory resource.
    #[error("platform device has no memory resource")]
    NoResource,
    /// The memory resource couldn't be mapped.
    #[error("register window mapping failed")]
    MapFailed,
    /// The memory resource is smaller than the register block.
    #[error("register window of {0:#x} bytes is too small")]
    WindowTooSmall(usize),
}

/// Status for a rejected stream format. Not an errno value.
const UNSUPPORTED: i32 = -1;
const ENOENT: i32 = 2;
const ENOMEM: i32 = 12;
const EINVAL: i32 = 22;

impl Error {
    /// Returns `true` for errors that signal a caller bug, rather than
    /// rejected input or a platform failure.
    pub const fn is_precondition(&self) -> bool {
        matches!(self, Error::NotAttached)
    }

    /// Negative status code for C-facing glue.
    ///
    /// Format errors map to `-1`, buffer errors to `-EINVAL`, and attach
    /// errors to `-ENOENT` / `-ENOMEM`.
    pub const fn errno(&self) -> i32 {
        match self {
            Error::UnsupportedBitWidth(_)
            | Error::UnsupportedChannels { .. }
            | Error::UnsupportedAlignment(_) => UNSUPPORTED,
            Error::InvalidBuffer { .. } => -EINVAL,
            Error::NoResource => -ENOENT,
            Error::MapFailed | Error::WindowTooSmall(_) => -ENOMEM,
            Error::NotAttached => -EINVAL,
        }
    }
}
