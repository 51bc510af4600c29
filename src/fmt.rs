//! Logging macros
//!
//! Log statements go to `defmt` or `tracing`, depending on the enabled
//! feature. With neither, arguments are evaluated by reference and dropped.
//!
//! Keep format strings to `{}` and `{:#x}` so they're valid for both
//! backends.

#![allow(unused_macros)]

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        macro_rules! trace { ($($t:tt)*) => { ::defmt::trace!($($t)*) }; }
        macro_rules! debug { ($($t:tt)*) => { ::defmt::debug!($($t)*) }; }
        macro_rules! info { ($($t:tt)*) => { ::defmt::info!($($t)*) }; }
        macro_rules! warn { ($($t:tt)*) => { ::defmt::warn!($($t)*) }; }
        macro_rules! error { ($($t:tt)*) => { ::defmt::error!($($t)*) }; }
    } else if #[cfg(feature = "tracing")] {
        macro_rules! trace { ($($t:tt)*) => { ::tracing::trace!($($t)*) }; }
        macro_rules! debug { ($($t:tt)*) => { ::tracing::debug!($($t)*) }; }
        macro_rules! info { ($($t:tt)*) => { ::tracing::info!($($t)*) }; }
        macro_rules! warn { ($($t:tt)*) => { ::tracing::warn!($($t)*) }; }
        macro_rules! error { ($($t:tt)*) => { ::tracing::error!($($t)*) }; }
    } else {
        macro_rules! trace { ($s:literal $(, $x:expr)* $(,)?) => {{ let _ = ($( & $x ),*); }}; }
        macro_rules! debug { ($s:literal $(, $x:expr)* $(,)?) => {{ let _ = ($( & $x ),*); }}; }
        macro_rules! info { ($s:literal $(, $x:expr)* $(,)?) => {{ let _ = ($( & $x ),*); }}; }
        macro_rules! warn { ($s:literal $(, $x:expr)* $(,)?) => {{ let _ = ($( & $x ),*); }}; }
        macro_rules! error { ($s:literal $(, $x:expr)* $(,)?) => {{ let _ = ($( & $x ),*); }}; }
    }
}

/// `true` when log statements go anywhere.
pub(crate) const ENABLED: bool = cfg!(any(feature = "defmt", feature = "tracing"));
