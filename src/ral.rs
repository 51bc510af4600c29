//! A RAL-like module for the HDMI audio DMA registers
//!
//! There's no vendor RAL for the ASP block. The register block and its
//! fields are written out by hand in [`hdmi`], following the RAL layout
//! conventions (`offset`, `mask`, `R`, `W`, `RW` per field) so that the
//! `ral-registers` macros work on them.

#![allow(
    non_snake_case, // Compatibility with RAL
    non_upper_case_globals, // RAL field constants are `offset` and `mask`
    dead_code, // Full register map, not all of it driven
    unused_imports, // Right subframe fields mirror the left, used or not
)]

pub mod hdmi;

pub use ral_registers::{modify_reg, read_reg, write_reg};
use ral_registers::{RORegister, RWRegister, WORegister};

//
// Helper types for static memory
//
// Similar to the RAL's `Instance` type, but more copy.
//

pub(crate) struct Static<T>(pub(crate) *const T);
impl<T> core::ops::Deref for Static<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        // Safety: pointer points to static memory (peripheral memory)
        unsafe { &*self.0 }
    }
}
impl<T> Clone for Static<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Static<T> {}
