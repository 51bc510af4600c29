//! Test doubles: an in-memory register file and a recording platform.

use core::cell::{Cell, UnsafeCell};
use core::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::ral::hdmi::RegisterBlock;
use crate::{PlatformDevice, Resource, WakeLock};

const WORDS: usize = core::mem::size_of::<RegisterBlock>() / 4;

/// Byte offset of a register in the block.
macro_rules! offset {
    ($reg:ident) => {
        core::mem::offset_of!(crate::ral::hdmi::RegisterBlock, $reg)
    };
}
pub(crate) use offset;

/// Zero-initialized memory standing in for the register window.
///
/// Writes stick, and read-only registers can be preset with
/// [`poke`](RegisterFile::poke).
#[repr(C, align(128))]
pub(crate) struct RegisterFile {
    words: UnsafeCell<[u32; WORDS]>,
}

impl RegisterFile {
    pub(crate) fn new() -> Self {
        Self {
            words: UnsafeCell::new([0; WORDS]),
        }
    }

    pub(crate) fn base(&self) -> *const () {
        self.words.get().cast_const().cast()
    }

    pub(crate) fn peek(&self, offset: usize) -> u32 {
        assert_eq!(offset % 4, 0);
        // Safety: offset is within the block (indexing panics otherwise)
        // and the cell permits shared mutation.
        unsafe { core::ptr::addr_of!((*self.words.get())[offset / 4]).read_volatile() }
    }

    pub(crate) fn poke(&self, offset: usize, value: u32) {
        assert_eq!(offset % 4, 0);
        // Safety: see peek.
        unsafe { core::ptr::addr_of_mut!((*self.words.get())[offset / 4]).write_volatile(value) }
    }

    pub(crate) fn words(&self) -> [u32; WORDS] {
        core::array::from_fn(|idx| self.peek(idx * 4))
    }
}

std::thread_local! {
    static WRITES: Cell<usize> = const { Cell::new(0) };
}

/// Called by the driver after each register write.
pub(crate) fn record_write() {
    WRITES.with(|writes| writes.set(writes.get() + 1));
}

/// Runs `f`, and returns how many register writes it made.
///
/// A write of the value a register already holds still counts.
pub(crate) fn count_writes(f: impl FnOnce()) -> usize {
    let before = WRITES.with(Cell::get);
    f();
    WRITES.with(Cell::get) - before
}

#[derive(Default)]
struct WakeCounts {
    acquires: AtomicUsize,
    releases: AtomicUsize,
}

/// Counts wake lock transitions. Clones share counts.
#[derive(Clone, Default)]
pub(crate) struct MockWakeLock(Arc<WakeCounts>);

impl MockWakeLock {
    pub(crate) fn acquires(&self) -> usize {
        self.0.acquires.load(Ordering::SeqCst)
    }

    pub(crate) fn releases(&self) -> usize {
        self.0.releases.load(Ordering::SeqCst)
    }

    pub(crate) fn is_held(&self) -> bool {
        self.acquires() > self.releases()
    }
}

impl WakeLock for MockWakeLock {
    fn acquire(&self) {
        self.0.acquires.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&self) {
        self.0.releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// Platform device backed by a [`RegisterFile`].
pub(crate) struct MockPlatform<'a> {
    file: &'a RegisterFile,
    resource: Option<Resource>,
    map_fails: bool,
    wake_lock_name: Cell<Option<&'static str>>,
    pub(crate) wake: MockWakeLock,
}

impl<'a> MockPlatform<'a> {
    pub(crate) fn new(file: &'a RegisterFile) -> Self {
        Self {
            file,
            resource: Some(Resource {
                start: 0xE804_E000,
                size: 0x400,
            }),
            map_fails: false,
            wake_lock_name: Cell::new(None),
            wake: MockWakeLock::default(),
        }
    }

    pub(crate) fn without_resource(mut self) -> Self {
        self.resource = None;
        self
    }

    pub(crate) fn failing_ioremap(mut self) -> Self {
        self.map_fails = true;
        self
    }

    pub(crate) fn with_size(mut self, size: usize) -> Self {
        if let Some(resource) = self.resource.as_mut() {
            resource.size = size;
        }
        self
    }

    pub(crate) fn wake_lock_name(&self) -> Option<&'static str> {
        self.wake_lock_name.get()
    }
}

// Safety: the register file outlives every driver in the tests that use it.
unsafe impl PlatformDevice for MockPlatform<'_> {
    type WakeLock = MockWakeLock;

    fn memory_resource(&self, index: usize) -> Option<Resource> {
        self.resource.filter(|_| index == 0)
    }

    fn ioremap(&self, _: &Resource) -> Option<NonNull<()>> {
        if self.map_fails {
            None
        } else {
            NonNull::new(self.file.base().cast_mut())
        }
    }

    fn wake_lock(&self, name: &'static str) -> MockWakeLock {
        self.wake_lock_name.set(Some(name));
        self.wake.clone()
    }
}
