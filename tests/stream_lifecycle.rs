//! End-to-end stream lifecycle through the public API.
//!
//! The register window is plain memory, so every write the driver makes
//! can be read back at its hardware offset.

use std::cell::UnsafeCell;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use asp_hdmi_dma::{
    Align, BitWidth, ChannelNum, DeviceSlot, Error, HdmiDma, PlatformDevice, Resource, SampleRate,
    SioParams, Tx3Params, WakeLock,
};

const TX3: usize = 0x00;
const DMA_EN: usize = 0x04;
const INT_EN: usize = 0x08;
const INT_MSK_STATE: usize = 0x10;
const INT_CLR: usize = 0x14;
const A_ADDR: usize = 0x18;
const A_LEN: usize = 0x1C;
const B_ADDR: usize = 0x20;
const B_LEN: usize = 0x24;
const SIO_CH0_STATUS1_L: usize = 0x40;
const SIO_CH0_STATUS1_R: usize = 0x44;
const SIO_CH0_STATUS2_R: usize = 0x4C;

#[repr(C, align(128))]
struct Window(UnsafeCell<[u32; 64]>);

impl Window {
    fn new() -> Self {
        Window(UnsafeCell::new([0; 64]))
    }

    fn read(&self, offset: usize) -> u32 {
        unsafe { std::ptr::addr_of!((*self.0.get())[offset / 4]).read_volatile() }
    }

    fn write(&self, offset: usize, value: u32) {
        unsafe { std::ptr::addr_of_mut!((*self.0.get())[offset / 4]).write_volatile(value) }
    }
}

#[derive(Clone, Default)]
struct Awake(Arc<AtomicBool>);

impl WakeLock for Awake {
    fn acquire(&self) {
        assert!(!self.0.swap(true, Ordering::SeqCst), "acquired twice");
    }

    fn release(&self) {
        assert!(self.0.swap(false, Ordering::SeqCst), "released while not held");
    }
}

struct Board<'a> {
    window: &'a Window,
    awake: Awake,
}

unsafe impl PlatformDevice for Board<'_> {
    type WakeLock = Awake;

    fn memory_resource(&self, index: usize) -> Option<Resource> {
        (index == 0).then_some(Resource {
            start: 0xE804_E400,
            size: 0x100,
        })
    }

    fn ioremap(&self, _: &Resource) -> Option<NonNull<()>> {
        NonNull::new(self.window.0.get().cast())
    }

    fn wake_lock(&self, name: &'static str) -> Awake {
        assert_eq!(name, "asp_hdmi_dma");
        self.awake.clone()
    }
}

#[test]
fn configure_start_acknowledge_stop() {
    let window = Window::new();
    let board = Board {
        window: &window,
        awake: Awake::default(),
    };
    let dma = HdmiDma::attach(&board).unwrap();

    let tx3 = Tx3Params::new(ChannelNum::Two, BitWidth::Bits16, Align::Align32);
    dma.tx3_config(&tx3).unwrap();
    dma.sio_config(&SioParams {
        sample_rate: SampleRate::Khz48 as u32,
        is_hdcp: true,
        tx3,
    });
    dma.dma_config(0x1000, 0x800).unwrap();
    dma.dma_start().unwrap();

    assert_eq!(window.read(TX3), 0x901);
    assert_eq!(window.read(SIO_CH0_STATUS1_L), 0x0200_0005);
    assert_eq!(window.read(SIO_CH0_STATUS1_R), 0x0200_0005);
    assert_eq!(window.read(SIO_CH0_STATUS2_R), 0x2);
    assert_eq!(
        [A_ADDR, A_LEN, B_ADDR, B_LEN].map(|reg| window.read(reg)),
        [0x1000, 0x800, 0x1800, 0x800]
    );
    assert_eq!(window.read(DMA_EN), 0x1);
    assert_eq!(window.read(INT_EN), 0x7);
    assert!(board.awake.0.load(Ordering::SeqCst));

    // Buffer A done.
    dma.dma_clear_interrupt(0x1);
    assert_eq!(window.read(INT_CLR), 0x1);

    dma.dma_stop();
    assert_eq!(window.read(INT_EN), 0);
    assert!(!board.awake.0.load(Ordering::SeqCst));

    // A pending masked interrupt keeps the engine from reading as stopped.
    window.write(INT_MSK_STATE, 0x1);
    assert!(!dma.dma_is_stop());
    window.write(INT_MSK_STATE, 0x0);
    assert!(dma.dma_is_stop());

    dma.tx3_disable();
    assert_eq!(window.read(TX3), 0x900);
    dma.detach();
}

#[test]
fn rejected_parameters_leave_hardware_alone() {
    let window = Window::new();
    let board = Board {
        window: &window,
        awake: Awake::default(),
    };
    let dma = HdmiDma::attach(&board).unwrap();

    let bad = Tx3Params {
        channel_num: 1,
        bit_width: 12,
        align_type: 0,
    };
    assert_eq!(dma.tx3_config(&bad), Err(Error::UnsupportedBitWidth(12)));
    assert_eq!(dma.dma_config(0x1001, 0x800).map_err(|e| e.errno()), Err(-22));

    assert!((0..0x50).step_by(4).all(|offset| window.read(offset) == 0));
}

#[test]
fn shared_slot_serves_interrupt_handler() {
    let window = Window::new();
    let board = Board {
        window: &window,
        awake: Awake::default(),
    };
    let slot = DeviceSlot::new();
    assert_eq!(slot.with(|dma| dma.read_interrupt_status()), Err(Error::NotAttached));

    slot.probe(&board).unwrap();
    slot.with(|dma| {
        dma.exclusive(|dma| {
            dma.dma_config(0x20_0000, 0x1000)?;
            dma.dma_start()
        })
    })
    .unwrap()
    .unwrap();

    let status = slot
        .with(|dma| {
            let status = dma.read_interrupt_status();
            dma.dma_clear_interrupt(status | 0x2);
            status
        })
        .unwrap();
    assert_eq!(status, 0);
    assert_eq!(window.read(INT_CLR), 0x2);

    slot.remove();
    assert!(!board.awake.0.load(Ordering::SeqCst));
    slot.remove();
}
