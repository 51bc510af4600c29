//! Transmitter format and channel status configuration.

use crate::format::{encode_tx3, BitWidth, SampleRate, SioParams, Tx3Params};
use crate::ral::{self, hdmi::SIO_CH0_STATUS1_L, hdmi::SIO_CH0_STATUS2_L};
use crate::{HdmiDma, Result, WakeLock};

impl<W: WakeLock> HdmiDma<W> {
    /// Configure the transmit format.
    ///
    /// On success, TX3 holds the encoded format and the transmitter is
    /// enabled, in a single write. On failure, TX3 isn't touched.
    pub fn tx3_config(&self, params: &Tx3Params) -> Result<()> {
        let value = encode_tx3(params).inspect_err(|err| {
            error!(
                "tx3 config failed for channels {}, bit width {}, align {}: {}",
                params.channel_num, params.bit_width, params.align_type, err
            );
        })?;

        self.locked_write(|regs| ral::write_reg!(crate::ral::hdmi, regs, TX3, value));
        self.dump();
        info!("tx3 config: {:#x}", value);
        Ok(())
    }

    /// Enable the transmitter.
    ///
    /// Always writes the enable bit, even if it's already set.
    pub fn tx3_enable(&self) {
        self.locked_write(|regs| ral::modify_reg!(crate::ral::hdmi, regs, TX3, EN: 1));
        info!("tx3 enable");
    }

    /// Disable the transmitter.
    ///
    /// If the transmitter is already disabled, this does nothing; the
    /// register isn't written.
    pub fn tx3_disable(&self) {
        // Separate from the clear below. Another caller may enable in between.
        let enabled = self.locked(|regs| ral::read_reg!(crate::ral::hdmi, regs, TX3, EN == 1));
        if enabled {
            self.locked_write(|regs| ral::modify_reg!(crate::ral::hdmi, regs, TX3, EN: 0));
            info!("tx3 disable");
        } else {
            info!("tx3 already disabled");
        }
    }

    /// Configure the channel status words sent with the stream.
    ///
    /// Sets the channel type, then applies each setting independently:
    ///
    /// - a supported sample rate is OR'd into the status words. An
    ///   unsupported rate keeps whatever rate the registers hold.
    /// - `is_hdcp` sets the copy protection bit.
    /// - a supported bit width marks the word length as 16 bits. The
    ///   actual width isn't encoded.
    ///
    /// A skipped setting doesn't undo the others.
    pub fn sio_config(&self, params: &SioParams) {
        self.locked_write(|regs| {
            ral::modify_reg!(crate::ral::hdmi, regs, SIO_CH0_STATUS1_L, CHANNEL_TYPE: 1)
        });
        self.locked_write(|regs| {
            ral::modify_reg!(crate::ral::hdmi, regs, SIO_CH0_STATUS1_R, CHANNEL_TYPE: 1)
        });

        if let Some(rate) = SampleRate::from_index(params.sample_rate) {
            // The right word follows the left word. Both come from one read.
            let value = self.locked(|regs| ral::read_reg!(crate::ral::hdmi, regs, SIO_CH0_STATUS1_L))
                | rate.code() << SIO_CH0_STATUS1_L::SAMPLE_RATE::offset;
            self.locked_write(|regs| ral::write_reg!(crate::ral::hdmi, regs, SIO_CH0_STATUS1_L, value));
            self.locked_write(|regs| ral::write_reg!(crate::ral::hdmi, regs, SIO_CH0_STATUS1_R, value));
            info!("sio sample rate {} kHz", rate.khz());
        } else {
            info!(
                "sio sample rate index {} not supported, keeping current rate",
                params.sample_rate
            );
        }

        if params.is_hdcp {
            self.locked_write(|regs| ral::modify_reg!(crate::ral::hdmi, regs, SIO_CH0_STATUS1_L, HDCP: 1));
            self.locked_write(|regs| ral::modify_reg!(crate::ral::hdmi, regs, SIO_CH0_STATUS1_R, HDCP: 1));
            info!("sio hdcp set");
        }

        // Word length is fixed at 16 bits for every supported width.
        if BitWidth::from_index(params.tx3.bit_width).is_some() {
            let value = self.locked(|regs| ral::read_reg!(crate::ral::hdmi, regs, SIO_CH0_STATUS2_L))
                | SIO_CH0_STATUS2_L::BIT_WIDTH::RW::BITS_16 << SIO_CH0_STATUS2_L::BIT_WIDTH::offset;
            self.locked_write(|regs| ral::write_reg!(crate::ral::hdmi, regs, SIO_CH0_STATUS2_L, value));
            self.locked_write(|regs| ral::write_reg!(crate::ral::hdmi, regs, SIO_CH0_STATUS2_R, value));
            info!("sio bit width index {}", params.tx3.bit_width);
        } else {
            info!(
                "sio bit width index {} not supported, keeping current width",
                params.tx3.bit_width
            );
        }

        if crate::fmt::ENABLED {
            let (status1_l, status1_r, status2_l, status2_r) = self.locked(|regs| {
                (
                    ral::read_reg!(crate::ral::hdmi, regs, SIO_CH0_STATUS1_L),
                    ral::read_reg!(crate::ral::hdmi, regs, SIO_CH0_STATUS1_R),
                    ral::read_reg!(crate::ral::hdmi, regs, SIO_CH0_STATUS2_L),
                    ral::read_reg!(crate::ral::hdmi, regs, SIO_CH0_STATUS2_R),
                )
            });
            info!(
                "sio status1 l {:#x} r {:#x}, status2 l {:#x} r {:#x}",
                status1_l, status1_r, status2_l, status2_r
            );
        }
    }
}
