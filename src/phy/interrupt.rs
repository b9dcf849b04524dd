//! Interrupt mask control
//!
//! The PHY raises its interrupt line for the events enabled in IMASK (0x19)
//! and reports them in ISTAT (0x1A), which clears on read. The quad-port
//! parts get speed and duplex events as well as link changes.

use embedded_hal::delay::DelayNs;

use crate::error::Result;
use crate::hal::mdio::MdioBus;
use crate::internal::phy_regs::vitesse::{imask, istat, reg};

use super::variant::{VSC8234, VSC8244, VSC8514, VSC8574, Variant};
use super::vsc82xx::Vsc82xx;

/// Declared identifiers that take the wide interrupt mask
const WIDE_MASK_IDS: [u32; 4] = [VSC8234.id(), VSC8244.id(), VSC8514.id(), VSC8574.id()];

/// Interrupt mask for a variant
///
/// Membership is by exact declared identifier, not by mask match.
pub fn interrupt_mask(variant: &Variant) -> u16 {
    if WIDE_MASK_IDS.contains(&variant.id()) {
        imask::WIDE
    } else {
        imask::NARROW
    }
}

/// Interrupt enable state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptState {
    /// Interrupt output armed
    pub enabled: bool,
    /// Mask written to IMASK, 0 while disabled
    pub mask: u16,
}

/// Decoded interrupt status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptStatus {
    /// An interrupt was pending
    pub pending: bool,
    /// Speed changed
    pub speed_changed: bool,
    /// Link went up or down
    pub link_changed: bool,
    /// Duplex changed
    pub duplex_changed: bool,
}

impl InterruptStatus {
    /// Decode an ISTAT value
    pub const fn from_bits(bits: u16) -> Self {
        Self {
            pending: bits & istat::STATUS != 0,
            speed_changed: bits & istat::SPEED != 0,
            link_changed: bits & istat::LINK != 0,
            duplex_changed: bits & istat::DUPLEX != 0,
        }
    }
}

impl<D: DelayNs> Vsc82xx<D> {
    /// Current interrupt enable state
    pub fn interrupt_state(&self) -> InterruptState {
        self.irq
    }

    /// Arm or disarm the PHY interrupt output
    ///
    /// Enabling writes the variant's mask once. Disabling first reads ISTAT
    /// to drop anything already pending, then clears the mask. The tracked
    /// state only changes when every access succeeded.
    pub fn set_interrupts<M: MdioBus>(&mut self, mdio: &mut M, enabled: bool) -> Result<()> {
        if enabled {
            let mask = interrupt_mask(self.variant);
            self.write(mdio, reg::IMASK, mask)?;
            self.irq = InterruptState {
                enabled: true,
                mask,
            };
        } else {
            self.read(mdio, reg::ISTAT)?;
            self.write(mdio, reg::IMASK, 0)?;
            self.irq = InterruptState::default();
        }

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "PHY {}: interrupts {} (mask {:#x})",
            self.config.address,
            enabled,
            self.irq.mask
        );
        Ok(())
    }

    /// Read and clear ISTAT
    ///
    /// Returns `None` without touching the bus while interrupts are disabled.
    pub fn take_interrupt_status<M: MdioBus>(
        &mut self,
        mdio: &mut M,
    ) -> Result<Option<InterruptStatus>> {
        if !self.irq.enabled {
            return Ok(None);
        }
        let bits = self.read(mdio, reg::ISTAT)?;
        Ok(Some(InterruptStatus::from_bits(bits)))
    }

    /// Clear a pending interrupt
    ///
    /// A no-op while interrupts are disabled.
    pub fn acknowledge<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        self.take_interrupt_status(mdio).map(|_| ())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
