//! MDIO (Management Data Input/Output) bus abstraction
//!
//! The driver never talks to hardware directly. Every register access goes
//! through [`MdioBus`], which the host controller's HAL implements (an SMI
//! peripheral, a bit-banged MDC/MDIO pair, a switch's MIIM block, ...).
//!
//! Accesses are plain Clause 22 frames: 5-bit PHY address, 5-bit register
//! number, 16-bit data. There is no framing or acknowledgment beyond what
//! the backend can detect, so a backend should report [`BusError`] only
//! for failures it can actually observe.

use crate::error::{BusError, BusResult};
use crate::internal::phy_regs::standard::phy_reg;

// =============================================================================
// MDIO Constants
// =============================================================================

/// Maximum valid PHY address (5-bit field)
pub const MAX_PHY_ADDR: u8 = 31;

/// Maximum valid register address (5-bit field)
pub const MAX_REG_ADDR: u8 = 31;

// =============================================================================
// MDIO Bus Trait
// =============================================================================

/// Trait for MDIO bus operations
///
/// This trait can be implemented by different backends, allowing
/// the PHY driver to work with various MDIO implementations.
pub trait MdioBus {
    /// Read a PHY register
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> BusResult<u16>;

    /// Write a PHY register
    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> BusResult<()>;
}

impl<M: MdioBus + ?Sized> MdioBus for &mut M {
    #[inline]
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> BusResult<u16> {
        (**self).read(phy_addr, reg_addr)
    }

    #[inline]
    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> BusResult<()> {
        (**self).write(phy_addr, reg_addr, value)
    }
}

/// Validate a PHY/register address pair before putting it on the wire
///
/// Backends built on wider address registers should call this so an
/// out-of-range number never aliases onto a valid one.
pub const fn check_address(phy_addr: u8, reg_addr: u8) -> BusResult<()> {
    if phy_addr > MAX_PHY_ADDR {
        return Err(BusError::InvalidPhyAddress);
    }
    if reg_addr > MAX_REG_ADDR {
        return Err(BusError::InvalidRegister);
    }
    Ok(())
}

/// Read the 32-bit PHY identifier
///
/// Returns `(PHYIDR1 << 16) | PHYIDR2`. Registers 2 and 3 are only valid on
/// the main page.
pub fn read_phy_id<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> BusResult<u32> {
    let id1 = mdio.read(phy_addr, phy_reg::PHYIDR1)? as u32;
    let id2 = mdio.read(phy_addr, phy_reg::PHYIDR2)? as u32;
    Ok((id1 << 16) | id2)
}

// =============================================================================
// Unit Tests
// =============================================================================
