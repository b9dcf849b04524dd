//! Testing utilities and mock implementations
//!
//! This module provides mock implementations for testing the PHY driver
//! on the host without hardware access.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::vec::Vec;

use crate::error::{BusError, BusResult};
use crate::hal::mdio::MdioBus;
use crate::internal::phy_regs::standard::{anar, bmsr, estatus, gbcr, gbsr, phy_reg};
use crate::internal::phy_regs::vitesse::reg;

// =============================================================================
// Mock MDIO Bus
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct WriteRecord {
    phy: u8,
    reg: u8,
    value: u16,
    ok: bool,
}

/// Mock MDIO bus for testing PHY drivers without hardware
///
/// Registers are a flat `(phy_addr, reg_addr)` map: the mock does not bank
/// registers by page. Use [`MockMdioBus::get_paged_writes`] to see which
/// page each write landed on.
///
/// # Example
///
/// ```ignore
/// let mut mdio = MockMdioBus::new();
/// mdio.setup_vsc8574(0, 0);
/// mdio.fail_write(0, 0x10, 0x87FA); // third crossover write
///
/// let mut phy = Vsc82xx::probe(&mut mdio, PhyConfig::new(), MockDelay::new()).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockMdioBus {
    /// Register values: (phy_addr, reg_addr) -> value
    registers: RefCell<HashMap<(u8, u8), u16>>,
    /// Every attempted write, in order
    write_log: RefCell<Vec<WriteRecord>>,
    /// Every attempted read, in order
    read_log: RefCell<Vec<(u8, u8)>>,
    /// Writes of exactly this value to this register fail
    failing_writes: RefCell<Vec<(u8, u8, u16)>>,
    /// Any write to this register fails
    failing_write_regs: RefCell<Vec<(u8, u8)>>,
    /// Any read of this register fails
    failing_reads: RefCell<Vec<(u8, u8)>>,
    /// Reads return this value regardless of writes
    pinned: RefCell<HashMap<(u8, u8), u16>>,
    /// Scripted read values, consumed before anything else
    read_queue: RefCell<HashMap<(u8, u8), VecDeque<u16>>>,
}

impl MockMdioBus {
    /// Create a new mock MDIO bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a register value
    pub fn set_register(&self, phy_addr: u8, reg_addr: u8, value: u16) {
        self.registers
            .borrow_mut()
            .insert((phy_addr, reg_addr), value);
    }

    /// Get the current value of a register (for test verification)
    pub fn get_register(&self, phy_addr: u8, reg_addr: u8) -> Option<u16> {
        self.registers.borrow().get(&(phy_addr, reg_addr)).copied()
    }

    /// Get all attempted writes, including ones that were made to fail
    pub fn get_writes(&self) -> Vec<(u8, u8, u16)> {
        self.write_log
            .borrow()
            .iter()
            .map(|w| (w.phy, w.reg, w.value))
            .collect()
    }

    /// Number of attempted writes to one register
    pub fn write_count(&self, phy_addr: u8, reg_addr: u8) -> usize {
        self.write_log
            .borrow()
            .iter()
            .filter(|w| w.phy == phy_addr && w.reg == reg_addr)
            .count()
    }

    /// Successful writes of one PHY tagged with the page active at the time
    ///
    /// Page-select writes themselves are not included. The page is assumed
    /// to start at 0.
    pub fn get_paged_writes(&self, phy_addr: u8) -> Vec<(u16, u8, u16)> {
        let mut page = 0u16;
        let mut out = Vec::new();
        for w in self.write_log.borrow().iter() {
            if w.phy != phy_addr || !w.ok {
                continue;
            }
            if w.reg == reg::EXT_PAGE_ACCESS {
                page = w.value;
            } else {
                out.push((page, w.reg, w.value));
            }
        }
        out
    }

    /// Get all attempted reads
    pub fn get_reads(&self) -> Vec<(u8, u8)> {
        self.read_log.borrow().clone()
    }

    /// Clear the write and read logs
    pub fn clear_writes(&self) {
        self.write_log.borrow_mut().clear();
        self.read_log.borrow_mut().clear();
    }

    /// Make writes of `value` to `reg_addr` fail with [`BusError::NoResponse`]
    pub fn fail_write(&self, phy_addr: u8, reg_addr: u8, value: u16) {
        self.failing_writes
            .borrow_mut()
            .push((phy_addr, reg_addr, value));
    }

    /// Make every write to `reg_addr` fail with [`BusError::NoResponse`]
    pub fn fail_writes_to(&self, phy_addr: u8, reg_addr: u8) {
        self.failing_write_regs
            .borrow_mut()
            .push((phy_addr, reg_addr));
    }

    /// Make every read of `reg_addr` fail with [`BusError::NoResponse`]
    pub fn fail_reads_from(&self, phy_addr: u8, reg_addr: u8) {
        self.failing_reads.borrow_mut().push((phy_addr, reg_addr));
    }

    /// Pin the value returned by reads of a register
    pub fn pin_register(&self, phy_addr: u8, reg_addr: u8, value: u16) {
        self.pinned
            .borrow_mut()
            .insert((phy_addr, reg_addr), value);
    }

    /// Queue values returned by the next reads of a register
    pub fn queue_reads(&self, phy_addr: u8, reg_addr: u8, values: &[u16]) {
        self.read_queue
            .borrow_mut()
            .entry((phy_addr, reg_addr))
            .or_default()
            .extend(values.iter().copied());
    }

    /// Set up ID and capability registers for a PHY with identifier `id`
    pub fn setup_phy(&self, phy_addr: u8, id: u32) {
        self.set_register(phy_addr, phy_reg::PHYIDR1, (id >> 16) as u16);
        self.set_register(phy_addr, phy_reg::PHYIDR2, id as u16);

        let bmsr_value = bmsr::TX_FD_CAPABLE
            | bmsr::TX_HD_CAPABLE
            | bmsr::T10_FD_CAPABLE
            | bmsr::T10_HD_CAPABLE
            | bmsr::ESTATUS
            | bmsr::AN_ABILITY
            | bmsr::EXT_CAPABLE;
        self.set_register(phy_addr, phy_reg::BMSR, bmsr_value);
        self.set_register(phy_addr, phy_reg::ESTATUS, estatus::T1000_FD | estatus::T1000_HD);

        // BMCR: auto-neg enabled, 1000 full
        self.set_register(phy_addr, phy_reg::BMCR, 0x1140);
        self.set_register(phy_addr, phy_reg::ANAR, 0x01E1);
        self.set_register(phy_addr, phy_reg::ANLPAR, 0x0000);
        self.set_register(phy_addr, phy_reg::GBCR, gbcr::ADV_1000_FD | gbcr::ADV_1000_HD);
    }

    /// Set up a VSC8574 with the given revision nibble
    pub fn setup_vsc8574(&self, phy_addr: u8, revision: u8) {
        self.setup_phy(phy_addr, 0x0007_04A0 | (revision as u32 & 0x0F));
    }

    /// Simulate an autonegotiated link at 1000 Mbps full duplex
    pub fn simulate_link_up_1000_fd(&self, phy_addr: u8) {
        self.set_link_bits(phy_addr, true);
        self.set_register(
            phy_addr,
            phy_reg::ANLPAR,
            anar::SELECTOR_IEEE802_3 | anar::TX_FD | anar::TX_HD | anar::T10_FD | anar::T10_HD,
        );
        self.set_register(phy_addr, phy_reg::GBSR, gbsr::LP_1000_FD);
    }

    /// Simulate an autonegotiated link with a 10 Mbps half duplex partner
    pub fn simulate_link_up_10_hd(&self, phy_addr: u8) {
        self.set_link_bits(phy_addr, true);
        self.set_register(phy_addr, phy_reg::ANLPAR, anar::SELECTOR_IEEE802_3 | anar::T10_HD);
        self.set_register(phy_addr, phy_reg::GBSR, 0);
    }

    /// Simulate link going down
    pub fn simulate_link_down(&self, phy_addr: u8) {
        self.set_link_bits(phy_addr, false);
        self.set_register(phy_addr, phy_reg::ANLPAR, 0x0000);
        self.set_register(phy_addr, phy_reg::GBSR, 0);
    }

    fn set_link_bits(&self, phy_addr: u8, up: bool) {
        let mut bmsr_val = self.get_register(phy_addr, phy_reg::BMSR).unwrap_or(0);
        if up {
            bmsr_val |= bmsr::LINK_STATUS | bmsr::AN_COMPLETE;
        } else {
            bmsr_val &= !(bmsr::LINK_STATUS | bmsr::AN_COMPLETE);
        }
        self.set_register(phy_addr, phy_reg::BMSR, bmsr_val);
    }
}

impl MdioBus for MockMdioBus {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> BusResult<u16> {
        self.read_log.borrow_mut().push((phy_addr, reg_addr));

        if self.failing_reads.borrow().contains(&(phy_addr, reg_addr)) {
            return Err(BusError::NoResponse);
        }
        if let Some(value) = self
            .read_queue
            .borrow_mut()
            .get_mut(&(phy_addr, reg_addr))
            .and_then(VecDeque::pop_front)
        {
            return Ok(value);
        }
        if let Some(value) = self.pinned.borrow().get(&(phy_addr, reg_addr)) {
            return Ok(*value);
        }

        // Return from register map (default 0 if not set)
        Ok(self
            .registers
            .borrow()
            .get(&(phy_addr, reg_addr))
            .copied()
            .unwrap_or(0))
    }

    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> BusResult<()> {
        let fails = self
            .failing_writes
            .borrow()
            .contains(&(phy_addr, reg_addr, value))
            || self
                .failing_write_regs
                .borrow()
                .contains(&(phy_addr, reg_addr));

        self.write_log.borrow_mut().push(WriteRecord {
            phy: phy_addr,
            reg: reg_addr,
            value,
            ok: !fails,
        });

        if fails {
            return Err(BusError::NoResponse);
        }

        self.registers
            .borrow_mut()
            .insert((phy_addr, reg_addr), value);

        Ok(())
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Mock delay for testing without actual timing
///
/// Records delays for verification without actually waiting.
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Total nanoseconds delayed
    total_ns: RefCell<u64>,
    /// Number of delay calls
    calls: RefCell<u32>,
}

impl MockDelay {
    /// Create a new mock delay
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total nanoseconds that were "delayed"
    pub fn total_ns(&self) -> u64 {
        *self.total_ns.borrow()
    }

    /// Get total microseconds that were "delayed"
    pub fn total_us(&self) -> u64 {
        self.total_ns() / 1_000
    }

    /// Number of times a delay was requested
    pub fn calls(&self) -> u32 {
        *self.calls.borrow()
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.total_ns.borrow_mut() += ns as u64;
        *self.calls.borrow_mut() += 1;
    }
}

// =============================================================================
// Test Assertions
// =============================================================================

/// Assert that a register was written with a specific value
#[macro_export]
macro_rules! assert_reg_written {
    ($mdio:expr, $phy:expr, $reg:expr, $value:expr) => {
        let writes = $mdio.get_writes();
        assert!(
            writes
                .iter()
                .any(|w| w.0 == $phy && w.1 == $reg && w.2 == $value),
            "Expected write to PHY {} reg {} with value 0x{:04X}, but got: {:?}",
            $phy,
            $reg,
            $value,
            writes
        );
    };
}

/// Assert that a register was written (any value)
#[macro_export]
macro_rules! assert_reg_written_any {
    ($mdio:expr, $phy:expr, $reg:expr) => {
        let writes = $mdio.get_writes();
        assert!(
            writes.iter().any(|w| w.0 == $phy && w.1 == $reg),
            "Expected write to PHY {} reg {}, but got: {:?}",
            $phy,
            $reg,
            writes
        );
    };
}
