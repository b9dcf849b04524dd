//! Revision fixups
//!
//! Some silicon revisions need register tweaks before the link is brought
//! up. A fixup is plain data: a list of `(page, register, value)` writes
//! selected by identifier/mask match. The engine is best effort. A failing
//! write is logged and skipped, the rest of the sequence still runs, and the
//! caller gets a [`FixupFailure`] summary at the end.

use embedded_hal::delay::DelayNs;

use crate::error::{ConfigError, ConfigResult, FailedStep, FixupFailure, Result, StepError};
use crate::hal::mdio::MdioBus;
use crate::internal::phy_regs::vitesse::{ext, reg};

use super::page::Page;
use super::variant::{DeviceId, is_unambiguous};
use super::vsc82xx::Vsc82xx;

// =============================================================================
// Fixup Data
// =============================================================================

/// One register write on a given page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegWrite {
    /// Page the register lives on
    pub page: Page,
    /// Register number
    pub reg: u8,
    /// Value to write
    pub value: u16,
}

impl RegWrite {
    /// Create a write step
    pub const fn new(page: Page, reg: u8, value: u16) -> Self {
        Self { page, reg, value }
    }
}

/// Named, ordered list of writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FixupSequence {
    /// Name used in log output
    pub name: &'static str,
    /// Writes in execution order
    pub steps: &'static [RegWrite],
}

/// Sequences to run for PHYs matching `device`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FixupEntry {
    /// Identifier pattern
    pub device: DeviceId,
    /// Sequences, run in order
    pub sequences: &'static [&'static FixupSequence],
}

impl FixupEntry {
    /// Total number of writes across all sequences
    pub fn step_count(&self) -> usize {
        self.sequences.iter().map(|s| s.steps.len()).sum()
    }
}

/// Validated fixup dispatch table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixupTable {
    entries: &'static [FixupEntry],
}

impl FixupTable {
    /// Build a table, rejecting equal-specificity overlaps
    ///
    /// `const`, so a table declared as a constant is checked at build time.
    pub const fn new(entries: &'static [FixupEntry]) -> ConfigResult<Self> {
        let mut i = 0;
        while i < entries.len() {
            let mut j = i + 1;
            while j < entries.len() {
                if !is_unambiguous(&[entries[i].device, entries[j].device]) {
                    return Err(ConfigError::AmbiguousFixupTable);
                }
                j += 1;
            }
            i += 1;
        }
        Ok(Self { entries })
    }

    /// A table without entries
    pub const fn empty() -> Self {
        Self { entries: &[] }
    }

    /// Entry for `phy_id`, narrowest mask first
    pub fn lookup(&self, phy_id: u32) -> Option<&'static FixupEntry> {
        self.entries
            .iter()
            .filter(|e| e.device.matches(phy_id))
            .max_by_key(|e| e.device.specificity())
    }

    /// All entries
    pub fn entries(&self) -> &'static [FixupEntry] {
        self.entries
    }
}

// =============================================================================
// Built-in Fixups
// =============================================================================

const fn main(reg: u8, value: u16) -> RegWrite {
    RegWrite::new(Page::Main, reg, value)
}

const fn test(reg: u8, value: u16) -> RegWrite {
    RegWrite::new(Page::Test, reg, value)
}

const fn tr(reg: u8, value: u16) -> RegWrite {
    RegWrite::new(Page::TokenRing, reg, value)
}

/// LED configuration for all VSC8574 revisions
pub const LED_MODE: FixupSequence = FixupSequence {
    name: "led-mode",
    steps: &[main(reg::LED_MODE, 0x800A), main(reg::LED_BEHAVIOR, 0x040F)],
};

/// Analog tuning for VSC8574 revision A
pub const REV_A_TUNE: FixupSequence = FixupSequence {
    name: "rev-a-tune",
    steps: &[
        // Broadcast writes to all ports on
        main(0x16, 0x3201),
        // 100BASE-TX edge rate
        main(0x18, 0x2040),
        // TX amplitude
        RegWrite::new(Page::Ext2, ext::REG_16, 0x02F0),
        test(0x14, 0x0140),
        test(0x09, 0x180C),
        // Token ring access on
        test(0x08, 0x8012),
        tr(ext::REG_18, 0x0000),
        tr(ext::REG_17, 0x0011),
        tr(ext::REG_16, 0x96A0),
        tr(ext::REG_18, 0x0000),
        tr(ext::REG_17, 0x7100),
        tr(ext::REG_16, 0x96A2),
        tr(ext::REG_18, 0x00D2),
        tr(ext::REG_17, 0x547F),
        tr(ext::REG_16, 0x968C),
        tr(ext::REG_18, 0x00F0),
        tr(ext::REG_17, 0xF00D),
        tr(ext::REG_16, 0x96B0),
        tr(ext::REG_18, 0x0000),
        tr(ext::REG_17, 0x7100),
        tr(ext::REG_16, 0x96B2),
        tr(ext::REG_18, 0x0000),
        tr(ext::REG_17, 0x345F),
        tr(ext::REG_16, 0x96B4),
        tr(ext::REG_18, 0x0000),
        tr(ext::REG_17, 0xF7DF),
        tr(ext::REG_16, 0x8FD4),
        tr(ext::REG_18, 0x0000),
        tr(ext::REG_17, 0xF3DF),
        tr(ext::REG_16, 0x8FD2),
        tr(ext::REG_18, 0x000E),
        tr(ext::REG_17, 0x2B00),
        tr(ext::REG_16, 0x8FB0),
        tr(ext::REG_18, 0x000B),
        tr(ext::REG_17, 0x05A0),
        tr(ext::REG_16, 0x8FE0),
        tr(ext::REG_18, 0x0000),
        tr(ext::REG_17, 0x00BA),
        tr(ext::REG_16, 0x8FE2),
        tr(ext::REG_18, 0x0000),
        tr(ext::REG_17, 0x4689),
        tr(ext::REG_16, 0x8F92),
        tr(ext::REG_18, 0x0060),
        tr(ext::REG_17, 0x0980),
        tr(ext::REG_16, 0x8F90),
        // Token ring access off
        test(0x08, 0x0012),
        // Broadcast off
        main(0x16, 0x3200),
    ],
};

const BUILTIN_ENTRIES: &[FixupEntry] = &[
    FixupEntry {
        device: DeviceId::new(0x0007_04A0, 0x000F_FFF1),
        sequences: &[&LED_MODE, &REV_A_TUNE],
    },
    FixupEntry {
        device: DeviceId::new(0x0007_04A1, 0x000F_FFF1),
        sequences: &[&LED_MODE],
    },
];

/// Fixups shipped with the driver
pub const BUILTIN_FIXUPS: FixupTable = match FixupTable::new(BUILTIN_ENTRIES) {
    Ok(table) => table,
    Err(_) => panic!("ambiguous built-in fixup table"),
};

// =============================================================================
// Failure Collection
// =============================================================================

#[derive(Default)]
struct Failures {
    failed: u16,
    first: Option<FailedStep>,
    last: Option<FailedStep>,
}

impl Failures {
    fn record(&mut self, step: FailedStep) {
        self.failed = self.failed.saturating_add(1);
        if self.first.is_none() {
            self.first = Some(step);
        }
        self.last = Some(step);
    }

    fn into_result(self) -> Result<()> {
        match (self.first, self.last) {
            (Some(first), Some(last)) => Err(FixupFailure {
                failed: self.failed,
                first,
                last,
            }
            .into()),
            _ => Ok(()),
        }
    }
}

// =============================================================================
// Fixup Engine
// =============================================================================

impl<D: DelayNs> Vsc82xx<D> {
    /// Whether the fixups already ran for this device
    pub fn fixup_applied(&self) -> bool {
        self.fixup_applied
    }

    /// Run the revision fixups matching this PHY
    ///
    /// Must run once, before link configuration. Identifiers without a
    /// matching entry return `Ok(())` without touching the bus.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::AlreadyInitialized`] on a second call (no bus traffic)
    /// - [`ConfigError::FixupAfterLinkConfig`] once
    ///   [`configure_link`](Self::configure_link) has run (no bus traffic)
    /// - [`Error::PartialFixup`](crate::Error::PartialFixup) if any write or
    ///   page switch failed. Every other step was still attempted, so the
    ///   device may be partially tuned.
    pub fn apply_fixup<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        if self.fixup_applied {
            return Err(ConfigError::AlreadyInitialized.into());
        }
        if self.link_configured {
            #[cfg(feature = "defmt")]
            defmt::warn!("PHY {}: fixup requested after link configuration", self.config.address);
            return Err(ConfigError::FixupAfterLinkConfig.into());
        }
        self.fixup_applied = true;

        let Some(entry) = self.fixups.lookup(self.phy_id) else {
            return Ok(());
        };

        let mut failures = Failures::default();
        let mut active: Option<Page> = None;
        let mut index: u16 = 0;

        for sequence in entry.sequences {
            #[cfg(feature = "defmt")]
            defmt::debug!(
                "PHY {}: fixup {} ({} writes)",
                self.config.address,
                sequence.name,
                sequence.steps.len()
            );
            #[cfg(feature = "defmt")]
            let before = failures.failed;

            for step in sequence.steps {
                if let Err(e) = self.fixup_step(mdio, step, &mut active) {
                    #[cfg(feature = "defmt")]
                    defmt::warn!(
                        "PHY {}: fixup {} step {} (page {:#x} reg {}) failed: {}",
                        self.config.address,
                        sequence.name,
                        index,
                        step.page.code(),
                        step.reg,
                        e
                    );
                    failures.record(FailedStep {
                        index,
                        page: step.page,
                        reg: step.reg,
                        value: step.value,
                        cause: StepError::from_error(e),
                    });
                }
                index = index.saturating_add(1);
            }

            #[cfg(feature = "defmt")]
            defmt::debug!(
                "PHY {}: fixup {} done, {} failed",
                self.config.address,
                sequence.name,
                failures.failed - before
            );
        }

        if active != Some(Page::Main) {
            let restore = RegWrite::new(Page::Main, reg::EXT_PAGE_ACCESS, Page::Main.code());
            if let Err(e) = self.select_page(mdio, Page::Main) {
                #[cfg(feature = "defmt")]
                defmt::warn!("PHY {}: page restore after fixup failed: {}", self.config.address, e);
                failures.record(FailedStep {
                    index,
                    page: restore.page,
                    reg: restore.reg,
                    value: restore.value,
                    cause: StepError::from_error(e),
                });
            }
        }

        failures.into_result()
    }

    fn fixup_step<M: MdioBus>(
        &mut self,
        mdio: &mut M,
        step: &RegWrite,
        active: &mut Option<Page>,
    ) -> Result<()> {
        if *active != Some(step.page) {
            // An unconfirmed switch is retried by the next step
            *active = None;
            self.select_page(mdio, step.page)?;
            *active = Some(step.page);
        }
        self.write_raw(mdio, step.reg, step.value)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use super::*;
    use crate::config::{Duplex, PhyConfig, Speed};
    use crate::error::{BusError, Error};
    use crate::phy::generic::PhyDriver;
    use crate::phy::link::LinkRequest;
    use crate::phy::vsc82xx::tests::probe_vsc8244;
    use crate::test_utils::{MockDelay, MockMdioBus};

    fn probe_8574_rev(mdio: &mut MockMdioBus, rev: u8) -> Vsc82xx<MockDelay> {
        mdio.setup_vsc8574(0, rev);
        let phy = Vsc82xx::probe(mdio, PhyConfig::new(), MockDelay::new()).unwrap();
        mdio.clear_writes();
        phy
    }

    fn expected(sequences: &[&FixupSequence]) -> Vec<(u16, u8, u16)> {
        sequences
            .iter()
            .flat_map(|s| s.steps.iter())
            .map(|w| (w.page.code(), w.reg, w.value))
            .collect()
    }

    fn page_writes(mdio: &MockMdioBus) -> usize {
        mdio.write_count(0, reg::EXT_PAGE_ACCESS)
    }

    #[test]
    fn builtin_table_lookup() {
        let rev_a = BUILTIN_FIXUPS.lookup(0x0007_04A0).unwrap();
        assert_eq!(rev_a.sequences.len(), 2);
        assert_eq!(rev_a.step_count(), 2 + 47);

        let rev_b = BUILTIN_FIXUPS.lookup(0x0007_04A1).unwrap();
        assert_eq!(rev_b.sequences, &[&LED_MODE]);

        // Bit 1 is outside both masks: even revisions get the rev A treatment
        assert_eq!(BUILTIN_FIXUPS.lookup(0x0007_04A2), Some(rev_a));
        assert!(BUILTIN_FIXUPS.lookup(0x0007_04B0).is_none());
        assert!(BUILTIN_FIXUPS.lookup(0x000F_C6C0).is_none());
    }

    #[test]
    fn narrower_mask_wins_lookup() {
        const GENERIC: FixupSequence = FixupSequence {
            name: "generic",
            steps: &[RegWrite::new(Page::Main, 0x16, 1)],
        };
        static ENTRIES: [FixupEntry; 2] = [
            FixupEntry {
                device: DeviceId::new(0x0007_04A0, 0x000F_FFF0),
                sequences: &[&GENERIC],
            },
            FixupEntry {
                device: DeviceId::new(0x0007_04A1, 0x000F_FFFF),
                sequences: &[&LED_MODE],
            },
        ];
        let table = FixupTable::new(&ENTRIES).unwrap();

        assert_eq!(table.lookup(0x0007_04A1).unwrap().sequences, &[&LED_MODE]);
        assert_eq!(table.lookup(0x0007_04A5).unwrap().sequences, &[&GENERIC]);
    }

    #[test]
    fn equal_specificity_overlap_rejected() {
        static ENTRIES: [FixupEntry; 2] = [
            FixupEntry {
                device: DeviceId::new(0x0007_04A0, 0x000F_FFF0),
                sequences: &[],
            },
            FixupEntry {
                device: DeviceId::new(0x0007_04A0, 0x000F_FFF0),
                sequences: &[&LED_MODE],
            },
        ];
        assert_eq!(FixupTable::new(&ENTRIES), Err(ConfigError::AmbiguousFixupTable));
    }

    #[test]
    fn unmatched_identifier_writes_nothing() {
        let mut mdio = MockMdioBus::new();
        let mut phy = probe_vsc8244(&mut mdio);

        assert_eq!(phy.apply_fixup(&mut mdio), Ok(()));
        assert!(mdio.get_writes().is_empty());
        assert!(phy.fixup_applied());
    }

    #[test]
    fn rev_a_runs_led_then_tune() {
        let mut mdio = MockMdioBus::new();
        let mut phy = probe_8574_rev(&mut mdio, 0);

        assert_eq!(phy.apply_fixup(&mut mdio), Ok(()));

        assert_eq!(mdio.get_paged_writes(0), expected(&[&LED_MODE, &REV_A_TUNE]));
        assert_eq!(phy.current_page(), Some(Page::Main));
        // MAIN (led + tune), EXT2, TEST, TR, TEST, MAIN
        assert_eq!(page_writes(&mdio), 6);
    }

    #[test]
    fn rev_b_runs_led_only() {
        let mut mdio = MockMdioBus::new();
        let mut phy = probe_8574_rev(&mut mdio, 1);

        assert_eq!(phy.apply_fixup(&mut mdio), Ok(()));

        assert_eq!(mdio.get_paged_writes(0), expected(&[&LED_MODE]));
        assert_eq!(page_writes(&mdio), 1);
        assert_eq!(phy.current_page(), Some(Page::Main));
    }

    #[test]
    fn failed_writes_are_collected_and_the_rest_still_runs() {
        let mut mdio = MockMdioBus::new();
        let mut phy = probe_8574_rev(&mut mdio, 0);
        mdio.fail_write(0, reg::LED_BEHAVIOR, 0x040F);
        mdio.fail_write(0, ext::REG_17, 0x7100);

        let err = phy.apply_fixup(&mut mdio).unwrap_err();

        let Error::PartialFixup(failure) = err else {
            panic!("unexpected error {err:?}");
        };
        // 0x7100 appears twice in the token ring block
        assert_eq!(failure.failed, 3);
        assert_eq!(failure.first.index, 1);
        assert_eq!(failure.first.page, Page::Main);
        assert_eq!(failure.first.cause, StepError::Bus(BusError::NoResponse));
        assert_eq!(failure.last.page, Page::TokenRing);
        assert_eq!(failure.last.value, 0x7100);

        // Everything else landed, in order
        let all = expected(&[&LED_MODE, &REV_A_TUNE]);
        let landed: Vec<_> = all
            .into_iter()
            .filter(|w| *w != (0, reg::LED_BEHAVIOR, 0x040F) && w.2 != 0x7100)
            .collect();
        assert_eq!(mdio.get_paged_writes(0), landed);
        assert_eq!(phy.current_page(), Some(Page::Main));
    }

    #[test]
    fn failed_page_switch_skips_its_write_and_is_retried() {
        let mut mdio = MockMdioBus::new();
        let mut phy = probe_8574_rev(&mut mdio, 0);
        mdio.fail_write(0, reg::EXT_PAGE_ACCESS, Page::Ext2.code());

        let err = phy.apply_fixup(&mut mdio).unwrap_err();

        let Error::PartialFixup(failure) = err else {
            panic!("unexpected error {err:?}");
        };
        assert_eq!(failure.failed, 1);
        assert_eq!(failure.first.page, Page::Ext2);
        assert!(
            !mdio
                .get_paged_writes(0)
                .iter()
                .any(|w| w.1 == ext::REG_16 && w.2 == 0x02F0)
        );
        assert_eq!(phy.current_page(), Some(Page::Main));
    }

    #[test]
    fn fixup_after_link_config_is_rejected_without_bus_traffic() {
        let mut mdio = MockMdioBus::new();
        let mut phy = probe_8574_rev(&mut mdio, 0);
        phy.configure_link(&mut mdio, LinkRequest::forced(Speed::Mbps100, Duplex::Half))
            .unwrap();
        mdio.clear_writes();

        assert_eq!(
            phy.apply_fixup(&mut mdio),
            Err(Error::Config(ConfigError::FixupAfterLinkConfig))
        );
        assert!(mdio.get_writes().is_empty());
        assert!(mdio.get_reads().is_empty());
        assert!(!phy.fixup_applied());

        // init goes through the same guard
        assert_eq!(
            phy.init(&mut mdio),
            Err(Error::Config(ConfigError::FixupAfterLinkConfig))
        );
        assert!(mdio.get_writes().is_empty());
    }

    #[test]
    fn fixup_before_link_config_is_accepted() {
        let mut mdio = MockMdioBus::new();
        let mut phy = probe_8574_rev(&mut mdio, 0);

        assert_eq!(phy.apply_fixup(&mut mdio), Ok(()));
        phy.configure_link(&mut mdio, LinkRequest::forced(Speed::Mbps100, Duplex::Half))
            .unwrap();

        let tune = expected(&[&LED_MODE, &REV_A_TUNE]);
        assert_eq!(&mdio.get_paged_writes(0)[..tune.len()], &tune[..]);
        assert_eq!(
            phy.apply_fixup(&mut mdio),
            Err(Error::Config(ConfigError::AlreadyInitialized))
        );
    }

    #[test]
    fn second_apply_is_rejected_without_bus_traffic() {
        let mut mdio = MockMdioBus::new();
        let mut phy = probe_8574_rev(&mut mdio, 1);
        phy.apply_fixup(&mut mdio).unwrap();
        mdio.clear_writes();

        assert_eq!(
            phy.apply_fixup(&mut mdio),
            Err(Error::Config(ConfigError::AlreadyInitialized))
        );
        assert!(mdio.get_writes().is_empty());
        assert!(mdio.get_reads().is_empty());
    }
}
