//! Extended page selection
//!
//! Vitesse PHYs reuse register numbers 16-30 for several register banks.
//! Writing a page code to register 31 remaps them; register 31 itself stays
//! put on every page. The driver keeps the page it last confirmed in the
//! session so that main-page accesses only pay for a page write when
//! something else moved the page away.
//!
//! A page switch is confirmed by polling a status register with a bounded
//! number of reads ([`Handshake`]). If the confirmation never arrives the
//! session forgets which page is active and the next access reselects.

use embedded_hal::delay::DelayNs;

use crate::config::PollConfig;
use crate::error::{Result, TimeoutKind};
use crate::hal::mdio::MdioBus;
use crate::internal::phy_regs::vitesse::{page as code, reg};

use super::vsc82xx::Vsc82xx;

// =============================================================================
// Pages
// =============================================================================

/// Register page selected through the extended page access register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Page {
    /// Standard IEEE registers plus the main vendor registers
    Main,
    /// Extended page 1
    Ext1,
    /// Extended page 2 (copper PMD tuning)
    Ext2,
    /// Extended page 3 (MAC-side SerDes)
    Ext3,
    /// MACsec
    Macsec,
    /// General purpose, shared by all ports of a package
    General,
    /// Test registers
    Test,
    /// Token ring (DSP tuning)
    TokenRing,
    /// IEEE 1588 timestamping
    Ptp1588,
    /// Extended 2DAF
    Ext2Daf,
}

impl Page {
    /// Value written to the page access register
    pub const fn code(self) -> u16 {
        match self {
            Page::Main => code::MAIN,
            Page::Ext1 => code::EXT_1,
            Page::Ext2 => code::EXT_2,
            Page::Ext3 => code::EXT_3,
            Page::Macsec => code::MACSEC,
            Page::General => code::GENERAL,
            Page::Test => code::TEST,
            Page::TokenRing => code::TOKEN_RING,
            Page::Ptp1588 => code::PTP_1588,
            Page::Ext2Daf => code::EXT_2DAF,
        }
    }

    /// Decode a page access register value
    pub const fn from_code(value: u16) -> Option<Self> {
        Some(match value {
            code::MAIN => Page::Main,
            code::EXT_1 => Page::Ext1,
            code::EXT_2 => Page::Ext2,
            code::EXT_3 => Page::Ext3,
            code::MACSEC => Page::Macsec,
            code::GENERAL => Page::General,
            code::TEST => Page::Test,
            code::TOKEN_RING => Page::TokenRing,
            code::PTP_1588 => Page::Ptp1588,
            code::EXT_2DAF => Page::Ext2Daf,
            _ => return None,
        })
    }
}

// =============================================================================
// Handshakes
// =============================================================================

/// How a device signals that a command written to a register has completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Handshake {
    /// Done once the `busy` bits read back clear
    BusyBit {
        /// Register to poll
        status: u8,
        /// Busy flag(s)
        busy: u16,
    },
    /// Done once `status` reads back the written value with `busy` cleared
    Settled {
        /// Register to poll
        status: u8,
        /// Busy flag(s) stripped from the written value
        busy: u16,
    },
}

impl Handshake {
    /// Busy-bit confirmation on the page access register
    pub const PAGE_BUSY_BIT: Self = Handshake::BusyBit {
        status: reg::EXT_PAGE_ACCESS,
        busy: crate::internal::phy_regs::vitesse::BUSY,
    };

    /// Settled-value confirmation on the page access register
    pub const PAGE_SETTLED: Self = Handshake::Settled {
        status: reg::EXT_PAGE_ACCESS,
        busy: crate::internal::phy_regs::vitesse::BUSY,
    };

    /// Register polled for completion
    pub const fn status_reg(&self) -> u8 {
        match *self {
            Handshake::BusyBit { status, .. } | Handshake::Settled { status, .. } => status,
        }
    }

    /// Whether `status` reports completion of a command that wrote `written`
    pub const fn is_complete(&self, status: u16, written: u16) -> bool {
        match *self {
            Handshake::BusyBit { busy, .. } => status & busy == 0,
            Handshake::Settled { busy, .. } => status == written & !busy,
        }
    }
}

// =============================================================================
// Page Selector
// =============================================================================

impl<D: DelayNs> Vsc82xx<D> {
    /// Page the driver last confirmed, `None` while indeterminate
    pub fn current_page(&self) -> Option<Page> {
        self.page
    }

    /// Switch to `page` and wait for the device to confirm it
    ///
    /// The page access register is written exactly once; the confirmation is
    /// then polled with the variant's [`Handshake`] and the configured
    /// [`PollConfig`]. The cached page is only updated after confirmation.
    ///
    /// # Errors
    ///
    /// [`Error::Bus`](crate::Error::Bus) if the write or a poll read fails,
    /// [`Error::Timeout`](crate::Error::Timeout) with
    /// [`TimeoutKind::PageSelect`] if the confirmation never arrives. In both
    /// cases the current page becomes indeterminate.
    pub fn select_page<M: MdioBus>(&mut self, mdio: &mut M, page: Page) -> Result<()> {
        // Whatever happens below, the old value is no longer trustworthy.
        self.page = None;

        let value = page.code();
        self.write_raw(mdio, reg::EXT_PAGE_ACCESS, value)?;

        let handshake = self.variant.page_handshake;
        let poll = self.config.page_poll;
        if let Err(e) = self.wait_handshake(mdio, handshake, value, poll, TimeoutKind::PageSelect) {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "PHY {}: page {:#x} not confirmed: {}",
                self.config.address,
                value,
                e
            );
            return Err(e);
        }

        self.page = Some(page);
        Ok(())
    }

    /// Select `page` unless it is already the confirmed page
    pub(crate) fn ensure_page<M: MdioBus>(&mut self, mdio: &mut M, page: Page) -> Result<()> {
        if self.page == Some(page) {
            return Ok(());
        }
        self.select_page(mdio, page)
    }

    /// Run `f` with `page` selected, then return to the main page
    ///
    /// The return to [`Page::Main`] is attempted on every exit path, also
    /// when selecting `page` or `f` itself failed. The first error wins; a
    /// failed restore is only reported when everything before it succeeded.
    pub fn with_page<M, R, F>(&mut self, mdio: &mut M, page: Page, f: F) -> Result<R>
    where
        M: MdioBus,
        F: FnOnce(&mut Self, &mut M) -> Result<R>,
    {
        let result = match self.select_page(mdio, page) {
            Ok(()) => f(self, mdio),
            Err(e) => Err(e),
        };

        let restore = self.select_page(mdio, Page::Main);

        match (result, restore) {
            (Err(e), Err(_restore_err)) => {
                #[cfg(feature = "defmt")]
                defmt::warn!(
                    "PHY {}: page restore failed after error: {}",
                    self.config.address,
                    _restore_err
                );
                Err(e)
            }
            (Err(e), Ok(())) | (Ok(_), Err(e)) => Err(e),
            (Ok(value), Ok(())) => Ok(value),
        }
    }

    /// Read one register on an extended page
    pub fn read_paged<M: MdioBus>(&mut self, mdio: &mut M, page: Page, reg_addr: u8) -> Result<u16> {
        self.with_page(mdio, page, |phy, mdio| phy.read_raw(mdio, reg_addr))
    }

    /// Write one register on an extended page
    pub fn write_paged<M: MdioBus>(
        &mut self,
        mdio: &mut M,
        page: Page,
        reg_addr: u8,
        value: u16,
    ) -> Result<()> {
        self.with_page(mdio, page, |phy, mdio| phy.write_raw(mdio, reg_addr, value))
    }

    /// Poll `handshake` until it reports completion of a write of `written`
    ///
    /// Reads the status register at most `poll.attempts` times (at least
    /// once), sleeping `poll.interval_us` between reads. Reads go to whatever
    /// page is currently selected.
    pub(crate) fn wait_handshake<M: MdioBus>(
        &mut self,
        mdio: &mut M,
        handshake: Handshake,
        written: u16,
        poll: PollConfig,
        kind: TimeoutKind,
    ) -> Result<()> {
        let status_reg = handshake.status_reg();
        for attempt in 0..poll.attempts.max(1) {
            if attempt > 0 {
                self.delay.delay_us(poll.interval_us);
            }
            let status = self.read_raw(mdio, status_reg)?;
            if handshake.is_complete(status, written) {
                return Ok(());
            }
        }
        Err(kind.into())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
