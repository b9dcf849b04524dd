//! Generic PHY Driver Trait
//!
//! This module defines the common interface for the PHY driver, plus the
//! IEEE 802.3 Clause 22 register helpers it is built on. The helpers talk to
//! the bus directly and assume the PHY is on its main page.

use crate::config::{Duplex, Speed};
use crate::error::Result;
use crate::hal::mdio::MdioBus;

use super::link::LinkRequest;

// =============================================================================
// Link Status
// =============================================================================

/// Ethernet link status information
///
/// `speed` and `duplex` are the resolved link parameters when the link is
/// up. With the link down they hold the forced setting, or 10/half while
/// auto-negotiating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStatus {
    /// Link is established
    pub link_up: bool,
    /// Link speed
    pub speed: Speed,
    /// Duplex mode
    pub duplex: Duplex,
}

impl LinkStatus {
    /// Create a new link status
    pub const fn new(link_up: bool, speed: Speed, duplex: Duplex) -> Self {
        Self {
            link_up,
            speed,
            duplex,
        }
    }

    /// Link established at `speed`/`duplex`
    pub const fn up(speed: Speed, duplex: Duplex) -> Self {
        Self::new(true, speed, duplex)
    }

    /// No link, nothing resolved
    pub const fn down() -> Self {
        Self::new(false, Speed::Mbps10, Duplex::Half)
    }
}

// =============================================================================
// Advertisement
// =============================================================================

/// Abilities advertised during auto-negotiation, or reported by the PHY
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Advertisement {
    /// 1000BASE-T Full Duplex
    pub speed_1000_fd: bool,
    /// 1000BASE-T Half Duplex
    pub speed_1000_hd: bool,
    /// 100BASE-TX Full Duplex
    pub speed_100_fd: bool,
    /// 100BASE-TX Half Duplex
    pub speed_100_hd: bool,
    /// 10BASE-T Full Duplex
    pub speed_10_fd: bool,
    /// 10BASE-T Half Duplex
    pub speed_10_hd: bool,
    /// PAUSE flow control
    pub pause: bool,
    /// Asymmetric PAUSE
    pub pause_asymmetric: bool,
}

impl Advertisement {
    /// Every speed/duplex combination, no flow control
    pub const fn all() -> Self {
        Self {
            speed_1000_fd: true,
            speed_1000_hd: true,
            speed_100_fd: true,
            speed_100_hd: true,
            speed_10_fd: true,
            speed_10_hd: true,
            pause: false,
            pause_asymmetric: false,
        }
    }

    /// 10/100 only
    pub const fn fast_ethernet() -> Self {
        Self {
            speed_1000_fd: false,
            speed_1000_hd: false,
            ..Self::all()
        }
    }

    /// Ability bits for ANAR (selector not included)
    pub const fn anar_bits(&self) -> u16 {
        use crate::internal::phy_regs::standard::anar;

        let mut bits = 0;
        if self.speed_100_fd {
            bits |= anar::TX_FD;
        }
        if self.speed_100_hd {
            bits |= anar::TX_HD;
        }
        if self.speed_10_fd {
            bits |= anar::T10_FD;
        }
        if self.speed_10_hd {
            bits |= anar::T10_HD;
        }
        if self.pause {
            bits |= anar::PAUSE;
        }
        if self.pause_asymmetric {
            bits |= anar::PAUSE_ASYM;
        }
        bits
    }

    /// Advertisement bits for the 1000BASE-T control register
    pub const fn gbcr_bits(&self) -> u16 {
        use crate::internal::phy_regs::standard::gbcr;

        let mut bits = 0;
        if self.speed_1000_fd {
            bits |= gbcr::ADV_1000_FD;
        }
        if self.speed_1000_hd {
            bits |= gbcr::ADV_1000_HD;
        }
        bits
    }

    /// Keep only abilities present in both
    pub const fn intersect(&self, other: &Self) -> Self {
        Self {
            speed_1000_fd: self.speed_1000_fd && other.speed_1000_fd,
            speed_1000_hd: self.speed_1000_hd && other.speed_1000_hd,
            speed_100_fd: self.speed_100_fd && other.speed_100_fd,
            speed_100_hd: self.speed_100_hd && other.speed_100_hd,
            speed_10_fd: self.speed_10_fd && other.speed_10_fd,
            speed_10_hd: self.speed_10_hd && other.speed_10_hd,
            pause: self.pause && other.pause,
            pause_asymmetric: self.pause_asymmetric && other.pause_asymmetric,
        }
    }
}

// =============================================================================
// PHY Driver Trait
// =============================================================================

/// Trait for Ethernet PHY drivers
///
/// Every method takes the bus by mutable reference, so a caller holding a
/// driver and its bus cannot interleave two register sequences.
///
/// # Example
///
/// ```ignore
/// let mut phy = Vsc82xx::probe(&mut mdio, PhyConfig::new(), delay)?;
/// phy.init(&mut mdio)?;
/// phy.configure_link(&mut mdio, LinkRequest::auto())?;
/// phy.set_interrupts(&mut mdio, true)?;
///
/// // From the PHY interrupt handler
/// let status = phy.handle_interrupt(&mut mdio)?;
/// ```
pub trait PhyDriver {
    /// Get the PHY address (0-31)
    fn address(&self) -> u8;

    /// Identifier read at probe time, `(PHYIDR1 << 16) | PHYIDR2`
    fn phy_id(&self) -> u32;

    /// Initialize the PHY
    ///
    /// Applies the revision fixups (once) and the chip-specific interface
    /// setup. Link configuration is a separate step.
    fn init<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()>;

    /// Perform a soft reset
    ///
    /// Writes to BMCR.RESET and waits for it to self-clear.
    fn soft_reset<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()>;

    /// Apply a link configuration request
    fn configure_link<M: MdioBus>(&mut self, mdio: &mut M, request: LinkRequest) -> Result<()>;

    /// Read the current link status
    fn read_status<M: MdioBus>(&mut self, mdio: &mut M) -> Result<LinkStatus>;

    /// Poll for link changes
    ///
    /// Returns `Some(LinkStatus)` when a new link is established,
    /// `None` if link is still down or unchanged.
    fn poll_link<M: MdioBus>(&mut self, mdio: &mut M) -> Result<Option<LinkStatus>>;

    /// Arm or disarm the PHY interrupt output
    fn set_interrupts<M: MdioBus>(&mut self, mdio: &mut M, enabled: bool) -> Result<()>;

    /// Clear a pending interrupt
    fn acknowledge<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()>;

    /// Interrupt service: acknowledge, then report the link status
    fn handle_interrupt<M: MdioBus>(&mut self, mdio: &mut M) -> Result<LinkStatus> {
        self.acknowledge(mdio)?;
        self.read_status(mdio)
    }

    /// Get PHY capabilities
    ///
    /// Returns what speed/duplex modes this PHY supports.
    fn capabilities<M: MdioBus>(&mut self, mdio: &mut M) -> Result<Advertisement>;
}

// =============================================================================
// Default Implementations
// =============================================================================

/// Helper functions using standard IEEE 802.3 registers
pub mod ieee802_3 {
    use super::*;
    use crate::internal::phy_regs::standard::{anar, bmcr, bmsr, estatus, gbcr, phy_reg};

    /// Write ANAR and GBCR abilities, keeping the other bits
    pub fn write_advertisement<M: MdioBus>(
        mdio: &mut M,
        phy_addr: u8,
        adv: &Advertisement,
    ) -> Result<()> {
        let anar_val = mdio.read(phy_addr, phy_reg::ANAR)?;
        mdio.write(
            phy_addr,
            phy_reg::ANAR,
            (anar_val & !anar::ABILITY_MASK) | adv.anar_bits(),
        )?;

        let gbcr_val = mdio.read(phy_addr, phy_reg::GBCR)?;
        mdio.write(
            phy_addr,
            phy_reg::GBCR,
            (gbcr_val & !(gbcr::ADV_1000_FD | gbcr::ADV_1000_HD)) | adv.gbcr_bits(),
        )?;
        Ok(())
    }

    /// Enable auto-negotiation and restart
    pub fn restart_auto_negotiation<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<()> {
        let bmcr_val = mdio.read(phy_addr, phy_reg::BMCR)?;
        mdio.write(
            phy_addr,
            phy_reg::BMCR,
            (bmcr_val | bmcr::AN_ENABLE | bmcr::AN_RESTART) & !bmcr::ISOLATE,
        )?;
        Ok(())
    }

    /// Force speed and duplex
    pub fn force_link<M: MdioBus>(
        mdio: &mut M,
        phy_addr: u8,
        speed: Speed,
        duplex: Duplex,
    ) -> Result<()> {
        let mut bmcr_val = mdio.read(phy_addr, phy_reg::BMCR)?;

        // Disable auto-negotiation
        bmcr_val &= !(bmcr::AN_ENABLE | bmcr::ISOLATE);

        bmcr_val &= !(bmcr::SPEED_100 | bmcr::SPEED_1000);
        match speed {
            Speed::Mbps1000 => bmcr_val |= bmcr::SPEED_1000,
            Speed::Mbps100 => bmcr_val |= bmcr::SPEED_100,
            Speed::Mbps10 => {}
        }

        if matches!(duplex, Duplex::Full) {
            bmcr_val |= bmcr::DUPLEX_FULL;
        } else {
            bmcr_val &= !bmcr::DUPLEX_FULL;
        }

        mdio.write(phy_addr, phy_reg::BMCR, bmcr_val)?;
        Ok(())
    }

    /// Decode speed and duplex from BMCR
    pub const fn forced_from_bmcr(bmcr_val: u16) -> (Speed, Duplex) {
        let speed = if bmcr_val & bmcr::SPEED_1000 != 0 && bmcr_val & bmcr::SPEED_100 == 0 {
            Speed::Mbps1000
        } else if bmcr_val & bmcr::SPEED_100 != 0 {
            Speed::Mbps100
        } else {
            Speed::Mbps10
        };

        let duplex = if (bmcr_val & bmcr::DUPLEX_FULL) != 0 {
            Duplex::Full
        } else {
            Duplex::Half
        };

        (speed, duplex)
    }

    /// Highest common mode from our advertisement and the partner's
    ///
    /// `gbcr`/`gbsr` are the 1000BASE-T control and status registers,
    /// `anar`/`lpa` the 10/100 advertisement and link partner ability.
    pub const fn resolve(gbcr_val: u16, gbsr_val: u16, anar_val: u16, lpa: u16) -> (Speed, Duplex) {
        // Partner bits in GBSR sit two above our advertisement bits in GBCR
        let common_gb = (gbsr_val >> 2) & gbcr_val;
        let common = anar_val & lpa;

        if common_gb & gbcr::ADV_1000_FD != 0 {
            (Speed::Mbps1000, Duplex::Full)
        } else if common_gb & gbcr::ADV_1000_HD != 0 {
            (Speed::Mbps1000, Duplex::Half)
        } else if common & anar::TX_FD != 0 {
            (Speed::Mbps100, Duplex::Full)
        } else if common & anar::TX_HD != 0 {
            (Speed::Mbps100, Duplex::Half)
        } else if common & anar::T10_FD != 0 {
            (Speed::Mbps10, Duplex::Full)
        } else {
            (Speed::Mbps10, Duplex::Half)
        }
    }

    /// Read link state and resolve speed/duplex
    ///
    /// With auto-negotiation enabled the result is the highest common mode;
    /// otherwise it is the forced BMCR setting.
    pub fn read_status<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<LinkStatus> {
        // Link status is latched low; the first read clears a stale drop
        mdio.read(phy_addr, phy_reg::BMSR)?;
        let bmsr_val = mdio.read(phy_addr, phy_reg::BMSR)?;
        let link_up = (bmsr_val & bmsr::LINK_STATUS) != 0;

        let bmcr_val = mdio.read(phy_addr, phy_reg::BMCR)?;
        if bmcr_val & bmcr::AN_ENABLE == 0 {
            let (speed, duplex) = forced_from_bmcr(bmcr_val);
            return Ok(LinkStatus::new(link_up, speed, duplex));
        }

        if !link_up {
            return Ok(LinkStatus::down());
        }

        let gbcr_val = mdio.read(phy_addr, phy_reg::GBCR)?;
        let gbsr_val = mdio.read(phy_addr, phy_reg::GBSR)?;
        let anar_val = mdio.read(phy_addr, phy_reg::ANAR)?;
        let lpa = mdio.read(phy_addr, phy_reg::ANLPAR)?;

        let (speed, duplex) = resolve(gbcr_val, gbsr_val, anar_val, lpa);
        Ok(LinkStatus::up(speed, duplex))
    }

    /// Read capabilities from BMSR and, if present, ESTATUS
    pub fn read_capabilities<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<Advertisement> {
        let bmsr_val = mdio.read(phy_addr, phy_reg::BMSR)?;

        let (speed_1000_fd, speed_1000_hd) = if (bmsr_val & bmsr::ESTATUS) != 0 {
            let es = mdio.read(phy_addr, phy_reg::ESTATUS)?;
            ((es & estatus::T1000_FD) != 0, (es & estatus::T1000_HD) != 0)
        } else {
            (false, false)
        };

        Ok(Advertisement {
            speed_1000_fd,
            speed_1000_hd,
            speed_100_fd: (bmsr_val & bmsr::TX_FD_CAPABLE) != 0,
            speed_100_hd: (bmsr_val & bmsr::TX_HD_CAPABLE) != 0,
            speed_10_fd: (bmsr_val & bmsr::T10_FD_CAPABLE) != 0,
            speed_10_hd: (bmsr_val & bmsr::T10_HD_CAPABLE) != 0,
            pause: true,
            pause_asymmetric: true,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
