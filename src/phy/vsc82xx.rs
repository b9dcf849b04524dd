//! Vitesse VSC82xx/VSC85xx PHY Driver
//!
//! One [`Vsc82xx`] is the driver session for one PHY on the MDIO bus. It
//! owns everything that has to stay consistent between register sequences:
//! the identified variant, the page the device is believed to be on, the
//! applied link mode and the interrupt enable state.
//!
//! # Bring-up
//!
//! ```ignore
//! use vsc82xx_phy::{LinkRequest, PhyConfig, PhyDriver, PhyInterface, Vsc82xx};
//!
//! let config = PhyConfig::new()
//!     .with_address(1)
//!     .with_interface(PhyInterface::Sgmii);
//!
//! // Reads the identifier and picks the variant
//! let mut phy = Vsc82xx::probe(&mut mdio, config, delay)?;
//!
//! // Revision fixups, then interface setup
//! phy.init(&mut mdio)?;
//! phy.configure_link(&mut mdio, LinkRequest::auto())?;
//! phy.set_interrupts(&mut mdio, true)?;
//! ```
//!
//! # Supported Parts
//!
//! | Part    | Init                 | Forced-mode crossover | IRQ mask |
//! |---------|----------------------|-----------------------|----------|
//! | VSC8234 | RGMII skew           | yes                   | wide     |
//! | VSC8244 | RGMII skew           | yes                   | wide     |
//! | VSC8514 | RGMII skew           | yes                   | wide     |
//! | VSC8574 | SGMII startup        | yes                   | wide     |
//! | VSC8662 | RGMII skew           | yes                   | narrow   |
//! | VSC8221 | aux control          | no                    | narrow   |
//! | VSC8211 | aux control          | no                    | narrow   |

use embedded_hal::delay::DelayNs;

use crate::config::{Duplex, PhyConfig, PhyInterface, Speed};
use crate::error::{ConfigError, Result, TimeoutKind};
use crate::hal::mdio::{MAX_PHY_ADDR, MdioBus, read_phy_id};
use crate::internal::phy_regs::standard::{bmcr, bmsr, phy_reg};
use crate::internal::phy_regs::vitesse::{BUSY, aux, ext, ext_con1, reg, sgmii};

use super::fixup::{BUILTIN_FIXUPS, FixupTable};
use super::generic::{Advertisement, LinkStatus, PhyDriver, ieee802_3};
use super::interrupt::InterruptState;
use super::link::{LinkMode, LinkRequest};
use super::page::{Handshake, Page};
use super::variant::{InitKind, Variant, identify};

// =============================================================================
// Driver Session
// =============================================================================

/// Driver session for one Vitesse PHY
///
/// Every operation takes the MDIO bus as `&mut`, so register sequences on
/// one session never interleave. `D` provides the waits between handshake
/// polls.
#[derive(Debug)]
pub struct Vsc82xx<D: DelayNs> {
    pub(crate) config: PhyConfig,
    pub(crate) phy_id: u32,
    pub(crate) variant: &'static Variant,
    pub(crate) fixups: FixupTable,
    pub(crate) delay: D,
    /// Last confirmed page, `None` while indeterminate
    pub(crate) page: Option<Page>,
    pub(crate) mode: LinkMode,
    pub(crate) irq: InterruptState,
    pub(crate) fixup_applied: bool,
    /// A link configuration request has touched the PHY
    pub(crate) link_configured: bool,
    /// Last known link state (for change detection)
    pub(crate) last_link_up: bool,
}

impl<D: DelayNs> Vsc82xx<D> {
    /// Identify the PHY at `config.address` and open a session
    ///
    /// Only the identifier registers are read. The page is treated as
    /// unknown, so the first main-page access selects it explicitly.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidPhyAddress`] for an address above 31
    /// - [`ConfigError::UnknownDevice`] if no variant matches the identifier
    /// - [`Error::Bus`](crate::Error::Bus) if the identifier read fails
    pub fn probe<M: MdioBus>(mdio: &mut M, config: PhyConfig, delay: D) -> Result<Self> {
        if config.address > MAX_PHY_ADDR {
            return Err(ConfigError::InvalidPhyAddress.into());
        }

        let phy_id = read_phy_id(mdio, config.address)?;
        let Some(variant) = identify(phy_id) else {
            #[cfg(feature = "defmt")]
            defmt::warn!("PHY {}: unknown identifier {:#x}", config.address, phy_id);
            return Err(ConfigError::UnknownDevice.into());
        };

        #[cfg(feature = "defmt")]
        defmt::info!(
            "PHY {}: {} (id {:#x})",
            config.address,
            variant.name,
            phy_id
        );

        Ok(Self {
            config,
            phy_id,
            variant,
            fixups: BUILTIN_FIXUPS,
            delay,
            page: None,
            mode: LinkMode::AutoNegotiating(Advertisement::all()),
            irq: InterruptState::default(),
            fixup_applied: false,
            link_configured: false,
            last_link_up: false,
        })
    }

    /// Replace the revision fixup table used by [`apply_fixup`](Self::apply_fixup)
    #[must_use]
    pub fn with_fixup_table(mut self, table: FixupTable) -> Self {
        self.fixups = table;
        self
    }

    /// Identified variant
    pub fn variant(&self) -> &'static Variant {
        self.variant
    }

    /// Driver configuration
    pub fn config(&self) -> &PhyConfig {
        &self.config
    }

    /// Release the delay provider
    pub fn release(self) -> D {
        self.delay
    }

    // =========================================================================
    // Register Access
    // =========================================================================

    /// Register read on whatever page is selected
    pub(crate) fn read_raw<M: MdioBus>(&mut self, mdio: &mut M, reg_addr: u8) -> Result<u16> {
        Ok(mdio.read(self.config.address, reg_addr)?)
    }

    /// Register write on whatever page is selected
    pub(crate) fn write_raw<M: MdioBus>(&mut self, mdio: &mut M, reg_addr: u8, value: u16) -> Result<()> {
        Ok(mdio.write(self.config.address, reg_addr, value)?)
    }

    /// Main-page register read
    pub fn read<M: MdioBus>(&mut self, mdio: &mut M, reg_addr: u8) -> Result<u16> {
        self.ensure_page(mdio, Page::Main)?;
        self.read_raw(mdio, reg_addr)
    }

    /// Main-page register write
    pub fn write<M: MdioBus>(&mut self, mdio: &mut M, reg_addr: u8, value: u16) -> Result<()> {
        self.ensure_page(mdio, Page::Main)?;
        self.write_raw(mdio, reg_addr, value)
    }

    // =========================================================================
    // Variant Init
    // =========================================================================

    /// Interface setup for the identified variant
    fn config_init<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        match self.variant.init {
            InitKind::RgmiiSkew => {
                if self.config.interface == PhyInterface::RgmiiId {
                    self.add_rgmii_skew(mdio)?;
                }
                Ok(())
            }
            InitKind::Sgmii => {
                if self.config.interface == PhyInterface::Sgmii {
                    self.sgmii_startup(mdio)
                } else {
                    #[cfg(feature = "defmt")]
                    defmt::debug!(
                        "PHY {}: {} not on SGMII, skipping MAC setup",
                        self.config.address,
                        self.variant.name
                    );
                    Ok(())
                }
            }
            InitKind::AuxControl => self.write(mdio, reg::AUX_CONSTAT, aux::VSC8221_INIT),
        }
    }

    /// Let the PHY insert the RGMII RX/TX clock delays
    fn add_rgmii_skew<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        let mut val = self.read(mdio, reg::EXT_CON1)?;
        val &= !(ext_con1::TX_SKEW_MASK | ext_con1::RX_SKEW_MASK);
        val |= ext_con1::TX_SKEW | ext_con1::RX_SKEW;
        self.write(mdio, reg::EXT_CON1, val)
    }

    /// VSC8574 SGMII MAC interface bring-up
    fn sgmii_startup<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        let poll = self.config.command_poll;

        self.with_page(mdio, Page::General, |phy, mdio| {
            // 18G must be idle before taking a new command
            let idle = Handshake::BusyBit {
                status: ext::REG_18,
                busy: BUSY,
            };
            phy.wait_handshake(mdio, idle, 0, poll, TimeoutKind::Command)?;

            phy.write_raw(mdio, ext::REG_18, sgmii::CMD_ALL_PORTS_SGMII)?;
            let done = Handshake::Settled {
                status: ext::REG_18,
                busy: BUSY,
            };
            phy.wait_handshake(mdio, done, sgmii::CMD_ALL_PORTS_SGMII, poll, TimeoutKind::Command)
        })?;

        self.write(mdio, phy_reg::BMCR, sgmii::BMCR_RESET_AN_1000FD)?;
        self.wait_reset(mdio)?;

        self.write_paged(mdio, Page::Ext3, ext::REG_16, sgmii::MAC_AN_ENABLE)?;
        self.write(mdio, phy_reg::BMCR, sgmii::BMCR_AN_1000FD)
    }

    fn wait_reset<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        let reset = Handshake::BusyBit {
            status: phy_reg::BMCR,
            busy: bmcr::RESET,
        };
        let poll = self.config.reset_poll;
        self.wait_handshake(mdio, reset, 0, poll, TimeoutKind::SoftReset)
    }

    // =========================================================================
    // Status
    // =========================================================================

    /// Speed and duplex from the auxiliary status register
    ///
    /// Reflects what the PHY is actually running at, regardless of how it
    /// got there. Link state comes from BMSR.
    pub fn aux_status<M: MdioBus>(&mut self, mdio: &mut M) -> Result<LinkStatus> {
        let bmsr_val = self.read(mdio, phy_reg::BMSR)?;
        let aux_val = self.read_raw(mdio, reg::AUX_CONSTAT)?;

        let speed = match aux_val & aux::SPEED {
            aux::GBIT => Speed::Mbps1000,
            aux::SPEED_100 => Speed::Mbps100,
            _ => Speed::Mbps10,
        };
        let duplex = if aux_val & aux::DUPLEX != 0 {
            Duplex::Full
        } else {
            Duplex::Half
        };

        Ok(LinkStatus::new(
            bmsr_val & bmsr::LINK_STATUS != 0,
            speed,
            duplex,
        ))
    }
}

// =============================================================================
// PhyDriver Implementation
// =============================================================================

impl<D: DelayNs> PhyDriver for Vsc82xx<D> {
    fn address(&self) -> u8 {
        self.config.address
    }

    fn phy_id(&self) -> u32 {
        self.phy_id
    }

    fn init<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        if !self.fixup_applied {
            self.apply_fixup(mdio)?;
        }
        self.config_init(mdio)?;
        self.last_link_up = false;
        Ok(())
    }

    /// Reset the PHY and re-arm interrupts if they were enabled
    ///
    /// The reset returns IMASK and the page register to their defaults, so
    /// the cached page is dropped and the interrupt mask written again.
    fn soft_reset<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        let bmcr_val = self.read(mdio, phy_reg::BMCR)?;
        self.write_raw(mdio, phy_reg::BMCR, bmcr_val | bmcr::RESET)?;
        self.page = None;
        self.wait_reset(mdio)?;

        if self.irq.enabled {
            #[cfg(feature = "defmt")]
            defmt::debug!("PHY {}: re-arming interrupts after reset", self.config.address);
            Vsc82xx::set_interrupts(self, mdio, true)?;
        }
        Ok(())
    }

    fn configure_link<M: MdioBus>(&mut self, mdio: &mut M, request: LinkRequest) -> Result<()> {
        Vsc82xx::configure_link(self, mdio, request)
    }

    fn read_status<M: MdioBus>(&mut self, mdio: &mut M) -> Result<LinkStatus> {
        self.ensure_page(mdio, Page::Main)?;
        ieee802_3::read_status(mdio, self.config.address)
    }

    fn poll_link<M: MdioBus>(&mut self, mdio: &mut M) -> Result<Option<LinkStatus>> {
        let status = self.read_status(mdio)?;

        if status.link_up && !self.last_link_up {
            // Link just came up
            self.last_link_up = true;
            #[cfg(feature = "defmt")]
            defmt::info!(
                "PHY {}: link up {} Mb/s {}",
                self.config.address,
                status.speed.mbps(),
                status.duplex
            );
            return Ok(Some(status));
        }

        if !status.link_up && self.last_link_up {
            // Link just went down
            self.last_link_up = false;
            #[cfg(feature = "defmt")]
            defmt::info!("PHY {}: link down", self.config.address);
        }

        Ok(None)
    }

    fn set_interrupts<M: MdioBus>(&mut self, mdio: &mut M, enabled: bool) -> Result<()> {
        Vsc82xx::set_interrupts(self, mdio, enabled)
    }

    fn acknowledge<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        Vsc82xx::acknowledge(self, mdio)
    }

    fn capabilities<M: MdioBus>(&mut self, mdio: &mut M) -> Result<Advertisement> {
        self.ensure_page(mdio, Page::Main)?;
        ieee802_3::read_capabilities(mdio, self.config.address)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
