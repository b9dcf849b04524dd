//! Link configuration
//!
//! A link request either restarts auto-negotiation with a given
//! advertisement or forces speed and duplex. Forcing 10 or 100 Mb/s turns
//! off the PHY's own MDI/MDI-X resolution, so on parts that support it the
//! driver re-enables auto-crossover through three extended-page writes.

use embedded_hal::delay::DelayNs;

use crate::config::{Duplex, Speed};
use crate::error::{ConfigError, Result};
use crate::hal::mdio::MdioBus;
use crate::internal::phy_regs::vitesse::CROSSOVER_SEQUENCE;

use super::generic::{Advertisement, ieee802_3};
use super::page::Page;
use super::vsc82xx::Vsc82xx;

/// Requested link configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkRequest {
    /// Auto-negotiate instead of forcing `speed`/`duplex`
    pub autoneg: bool,
    /// Forced speed, ignored while auto-negotiating
    pub speed: Speed,
    /// Forced duplex, ignored while auto-negotiating
    pub duplex: Duplex,
    /// Abilities to advertise, ignored when forcing
    pub advertisement: Advertisement,
}

impl LinkRequest {
    /// Auto-negotiate, advertising everything
    pub const fn auto() -> Self {
        Self::advertise(Advertisement::all())
    }

    /// Auto-negotiate with a specific advertisement
    pub const fn advertise(advertisement: Advertisement) -> Self {
        Self {
            autoneg: true,
            speed: Speed::Mbps1000,
            duplex: Duplex::Full,
            advertisement,
        }
    }

    /// Force speed and duplex
    pub const fn forced(speed: Speed, duplex: Duplex) -> Self {
        Self {
            autoneg: false,
            speed,
            duplex,
            advertisement: Advertisement::all(),
        }
    }
}

impl Default for LinkRequest {
    fn default() -> Self {
        Self::auto()
    }
}

/// Link configuration currently applied to the PHY
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkMode {
    /// Auto-negotiation enabled with this advertisement
    AutoNegotiating(Advertisement),
    /// Auto-negotiation off
    Forced {
        /// Forced speed
        speed: Speed,
        /// Forced duplex
        duplex: Duplex,
    },
}

impl LinkMode {
    /// Whether auto-crossover can be enabled in this mode
    pub const fn allows_crossover(&self) -> bool {
        match self {
            LinkMode::Forced { speed, .. } => speed.allows_forced_crossover(),
            LinkMode::AutoNegotiating(_) => false,
        }
    }
}

impl<D: DelayNs> Vsc82xx<D> {
    /// Link mode last applied through [`configure_link`](Self::configure_link)
    pub fn link_mode(&self) -> LinkMode {
        self.mode
    }

    /// Apply a link configuration request
    ///
    /// Auto-negotiation writes the advertisement and restarts negotiation
    /// without waiting for it to finish. Forced mode writes BMCR and then,
    /// for 10/100 Mb/s on parts that support it, enables auto-crossover.
    ///
    /// # Errors
    ///
    /// Any bus or page-select error. A failed BMCR write returns at once and
    /// leaves the link mode unchanged. A failed crossover write stops the
    /// sequence; the main page is restored either way.
    pub fn configure_link<M: MdioBus>(&mut self, mdio: &mut M, request: LinkRequest) -> Result<()> {
        let addr = self.config.address;
        // Tuning writes on top of a configured link are refused from here on
        self.link_configured = true;

        if request.autoneg {
            #[cfg(feature = "defmt")]
            defmt::debug!("PHY {}: auto-negotiate {}", addr, request.advertisement);

            self.ensure_page(mdio, Page::Main)?;
            ieee802_3::write_advertisement(mdio, addr, &request.advertisement)?;
            ieee802_3::restart_auto_negotiation(mdio, addr)?;
            self.mode = LinkMode::AutoNegotiating(request.advertisement);
            return Ok(());
        }

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "PHY {}: forced {} Mb/s {}",
            addr,
            request.speed.mbps(),
            request.duplex
        );

        self.ensure_page(mdio, Page::Main)?;
        ieee802_3::force_link(mdio, addr, request.speed, request.duplex)?;
        self.mode = LinkMode::Forced {
            speed: request.speed,
            duplex: request.duplex,
        };

        if self.variant.forced_crossover && request.speed.allows_forced_crossover() {
            self.crossover_sequence(mdio)
        } else {
            Ok(())
        }
    }

    /// Re-enable auto MDI/MDI-X in forced 10/100 mode
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidModeCombination`] without any bus access if the
    /// PHY is not forced to 10 or 100 Mb/s or the part has no crossover
    /// sequence. Otherwise the first failed write, with the main page
    /// restored.
    pub fn enable_auto_crossover<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        if !self.variant.forced_crossover || !self.mode.allows_crossover() {
            return Err(ConfigError::InvalidModeCombination.into());
        }
        self.crossover_sequence(mdio)
    }

    fn crossover_sequence<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        let page = self.variant.crossover_page;
        self.with_page(mdio, page, |phy, mdio| {
            for (reg, value) in CROSSOVER_SEQUENCE {
                phy.write_raw(mdio, reg, value)?;
            }
            Ok(())
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
