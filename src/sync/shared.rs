//! ISR-safe PHY wrapper using critical sections.
//!
//! Provides [`SharedPhy`], which owns a probed driver session together with
//! its MDIO bus so that thread-mode code and the PHY interrupt handler can
//! both run register sequences without interleaving.

use embedded_hal::delay::DelayNs;

use super::primitives::CriticalSectionCell;
use crate::error::Result;
use crate::hal::mdio::MdioBus;
use crate::phy::{LinkStatus, PhyDriver, Vsc82xx};

/// A driver session and the bus it talks over
pub struct PhyDevice<M, D: DelayNs> {
    /// Driver session
    pub phy: Vsc82xx<D>,
    /// MDIO bus the PHY sits on
    pub mdio: M,
}

/// ISR-safe PHY wrapper using critical sections.
///
/// Starts empty so it can live in a `static`; the session is installed after
/// probing. All access goes through `critical_section::with()`, disabling
/// interrupts for the whole closure, so a multi-register sequence is never
/// split by the interrupt handler.
///
/// # Example
///
/// ```ignore
/// static PHY: SharedPhy<Smi, Delay> = SharedPhy::new();
///
/// let mut phy = Vsc82xx::probe(&mut smi, PhyConfig::new(), delay)?;
/// phy.init(&mut smi)?;
/// PHY.install(phy, smi);
///
/// PHY.with(|phy, mdio| phy.set_interrupts(mdio, true));
///
/// #[interrupt]
/// fn GPIO_PHY_IRQ() {
///     if let Some(Ok(status)) = PHY.on_interrupt() {
///         // update the MAC speed/duplex
///     }
/// }
/// ```
pub struct SharedPhy<M, D: DelayNs> {
    inner: CriticalSectionCell<Option<PhyDevice<M, D>>>,
}

impl<M: MdioBus, D: DelayNs> SharedPhy<M, D> {
    /// Create an empty wrapper (const, suitable for static initialization).
    pub const fn new() -> Self {
        Self {
            inner: CriticalSectionCell::new(None),
        }
    }

    /// Install a session, returning the one it replaces
    pub fn install(&self, phy: Vsc82xx<D>, mdio: M) -> Option<PhyDevice<M, D>> {
        self.inner
            .with(|slot| slot.replace(PhyDevice { phy, mdio }))
    }

    /// Remove the session
    pub fn take(&self) -> Option<PhyDevice<M, D>> {
        self.inner.with(Option::take)
    }

    /// Whether a session is installed
    pub fn is_installed(&self) -> bool {
        self.inner.with(|slot| slot.is_some())
    }

    /// Execute a closure with exclusive access to the session and its bus.
    ///
    /// Returns `None` if nothing is installed.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut Vsc82xx<D>, &mut M) -> R,
    {
        self.inner
            .with(|slot| slot.as_mut().map(|dev| f(&mut dev.phy, &mut dev.mdio)))
    }

    /// Try to execute a closure, returning `None` if already borrowed or
    /// nothing is installed.
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut Vsc82xx<D>, &mut M) -> R,
    {
        self.inner
            .try_with(|slot| slot.as_mut().map(|dev| f(&mut dev.phy, &mut dev.mdio)))
            .flatten()
    }

    /// Interrupt service: acknowledge, then read the link status
    ///
    /// Returns `None` if the wrapper is empty or already in use.
    pub fn on_interrupt(&self) -> Option<Result<LinkStatus>> {
        self.try_with(|phy, mdio| phy.handle_interrupt(mdio))
    }
}

impl<M: MdioBus, D: DelayNs> Default for SharedPhy<M, D> {
    fn default() -> Self {
        Self::new()
    }
}
