//! Vitesse Ethernet PHY Driver
//!
//! The driver is split along the PHY's own structure:
//!
//! - [`page`]: extended page selection with bounded confirmation polling
//! - [`fixup`]: revision-specific register write sequences, run once
//! - [`link`]: auto-negotiation and forced mode, plus forced-mode
//!   auto-crossover
//! - [`interrupt`]: interrupt mask and acknowledge
//! - [`variant`]: supported parts and identifier matching
//! - [`generic`]: the [`PhyDriver`] trait and IEEE 802.3 helpers
//!
//! All of it hangs off one session type, [`Vsc82xx`], which is what a MAC
//! driver holds on to.
//!
//! # Example
//!
//! ```ignore
//! use vsc82xx_phy::phy::{LinkRequest, PhyDriver, Vsc82xx};
//!
//! let mut phy = Vsc82xx::probe(&mut mdio, PhyConfig::new(), delay)?;
//! phy.init(&mut mdio)?;
//! phy.configure_link(&mut mdio, LinkRequest::auto())?;
//!
//! // Poll for link status
//! loop {
//!     if let Some(link) = phy.poll_link(&mut mdio)? {
//!         mac.set_speed(link.speed);
//!         mac.set_duplex(link.duplex);
//!         break;
//!     }
//! }
//! ```

pub mod fixup;
pub mod generic;
pub mod interrupt;
pub mod link;
pub mod page;
pub mod variant;
pub mod vsc82xx;

pub use fixup::{BUILTIN_FIXUPS, FixupEntry, FixupSequence, FixupTable, RegWrite};
pub use generic::{Advertisement, LinkStatus, PhyDriver};
pub use interrupt::{InterruptState, InterruptStatus};
pub use link::{LinkMode, LinkRequest};
pub use page::{Handshake, Page};
pub use variant::{DeviceId, InitKind, VARIANTS, Variant, identify};
pub use vsc82xx::Vsc82xx;
