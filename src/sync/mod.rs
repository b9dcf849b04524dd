//! Synchronization and Concurrency Support
//!
//! This module provides ISR-safe wrappers for sharing a PHY session between
//! thread-mode code and the PHY interrupt handler:
//!
//! - **Primitives** (`primitives`): Low-level synchronization types
//!   - [`CriticalSectionCell`] - ISR-safe interior mutability
//!
//! - **Shared Wrappers** (`shared`): ISR-safe PHY wrappers
//!   - [`SharedPhy`] - critical-section protected session plus MDIO bus
//!
//! Page selection is per-device state: a paged register sequence run from
//! thread mode must not be interleaved with one run from the interrupt
//! handler. Holding both behind one lock keeps them serialized.
//!
//! # Feature Flags
//!
//! - `critical-section`: Enables this module
//!
//! # Example
//!
//! ```ignore
//! use vsc82xx_phy::sync::SharedPhy;
//!
//! static PHY: SharedPhy<Smi, Delay> = SharedPhy::new();
//!
//! #[interrupt]
//! fn PHY_IRQ() {
//!     if let Some(Ok(link)) = PHY.on_interrupt() {
//!         // reprogram the MAC
//!     }
//! }
//! ```

mod primitives;

pub use primitives::CriticalSectionCell;

mod shared;

pub use shared::{PhyDevice, SharedPhy};
