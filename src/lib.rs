//! Vitesse VSC82xx/VSC85xx PHY Driver
//!
//! A `no_std`, `no_alloc` driver for the Vitesse (Microsemi) family of
//! Ethernet PHYs, written against an abstract MDIO bus.
//!
//! # Architecture
//!
//! Everything hangs off one driver session, [`Vsc82xx`], created by probing
//! a bus address:
//!
//! 1. **Page Selector** ([`phy::page`]): switches the PHY's banked register
//!    space and confirms each switch with a bounded busy-wait
//! 2. **Revision Fixups** ([`phy::fixup`]): silicon errata write sequences,
//!    matched by masked identifier and run once per session
//! 3. **Link Configuration** ([`phy::link`]): auto-negotiation, forced
//!    speed/duplex, and forced-mode auto-crossover
//! 4. **Interrupt Mask** ([`phy::interrupt`]): per-variant interrupt mask
//!    plus status acknowledge
//!
//! The bus itself is the [`MdioBus`] trait in [`hal`]; implement it for your
//! MAC's SMI controller.
//!
//! # Supported PHY Chips
//!
//! - VSC8234, VSC8244, VSC8514, VSC8574 (quad port)
//! - VSC8662 (dual port)
//! - VSC8221, VSC8211 (single port)
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting and driver logging
//! - `critical-section`: Enable the ISR-safe [`sync::SharedPhy`] wrapper
//!
//! # Example
//!
//! ```ignore
//! use vsc82xx_phy::{LinkRequest, PhyConfig, PhyDriver, PhyInterface, Vsc82xx};
//!
//! let config = PhyConfig::new()
//!     .with_address(1)
//!     .with_interface(PhyInterface::RgmiiId);
//!
//! let mut phy = Vsc82xx::probe(&mut mdio, config, delay)?;
//! phy.init(&mut mdio)?;
//! phy.configure_link(&mut mdio, LinkRequest::auto())?;
//! phy.set_interrupts(&mut mdio, true)?;
//!
//! if let Some(link) = phy.poll_link(&mut mdio)? {
//!     mac.set_speed(link.speed);
//!     mac.set_duplex(link.duplex);
//! }
//! ```

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here; thresholds and config are in Cargo.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]

// =============================================================================
// Modules
// =============================================================================

pub mod config;
pub mod constants;
pub mod error;
pub mod hal;
pub mod phy;

// Internal implementation details (pub(crate) only)
mod internal;

#[cfg(feature = "critical-section")]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// Test utilities (only available during testing)
#[cfg(test)]
mod test_utils;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{Duplex, PhyConfig, PhyInterface, PollConfig, Speed};
pub use error::{
    BusError, BusResult, ConfigError, ConfigResult, Error, FailedStep, FixupFailure, Result,
    StepError, TimeoutKind,
};
pub use hal::mdio::MdioBus;

// Re-export PHY types
pub use phy::{
    Advertisement, FixupTable, InterruptStatus, LinkMode, LinkRequest, LinkStatus, Page,
    PhyDriver, Variant, Vsc82xx,
};

// Re-export sync types when critical-section is enabled
#[cfg(feature = "critical-section")]
pub use sync::SharedPhy;
