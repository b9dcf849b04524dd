//! PHY Register Definitions
//!
//! Register maps for PHY devices accessed via MDIO.
//!
//! # Module Organization
//!
//! - [`standard`] - IEEE 802.3 Clause 22 standard PHY registers (0-15)
//! - [`vitesse`] - Vitesse vendor registers and extended page codes

pub mod standard;
pub mod vitesse;
