//! Hardware Abstraction Layer
//!
//! The register transport the driver is written against.
//!
//! # Modules
//!
//! - [`mdio`]: MDIO/SMI bus trait for PHY communication
//!
//! # Delay Integration
//!
//! All types that poll with delays use `embedded_hal::delay::DelayNs` directly.
//! Pass any delay implementation from your HAL (e.g., `esp_hal::delay::Delay`).

pub mod mdio;

// Re-export commonly used types
pub use mdio::{MdioBus, read_phy_id};
