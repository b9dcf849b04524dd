//! Centralized Constants
//!
//! Single source of truth for timing defaults used by the bounded
//! busy-wait handshakes.
//!
//! # Note
//!
//! Register addresses and bit definitions live in `internal::phy_regs`, next
//! to the register maps they belong to.

// =============================================================================
// Page Select
// =============================================================================

/// Maximum reads of the page-select status before giving up
pub const PAGE_POLL_ATTEMPTS: u32 = 32;

/// Delay between page-select status reads (microseconds)
pub const PAGE_POLL_INTERVAL_US: u32 = 1_000;

// =============================================================================
// Vendor Command Register
// =============================================================================

/// Maximum reads of a vendor command register (VSC8574 18G)
pub const COMMAND_POLL_ATTEMPTS: u32 = 10;

/// Delay between command register reads (microseconds)
///
/// Datasheet says 25 ms; measured parts need more.
pub const COMMAND_POLL_INTERVAL_US: u32 = 40_000;

// =============================================================================
// Soft Reset
// =============================================================================

/// Maximum reads of BMCR while waiting for the reset bit to self-clear
pub const RESET_POLL_ATTEMPTS: u32 = 500;

/// Delay between BMCR reads during reset (microseconds)
pub const RESET_POLL_INTERVAL_US: u32 = 1_000;
