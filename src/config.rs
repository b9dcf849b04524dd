//! Driver configuration types
//!
//! Link parameters, the MAC-side interface mode, and the timing of the
//! bounded busy-wait handshakes.

use crate::constants::{
    COMMAND_POLL_ATTEMPTS, COMMAND_POLL_INTERVAL_US, PAGE_POLL_ATTEMPTS, PAGE_POLL_INTERVAL_US,
    RESET_POLL_ATTEMPTS, RESET_POLL_INTERVAL_US,
};

/// Ethernet link speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    /// 10 Mbps
    Mbps10,
    /// 100 Mbps
    Mbps100,
    /// 1000 Mbps
    #[default]
    Mbps1000,
}

impl Speed {
    /// Speed in Mb/s
    pub const fn mbps(self) -> u16 {
        match self {
            Speed::Mbps10 => 10,
            Speed::Mbps100 => 100,
            Speed::Mbps1000 => 1000,
        }
    }

    /// Whether this speed is within the auto MDI/MDI-X forced-mode window
    pub const fn allows_forced_crossover(self) -> bool {
        self.mbps() <= 100
    }
}

/// Ethernet duplex mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Duplex {
    /// Half duplex
    Half,
    /// Full duplex
    #[default]
    Full,
}

/// MAC-side interface between the PHY and the host controller
///
/// Only affects the variant-specific init routine: RGMII with internal
/// delay enables the skew bits on VSC824x parts, SGMII runs the VSC8574
/// startup sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhyInterface {
    /// Media Independent Interface
    Mii,
    /// Gigabit Media Independent Interface
    Gmii,
    /// Reduced Gigabit MII, delays on the board
    #[default]
    Rgmii,
    /// Reduced Gigabit MII, RX/TX delays inserted by the PHY
    RgmiiId,
    /// Serial Gigabit MII
    Sgmii,
}

/// Bounded polling parameters for a busy-wait handshake
///
/// The status register is read at most `attempts` times with `interval_us`
/// between reads, so the worst-case wait is roughly
/// `attempts * interval_us` plus bus time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollConfig {
    /// Maximum number of status reads (at least one is always issued)
    pub attempts: u32,
    /// Delay between reads in microseconds
    pub interval_us: u32,
}

impl PollConfig {
    /// Create a polling configuration
    pub const fn new(attempts: u32, interval_us: u32) -> Self {
        Self {
            attempts,
            interval_us,
        }
    }

    /// Default page-select confirmation timing
    pub const fn page_select() -> Self {
        Self::new(PAGE_POLL_ATTEMPTS, PAGE_POLL_INTERVAL_US)
    }

    /// Default vendor command-register timing
    pub const fn command() -> Self {
        Self::new(COMMAND_POLL_ATTEMPTS, COMMAND_POLL_INTERVAL_US)
    }

    /// Default BMCR soft-reset timing
    pub const fn soft_reset() -> Self {
        Self::new(RESET_POLL_ATTEMPTS, RESET_POLL_INTERVAL_US)
    }

    /// Upper bound on the time spent sleeping, in microseconds
    pub const fn budget_us(&self) -> u64 {
        self.attempts as u64 * self.interval_us as u64
    }
}

/// Complete PHY driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhyConfig {
    /// PHY address on the MDIO bus (0-31)
    pub address: u8,
    /// MAC-side interface
    pub interface: PhyInterface,
    /// Page-select handshake timing
    pub page_poll: PollConfig,
    /// Vendor command-register timing (VSC8574 SGMII setup)
    pub command_poll: PollConfig,
    /// BMCR soft-reset timing
    pub reset_poll: PollConfig,
}

impl Default for PhyConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PhyConfig {
    /// Create a new configuration with defaults (address 0, RGMII)
    #[must_use]
    pub const fn new() -> Self {
        Self {
            address: 0,
            interface: PhyInterface::Rgmii,
            page_poll: PollConfig::page_select(),
            command_poll: PollConfig::command(),
            reset_poll: PollConfig::soft_reset(),
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    /// Set the PHY address
    #[must_use]
    pub const fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Set the MAC-side interface
    #[must_use]
    pub const fn with_interface(mut self, interface: PhyInterface) -> Self {
        self.interface = interface;
        self
    }

    /// Set the page-select handshake timing
    #[must_use]
    pub const fn with_page_poll(mut self, poll: PollConfig) -> Self {
        self.page_poll = poll;
        self
    }

    /// Set the command-register handshake timing
    #[must_use]
    pub const fn with_command_poll(mut self, poll: PollConfig) -> Self {
        self.command_poll = poll;
        self
    }

    /// Set the soft-reset handshake timing
    #[must_use]
    pub const fn with_reset_poll(mut self, poll: PollConfig) -> Self {
        self.reset_poll = poll;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_ordering_and_crossover_window() {
        assert!(Speed::Mbps10 < Speed::Mbps100);
        assert!(Speed::Mbps100 < Speed::Mbps1000);
        assert!(Speed::Mbps10.allows_forced_crossover());
        assert!(Speed::Mbps100.allows_forced_crossover());
        assert!(!Speed::Mbps1000.allows_forced_crossover());
    }

    #[test]
    fn builder_overrides_defaults() {
        let config = PhyConfig::new()
            .with_address(3)
            .with_interface(PhyInterface::Sgmii)
            .with_page_poll(PollConfig::new(4, 10));

        assert_eq!(config.address, 3);
        assert_eq!(config.interface, PhyInterface::Sgmii);
        assert_eq!(config.page_poll, PollConfig::new(4, 10));
        assert_eq!(config.command_poll, PollConfig::command());
    }

    #[test]
    fn poll_budget() {
        assert_eq!(PollConfig::new(10, 40_000).budget_us(), 400_000);
        assert!(PollConfig::page_select().attempts > 0);
    }
}
