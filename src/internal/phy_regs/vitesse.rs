//! Vitesse VSC82xx/VSC85xx vendor register definitions
//!
//! Registers 16-31 on the main page plus the handful of extended-page
//! registers the driver touches. Extended registers are written as
//! `(page, reg)`; the page-select register itself is visible on every page.

#![allow(dead_code)]

/// Main-page vendor register addresses
pub mod reg {
    /// Extended PHY control 1 (RGMII skew)
    pub const EXT_CON1: u8 = 0x17;
    /// Interrupt mask
    pub const IMASK: u8 = 0x19;
    /// Interrupt status (clear on read)
    pub const ISTAT: u8 = 0x1A;
    /// Auxiliary control and status
    pub const AUX_CONSTAT: u8 = 0x1C;
    /// LED mode select
    pub const LED_MODE: u8 = 0x1D;
    /// LED behavior
    pub const LED_BEHAVIOR: u8 = 0x1E;
    /// Extended page access; present at this address on every page
    pub const EXT_PAGE_ACCESS: u8 = 0x1F;
}

/// Extended-page register numbers used by the crossover and token-ring writes
pub mod ext {
    /// Extended register 16 (16E, 16G, ...)
    pub const REG_16: u8 = 0x10;
    /// Extended register 17
    pub const REG_17: u8 = 0x11;
    /// Extended register 18; the 18G command register on the general page
    pub const REG_18: u8 = 0x12;
}

/// Page codes written to [`reg::EXT_PAGE_ACCESS`]
pub mod page {
    /// Standard registers
    pub const MAIN: u16 = 0x0000;
    /// Extended page 1
    pub const EXT_1: u16 = 0x0001;
    /// Extended page 2
    pub const EXT_2: u16 = 0x0002;
    /// Extended page 3
    pub const EXT_3: u16 = 0x0003;
    /// MACsec page
    pub const MACSEC: u16 = 0x0004;
    /// General purpose page
    pub const GENERAL: u16 = 0x0010;
    /// 1588 timestamping page
    pub const PTP_1588: u16 = 0x1588;
    /// Test page
    pub const TEST: u16 = 0x2A30;
    /// Extended 2DAF page
    pub const EXT_2DAF: u16 = 0x2DAF;
    /// Token ring page
    pub const TOKEN_RING: u16 = 0x52B5;
}

/// Busy flag in the page-access and 18G command registers
pub const BUSY: u16 = 1 << 15;

/// Extended control 1 (0x17) skew fields
pub mod ext_con1 {
    /// TX skew field
    pub const TX_SKEW_MASK: u16 = 0x0C00;
    /// RX skew field
    pub const RX_SKEW_MASK: u16 = 0x0300;
    /// TX skew 2 ns
    pub const TX_SKEW: u16 = 0x0800;
    /// RX skew 2 ns
    pub const RX_SKEW: u16 = 0x0200;
}

/// Interrupt mask (0x19) bits
pub mod imask {
    /// Interrupt enable
    pub const IEN: u16 = 1 << 15;
    /// Speed change
    pub const SPEED: u16 = 1 << 14;
    /// Link state change
    pub const LINK: u16 = 1 << 13;
    /// Duplex change
    pub const DUPLEX: u16 = 1 << 12;
    /// Mask used by the VSC8234/8244/8514/8574
    pub const WIDE: u16 = IEN | SPEED | LINK | DUPLEX;
    /// Mask used by the remaining parts
    pub const NARROW: u16 = IEN | LINK;
}

/// Interrupt status (0x1A) bits
pub mod istat {
    /// Interrupt pending
    pub const STATUS: u16 = 1 << 15;
    /// Speed changed
    pub const SPEED: u16 = 1 << 14;
    /// Link changed
    pub const LINK: u16 = 1 << 13;
    /// Duplex changed
    pub const DUPLEX: u16 = 1 << 12;
}

/// Auxiliary control/status (0x1C) bits
pub mod aux {
    /// Full duplex
    pub const DUPLEX: u16 = 0x0020;
    /// Speed field
    pub const SPEED: u16 = 0x0018;
    /// Speed field value for 1000 Mb/s
    pub const GBIT: u16 = 0x0010;
    /// Speed field value for 100 Mb/s
    pub const SPEED_100: u16 = 0x0008;
    /// Reserved bit the VSC8221/8211 want set at init
    pub const VSC8221_INIT: u16 = 0x0004;
}

/// VSC8574 SGMII bring-up values
pub mod sgmii {
    /// 18G command: configure all four ports for SGMII (busy bit set)
    pub const CMD_ALL_PORTS_SGMII: u16 = 0x80F0;
    /// BMCR: reset, autoneg enable, 1000 full
    pub const BMCR_RESET_AN_1000FD: u16 = 0x9140;
    /// 16E3: enable MAC-side SGMII autonegotiation
    pub const MAC_AN_ENABLE: u16 = 0x0180;
    /// BMCR: autoneg enable, 1000 full
    pub const BMCR_AN_1000FD: u16 = 0x1140;
}

/// Auto MDI/MDI-X enable values for forced 10/100, written 18E, 17E, 16E
pub const CROSSOVER_SEQUENCE: [(u8, u16); 3] = [
    (ext::REG_18, 0x0012),
    (ext::REG_17, 0x2803),
    (ext::REG_16, 0x87FA),
];
