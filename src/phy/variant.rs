//! Supported parts and identifier matching
//!
//! Every supported PHY is described by a [`Variant`]: its identifier/mask
//! pair plus the few behaviors that differ between parts. The same
//! [`DeviceId`] matching rule drives the fixup table, so both tables resolve
//! overlaps the same way: the entry whose mask has the most bits set wins.

use super::page::{Handshake, Page};

// =============================================================================
// Identifier Matching
// =============================================================================

/// Identifier pattern with a mask of significant bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceId {
    /// Identifier bits to compare
    pub id: u32,
    /// Which bits of `id` are significant
    pub mask: u32,
}

impl DeviceId {
    /// Create an identifier pattern
    pub const fn new(id: u32, mask: u32) -> Self {
        Self { id, mask }
    }

    /// Whether a PHY reporting `phy_id` matches this pattern
    pub const fn matches(&self, phy_id: u32) -> bool {
        (phy_id & self.mask) == (self.id & self.mask)
    }

    /// Number of significant bits; higher is more specific
    pub const fn specificity(&self) -> u32 {
        self.mask.count_ones()
    }

    /// Whether some identifier matches both patterns
    pub const fn overlaps(&self, other: &DeviceId) -> bool {
        let common = self.mask & other.mask;
        (self.id & common) == (other.id & common)
    }
}

/// Check that no two patterns overlap with equal specificity
///
/// Such a pair would make lookup depend on table order.
pub(crate) const fn is_unambiguous(ids: &[DeviceId]) -> bool {
    let mut i = 0;
    while i < ids.len() {
        let mut j = i + 1;
        while j < ids.len() {
            if ids[i].specificity() == ids[j].specificity() && ids[i].overlaps(&ids[j]) {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

// =============================================================================
// Variants
// =============================================================================

/// Interface setup run once after the fixups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitKind {
    /// VSC824x style: RGMII RX/TX skew when the PHY inserts the delays
    RgmiiSkew,
    /// VSC8574: SGMII MAC interface bring-up through the 18G command
    Sgmii,
    /// VSC8221/VSC8211: auxiliary control register init
    AuxControl,
}

/// A supported PHY part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Variant {
    /// Part name
    pub name: &'static str,
    /// Declared identifier and mask
    pub device: DeviceId,
    /// Init routine
    pub init: InitKind,
    /// Whether forced 10/100 operation runs the auto-crossover sequence
    pub forced_crossover: bool,
    /// How a page switch is confirmed
    pub page_handshake: Handshake,
    /// Page holding the crossover registers 16E-18E
    pub crossover_page: Page,
}

impl Variant {
    const fn vsc82x4(name: &'static str, id: u32, mask: u32, init: InitKind) -> Self {
        Self {
            name,
            device: DeviceId::new(id, mask),
            init,
            forced_crossover: true,
            page_handshake: Handshake::PAGE_BUSY_BIT,
            crossover_page: Page::TokenRing,
        }
    }

    const fn vsc8221(name: &'static str, id: u32) -> Self {
        Self {
            name,
            device: DeviceId::new(id, 0x000F_FFF0),
            init: InitKind::AuxControl,
            forced_crossover: false,
            page_handshake: Handshake::PAGE_BUSY_BIT,
            crossover_page: Page::TokenRing,
        }
    }

    /// Declared identifier
    pub const fn id(&self) -> u32 {
        self.device.id
    }
}

/// VSC8234 quad gigabit
pub const VSC8234: Variant = Variant::vsc82x4("VSC8234", 0x000F_C620, 0x000F_FFF0, InitKind::RgmiiSkew);
/// VSC8244 quad gigabit (covers the whole revision range)
pub const VSC8244: Variant = Variant::vsc82x4("VSC8244", 0x000F_C6C0, 0x000F_FFC0, InitKind::RgmiiSkew);
/// VSC8514 quad gigabit QSGMII
pub const VSC8514: Variant = Variant::vsc82x4("VSC8514", 0x0007_0670, 0x000F_FFF0, InitKind::RgmiiSkew);
/// VSC8574 quad gigabit with SGMII startup and a settled-value page handshake
pub const VSC8574: Variant = Variant {
    page_handshake: Handshake::PAGE_SETTLED,
    ..Variant::vsc82x4("VSC8574", 0x0007_04A0, 0x000F_FFF0, InitKind::Sgmii)
};
/// VSC8662 dual gigabit
pub const VSC8662: Variant = Variant::vsc82x4("VSC8662", 0x0007_0660, 0x000F_FFF0, InitKind::RgmiiSkew);
/// VSC8221 single gigabit
pub const VSC8221: Variant = Variant::vsc8221("VSC8221", 0x000F_C550);
/// VSC8211 single gigabit
pub const VSC8211: Variant = Variant::vsc8221("VSC8211", 0x000F_C4B0);

const VARIANT_LIST: [Variant; 7] = [
    VSC8234, VSC8244, VSC8514, VSC8574, VSC8662, VSC8221, VSC8211,
];

/// All supported parts
pub static VARIANTS: [Variant; 7] = VARIANT_LIST;

const fn variant_ids() -> [DeviceId; 7] {
    let mut ids = [DeviceId::new(0, 0); 7];
    let mut i = 0;
    while i < ids.len() {
        ids[i] = VARIANT_LIST[i].device;
        i += 1;
    }
    ids
}

const _: () = assert!(is_unambiguous(&variant_ids()), "overlapping PHY variants");

/// Find the variant matching a PHY identifier
///
/// When several variants match, the one with the narrowest mask wins.
pub fn identify(phy_id: u32) -> Option<&'static Variant> {
    VARIANTS
        .iter()
        .filter(|v| v.device.matches(phy_id))
        .max_by_key(|v| v.device.specificity())
}

// =============================================================================
// Unit Tests
// =============================================================================
