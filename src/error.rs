//! Error types for the VSC82xx PHY driver
//!
//! Errors are organized by domain for better diagnostics:
//! - [`BusError`]: MDIO transport failures reported by the [`MdioBus`] backend
//! - [`TimeoutKind`]: bounded busy-wait handshakes that never completed
//! - [`FixupFailure`]: best-effort revision fixups with one or more failed writes
//! - [`ConfigError`]: invalid requests and driver configuration problems
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by most driver methods.
//!
//! [`MdioBus`]: crate::hal::mdio::MdioBus

use crate::phy::page::Page;

// =============================================================================
// Bus Errors
// =============================================================================

/// MDIO transport errors
///
/// Returned by [`MdioBus`](crate::hal::mdio::MdioBus) implementations. A bus
/// error is always fatal to the operation that issued the access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// No PHY answered at the addressed slot
    NoResponse,
    /// The MDIO controller stayed busy
    Timeout,
    /// PHY address out of range (must be 0-31)
    InvalidPhyAddress,
    /// Register address out of range (must be 0-31)
    InvalidRegister,
    /// Backend-specific failure
    Other,
}

impl core::fmt::Display for BusError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BusError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            BusError::NoResponse => "no response from PHY",
            BusError::Timeout => "MDIO controller timeout",
            BusError::InvalidPhyAddress => "invalid PHY address",
            BusError::InvalidRegister => "invalid register address",
            BusError::Other => "MDIO transport error",
        }
    }
}

// =============================================================================
// Handshake Timeouts
// =============================================================================

/// Which bounded handshake gave up
///
/// After a [`TimeoutKind::PageSelect`] the driver's current page is
/// indeterminate until the next successful page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeoutKind {
    /// Page-select confirmation never arrived
    PageSelect,
    /// A vendor command register stayed busy
    Command,
    /// BMCR reset bit did not self-clear
    SoftReset,
}

impl core::fmt::Display for TimeoutKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TimeoutKind {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            TimeoutKind::PageSelect => "page select not confirmed",
            TimeoutKind::Command => "command register stayed busy",
            TimeoutKind::SoftReset => "soft reset did not complete",
        }
    }
}

// =============================================================================
// Fixup Failures
// =============================================================================

/// Why a single fixup step failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepError {
    /// The register write (or its page switch) hit a bus error
    Bus(BusError),
    /// The page switch for this step was not confirmed
    Timeout(TimeoutKind),
}

/// One failed step of a fixup sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FailedStep {
    /// Index of the step within the whole fixup run
    pub index: u16,
    /// Page the step targeted
    pub page: Page,
    /// Register number within the page
    pub reg: u8,
    /// Value that should have been written
    pub value: u16,
    /// What went wrong
    pub cause: StepError,
}

/// Outcome of a fixup run in which at least one write failed
///
/// The sequence kept going after each failure, so the device may be left
/// partially tuned. It is never safe to assume nothing was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FixupFailure {
    /// Number of failed steps
    pub failed: u16,
    /// First failure encountered
    pub first: FailedStep,
    /// Last failure encountered (equal to `first` when `failed == 1`)
    pub last: FailedStep,
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration and request validation errors
///
/// These fail fast, before any register is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Auto-crossover requested outside forced 10/100 operation
    InvalidModeCombination,
    /// The PHY identifier matches no known variant
    UnknownDevice,
    /// Two table entries match the same identifier with equal specificity
    AmbiguousFixupTable,
    /// Fixups were already applied to this device
    AlreadyInitialized,
    /// Fixups requested after the link was configured
    FixupAfterLinkConfig,
    /// Invalid PHY address (must be 0-31)
    InvalidPhyAddress,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::InvalidModeCombination => "invalid link mode combination",
            ConfigError::UnknownDevice => "unknown PHY identifier",
            ConfigError::AmbiguousFixupTable => "ambiguous fixup table",
            ConfigError::AlreadyInitialized => "already initialized",
            ConfigError::FixupAfterLinkConfig => "fixup after link configuration",
            ConfigError::InvalidPhyAddress => "invalid PHY address",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match result {
///     Err(Error::Bus(BusError::NoResponse)) => { /* ... */ }
///     Err(Error::Timeout(TimeoutKind::PageSelect)) => { /* reselect page */ }
///     Err(Error::PartialFixup(f)) => { /* f.first, f.failed */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// MDIO transport error
    Bus(BusError),
    /// Bounded handshake timed out
    Timeout(TimeoutKind),
    /// Revision fixup completed with failures
    PartialFixup(FixupFailure),
    /// Configuration error
    Config(ConfigError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "bus: {}", e.as_str()),
            Error::Timeout(e) => write!(f, "timeout: {}", e.as_str()),
            Error::PartialFixup(e) => write!(
                f,
                "fixup: {} write(s) failed, first at step {} (reg {} on page {:#06x})",
                e.failed,
                e.first.index,
                e.first.reg,
                e.first.page.code()
            ),
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
        }
    }
}

// From impls for automatic conversion
impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Error::Bus(e)
    }
}

impl From<TimeoutKind> for Error {
    fn from(e: TimeoutKind) -> Self {
        Error::Timeout(e)
    }
}

impl From<FixupFailure> for Error {
    fn from(e: FixupFailure) -> Self {
        Error::PartialFixup(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl StepError {
    /// Map a driver error from a page switch or write onto a step cause
    ///
    /// Only bus and timeout errors can come out of a single register step.
    pub(crate) const fn from_error(err: Error) -> Self {
        match err {
            Error::Timeout(t) => StepError::Timeout(t),
            Error::Bus(b) => StepError::Bus(b),
            Error::PartialFixup(_) | Error::Config(_) => StepError::Bus(BusError::Other),
        }
    }
}

/// Result type alias for driver operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for raw MDIO transport operations
pub type BusResult<T> = core::result::Result<T, BusError>;

/// Result type alias for configuration validation
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

// =============================================================================
// Unit Tests
// =============================================================================
