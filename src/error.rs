//! Crate-wide error type
//!
//! Bus-level failures are normally absorbed by the device facade (the chip
//! may simply be absent); this type covers the cases a caller must see.

use crate::bus::BusError;

/// Errors returned by the receiver API
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// A tune or seek is already in flight
    Busy,
    /// A GPIO line could not be driven
    Pin,
    /// A two-wire transaction was not acknowledged
    Bus(BusError),
}

impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Error::Bus(e)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Busy => f.write_str("tune or seek already in progress"),
            Self::Pin => f.write_str("GPIO error"),
            Self::Bus(e) => write!(f, "bus error: {e}"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Busy => defmt::write!(f, "Busy"),
            Self::Pin => defmt::write!(f, "Pin"),
            Self::Bus(e) => defmt::write!(f, "Bus({})", e),
        }
    }
}

/// Result alias for receiver operations
pub type Result<T> = core::result::Result<T, Error>;
