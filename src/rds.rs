//! RDS Sideband Decoding
//!
//! The Si4703 delivers one RDS group at a time in RDSA..RDSD. Groups carry
//! independent fragments of the station name (type 0), radio text (type 2)
//! and clock time (type 4A); the decoder reassembles them into fixed buffers.
//!
//! Decoding is pure: [`RdsDecoder::ingest`] takes a [`SidebandGroup`] built
//! from the register shadow, so everything here runs on the host.

pub mod clock;
pub mod decoder;
pub mod group;
pub mod text;

pub use clock::{ClockTime, Date};
pub use decoder::{RdsDecoder, RdsUpdate};
pub use group::{GroupVersion, SidebandGroup};
pub use text::TextBuffer;
