//! Radio Control Logic
//!
//! Band plan arithmetic, cached receiver state and the tune/seek state machine.
//! The mapper and state are pure; only the tune controller touches the bus.

pub mod frequency;
pub mod state;
pub mod tune;

pub use frequency::FrequencyMapper;
pub use state::DeviceState;
pub use tune::{TuneController, TuneOutcome, TunePhase, TuneProgress, TuneRequest, TuneStatus};
