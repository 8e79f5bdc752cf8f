//! Rotary Encoder Driver
//!
//! Phase A sits on an EXTI line. Every edge wakes [`EncoderInput::run`], which
//! samples both phases and hands them to an [`EncoderTracker`]. The tracker
//! state never leaves this task; the polling loop only sees the
//! [`SelectedIndex`] it publishes to.

use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::Input;

use crate::input::{EncoderTracker, SelectedIndex};

/// Encoder wired to one EXTI input (phase A) and one plain input (phase B)
pub struct EncoderInput<'d> {
    a: ExtiInput<'d>,
    b: Input<'d>,
    tracker: EncoderTracker,
}

impl<'d> EncoderInput<'d> {
    /// Create from the two phase pins
    #[must_use]
    pub fn new(a: ExtiInput<'d>, b: Input<'d>) -> Self {
        let tracker = EncoderTracker::new(a.is_high());
        Self { a, b, tracker }
    }

    /// Wait for the next pin change and process it
    pub async fn next(&mut self, selected: &SelectedIndex) {
        self.a.wait_for_any_edge().await;
        if let Some(direction) = self
            .tracker
            .on_pin_change(self.a.is_high(), self.b.is_high(), selected)
        {
            trace!("encoder {} -> preset {}", direction, selected.load());
        }
    }

    /// Process edges forever
    pub async fn run(&mut self, selected: &SelectedIndex) -> ! {
        loop {
            self.next(selected).await;
        }
    }
}
