//! Peripheral Drivers
//!
//! Board-level drivers built on the HAL layer: the SSD1306 OLED and the
//! rotary encoder interrupt task.

pub mod display;
pub mod encoder;
