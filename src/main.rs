//! FM Receiver Main Application
//!
//! Entry point for the STM32G474 board with an Si4703 tuner, SSD1306 OLED,
//! preset encoder and four front-panel buttons.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{Input, Level, Output, OutputOpenDrain, Pull, Speed};
use embassy_stm32::i2c::I2c;
use embassy_stm32::time::Hertz;
use embassy_stm32::{bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use si4703_radio::app::RadioApp;
use si4703_radio::bus::BitBangBus;
use si4703_radio::device::Si4703;
use si4703_radio::drivers::display::Display;
use si4703_radio::drivers::encoder::EncoderInput;
use si4703_radio::hal::gpio::{Button, StatusLed};
use si4703_radio::hal::i2c::{I2cAddress, I2cBus};
use si4703_radio::input::{Debouncer, InputEvent, SelectedIndex};
use si4703_radio::power::PowerSequencer;
use si4703_radio::prelude::*;
use si4703_radio::ui::Screen;

bind_interrupts!(struct Irqs {
    I2C1_EV => embassy_stm32::i2c::EventInterruptHandler<peripherals::I2C1>;
    I2C1_ER => embassy_stm32::i2c::ErrorInterruptHandler<peripherals::I2C1>;
});

/// Preset index written by the encoder task, read by the polling loop
static SELECTED: SelectedIndex = SelectedIndex::new(DEFAULT_PRESET, PRESETS.len());

/// Button events waiting for the polling loop
static EVENTS: Channel<CriticalSectionRawMutex, InputEvent, 8> = Channel::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("FM Receiver Firmware v{}", env!("CARGO_PKG_VERSION"));

    let p = embassy_stm32::init(embassy_stm32::Config::default());

    info!(
        "Si4703 on RST {} SCLK {} SDIO {}, display on SCL {} SDA {}",
        pins::SI4703_RST,
        pins::SI4703_SCLK,
        pins::SI4703_SDIO,
        pins::I2C1_SCL,
        pins::I2C1_SDA
    );

    // pins::LED_STATUS
    let led = StatusLed::new(Output::new(p.PA5, Level::Low, Speed::Low));

    // Reset selects two-wire mode; it needs SDIO before the bus owns it
    let mut rst = Output::new(p.PB4, Level::High, Speed::Low);
    let mut sdio = OutputOpenDrain::new(p.PB9, Level::High, Speed::Low);
    let sclk = OutputOpenDrain::new(p.PB8, Level::High, Speed::Low);

    let config = RadioConfig::new();
    let mut sequencer = PowerSequencer::new(config);
    if sequencer.reset(&mut rst, &mut sdio, &mut Delay).is_err() {
        warn!("Si4703 reset failed");
    }

    let bus = BitBangBus::new(sclk, sdio, Delay);
    let mut radio = Si4703::with_sequencer(bus, Delay, sequencer);
    radio.setup();

    if radio.is_present() {
        info!(
            "Si4703 PN {} MFG 0x{:04X} firmware {}",
            radio.part_number(),
            radio.manufacturer_id(),
            radio.firmware_version()
        );
    } else {
        warn!("Si4703 not responding");
    }
    radio.set_volume(DEFAULT_VOLUME.level());

    // OLED on hardware I2C1: pins::I2C1_SCL, pins::I2C1_SDA
    let i2c = I2c::new(
        p.I2C1,
        p.PB6,
        p.PB7,
        Irqs,
        p.DMA1_CH1,
        p.DMA1_CH2,
        Hertz(I2C_FREQUENCY_HZ),
        Default::default(),
    );
    let mut i2c = I2cBus::new(i2c);
    let found = i2c.scan().await;
    if !found.contains(&I2cAddress::SSD1306) {
        warn!("display not found, devices: {}", found.as_slice());
    }
    let mut display = Display::from_bus(i2c);
    if display.init().await.is_err() {
        warn!("display init failed");
    }

    info!(
        "encoder on {}/{}, buttons {} {} {} {}",
        pins::ENCODER_A,
        pins::ENCODER_B,
        pins::VOL_UP,
        pins::VOL_DOWN,
        pins::SEEK_UP,
        pins::SEEK_DOWN
    );
    let encoder = EncoderInput::new(
        ExtiInput::new(p.PA0, p.EXTI0, Pull::Up),
        Input::new(p.PA1, Pull::Up),
    );
    let buttons = [
        (Button::new(Input::new(p.PC0, Pull::Up)), InputEvent::VolumeUp),
        (Button::new(Input::new(p.PC1, Pull::Up)), InputEvent::VolumeDown),
        (Button::new(Input::new(p.PC2, Pull::Up)), InputEvent::SeekUp),
        (Button::new(Input::new(p.PC3, Pull::Up)), InputEvent::SeekDown),
    ];

    spawner.spawn(heartbeat_task(led)).unwrap();
    spawner.spawn(encoder_task(encoder)).unwrap();
    spawner.spawn(button_task(buttons)).unwrap();

    info!("Tasks spawned, entering polling loop");

    let mut app = RadioApp::new(&SELECTED);
    let mut screen = Screen::new();
    let mut ticker = Ticker::every(Duration::from_millis(POLL_PERIOD_MS));
    loop {
        let events = core::iter::from_fn(|| EVENTS.try_receive().ok());
        app.poll(&mut radio, &SELECTED, events, &mut screen);

        if display.show(&mut screen).await.is_err() {
            warn!("display write failed");
        }
        ticker.next().await;
    }
}

/// Heartbeat task - blinks LED to show system is running
#[embassy_executor::task]
async fn heartbeat_task(mut led: StatusLed<'static>) {
    loop {
        led.on();
        Timer::after(Duration::from_millis(100)).await;
        led.off();
        Timer::after(Duration::from_millis(900)).await;
    }
}

/// Encoder task - tracks phase edges and publishes the preset index
#[embassy_executor::task]
async fn encoder_task(mut encoder: EncoderInput<'static>) {
    encoder.run(&SELECTED).await
}

/// Button task - samples the front panel and queues debounced presses
#[embassy_executor::task]
async fn button_task(mut buttons: [(Button<'static>, InputEvent); 4]) {
    let period = BUTTON_DEBOUNCE_MS / u32::from(Debouncer::THRESHOLD);
    let mut ticker = Ticker::every(Duration::from_millis(u64::from(period)));
    loop {
        for (button, event) in &mut buttons {
            if button.update() && EVENTS.try_send(*event).is_err() {
                warn!("input queue full, dropped {}", event);
            }
        }
        ticker.next().await;
    }
}
