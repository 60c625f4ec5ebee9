//! Sensing node firmware: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                       Adapters (outer ring)                      │
//! │                                                                  │
//! │  UartSerial        OneshotChannel    GpioInput/GpioOutput        │
//! │  (SerialChannel)   (AnalogInput)     (embedded-hal digital)      │
//! │  HwTimer (PeriodicTimer)             FreeRtos (DelayNs)          │
//! │                                                                  │
//! │  ──────────────────── Port Trait Boundary ─────────────────────  │
//! │                                                                  │
//! │  uart-rx task      : CommandEngine · ButtonHandler               │
//! │  esp_timer task    : SamplingPipeline ×2 (distance, light)       │
//! │  main task         : ControlLoop (timer reconcile, run LED)      │
//! │                                                                  │
//! │             all share one SharedConfig (critical section)        │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use log::{error, info};

use sensenode::adapters::analog::OneshotChannel;
use sensenode::adapters::gpio::{GpioInput, GpioOutput};
use sensenode::adapters::uart::UartSerial;
use sensenode::app::control::{ControlLoop, VERSION, send_banner};
use sensenode::app::pipeline::SamplingPipeline;
use sensenode::app::ports::NoIndicator;
use sensenode::config::{AcquisitionConfig, NodeConfig, SharedConfig};
use sensenode::drivers::button::ButtonHandler;
use sensenode::drivers::hw_init;
use sensenode::drivers::hw_timer::HwTimer;
use sensenode::pins;
use sensenode::protocol::engine::CommandEngine;
use sensenode::sensors::{DISTANCE, LIGHT};

/// Acquisition state shared by every execution context.
static CONFIG: SharedConfig = SharedConfig::new(AcquisitionConfig::DEFAULT);

/// How long the receive task waits for a byte before checking the button.
const RX_POLL_MS: u32 = 20;
const RX_STACK_BYTES: usize = 6 * 1024;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    info!("Sensing node v{}", VERSION);

    let node = NodeConfig::default();

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals(node.baud_rate) {
        // No UART, no ADC: nothing useful left to do.  The task watchdog
        // resets the chip after its timeout.
        error!("HAL init failed: {}, halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    if let Err(e) = hw_init::init_isr_service() {
        error!("ISR service init failed: {}, continuing without button", e);
    }

    let serial = UartSerial::new(pins::UART_PORT);
    let mut out = serial;
    send_banner(&mut out);

    // ── 3. Sampling pipelines, one per timer ──────────────────
    let mut distance = SamplingPipeline::new(
        &DISTANCE,
        OneshotChannel::new(pins::DISTANCE_ADC_UNIT, pins::DISTANCE_ADC_CHANNEL, DISTANCE.adc_bits),
        GpioOutput::new(pins::ACTIVITY_LED_GPIO),
        node.adc_poll_limit,
    );
    let mut distance_out = serial;
    let distance_timer = HwTimer::new(c"distance", move || {
        // Faults are already reported on the link.
        let _ = distance.on_timer_event(&CONFIG, &mut distance_out);
    })?;

    let mut light = SamplingPipeline::new(
        &LIGHT,
        OneshotChannel::new(pins::LIGHT_ADC_UNIT, pins::LIGHT_ADC_CHANNEL, LIGHT.adc_bits),
        NoIndicator,
        node.adc_poll_limit,
    );
    let mut light_out = serial;
    let light_timer = HwTimer::new(c"light", move || {
        let _ = light.on_timer_event(&CONFIG, &mut light_out);
    })?;

    // ── 4. Command receive task ───────────────────────────────
    std::thread::Builder::new()
        .name("uart-rx".into())
        .stack_size(RX_STACK_BYTES)
        .spawn(move || receive_task(serial))?;

    // ── 5. Control loop ───────────────────────────────────────
    let mut control = ControlLoop::new(
        &CONFIG.snapshot(),
        distance_timer,
        light_timer,
        GpioOutput::new(pins::RUN_LED_GPIO),
        FreeRtos,
        node,
    );

    info!("System ready. Entering control loop.");
    control.run(&CONFIG, &mut out)
}

/// Feed received bytes to the command engine and drain button edges.
fn receive_task(serial: UartSerial) {
    let mut engine = CommandEngine::new();
    let mut button = ButtonHandler::new(GpioInput::new(pins::BUTTON_GPIO));
    let mut out = serial;

    loop {
        if let Some(byte) = serial.read_byte(RX_POLL_MS) {
            engine.feed(byte, &CONFIG, &mut out);
        }
        button.poll(&CONFIG, &mut out);
    }
}
