#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{self, BufferedInterruptHandler, BufferedUartRx};
use led_controller::config::DEFAULT_BAUD_RATE;
use led_controller::inputs::{ingestion_task, UartTransport};
use led_controller::outputs::led_task;
use led_controller::telemetry::telemetry_task;
use led_controller::{split_resources, AssignedResources, LedResources, LedSubsystem, UartResources};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    let r = split_resources!(p);

    info!("Starting LED controller {}", led_controller::VERSION);

    let subsystem = match LedSubsystem::init() {
        Ok(subsystem) => subsystem,
        Err(e) => {
            error!("LED control not started: {}", e);
            return;
        }
    };

    let mut config = uart::Config::default();
    config.baudrate = DEFAULT_BAUD_RATE;
    static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
    let rx = BufferedUartRx::new(
        r.uart.uart,
        Irqs,
        r.uart.rx,
        RX_BUF.init([0; 256]),
        config,
    );
    info!("UART initialized at {} baud", DEFAULT_BAUD_RATE);

    let led = Output::new(r.led.pin, Level::Low);

    // LED timing preempts command parsing.
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    high_spawner.spawn(unwrap!(led_task(
        led,
        subsystem.state(),
        subsystem.receiver()
    )));

    spawner.spawn(unwrap!(ingestion_task(
        UartTransport::new(rx),
        subsystem.sender(),
        subsystem.stats()
    )));
    spawner.spawn(unwrap!(telemetry_task(subsystem)));
}
