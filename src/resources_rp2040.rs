use assign_resources::assign_resources;
use embassy_rp::peripherals;
use embassy_rp::Peri;

assign_resources! {
    led: LedResources {
        pin: PIN_25,
    },
    uart: UartResources {
        uart: UART0,
        rx: PIN_1,
    },
}
