use embassy_rp::gpio::Output;
use embassy_time::Instant;

use crate::led_controller::LedController;
use crate::led_state::SharedLedState;
use crate::CommandReceiver;

/// Runs on the high-priority interrupt executor.
#[embassy_executor::task]
pub async fn led_task(
    pin: Output<'static>,
    state: &'static SharedLedState,
    commands: CommandReceiver<'static>,
) -> ! {
    let mut controller = LedController::new(pin, state, commands, Instant::now());
    controller.run().await
}
