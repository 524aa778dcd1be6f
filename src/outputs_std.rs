use core::convert::Infallible;

use embassy_time::Instant;
use embedded_hal::digital::{ErrorType, OutputPin};

use crate::led_controller::LedController;
use crate::led_state::SharedLedState;
use crate::log::*;
use crate::CommandReceiver;

/// Stand-in for the LED GPIO on the host: logs each level change.
#[derive(Debug, Default)]
pub struct SimulatedLed;

impl ErrorType for SimulatedLed {
    type Error = Infallible;
}

impl OutputPin for SimulatedLed {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        info!("LED OFF");
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        info!("LED ON");
        Ok(())
    }
}

#[embassy_executor::task]
pub async fn led_task(
    pin: SimulatedLed,
    state: &'static SharedLedState,
    commands: CommandReceiver<'static>,
) -> ! {
    let mut controller = LedController::new(pin, state, commands, Instant::now());
    controller.run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_led_accepts_every_level() {
        let mut led = SimulatedLed;
        assert!(led.set_high().is_ok());
        assert!(led.set_low().is_ok());
        assert!(led.set_state(embedded_hal::digital::PinState::High).is_ok());
    }
}
