use embassy_time::{Instant, Timer};
use embedded_hal::digital::{OutputPin, PinState};

use crate::command::Command;
use crate::config::IDLE_PERIOD;
use crate::led_state::SharedLedState;
use crate::log::*;
use crate::schedule::PeriodicSchedule;
use crate::CommandReceiver;

/// Applies queued commands to the shared LED state and drives the pin.
pub struct LedController<'a, P: OutputPin> {
    pin: P,
    state: &'a SharedLedState,
    commands: CommandReceiver<'a>,
    schedule: PeriodicSchedule,
}

impl<'a, P: OutputPin> LedController<'a, P> {
    /// Drives the pin low and starts the wake-up schedule at `start`.
    pub fn new(
        mut pin: P,
        state: &'a SharedLedState,
        commands: CommandReceiver<'a>,
        start: Instant,
    ) -> Self {
        if pin.set_low().is_err() {
            warn!("Failed to drive LED pin low");
        }
        Self {
            pin,
            state,
            commands,
            schedule: PeriodicSchedule::starting_at(start),
        }
    }

    pub async fn run(&mut self) -> ! {
        info!("Starting LED control");
        loop {
            let deadline = self.step();
            Timer::at(deadline).await;
        }
    }

    /// One loop iteration without the sleep: applies at most one queued
    /// command, toggles the pin if blinking, and returns the next deadline.
    pub fn step(&mut self) -> Instant {
        if let Ok(command) = self.commands.try_receive() {
            self.apply(command);
        }

        let pin = &mut self.pin;
        let blink_period = self.state.lock(|state| {
            let mut state = state.borrow_mut();
            let period = state.toggle()?;
            drive(pin, state.level);
            Some(period)
        });

        self.schedule.advance(blink_period.unwrap_or(IDLE_PERIOD))
    }

    pub fn apply(&mut self, command: Command) {
        let pin = &mut self.pin;
        self.state.lock(|state| {
            if let Some(level) = state.borrow_mut().apply(command) {
                drive(pin, level);
            }
        });

        match command {
            Command::On => info!("LED on"),
            Command::Off => info!("LED off"),
            Command::SlowBlink => info!("LED slow blink"),
            Command::FastBlink => info!("LED fast blink"),
        }
    }

    #[cfg(test)]
    fn pin(&self) -> &P {
        &self.pin
    }

    #[cfg(test)]
    fn last_wake(&self) -> Instant {
        self.schedule.last_wake()
    }
}

fn drive<P: OutputPin>(pin: &mut P, level: bool) {
    if pin.set_state(PinState::from(level)).is_err() {
        warn!("Failed to drive LED pin");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FAST_BLINK_PERIOD, SLOW_BLINK_PERIOD};
    use crate::led_state::{new_shared_state, LedMode, LedState};
    use crate::CommandChannel;
    use core::convert::Infallible;
    use embassy_time::Duration;
    use embedded_hal::digital::ErrorType;
    use std::vec::Vec;

    #[derive(Default)]
    struct RecordingPin {
        writes: Vec<bool>,
    }

    impl ErrorType for RecordingPin {
        type Error = Infallible;
    }

    impl OutputPin for RecordingPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.writes.push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.writes.push(true);
            Ok(())
        }
    }

    const START: Instant = Instant::from_ticks(0);

    fn snapshot(state: &SharedLedState) -> LedState {
        state.lock(|s| *s.borrow())
    }

    #[test]
    fn starts_low_and_idles_at_the_poll_period() {
        let channel = CommandChannel::new();
        let state = new_shared_state();
        let mut controller =
            LedController::new(RecordingPin::default(), &state, channel.receiver(), START);

        assert_eq!(controller.pin().writes, [false]);
        assert_eq!(controller.step(), START + IDLE_PERIOD);
        assert_eq!(controller.step(), START + IDLE_PERIOD + IDLE_PERIOD);
        assert_eq!(controller.pin().writes, [false]);
        assert_eq!(snapshot(&state).mode(), LedMode::Off);
    }

    #[test]
    fn on_twice_drives_high_without_toggling() {
        let channel = CommandChannel::new();
        let state = new_shared_state();
        let mut controller =
            LedController::new(RecordingPin::default(), &state, channel.receiver(), START);

        channel.try_send(Command::On).unwrap();
        channel.try_send(Command::On).unwrap();
        controller.step();
        controller.step();
        controller.step();

        let state = snapshot(&state);
        assert!(state.level);
        assert!(!state.is_blinking);
        assert_eq!(controller.pin().writes, [false, true, true]);
    }

    #[test]
    fn slow_blink_toggles_once_per_second() {
        let channel = CommandChannel::new();
        let state = new_shared_state();
        let mut controller =
            LedController::new(RecordingPin::default(), &state, channel.receiver(), START);

        channel.try_send(Command::SlowBlink).unwrap();
        assert_eq!(controller.step(), START + SLOW_BLINK_PERIOD);
        assert_eq!(controller.step(), START + SLOW_BLINK_PERIOD * 2);
        assert_eq!(controller.step(), START + SLOW_BLINK_PERIOD * 3);
        assert_eq!(controller.pin().writes, [false, true, false, true]);
    }

    #[test]
    fn commands_apply_one_per_iteration_in_fifo_order() {
        let channel = CommandChannel::new();
        let state = new_shared_state();
        let mut controller =
            LedController::new(RecordingPin::default(), &state, channel.receiver(), START);

        channel.try_send(Command::FastBlink).unwrap();
        channel.try_send(Command::Off).unwrap();

        assert_eq!(controller.step(), START + FAST_BLINK_PERIOD);
        assert!(snapshot(&state).is_blinking);

        assert_eq!(controller.step(), START + FAST_BLINK_PERIOD + IDLE_PERIOD);
        let after = snapshot(&state);
        assert_eq!(after.mode(), LedMode::Off);
        assert_eq!(after.last_command, Command::Off);
        assert_eq!(controller.pin().writes, [false, true, false]);
    }

    #[test]
    fn switching_blink_rate_changes_the_next_period_only() {
        let channel = CommandChannel::new();
        let state = new_shared_state();
        let mut controller =
            LedController::new(RecordingPin::default(), &state, channel.receiver(), START);

        channel.try_send(Command::SlowBlink).unwrap();
        controller.step();
        channel.try_send(Command::FastBlink).unwrap();
        let deadline = controller.step();

        assert_eq!(deadline, START + SLOW_BLINK_PERIOD + FAST_BLINK_PERIOD);
        assert_eq!(
            snapshot(&state).mode(),
            LedMode::Blinking(FAST_BLINK_PERIOD)
        );
    }

    #[test]
    fn slow_blink_deadlines_do_not_drift() {
        let channel = CommandChannel::new();
        let state = new_shared_state();
        let mut controller =
            LedController::new(RecordingPin::default(), &state, channel.receiver(), START);

        channel.try_send(Command::SlowBlink).unwrap();
        let periods = 1_000u32;
        for _ in 0..periods {
            controller.step();
        }

        let expected = START + SLOW_BLINK_PERIOD * periods;
        let error = expected.as_ticks().abs_diff(controller.last_wake().as_ticks());
        assert!(error <= 1, "accumulated {} ticks of drift", error);
    }

    #[test]
    fn sleeping_to_each_deadline_keeps_wall_clock_period() {
        use embassy_futures::block_on;

        let channel = CommandChannel::new();
        let state = new_shared_state();
        let start = Instant::now();
        let mut controller =
            LedController::new(RecordingPin::default(), &state, channel.receiver(), start);
        channel.try_send(Command::FastBlink).unwrap();

        block_on(async {
            for _ in 0..6 {
                let deadline = controller.step();
                Timer::at(deadline).await;
            }
        });

        let elapsed = start.elapsed();
        assert!(elapsed >= FAST_BLINK_PERIOD * 6);
        assert!(elapsed < FAST_BLINK_PERIOD * 6 + Duration::from_millis(500));
        assert_eq!(controller.pin().writes.len(), 1 + 6);
    }
}
