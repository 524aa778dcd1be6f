use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Duration;

use crate::command::Command;
use crate::config::SLOW_BLINK_PERIOD;

/// LED state shared between the control task and readers such as telemetry.
/// The blocking mutex only hands out the state inside a closure, so the lock
/// can never be held across an `.await`.
pub type SharedLedState = Mutex<CriticalSectionRawMutex, RefCell<LedState>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedState {
    pub is_blinking: bool,
    /// Level currently driven on the output pin.
    pub level: bool,
    pub delay: Duration,
    pub last_command: Command,
}

/// Externally visible mode of the LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedMode {
    Off,
    SteadyOn,
    Blinking(Duration),
}

impl LedState {
    pub const fn new() -> Self {
        Self {
            is_blinking: false,
            level: false,
            delay: SLOW_BLINK_PERIOD,
            last_command: Command::Off,
        }
    }

    /// Applies a command to the state. Returns the level to force onto the
    /// pin for `On`/`Off`; blink commands leave the level for the next toggle.
    pub fn apply(&mut self, command: Command) -> Option<bool> {
        self.last_command = command;
        match command {
            Command::On | Command::Off => {
                self.is_blinking = false;
                self.level = command == Command::On;
                Some(self.level)
            }
            Command::SlowBlink | Command::FastBlink => {
                self.is_blinking = true;
                if let Some(period) = command.blink_period() {
                    self.delay = period;
                }
                None
            }
        }
    }

    /// Flips the level while blinking and returns the blink period.
    pub fn toggle(&mut self) -> Option<Duration> {
        if !self.is_blinking {
            return None;
        }
        self.level = !self.level;
        Some(self.delay)
    }

    pub fn mode(&self) -> LedMode {
        if self.is_blinking {
            LedMode::Blinking(self.delay)
        } else if self.level {
            LedMode::SteadyOn
        } else {
            LedMode::Off
        }
    }
}

impl Default for LedState {
    fn default() -> Self {
        Self::new()
    }
}

impl LedMode {
    pub fn as_str(self) -> &'static str {
        match self {
            LedMode::Off => "off",
            LedMode::SteadyOn => "on",
            LedMode::Blinking(_) => "blinking",
        }
    }
}

pub const fn new_shared_state() -> SharedLedState {
    Mutex::new(RefCell::new(LedState::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FAST_BLINK_PERIOD;

    const ALL: [Command; 4] = [
        Command::On,
        Command::Off,
        Command::SlowBlink,
        Command::FastBlink,
    ];

    #[test]
    fn starts_off() {
        let state = LedState::new();
        assert_eq!(state.mode(), LedMode::Off);
        assert!(!state.level);
        assert_eq!(state.last_command, Command::Off);
    }

    #[test]
    fn on_and_off_force_the_level_and_stop_blinking() {
        let mut state = LedState::new();
        state.apply(Command::FastBlink);
        assert_eq!(state.apply(Command::On), Some(true));
        assert_eq!(state.mode(), LedMode::SteadyOn);
        assert_eq!(state.apply(Command::Off), Some(false));
        assert_eq!(state.mode(), LedMode::Off);
    }

    #[test]
    fn on_is_idempotent() {
        let mut state = LedState::new();
        state.apply(Command::On);
        state.apply(Command::On);
        assert!(state.level);
        assert!(!state.is_blinking);
        assert_eq!(state.toggle(), None);
        assert!(state.level);
    }

    #[test]
    fn blink_commands_keep_the_level_until_the_next_toggle() {
        let mut state = LedState::new();
        state.apply(Command::On);
        assert_eq!(state.apply(Command::SlowBlink), None);
        assert!(state.level);
        assert_eq!(state.toggle(), Some(SLOW_BLINK_PERIOD));
        assert!(!state.level);
    }

    #[test]
    fn reentering_blink_updates_the_delay_in_place() {
        let mut state = LedState::new();
        state.apply(Command::SlowBlink);
        state.toggle();
        let level = state.level;
        state.apply(Command::FastBlink);
        assert_eq!(state.mode(), LedMode::Blinking(FAST_BLINK_PERIOD));
        assert_eq!(state.level, level);
    }

    #[test]
    fn invariants_hold_across_command_sequences() {
        for first in ALL {
            for second in ALL {
                for third in ALL {
                    let mut state = LedState::new();
                    for command in [first, second, third] {
                        state.apply(command);
                        if command == Command::On || command == Command::Off {
                            assert!(!state.is_blinking);
                        }
                        if state.is_blinking {
                            assert!(
                                state.delay == SLOW_BLINK_PERIOD
                                    || state.delay == FAST_BLINK_PERIOD
                            );
                        }
                        let before = state.level;
                        let toggled = state.toggle();
                        assert_eq!(toggled.is_some(), state.is_blinking);
                        if toggled.is_none() {
                            assert_eq!(state.level, before);
                        }
                    }
                    assert_eq!(state.last_command, third);
                }
            }
        }
    }
}
