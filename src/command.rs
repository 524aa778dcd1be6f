use core::fmt;
use core::str::FromStr;

use serde::Serialize;

use crate::config::{FAST_BLINK_PERIOD, SLOW_BLINK_PERIOD};
use embassy_time::Duration;

/// A decoded serial command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "rp2040", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum Command {
    On,
    Off,
    SlowBlink,
    FastBlink,
}

/// A line that matches none of the known verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2040", derive(defmt::Format))]
pub struct UnknownCommand;

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown command")
    }
}

impl Command {
    /// Decodes a line with its terminator already stripped. Matching is
    /// exact and case-sensitive.
    pub fn from_line(line: &[u8]) -> Result<Self, UnknownCommand> {
        match line {
            b"on" => Ok(Command::On),
            b"off" => Ok(Command::Off),
            b"slow" => Ok(Command::SlowBlink),
            b"fast" => Ok(Command::FastBlink),
            _ => Err(UnknownCommand),
        }
    }

    /// Blink period selected by this command, if it starts blinking.
    pub fn blink_period(self) -> Option<Duration> {
        match self {
            Command::SlowBlink => Some(SLOW_BLINK_PERIOD),
            Command::FastBlink => Some(FAST_BLINK_PERIOD),
            Command::On | Command::Off => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Command::On => "on",
            Command::Off => "off",
            Command::SlowBlink => "slow",
            Command::FastBlink => "fast",
        }
    }
}

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::from_line(s.as_bytes())
    }
}
