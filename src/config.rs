//! Compile-time tunables for the LED subsystem.

use embassy_time::Duration;

/// Commands that can wait between ingestion and the LED task.
pub const COMMAND_QUEUE_DEPTH: usize = 10;

/// Size of the ingestion line buffer. A line overflows once it holds
/// `LINE_CAPACITY - 1` bytes without a terminator.
pub const LINE_CAPACITY: usize = 64;

pub const SERIAL_READ_TIMEOUT: Duration = Duration::from_millis(100);
pub const COMMAND_SEND_TIMEOUT: Duration = Duration::from_millis(100);

/// Poll period of the LED task while not blinking.
pub const IDLE_PERIOD: Duration = Duration::from_millis(100);

pub const SLOW_BLINK_PERIOD: Duration = Duration::from_millis(1000);
pub const FAST_BLINK_PERIOD: Duration = Duration::from_millis(100);

pub const TELEMETRY_PERIOD: Duration = Duration::from_secs(10);

/// 8 data bits, no parity, 1 stop bit.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;
