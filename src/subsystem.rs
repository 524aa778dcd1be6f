use core::fmt;

use embassy_sync::channel::Channel;
use static_cell::StaticCell;

use crate::ingestion::IngestionStats;
use crate::led_state::{new_shared_state, SharedLedState};
use crate::log::*;
use crate::{CommandChannel, CommandReceiver, CommandSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2040", derive(defmt::Format))]
pub enum InitError {
    ChannelUnavailable,
    StateUnavailable,
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::ChannelUnavailable => write!(f, "command channel unavailable"),
            InitError::StateUnavailable => write!(f, "LED state unavailable"),
        }
    }
}

static COMMAND_CHANNEL: StaticCell<CommandChannel> = StaticCell::new();
static LED_STATE: StaticCell<SharedLedState> = StaticCell::new();
static INGESTION_STATS: IngestionStats = IngestionStats::new();

/// The long-lived objects both tasks share. Created once at startup.
#[derive(Clone, Copy)]
pub struct LedSubsystem {
    channel: &'static CommandChannel,
    state: &'static SharedLedState,
    stats: &'static IngestionStats,
}

impl LedSubsystem {
    pub fn init() -> Result<Self, InitError> {
        Self::init_from(&COMMAND_CHANNEL, &LED_STATE, &INGESTION_STATS)
    }

    /// Claims the channel and state cells. Fails, logging an error, if
    /// either has already been claimed; neither task should start then.
    pub fn init_from(
        channel: &'static StaticCell<CommandChannel>,
        state: &'static StaticCell<SharedLedState>,
        stats: &'static IngestionStats,
    ) -> Result<Self, InitError> {
        let Some(channel) = channel.try_init(Channel::new()) else {
            error!("Failed to create command channel");
            return Err(InitError::ChannelUnavailable);
        };
        let Some(state) = state.try_init(new_shared_state()) else {
            error!("Failed to create LED state lock");
            return Err(InitError::StateUnavailable);
        };
        info!("LED subsystem initialized");
        Ok(Self {
            channel,
            state,
            stats,
        })
    }

    pub fn sender(&self) -> CommandSender<'static> {
        self.channel.sender()
    }

    pub fn receiver(&self) -> CommandReceiver<'static> {
        self.channel.receiver()
    }

    pub fn state(&self) -> &'static SharedLedState {
        self.state
    }

    pub fn stats(&self) -> &'static IngestionStats {
        self.stats
    }
}
