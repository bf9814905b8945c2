use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Configuration that defines a game session: the shape of the board and how
/// fast the simulation runs. The board shape can never change after the game
/// is created.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GameConfig {
    /// Number of hex rows on the board
    #[validate(range(min = 1, max = 1000))]
    pub rows: usize,

    /// Number of hex columns on the board
    #[validate(range(min = 1, max = 1000))]
    pub cols: usize,

    /// Time between two simulation ticks while the game is running, in
    /// milliseconds
    #[validate(range(min = 1))]
    pub tick_interval_ms: u64,

    /// Delay before trying to re-open a dropped peer connection, in
    /// milliseconds. See [Reconnector](crate::Reconnector).
    #[validate(range(min = 1))]
    pub reconnect_delay_ms: u64,
}

impl GameConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 50,
            cols: 50,
            tick_interval_ms: 500,
            reconnect_delay_ms: 5000,
        }
    }
}
