//! Connection bookkeeping for sharing a board with peers. This module doesn't
//! know anything about the transport, it just tracks status and decides when
//! the host should try to connect again.

use crate::{config::GameConfig, notify::Subscribers};
use derive_more::Display;
use log::{info, warn};
use serde::Serialize;
use std::time::Duration;

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionStatus {
    NotConnected,
    Connecting,
    Connected,
}

/// Something the host needs to do on behalf of the [Reconnector]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReconnectAction {
    /// Open a new connection. `attempt` counts attempts since the last
    /// successful connection, starting at 1.
    Connect { attempt: u32 },
}

/// Tracks the status of one peer connection, and retries with a fixed delay
/// whenever the connection drops. Like [Clock](crate::Clock), this is driven
/// by the host reporting elapsed time.
///
/// The host calls [Reconnector::opened] and [Reconnector::closed] as its
/// transport reports those events. A close that wasn't requested via
/// [Reconnector::disconnect] (including a failed attempt) schedules a retry.
#[derive(Debug)]
pub struct Reconnector {
    delay: Duration,
    status: ConnectionStatus,
    /// Time left until the next retry, if one is scheduled
    retry_in: Option<Duration>,
    attempt: u32,
    subscribers: Subscribers<ConnectionStatus>,
}

impl Reconnector {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            status: ConnectionStatus::NotConnected,
            retry_in: None,
            attempt: 0,
            subscribers: Subscribers::new(),
        }
    }

    /// Create a reconnector that waits the game's configured reconnect delay
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.reconnect_delay())
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Time until the next scheduled retry, if any
    pub fn retry_in(&self) -> Option<Duration> {
        self.retry_in
    }

    /// Subscribers to status changes
    pub fn subscribers(&self) -> &Subscribers<ConnectionStatus> {
        &self.subscribers
    }

    fn set_status(&mut self, status: ConnectionStatus) {
        if self.status != status {
            self.status = status;
            self.subscribers.notify(&status);
        }
    }

    /// Start connecting right away. Cancels any scheduled retry. Returns
    /// `None` if already connecting or connected.
    pub fn connect(&mut self) -> Option<ReconnectAction> {
        if self.status != ConnectionStatus::NotConnected {
            return None;
        }
        self.retry_in = None;
        self.attempt = 1;
        self.set_status(ConnectionStatus::Connecting);
        Some(ReconnectAction::Connect {
            attempt: self.attempt,
        })
    }

    /// The transport finished opening
    pub fn opened(&mut self) {
        if self.status == ConnectionStatus::Connected {
            return;
        }
        info!("Connected after {} attempt(s)", self.attempt);
        self.attempt = 0;
        self.retry_in = None;
        self.set_status(ConnectionStatus::Connected);
    }

    /// The transport closed, or an attempt failed. Schedules a retry.
    pub fn closed(&mut self) {
        if self.status == ConnectionStatus::NotConnected {
            return;
        }
        warn!(
            "Connection lost, retrying in {} ms",
            self.delay.as_millis()
        );
        self.retry_in = Some(self.delay);
        self.set_status(ConnectionStatus::NotConnected);
    }

    /// Close on purpose. No retry will be scheduled.
    pub fn disconnect(&mut self) {
        self.retry_in = None;
        self.attempt = 0;
        self.set_status(ConnectionStatus::NotConnected);
    }

    /// Let time pass. If a scheduled retry came due, returns the action for
    /// the host to carry out.
    pub fn advance(&mut self, elapsed: Duration) -> Option<ReconnectAction> {
        let remaining = self.retry_in?;
        if elapsed < remaining {
            self.retry_in = Some(remaining - elapsed);
            return None;
        }
        self.retry_in = None;
        self.attempt += 1;
        self.set_status(ConnectionStatus::Connecting);
        Some(ReconnectAction::Connect {
            attempt: self.attempt,
        })
    }
}
