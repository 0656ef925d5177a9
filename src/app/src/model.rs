use serde::{Deserialize, Serialize};

use crate::types::*;

/// Consecutive failed polls before the view reports `Disconnected`
pub const DISCONNECT_THRESHOLD: u32 = 3;

/// Upper bound on ticks skipped between retries while the device is failing
pub const MAX_BACKOFF_TICKS: u32 = 8;

/// Application Model - the complete client state
///
/// The device owns the authoritative machine state. The model only keeps the
/// last status that was successfully applied plus the bookkeeping the poller
/// needs to order responses and pace retries.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Model {
    /// Last-known-good snapshot, `None` until the first successful poll
    pub status: Option<MachineStatus>,

    // Poller state
    /// Sequence number handed to the most recently issued poll
    pub last_issued_seq: u64,
    /// Sequence number of the newest response applied to `status`
    pub last_applied_seq: u64,
    pub polls_in_flight: u32,
    pub consecutive_failures: u32,
    /// Ticks left to skip before the next scheduled poll
    pub backoff_ticks: u32,

    // UI state
    pub error_message: Option<String>,
}

impl Model {
    /// Allocate the sequence number for a new status request and mark it in flight
    pub fn begin_poll(&mut self) -> u64 {
        self.last_issued_seq += 1;
        self.polls_in_flight += 1;
        self.last_issued_seq
    }

    /// Mark one outstanding status request as returned
    pub fn finish_poll(&mut self) {
        self.polls_in_flight = self.polls_in_flight.saturating_sub(1);
    }

    /// Whether a response with `seq` is older than what is already displayed
    pub fn is_stale(&self, seq: u64) -> bool {
        seq <= self.last_applied_seq
    }

    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
        self.backoff_ticks = 0;
    }

    pub fn record_failure(&mut self) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.backoff_ticks = backoff_ticks(self.consecutive_failures);
    }

    pub fn connection(&self) -> ConnectionState {
        if self.consecutive_failures >= DISCONNECT_THRESHOLD {
            ConnectionState::Disconnected
        } else if self.last_applied_seq == 0 {
            ConnectionState::Connecting
        } else {
            ConnectionState::Connected
        }
    }

    /// Set an error message
    pub fn set_error(&mut self, error: String) {
        self.error_message = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }
}

/// Ticks to skip after `failures` consecutive failed polls
///
/// Doubles with every failure (0, 1, 3, 7, ...) and is capped at
/// [`MAX_BACKOFF_TICKS`].
pub fn backoff_ticks(failures: u32) -> u32 {
    if failures == 0 {
        return 0;
    }

    let exponent = (failures - 1).min(31);
    (1u32 << exponent)
        .saturating_sub(1)
        .min(MAX_BACKOFF_TICKS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        let schedule: Vec<u32> = (0..=6).map(backoff_ticks).collect();
        assert_eq!(schedule, vec![0, 0, 1, 3, 7, 8, 8]);
        assert_eq!(backoff_ticks(u32::MAX), MAX_BACKOFF_TICKS);
    }

    #[test]
    fn connection_reports_disconnected_at_threshold() {
        let mut model = Model::default();
        assert_eq!(model.connection(), ConnectionState::Connecting);

        for _ in 0..DISCONNECT_THRESHOLD - 1 {
            model.record_failure();
        }
        assert_eq!(model.connection(), ConnectionState::Connecting);

        model.record_failure();
        assert_eq!(model.connection(), ConnectionState::Disconnected);

        model.last_applied_seq = 4;
        model.record_success();
        assert_eq!(model.connection(), ConnectionState::Connected);
    }

    #[test]
    fn sequence_numbers_increase() {
        let mut model = Model::default();
        let first = model.begin_poll();
        let second = model.begin_poll();

        assert!(second > first);
        assert_eq!(model.polls_in_flight, 2);

        model.finish_poll();
        model.finish_poll();
        model.finish_poll();
        assert_eq!(model.polls_in_flight, 0);
    }
}
