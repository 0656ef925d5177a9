//! Device state store
//!
//! The brewer owns the authoritative machine state: power flag, selected
//! brew profile and remaining countdown. Every mutation runs inside a single
//! critical section so concurrent handlers and the countdown task never see
//! a half-applied change.

use crate::{config::BrewerConfig, heater::Heater};
use anyhow::{Context, Result, anyhow, ensure};
use log::{debug, error, info};
#[cfg(feature = "mock")]
use mockall::automock;
use smarter_coffee_core::{MachineStatus, ModeValue};
use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use trait_variant::make;

/// Raw machine state, reset on every power cycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BrewerState {
    pub is_on: bool,
    pub mode: usize,
    /// Seconds left in the running brew, 0 while off
    pub remaining: u32,
}

impl From<BrewerState> for MachineStatus {
    fn from(state: BrewerState) -> Self {
        MachineStatus {
            remaining: state.remaining,
            mode: ModeValue::Index(state.mode as u32),
            is_on: state.is_on,
        }
    }
}

/// Operations exposed to the HTTP endpoints
#[make(Send)]
#[cfg_attr(feature = "mock", automock)]
pub trait BrewerDevice {
    async fn status(&self) -> Result<MachineStatus>;
    async fn toggle(&self) -> Result<()>;
    async fn next_mode(&self) -> Result<()>;
    fn profiles(&self) -> Vec<u32>;
}

#[derive(Clone)]
pub struct Brewer {
    state: Arc<Mutex<BrewerState>>,
    profiles: Arc<[u32]>,
    heater: Arc<dyn Heater>,
}

impl Brewer {
    pub fn new(config: &BrewerConfig, heater: impl Heater + 'static) -> Result<Self> {
        ensure!(
            !config.profiles.is_empty(),
            "failed to create brewer: no brew profiles configured"
        );
        ensure!(
            config.profiles.iter().all(|minutes| *minutes > 0),
            "failed to create brewer: brew profiles must be longer than 0 minutes"
        );

        Ok(Brewer {
            state: Arc::new(Mutex::new(BrewerState::default())),
            profiles: config.profiles.clone().into(),
            heater: Arc::new(heater),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, BrewerState>> {
        self.state
            .lock()
            .map_err(|_| anyhow!("failed to lock brewer state: lock poisoned"))
    }

    fn brew_secs(&self, mode: usize) -> u32 {
        self.profiles[mode].saturating_mul(60)
    }

    pub fn snapshot(&self) -> Result<BrewerState> {
        Ok(*self.lock()?)
    }

    /// Flip the power state
    ///
    /// Switching on starts a brew with the selected profile; switching off
    /// aborts a running brew. State is untouched if the heater refuses.
    pub fn power_toggle(&self) -> Result<BrewerState> {
        let mut state = self.lock()?;
        let turn_on = !state.is_on;

        self.heater
            .set_power(turn_on)
            .with_context(|| format!("failed to switch heater {}", on_off(turn_on)))?;

        state.is_on = turn_on;
        state.remaining = if turn_on {
            self.brew_secs(state.mode)
        } else {
            0
        };

        info!(
            "machine {} (mode {}, {}s)",
            on_off(turn_on),
            state.mode,
            state.remaining
        );

        Ok(*state)
    }

    /// Select the next brew profile, wrapping after the last one
    ///
    /// A running brew restarts with the new profile's duration.
    pub fn advance_mode(&self) -> Result<BrewerState> {
        let mut state = self.lock()?;

        state.mode = (state.mode + 1) % self.profiles.len();
        if state.is_on {
            state.remaining = self.brew_secs(state.mode);
        }

        info!(
            "mode {} selected ({} min)",
            state.mode, self.profiles[state.mode]
        );

        Ok(*state)
    }

    /// Advance the countdown by one second
    ///
    /// The brew ends and the heater is switched off once the countdown
    /// reaches zero.
    pub fn tick(&self) -> Result<BrewerState> {
        let mut state = self.lock()?;

        if !state.is_on {
            return Ok(*state);
        }

        let remaining = state.remaining.saturating_sub(1);

        // on heater failure the last second stays pending and the next tick retries
        if remaining == 0 {
            self.heater
                .set_power(false)
                .context("failed to switch heater off at end of brew")?;
            state.is_on = false;
            info!("brew finished (mode {})", state.mode);
        }

        state.remaining = remaining;

        Ok(*state)
    }

    /// Switch the machine off, if it is on
    pub fn power_off(&self) -> Result<()> {
        let mut state = self.lock()?;

        if state.is_on {
            self.heater
                .set_power(false)
                .context("failed to switch heater off")?;
            state.is_on = false;
            state.remaining = 0;
        }

        Ok(())
    }
}

impl BrewerDevice for Brewer {
    async fn status(&self) -> Result<MachineStatus> {
        Ok(self.snapshot()?.into())
    }

    async fn toggle(&self) -> Result<()> {
        self.power_toggle().map(|_| ())
    }

    async fn next_mode(&self) -> Result<()> {
        self.advance_mode().map(|_| ())
    }

    fn profiles(&self) -> Vec<u32> {
        self.profiles.to_vec()
    }
}

/// Tick the brewer for the lifetime of the process
pub async fn run_countdown(brewer: Brewer, period: Duration) {
    let mut interval = tokio::time::interval(period);
    // the first tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;
        match brewer.tick() {
            Ok(state) if state.is_on => debug!("countdown: {}s left", state.remaining),
            Ok(_) => {}
            Err(e) => error!("countdown tick failed: {e:#}"),
        }
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}
