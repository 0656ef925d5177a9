use anyhow::Result;
use log::info;

/// Switches the brewing element of the appliance
///
/// Implementations drive the relay. Returning an error means the element
/// did not change state.
pub trait Heater: Send + Sync {
    fn set_power(&self, on: bool) -> Result<()>;
}

/// Heater that only reports the requested power state
///
/// Used on hosts without a relay attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogHeater;

impl Heater for LogHeater {
    fn set_power(&self, on: bool) -> Result<()> {
        info!("heater {}", if on { "on" } else { "off" });
        Ok(())
    }
}
