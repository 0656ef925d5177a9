mod command;
mod poll;
mod ui;

use crux_core::Command;

use crate::events::Event;
use crate::model::Model;
use crate::Effect;

pub use command::{NEXT_MODE_ENDPOINT, TOGGLE_ENDPOINT};
pub use poll::STATUS_ENDPOINT;

/// Main update dispatcher - routes events to domain-specific handlers
pub fn update(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        // Status polling domain
        Event::Initialize | Event::PollTick | Event::StatusResponse { .. } => {
            poll::handle(event, model)
        }

        // Command domain
        Event::Toggle
        | Event::ToggleResponse(_)
        | Event::NextMode
        | Event::NextModeResponse(_) => command::handle(event, model),

        // UI actions domain
        Event::ClearError => ui::handle(event, model),
    }
}
