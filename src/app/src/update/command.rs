use crux_core::{render::render, Command};
use log::{debug, error};

use crate::device_command;
use crate::events::Event;
use crate::model::Model;
use crate::Effect;

use super::poll::fetch_status;

pub const TOGGLE_ENDPOINT: &str = "/toggle";
pub const NEXT_MODE_ENDPOINT: &str = "/nextmode";

/// Handle user commands (power toggle, mode advance)
///
/// The model is never changed optimistically. Whatever the command outcome,
/// a fresh status poll follows so the display shows what the device reports.
pub fn handle(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        Event::Toggle => {
            debug!("toggle requested");
            device_command!(TOGGLE_ENDPOINT, ToggleResponse, "Toggle")
        }

        Event::ToggleResponse(result) => handle_command_response(result, model),

        Event::NextMode => {
            debug!("next mode requested");
            device_command!(NEXT_MODE_ENDPOINT, NextModeResponse, "Next mode")
        }

        Event::NextModeResponse(result) => handle_command_response(result, model),

        _ => unreachable!("Non-command event passed to command handler"),
    }
}

fn handle_command_response(
    result: Result<(), String>,
    model: &mut Model,
) -> Command<Effect, Event> {
    match result {
        Ok(()) => model.clear_error(),
        Err(e) => {
            error!("{e}");
            model.set_error(e);
        }
    }

    Command::all([render(), fetch_status(model)])
}
