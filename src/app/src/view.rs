//! Renderer: maps the model onto the three widgets of the control page.

use serde::{Deserialize, Serialize};

use crate::model::Model;
use crate::types::{ConnectionState, MachineStatus};

/// Timer text shown before the first status arrives
pub const TIMER_PLACEHOLDER: &str = "--:--";

/// Everything a shell needs to draw the control page
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub timer: String,
    pub mode: String,
    pub is_on: bool,
    pub connection: ConnectionState,
    pub error_message: Option<String>,
}

/// Timer text, mode label and toggle position for a status snapshot
///
/// Pure: the same snapshot always yields the same output, whatever was
/// rendered before.
pub fn render_status(status: Option<&MachineStatus>) -> (String, String, bool) {
    match status {
        Some(status) => (
            status.remaining.to_string(),
            format!("{} min", status.mode),
            status.is_on,
        ),
        None => (TIMER_PLACEHOLDER.to_string(), String::new(), false),
    }
}

pub fn view(model: &Model) -> ViewModel {
    let (timer, mode, is_on) = render_status(model.status.as_ref());

    ViewModel {
        timer,
        mode,
        is_on,
        connection: model.connection(),
        error_message: model.error_message.clone(),
    }
}
