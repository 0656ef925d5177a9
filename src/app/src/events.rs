use serde::{Deserialize, Serialize};

use crate::types::*;

/// Events that can happen in the app
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum Event {
    // Page load: issues the first poll immediately
    Initialize,

    // Sent by the shell once per poll interval
    PollTick,

    // User gestures
    Toggle,
    NextMode,

    // HTTP responses (internal events, skipped from serialization)
    #[serde(skip)]
    StatusResponse {
        seq: u64,
        result: Result<MachineStatus, String>,
    },
    #[serde(skip)]
    ToggleResponse(Result<(), String>),
    #[serde(skip)]
    NextModeResponse(Result<(), String>),

    // UI actions
    ClearError,
}
