use crux_core::{render::render, Command};
use log::{debug, warn};

use crate::events::Event;
use crate::model::Model;
use crate::status_get;
use crate::types::MachineStatus;
use crate::Effect;

pub const STATUS_ENDPOINT: &str = "/status";

/// Handle status polling events (initial load, periodic tick, responses)
pub fn handle(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        Event::Initialize => fetch_status(model),

        Event::PollTick => handle_poll_tick(model),

        Event::StatusResponse { seq, result } => handle_status_response(seq, result, model),

        _ => unreachable!("Non-poll event passed to poll handler"),
    }
}

/// Issue a status request unconditionally
///
/// Used for the initial load and for the resynchronizing poll after a
/// command, neither of which may be delayed by the tick pacing rules.
pub fn fetch_status(model: &mut Model) -> Command<Effect, Event> {
    let seq = model.begin_poll();
    debug!("poll #{seq} issued");
    status_get!(STATUS_ENDPOINT, seq, MachineStatus, "Status")
}

/// Handle a periodic tick from the shell
///
/// The tick is dropped while an earlier poll is still outstanding, and while
/// the backoff window after repeated failures has not elapsed.
fn handle_poll_tick(model: &mut Model) -> Command<Effect, Event> {
    if model.polls_in_flight > 0 {
        debug!("poll tick skipped: {} poll(s) in flight", model.polls_in_flight);
        return Command::done();
    }

    if model.backoff_ticks > 0 {
        model.backoff_ticks -= 1;
        debug!("poll tick skipped: backing off ({} left)", model.backoff_ticks);
        return Command::done();
    }

    fetch_status(model)
}

fn handle_status_response(
    seq: u64,
    result: Result<MachineStatus, String>,
    model: &mut Model,
) -> Command<Effect, Event> {
    model.finish_poll();

    match result {
        Ok(status) => {
            model.record_success();

            if model.is_stale(seq) {
                debug!(
                    "poll #{seq} discarded: #{} already applied",
                    model.last_applied_seq
                );
            } else {
                model.last_applied_seq = seq;
                model.status = Some(status);
            }
        }
        Err(e) if model.is_stale(seq) => {
            debug!(
                "poll #{seq} failed after #{} was applied: {e}",
                model.last_applied_seq
            );
        }
        Err(e) => {
            // keep the last-known-good status on screen
            model.record_failure();
            warn!(
                "poll #{seq} failed ({} in a row): {e}",
                model.consecutive_failures
            );
        }
    }

    render()
}
