pub mod events;
pub mod http_helpers;
pub mod macros;
pub mod model;
pub mod types;
pub mod update;
pub mod view;


use crux_core::Command;

// Re-export core types
pub use crate::{
    events::Event,
    http_helpers::{
        build_url, check_response_status, endpoint_path, extract_error_message,
        is_response_success, map_http_error, parse_json_response, process_json_response,
        process_status_response, BASE_URL,
    },
    model::Model,
    types::*,
    update::{NEXT_MODE_ENDPOINT, STATUS_ENDPOINT, TOGGLE_ENDPOINT},
    view::ViewModel,
};

/// Interval at which shells deliver [`Event::PollTick`]
pub const POLL_INTERVAL_MS: u64 = 1000;

#[crux_macros::effect]
pub enum Effect {
    Render(crux_core::render::RenderOperation),
    Http(crux_http::protocol::HttpRequest),
}

pub type HttpCmd = crux_http::command::Http<Effect, Event>;

/// The Core application
#[derive(Default)]
pub struct App;

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Effect = Effect;

    fn update(&self, event: Self::Event, model: &mut Self::Model) -> Command<Effect, Event> {
        update::update(event, model)
    }

    fn view(&self, model: &Self::Model) -> Self::ViewModel {
        view::view(model)
    }
}
