pub mod api;
pub mod brewer;
pub mod config;
pub mod heater;
pub mod http_client;
pub mod shell;
