use actix_web::HttpResponse;
use anyhow::{Context, Result, ensure};
use log::error;
use reqwest::{Client, Response};
use serde::Serialize;
use smarter_coffee_core::MachineStatus;
use std::time::Duration;

/// Create an HTTP client for talking to the brewer over the LAN
///
/// Requests time out after `timeout` so a stalled device never blocks the
/// caller for longer than one poll interval.
///
/// # Examples
/// ```no_run
/// use smarter_coffee::http_client::device_client;
/// use std::time::Duration;
///
/// let client = device_client(Duration::from_millis(900))
///     .expect("failed to create client");
/// ```
pub fn device_client(timeout: Duration) -> Result<Client> {
    ensure!(!timeout.is_zero(), "failed since request timeout is zero");

    Client::builder()
        .timeout(timeout)
        .build()
        .context("failed to create device HTTP client")
}

/// Trait for converting service results into HTTP responses
pub trait ServiceResultResponse {
    fn into_response(self) -> HttpResponse;
}

impl ServiceResultResponse for () {
    fn into_response(self) -> HttpResponse {
        HttpResponse::Ok().finish()
    }
}

impl ServiceResultResponse for MachineStatus {
    fn into_response(self) -> HttpResponse {
        json_response(&self, "MachineStatus")
    }
}

impl ServiceResultResponse for crate::api::HealthcheckInfo {
    fn into_response(self) -> HttpResponse {
        json_response(&self, "HealthcheckInfo")
    }
}

fn json_response<T: Serialize>(value: &T, type_name: &str) -> HttpResponse {
    match serde_json::to_string(value) {
        Ok(json) => HttpResponse::Ok()
            .content_type("application/json")
            .body(json),
        Err(e) => {
            error!("failed to serialize {type_name}: {e:#}");
            HttpResponse::InternalServerError().body("failed to serialize response")
        }
    }
}

/// Handle Result and convert data to Response
///
/// This is a common utility for processing Results and transform to HTTP responses.
/// It puts data or the error in a corresponding Response.
///
/// # Arguments
/// * `result` - The Result to handle
/// * `operation` - Context message describing the operation
///
/// # Returns
/// * `HttpResponse` - The ServiceResultResponse (HttpResponse::Ok or HttpResponse::InternalServerError)
pub fn handle_service_result<T>(result: Result<T>, operation: &str) -> HttpResponse
where
    T: ServiceResultResponse,
{
    match result {
        Ok(data) => data.into_response(),
        Err(e) => {
            error!("{operation} failed: {e:#}");
            HttpResponse::InternalServerError().body(e.to_string())
        }
    }
}

/// Handle HTTP response by checking status and extracting body
///
/// # Arguments
/// * `res` - The HTTP response to handle
/// * `context_msg` - Context message describing the request (e.g., "GET /status")
///
/// # Returns
/// * `Ok(String)` - The response body if the status is successful
/// * `Err` - If the status is not successful or reading the body fails
pub async fn handle_http_response(res: Response, context_msg: &str) -> Result<String> {
    let status = res.status();
    let body = res.text().await.context("failed to read response body")?;

    ensure!(
        status.is_success(),
        "{context_msg} failed with status {status} and body: {body}"
    );

    Ok(body)
}
