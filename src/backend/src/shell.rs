//! Native shell for the control panel core
//!
//! Executes the effects requested by the Crux core: HTTP requests go through
//! a [`Transport`], render requests are answered by reading the view model.

use crate::{api::HealthcheckInfo, http_client::handle_http_response};
use anyhow::{Context, Result, anyhow};
use crux_core::Core;
use crux_http::{
    HttpError,
    protocol::{HttpRequest, HttpResponse, HttpResult},
};
use log::debug;
use reqwest::{Client, Method};
use smarter_coffee_core::{App, Effect, Event, ViewModel, endpoint_path};
use std::collections::VecDeque;
use trait_variant::make;

/// Carries core HTTP requests to the brewer
#[make(Send)]
pub trait Transport {
    async fn execute(&self, request: HttpRequest) -> HttpResult;
}

/// Transport that reaches the brewer over the network
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        ReqwestTransport {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Map a core request URL onto the configured device address
    pub fn device_url(&self, url: &str) -> String {
        format!("{}{}", self.base_url, endpoint_path(url))
    }

    /// Fetch version and brew profiles from the device
    pub async fn healthcheck(&self) -> Result<HealthcheckInfo> {
        let url = self.device_url("/healthcheck");
        let res = self
            .client
            .get(&url)
            .send()
            .await
            .context(format!("failed to send GET request to {url}"))?;

        let body = handle_http_response(res, &format!("GET {url}")).await?;
        serde_json::from_str(&body).context("failed to parse healthcheck response")
    }
}

impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> HttpResult {
        let url = self.device_url(&request.url);

        let method = match Method::from_bytes(request.method.as_bytes()) {
            Ok(method) => method,
            Err(e) => return HttpResult::Err(HttpError::Url(format!("{}: {e}", request.method))),
        };

        debug!("{method} {url}");

        let res = match self.client.request(method, &url).send().await {
            Ok(res) => res,
            Err(e) if e.is_timeout() => return HttpResult::Err(HttpError::Timeout),
            Err(e) => return HttpResult::Err(HttpError::Io(e.to_string())),
        };

        let status = res.status().as_u16();
        match res.bytes().await {
            Ok(body) => HttpResult::Ok(HttpResponse::status(status).body(body.to_vec()).build()),
            Err(e) => HttpResult::Err(HttpError::Io(e.to_string())),
        }
    }
}

/// Drives the control panel core until every effect of an event is resolved
pub struct PanelShell<T>
where
    T: Transport,
{
    core: Core<App>,
    transport: T,
}

impl<T> PanelShell<T>
where
    T: Transport,
{
    pub fn new(transport: T) -> Self {
        PanelShell {
            core: Core::new(),
            transport,
        }
    }

    /// Process `event` and every follow-up effect, returning the resulting view
    pub async fn dispatch(&self, event: Event) -> Result<ViewModel> {
        let mut effects: VecDeque<Effect> = self.core.process_event(event).into();

        while let Some(effect) = effects.pop_front() {
            match effect {
                Effect::Render(_) => {}
                Effect::Http(mut request) => {
                    let result = self.transport.execute(request.operation.clone()).await;
                    let follow_up = self
                        .core
                        .resolve(&mut request, result)
                        .map_err(|e| anyhow!("failed to resolve http effect: {e:?}"))?;
                    effects.extend(follow_up);
                }
            }
        }

        Ok(self.view())
    }

    pub fn view(&self) -> ViewModel {
        self.core.view()
    }
}
