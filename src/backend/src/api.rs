use crate::{brewer::BrewerDevice, http_client::handle_service_result};
use actix_web::{HttpResponse, Responder, web};
use anyhow::Result;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type StaticResources = HashMap<&'static str, static_files::Resource>;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct HealthcheckInfo {
    pub version: String,
    pub git_rev: String,
    /// Brew durations in minutes, in mode order
    pub profiles: Vec<u32>,
}

#[derive(Clone)]
pub struct Api<Device>
where
    Device: BrewerDevice,
{
    pub device: Device,
}

impl<Device> Api<Device>
where
    Device: BrewerDevice + 'static,
{
    pub fn new(device: Device) -> Result<Self> {
        Ok(Api { device })
    }

    pub async fn index(
        static_resources: web::Data<StaticResources>,
    ) -> actix_web::Result<HttpResponse> {
        debug!("index() called");

        let Some(index_html) = static_resources.get("index.html") else {
            return Err(actix_web::error::ErrorNotFound(
                "index.html not found in embedded resources",
            ));
        };

        Ok(HttpResponse::Ok()
            .content_type(index_html.mime_type)
            .body(index_html.data.to_vec()))
    }

    pub async fn status(api: web::Data<Self>) -> impl Responder {
        debug!("status() called");
        handle_service_result(api.device.status().await, "status")
    }

    pub async fn toggle(api: web::Data<Self>) -> impl Responder {
        debug!("toggle() called");
        handle_service_result(api.device.toggle().await, "toggle")
    }

    pub async fn next_mode(api: web::Data<Self>) -> impl Responder {
        debug!("next_mode() called");
        handle_service_result(api.device.next_mode().await, "next_mode")
    }

    pub async fn version() -> impl Responder {
        HttpResponse::Ok().body(env!("CARGO_PKG_VERSION"))
    }

    pub async fn healthcheck(api: web::Data<Self>) -> impl Responder {
        debug!("healthcheck() called");

        let info = HealthcheckInfo {
            version: env!("CARGO_PKG_VERSION").to_string(),
            git_rev: env!("GIT_SHORT_REV").to_string(),
            profiles: api.device.profiles(),
        };

        handle_service_result(Ok(info), "healthcheck")
    }
}

/// Register the control page and brewer endpoints
///
/// Commands answer GET as the control page issues plain fetches, and POST
/// for clients that prefer a mutating verb.
pub fn configure<Device>(cfg: &mut web::ServiceConfig)
where
    Device: BrewerDevice + 'static,
{
    cfg.route("/", web::get().to(Api::<Device>::index))
        .route(
            smarter_coffee_core::STATUS_ENDPOINT,
            web::get().to(Api::<Device>::status),
        )
        .route(
            smarter_coffee_core::TOGGLE_ENDPOINT,
            web::get().to(Api::<Device>::toggle),
        )
        .route(
            smarter_coffee_core::TOGGLE_ENDPOINT,
            web::post().to(Api::<Device>::toggle),
        )
        .route(
            smarter_coffee_core::NEXT_MODE_ENDPOINT,
            web::get().to(Api::<Device>::next_mode),
        )
        .route(
            smarter_coffee_core::NEXT_MODE_ENDPOINT,
            web::post().to(Api::<Device>::next_mode),
        )
        .route("/version", web::get().to(Api::<Device>::version))
        .route("/healthcheck", web::get().to(Api::<Device>::healthcheck));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{brewer::Brewer, config::BrewerConfig, heater::LogHeater};
    use actix_web::{App, http::StatusCode, test};
    use smarter_coffee_core::{MachineStatus, ModeValue};

    fn brewer() -> Brewer {
        Brewer::new(&BrewerConfig::default(), LogHeater).expect("valid brewer")
    }

    fn resources() -> StaticResources {
        let mut resources = StaticResources::new();
        resources.insert(
            "index.html",
            static_files::Resource {
                data: b"<html>SmarterCoffee</html>",
                modified: 0,
                mime_type: "text/html",
            },
        );
        resources
    }

    macro_rules! init_app {
        ($brewer:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(Api::new($brewer).unwrap()))
                    .app_data(web::Data::new(resources()))
                    .configure(configure::<Brewer>),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn status_reports_idle_machine() {
        let app = init_app!(brewer());

        let req = test::TestRequest::get().uri("/status").to_request();
        let status: MachineStatus = test::call_and_read_body_json(&app, req).await;

        assert_eq!(
            status,
            MachineStatus {
                remaining: 0,
                mode: ModeValue::Index(0),
                is_on: false,
            }
        );
    }

    #[actix_web::test]
    async fn toggle_then_status_reflects_brew() {
        let app = init_app!(brewer());

        let req = test::TestRequest::get().uri("/toggle").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/status").to_request();
        let status: MachineStatus = test::call_and_read_body_json(&app, req).await;

        assert!(status.is_on);
        assert_eq!(status.remaining, 300);
    }

    #[actix_web::test]
    async fn nextmode_accepts_get_and_post() {
        let app = init_app!(brewer());

        let req = test::TestRequest::get().uri("/nextmode").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::post().uri("/nextmode").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/status").to_request();
        let status: MachineStatus = test::call_and_read_body_json(&app, req).await;
        assert_eq!(status.mode, ModeValue::Index(2));
    }

    #[actix_web::test]
    async fn index_serves_embedded_page() {
        let app = init_app!(brewer());

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert_eq!(&body[..], b"<html>SmarterCoffee</html>");
    }

    #[actix_web::test]
    async fn control_page_shows_rejected_commands() {
        let mut shipped = StaticResources::new();
        shipped.insert(
            "index.html",
            static_files::Resource {
                data: include_bytes!("../static/index.html"),
                modified: 0,
                mime_type: "text/html",
            },
        );

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Api::new(brewer()).unwrap()))
                .app_data(web::Data::new(shipped))
                .configure(configure::<Brewer>),
        )
        .await;

        let req = test::TestRequest::get().uri("/").to_request();
        let body = test::call_and_read_body(&app, req).await;
        let page = String::from_utf8_lossy(&body);

        assert!(page.contains(r#"id="error""#));
        assert!(page.contains("failed: HTTP "));
        assert!(page.contains(r#"onclick="clearError()""#));
        assert!(page.contains("command('/toggle', 'Toggle')"));
        assert!(page.contains("command('/nextmode', 'Next mode')"));
    }

    #[actix_web::test]
    async fn healthcheck_lists_profiles() {
        let app = init_app!(brewer());

        let req = test::TestRequest::get().uri("/healthcheck").to_request();
        let info: HealthcheckInfo = test::call_and_read_body_json(&app, req).await;

        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(info.profiles, vec![5, 10, 15]);
    }

    #[cfg(feature = "mock")]
    mod with_mock_device {
        use super::*;
        use crate::brewer::MockBrewerDevice;
        use anyhow::anyhow;

        #[actix_web::test]
        async fn failing_toggle_returns_internal_server_error() {
            let mut device = MockBrewerDevice::default();
            device
                .expect_toggle()
                .returning(|| Box::pin(async { Err(anyhow!("failed to switch heater on")) }));

            let app = test::init_service(
                App::new()
                    .app_data(web::Data::new(Api::new(device).unwrap()))
                    .configure(configure::<MockBrewerDevice>),
            )
            .await;

            let req = test::TestRequest::get().uri("/toggle").to_request();
            let resp = test::call_service(&app, req).await;

            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body = test::read_body(resp).await;
            assert_eq!(&body[..], b"failed to switch heater on");
        }
    }
}
