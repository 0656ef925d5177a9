use actix_cors::Cors;
use actix_server::ServerHandle;
use actix_web::{
    App, HttpServer,
    web::{self, Data},
};
use actix_web_static_files::ResourceFiles;
use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::{debug, error, info};
use smarter_coffee::{
    api::{self, Api},
    brewer::{Brewer, run_countdown},
    config::AppConfig,
    heater::LogHeater,
};
use std::io::Write;
use tokio::signal::unix::{SignalKind, signal};

// Include the generated static files from build.rs
include!(concat!(env!("OUT_DIR"), "/generated.rs"));

// Alias the generated function to a more descriptive name
#[inline(always)]
fn static_files() -> std::collections::HashMap<&'static str, static_files::Resource> {
    generate()
}

type BrewerApi = Api<Brewer>;

#[actix_web::main]
async fn main() {
    if let Err(e) = run().await {
        error!("application error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    initialize();

    let mut sigterm =
        signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;

    let config = AppConfig::get();
    let brewer = Brewer::new(&config.brewer, LogHeater).context("failed to create brewer")?;

    info!(
        "brew profiles: {:?} min, tick every {:?}",
        config.brewer.profiles, config.brewer.tick_interval
    );

    let countdown = tokio::spawn(run_countdown(brewer.clone(), config.brewer.tick_interval));
    let (server_handle, server_task) = run_server(brewer.clone())?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            debug!("ctrl-c received");
        },
        _ = sigterm.recv() => {
            debug!("SIGTERM received");
        },
        result = server_task => {
            match result {
                Ok(Ok(())) => debug!("server stopped normally"),
                Ok(Err(e)) => error!("server stopped with error: {e}"),
                Err(e) => error!("server task panicked: {e}"),
            }
        },
    };

    info!("shutting down");

    server_handle.stop(true).await;
    countdown.abort();

    if let Err(e) = brewer.power_off() {
        error!("failed to switch machine off: {e:#}");
    }

    info!("shutdown complete");

    Ok(())
}

fn initialize() {
    log_panics::init();

    let mut builder = if cfg!(debug_assertions) {
        Builder::from_env(Env::default().default_filter_or("debug"))
    } else {
        Builder::from_env(Env::default().default_filter_or("info"))
    };

    builder.format(|f, record| match record.level() {
        log::Level::Error => {
            eprintln!("{}", record.args());
            Ok(())
        }
        _ => {
            writeln!(f, "{}", record.args())
        }
    });

    builder.target(Target::Stdout).init();

    info!(
        "module version: {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_SHORT_REV")
    );
}

fn run_server(
    brewer: Brewer,
) -> Result<(
    ServerHandle,
    tokio::task::JoinHandle<Result<(), std::io::Error>>,
)> {
    let api = Data::new(BrewerApi::new(brewer).context("failed to create api")?);
    let ui_port = AppConfig::get().ui.port;

    let server = HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_header()
                    .allowed_methods(vec!["GET"])
                    .max_age(3600),
            )
            .app_data(api.clone())
            .app_data(Data::new(static_files()))
            .configure(api::configure::<Brewer>)
            .service(ResourceFiles::new("/static", static_files()))
            .default_service(web::route().to(BrewerApi::index))
    })
    .bind(format!("0.0.0.0:{ui_port}"))
    .context("failed to bind server")?
    .disable_signals()
    .run();

    info!("listening on port {ui_port}");

    Ok((server.handle(), tokio::spawn(server)))
}
