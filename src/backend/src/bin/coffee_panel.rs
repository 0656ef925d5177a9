//! Terminal control panel for a SmarterCoffee brewer
//!
//! Polls the device once per interval and accepts one-letter commands on
//! stdin: `t` toggles power, `m` selects the next mode, `c` dismisses the
//! last error and `q` quits.

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::{error, info, warn};
use smarter_coffee::{
    config::AppConfig,
    http_client::device_client,
    shell::{PanelShell, ReqwestTransport},
};
use smarter_coffee_core::{Event, ViewModel};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        error!("panel error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    initialize();

    let config = &AppConfig::get().panel;
    let client = device_client(config.poll_interval).context("failed to create panel client")?;
    let transport = ReqwestTransport::new(client, config.device_url.clone());

    match transport.healthcheck().await {
        Ok(info) => info!(
            "device {} ({}), profiles {:?} min",
            info.version, info.git_rev, info.profiles
        ),
        Err(e) => warn!("device healthcheck failed: {e:#}"),
    }

    let shell = PanelShell::new(transport);
    let mut last = shell.dispatch(Event::Initialize).await?;
    print_view(&last);

    let mut interval = tokio::time::interval(config.poll_interval);
    // Initialize already issued the first poll
    interval.tick().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let event = tokio::select! {
            _ = interval.tick() => Event::PollTick,
            line = lines.next_line() => {
                match line.context("failed to read stdin")? {
                    Some(line) => match parse_command(&line) {
                        Some(event) => event,
                        None if line.trim() == "q" => break,
                        None => {
                            println!("commands: t (toggle), m (next mode), c (clear error), q (quit)");
                            continue;
                        }
                    },
                    None => break,
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        };

        let view = shell.dispatch(event).await?;
        if view != last {
            print_view(&view);
            last = view;
        }
    }

    info!("panel closed");

    Ok(())
}

fn initialize() {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));

    builder.format(|f, record| writeln!(f, "{}: {}", record.level(), record.args()));
    builder.target(Target::Stderr).init();
}

fn parse_command(line: &str) -> Option<Event> {
    match line.trim() {
        "t" => Some(Event::Toggle),
        "m" => Some(Event::NextMode),
        "c" => Some(Event::ClearError),
        _ => None,
    }
}

fn print_view(view: &ViewModel) {
    let power = if view.is_on { "ON" } else { "OFF" };
    let mode = if view.mode.is_empty() { "-" } else { &view.mode };

    println!(
        "[{}] timer {} | mode {} | {}",
        view.connection.label(),
        view.timer,
        mode,
        power
    );

    if let Some(message) = &view.error_message {
        println!("  error: {message}");
    }
}
