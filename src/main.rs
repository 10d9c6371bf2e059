use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use log::info;

use studycircle_client::app::signal::{AuthSnapshot, Signal, UserRef, Visibility};
use studycircle_client::app::AppController;
use studycircle_client::config::ControllerConfig;
use studycircle_client::host::{ConsoleUi, DemoAuthStore, DemoEnvironment, HttpApiClient};

/// Drives a scripted client session against console-backed collaborators.
#[derive(Parser)]
#[command(name = "studycircle-client", version, about)]
struct Cli {
    /// Log file path (truncated on each run)
    #[arg(long, default_value = "studycircle-client.log")]
    log_file: String,

    /// Override the API base URL from the config file
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger to file (truncate on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&cli.log_file)?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let mut config = ControllerConfig::load()?;
    if !ControllerConfig::config_path()?.exists() {
        // First run: write the defaults out so they can be edited.
        config.save()?;
    }
    if let Some(api_url) = cli.api_url {
        config.api_base_url = api_url;
    }
    info!("Starting studycircle-client");

    let api = Arc::new(HttpApiClient::new(config.api_base_url.clone())?);
    let mut controller = AppController::new(
        config,
        Box::new(DemoAuthStore::default()),
        api,
        Box::new(ConsoleUi::default()),
        Box::new(DemoEnvironment),
    );

    controller.initialize();

    // Scripted session: startup, login, browse to a group, tab away and
    // back, log out, leave.
    let script = [
        Signal::DocumentReady,
        Signal::Auth(AuthSnapshot::authenticated(UserRef {
            id: "demo-user".into(),
            display_name: "Demo User".into(),
        })),
        Signal::Route {
            path: "/group/42".into(),
        },
        Signal::Visibility(Visibility::Hidden),
        Signal::Visibility(Visibility::Visible),
        Signal::Auth(AuthSnapshot::anonymous()),
    ];

    for signal in script {
        controller.handle_signal(signal);
        // Give deferred work (health check, delayed announcements) a few
        // chances to complete between steps.
        for _ in 0..4 {
            tokio::time::sleep(Duration::from_millis(60)).await;
            controller.poll_async().await;
        }
    }

    let report = serde_json::to_string_pretty(&controller.application_info())?;
    info!("Final application info:\n{report}");
    println!("{report}");

    controller.handle_signal(Signal::BeforeTeardown);
    Ok(())
}
