use anyhow::{anyhow, Result};
use digcrab::dig::{SharedQuerier, UdpQuerier};
use digcrab::edit::{SharedEditor, WebhookEditor};
use digcrab::report::{LogReporter, SharedReporter};
use digcrab::{Config, Dispatcher, Registry, SharedConfig};
use is_terminal::IsTerminal;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_init();

    let mut first_args = std::env::args().take(2);
    let (program_name, config_file) = (
        first_args.next().unwrap_or("digcrab".to_string()),
        first_args.next(),
    );

    let config = config_init(&program_name, config_file)?;

    let (scheduler, supervisor) = digcrab::deferred::new();
    let registry = Registry::from_config(&config)?;
    let querier: SharedQuerier = Arc::new(UdpQuerier::new(&config));
    let editor: SharedEditor = Arc::new(WebhookEditor::new(&config));
    let reporter: SharedReporter = Arc::new(LogReporter);
    let dispatcher = Arc::new(Dispatcher::new(
        registry,
        config.clone(),
        scheduler,
        reporter,
        editor,
        querier,
    ));

    if std::io::stdout().is_terminal() {
        println!("{}", digcrab::crab::CRAB);
    }

    tracing::info!("API listening on {}", &config.api_bind_addr);
    let api_server = digcrab::api::new(config.clone(), dispatcher)?;
    let api_handle = tokio::spawn(api_server);
    let supervisor_handle = tokio::spawn(supervisor.run());

    // TODO(XXX): drain in-flight deferred tasks before exit.
    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("quitting from signal");
        },
        Ok(api_res) = api_handle => {
            if let Err(err) = api_res {
                return Err(err.into())
            }
        }
        _ = supervisor_handle => {
            tracing::warn!("deferred task supervisor exited");
        }
    }
    tracing::info!("goodbye");
    Ok(())
}

fn tracing_init() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "digcrab=info".into()),
        )
        .init();
}

fn config_init(program_name: &str, config_file: Option<String>) -> Result<SharedConfig> {
    match config_file {
        None => Err(anyhow!("usage: {program_name} /path/to/config.json")),
        Some(config_file) => {
            tracing::debug!("loaded config from {config_file}");
            let config = Config::try_from_file(&config_file)?;
            Ok(Arc::new(config))
        }
    }
}
