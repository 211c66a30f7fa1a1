use std::sync::Arc;
use tokio::sync::Notify;

mod calculator;
mod config;
mod handler;
mod http;
mod logger;
mod server;

use logger::Log;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional first argument: config file path without extension
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;

    let log: Arc<dyn Log> = Arc::new(logger::Logger::from_config(&cfg)?);
    logger::install_panic_hook(Arc::clone(&log));

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg, log))
}

async fn async_main(
    cfg: config::Config,
    log: Arc<dyn Log>,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = match server::create_reusable_listener(addr) {
        Ok(l) => l,
        Err(e) => {
            log.error(&format!("Failed to bind {addr}: {e}"));
            return Err(e.into());
        }
    };

    logger::log_server_start(log.as_ref(), &addr, &cfg);

    let shutdown = Arc::new(Notify::new());
    server::signal::start_signal_handler(Arc::clone(&shutdown), Arc::clone(&log))?;

    let state = Arc::new(config::AppState::new(cfg, log));

    // Use LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(listener, state, shutdown))
        .await
}
