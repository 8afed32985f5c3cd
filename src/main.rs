use std::sync::Arc;

mod chat;
mod config;
mod error;
mod handler;
mod http;
mod logger;
mod server;

use error::StartupError;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is normal; only the real environment is used then
    let _ = dotenv::dotenv();

    let cfg = match std::env::args().nth(1) {
        Some(path) => config::Config::load_from(&path, &config::EnvOverrides::from_env()),
        None => config::Config::load(),
    }
    .map_err(StartupError::from)?;

    logger::init(&cfg)?;

    // Build the Tokio runtime, honouring `server.workers`
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener =
        server::create_listener(addr).map_err(|source| StartupError::Bind { addr, source })?;

    logger::log_server_start(&addr, &cfg);

    let state: Arc<config::AppState> = config::AppState::new(cfg).shared();
    logger::log_chat_mode(state.chat.mode(), &state.config.chat.model);
    server::run(listener, state).await;
    Ok(())
}
