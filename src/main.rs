#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    gateway::run()
}

// The gateway binary is native-only; wasm32 builds use the library
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod gateway {
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    use builder_gateway::config::{self, AppState, Config};
    use builder_gateway::logger;
    use builder_gateway::server::{self, ShutdownSignal};

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let config_path = std::env::args()
            .nth(1)
            .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
        let cfg = Config::load_from(&config_path)?;
        logger::init(&cfg)?;

        // Worker count comes from config; default is one per CPU core
        let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
        runtime_builder.enable_all();
        if let Some(workers) = cfg.server.workers {
            runtime_builder.worker_threads(workers);
        }
        let runtime = runtime_builder.build()?;

        runtime.block_on(async_main(cfg))
    }

    async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
        let addr = cfg.get_socket_addr()?;
        let listener = server::create_reusable_listener(addr)?;
        let state = Arc::new(AppState::new(&cfg)?);
        let active_connections = Arc::new(AtomicUsize::new(0));
        let shutdown = Arc::new(ShutdownSignal::new());

        server::signal::start_signal_handler(Arc::clone(&shutdown))?;
        logger::log_server_start(&addr, &cfg);

        // Connections are served with spawn_local
        let local = tokio::task::LocalSet::new();
        local
            .run_until(server::start_server_loop(
                listener,
                state,
                active_connections,
                shutdown,
            ))
            .await;
        Ok(())
    }
}
