use log::{error, info};
use std::env;
use std::sync::Arc;

use toroid_bot::bot::Bot;
use toroid_bot::config::Config;
use toroid_bot::debug_logger::DebugLogger;
use toroid_bot::handler::RequestHandler;
use toroid_bot::server;

/// Port from the first CLI argument, else `PORT`, else the config file
fn determine_port(config: &Config) -> Result<u16, String> {
    if let Some(arg) = env::args().nth(1) {
        return arg
            .parse()
            .map_err(|e| format!("Invalid port argument '{}': {}", arg, e));
    }

    // Lots of hosting services expect you to bind to the port specified by the `PORT`
    // environment variable.
    if let Ok(port) = env::var("PORT") {
        return port
            .parse()
            .map_err(|e| format!("Invalid PORT '{}': {}", port, e));
    }

    Ok(config.server.port)
}

#[tokio::main]
async fn main() {
    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    info!("Starting bot server...");

    // Load configuration once at startup
    let config = Config::load_or_default();

    let port = match determine_port(&config) {
        Ok(port) => port,
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    };

    let logger = DebugLogger::new(config.debug.enabled, &config.debug.log_file_path).await;
    let host = config.server.host.clone();
    let bot = Bot::new(config);
    info!("Bot '{}' ready", bot.name());

    let handler = Arc::new(RequestHandler::new(bot, logger));

    let listener = match server::bind(&host, port).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}:{}: {}", host, port, e);
            std::process::exit(1);
        }
    };

    tokio::select! {
        result = server::run(listener, handler.clone()) => {
            if let Err(e) = result {
                error!("Server stopped: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
        }
    }

    info!("Served {:?}, uptime {}s", handler.stats(), handler.uptime_secs());
}
