// Library exports for the bot
// This allows the server binary, the replay tool and the integration tests to share the engine

pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod error;
pub mod game_state;
pub mod handler;
pub mod moves;
pub mod plan;
pub mod replay;
pub mod request;
pub mod scoring;
pub mod server;
pub mod suppliers;
pub mod types;
