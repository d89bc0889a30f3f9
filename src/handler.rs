// Request handling for the line protocol
//
// One request line in, one response line out:
// - `NAME`   the bot's name
// - `UPTIME` whole seconds since the handler was created
// - anything else is a JSON move request, answered with the move text
//
// Errors never escape: they become `ERROR: ...` responses.

use log::{info, warn};
use parking_lot::Mutex;
use std::time::Instant;

use crate::bot::Bot;
use crate::debug_logger::DebugLogger;
use crate::error::BotResult;
use crate::request::MoveRequest;

pub const NAME_REQUEST: &str = "NAME";
pub const UPTIME_REQUEST: &str = "UPTIME";
pub const ERROR_PREFIX: &str = "ERROR: ";

/// Counters kept for the lifetime of the handler
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RequestStats {
    pub name_requests: u64,
    pub uptime_requests: u64,
    pub move_requests: u64,
    pub errors: u64,
}

pub struct RequestHandler {
    bot: Bot,
    logger: DebugLogger,
    started: Instant,
    stats: Mutex<RequestStats>,
}

impl RequestHandler {
    pub fn new(bot: Bot, logger: DebugLogger) -> Self {
        RequestHandler {
            bot,
            logger,
            started: Instant::now(),
            stats: Mutex::new(RequestStats::default()),
        }
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    pub fn stats(&self) -> RequestStats {
        *self.stats.lock()
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    /// Answers one request line
    pub fn process_request(&self, request: &str) -> String {
        match self.process_request_internal(request.trim()) {
            Ok(response) => response,
            Err(e) => {
                warn!("Request failed: {}", e);
                self.stats.lock().errors += 1;
                format!("{}{}", ERROR_PREFIX, e)
            }
        }
    }

    fn process_request_internal(&self, request: &str) -> BotResult<String> {
        match request {
            NAME_REQUEST => {
                self.stats.lock().name_requests += 1;
                info!("NAME");
                Ok(self.bot.name().to_string())
            }
            UPTIME_REQUEST => {
                self.stats.lock().uptime_requests += 1;
                Ok(self.uptime_secs().to_string())
            }
            _ => self.process_move_request(request),
        }
    }

    fn process_move_request(&self, request: &str) -> BotResult<String> {
        let move_request = MoveRequest::parse(request)?;
        let agent_id = move_request.agent_id();
        let state = move_request.game_state()?;
        let decision = self.bot.decide(agent_id, &state)?;

        let sequence = {
            let mut stats = self.stats.lock();
            stats.move_requests += 1;
            stats.move_requests
        };

        info!(
            "Move #{} for agent {}: {} ({} candidates)",
            sequence, agent_id, decision.chosen, decision.candidates
        );
        self.logger
            .log_decision(sequence, agent_id, request, decision.chosen);

        Ok(decision.chosen.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;

    fn handler() -> RequestHandler {
        RequestHandler::new(Bot::new(Config::default_hardcoded()), DebugLogger::disabled())
    }

    #[test]
    fn test_name_request() {
        let handler = handler();
        assert_eq!(handler.process_request("NAME"), "Toroid");
        assert_eq!(handler.process_request("NAME\r\n"), "Toroid");
        assert_eq!(handler.stats().name_requests, 2);
    }

    #[test]
    fn test_uptime_request() {
        let handler = handler();
        let uptime: u64 = handler.process_request("UPTIME").parse().unwrap();
        assert!(uptime < 60);
    }

    #[test]
    fn test_move_request() {
        let handler = handler();
        let request = json!({
            "gamePlan": ["***", "* 1", "***"],
            "yourBotId": 1,
        })
        .to_string();
        assert_eq!(handler.process_request(&request), "L");
        assert_eq!(handler.stats().move_requests, 1);
    }

    #[test]
    fn test_errors_become_prefixed_responses() {
        let handler = handler();
        let response = handler.process_request("{\"gamePlan\": [\" x \"], \"yourBotId\": 1}");
        assert!(response.starts_with(ERROR_PREFIX), "{}", response);
        assert!(response.contains("unrecognized character"));

        let energy = json!({"gamePlan": [" 1 "], "yourBotId": 1, "botEnergyMap": {"one": 3}})
            .to_string();
        assert!(handler.process_request(&energy).starts_with(ERROR_PREFIX));

        assert!(handler.process_request("garbage").starts_with(ERROR_PREFIX));
        assert_eq!(handler.stats().errors, 3);
        assert_eq!(handler.stats().move_requests, 0);
    }
}
