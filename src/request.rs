// JSON move request formats
//
// Two shapes are accepted on the wire:
// - plan format: an ASCII `gamePlan` plus id lists and an optional energy map
// - league format: a structured `gameState` with per-player segment trails
//
// Both are turned into the acting agent id and an immutable `GameState`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{BotError, BotResult};
use crate::game_state::{Agent, GameState};
use crate::plan;
use crate::types::{AgentId, Point};

/// Plan format request
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub game_plan: Vec<String>,
    pub your_bot_id: AgentId,
    #[serde(default)]
    pub bot_ids: Option<Vec<AgentId>>,
    #[serde(default)]
    pub live_bot_ids: Option<Vec<AgentId>>,
    #[serde(default)]
    pub bot_energy_map: HashMap<String, i32>,
}

/// League format request
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LeagueRequest {
    pub ai_player_id: AgentId,
    pub game_state: LeagueGameState,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LeagueGameState {
    pub game_plan: LeaguePlan,
    pub players: Vec<LeaguePlayer>,
    #[serde(default)]
    pub player_state_map: HashMap<String, LeaguePlayerState>,
    #[serde(default)]
    pub live_players: Option<Vec<LeaguePlayer>>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LeaguePlan {
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub starting_positions: Vec<Point>,
    #[serde(default)]
    pub walls: Vec<Point>,
    #[serde(default)]
    pub treasures: Vec<Point>,
    #[serde(default)]
    pub batteries: Vec<Point>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LeaguePlayer {
    pub id: AgentId,
    pub name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct LeaguePlayerState {
    /// Body trail, tail first
    #[serde(default)]
    pub segments: Vec<Point>,
    #[serde(default)]
    pub energy: Option<i32>,
}

#[derive(Debug, Clone)]
pub enum MoveRequest {
    Plan(PlanRequest),
    League(LeagueRequest),
}

impl MoveRequest {
    /// Parses one request line, picking the format by its top-level key
    pub fn parse(text: &str) -> BotResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        let object = value
            .as_object()
            .ok_or_else(|| BotError::Parse("move request must be a JSON object".to_string()))?;

        if object.contains_key("gamePlan") {
            Ok(MoveRequest::Plan(serde_json::from_value(value)?))
        } else if object.contains_key("gameState") {
            Ok(MoveRequest::League(serde_json::from_value(value)?))
        } else {
            Err(BotError::Parse(
                "unrecognized move request: expected a gamePlan or gameState field".to_string(),
            ))
        }
    }

    /// The agent the decision is made for
    pub fn agent_id(&self) -> AgentId {
        match self {
            MoveRequest::Plan(r) => r.your_bot_id,
            MoveRequest::League(r) => r.ai_player_id,
        }
    }

    pub fn game_state(&self) -> BotResult<GameState> {
        match self {
            MoveRequest::Plan(r) => r.game_state(),
            MoveRequest::League(r) => r.game_state(),
        }
    }
}

impl PlanRequest {
    pub fn game_state(&self) -> BotResult<GameState> {
        let mut builder = plan::parse_game_plan(self.game_plan.as_slice())?;

        for id in self.bot_ids.iter().flatten() {
            builder = builder.known_agent(*id);
        }
        if let Some(live) = &self.live_bot_ids {
            builder = builder.live_agents(live.iter().copied());
        }
        for (key, level) in &self.bot_energy_map {
            builder = builder.energy(parse_agent_key(key)?, *level);
        }

        Ok(builder.build())
    }
}

impl LeagueRequest {
    pub fn game_state(&self) -> BotResult<GameState> {
        let state = &self.game_state;
        let plan = &state.game_plan;
        if plan.width <= 0 || plan.height <= 0 {
            return Err(BotError::Parse(format!(
                "invalid board size {}x{}",
                plan.width, plan.height
            )));
        }

        let mut trails: HashMap<AgentId, &LeaguePlayerState> = HashMap::new();
        for (key, player_state) in &state.player_state_map {
            trails.insert(parse_agent_key(key)?, player_state);
        }

        let mut builder = GameState::builder(plan.width, plan.height)
            .obstacles(plan.walls.iter().copied())
            .treasures(plan.treasures.iter().copied())
            .batteries(plan.batteries.iter().copied());

        for player in &state.players {
            let mut agent = Agent::new(player.id, player.name.clone());
            if let Some(player_state) = trails.get(&player.id) {
                for segment in &player_state.segments {
                    let inside = (0..plan.width).contains(&segment.x)
                        && (0..plan.height).contains(&segment.y);
                    if !inside {
                        return Err(BotError::Parse(format!(
                            "segment {} of player {} is outside the {}x{} board",
                            segment, player.id, plan.width, plan.height
                        )));
                    }
                    agent.add_segment(*segment);
                }
                if let Some(energy) = player_state.energy {
                    builder = builder.energy(player.id, energy);
                }
            }
            builder = builder.agent(agent);
        }

        if let Some(live) = &state.live_players {
            builder = builder.live_agents(live.iter().map(|p| p.id));
        }

        Ok(builder.build())
    }
}

fn parse_agent_key(key: &str) -> BotResult<AgentId> {
    key.trim()
        .parse()
        .map_err(|_| BotError::Parse(format!("invalid agent id key {:?}", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plan_request() {
        let text = json!({
            "gamePlan": ["* 2", " 1 ", " **"],
            "yourBotId": 1,
            "botIds": [1, 2, 3],
            "liveBotIds": [1, 2],
        })
        .to_string();

        let request = MoveRequest::parse(&text).unwrap();
        assert_eq!(request.agent_id(), 1);

        let state = request.game_state().unwrap();
        assert_eq!(state.width(), 3);
        assert_eq!(state.height(), 3);
        assert_eq!(state.all_agent_ids().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(state.live_agent_ids().iter().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(state.location(1), Ok(Some(Point::new(1, 1))));
        assert_eq!(state.location(2), Ok(Some(Point::new(2, 0))));
        assert_eq!(state.location(3), Ok(None));

        // bot heads counted, too
        assert_eq!(state.obstacles().len(), 5);
    }

    #[test]
    fn test_plan_request_energy_map() {
        let text = json!({
            "gamePlan": [" 1 "],
            "yourBotId": 1,
            "botEnergyMap": {"1": 4},
        })
        .to_string();
        let state = MoveRequest::parse(&text).unwrap().game_state().unwrap();
        assert_eq!(state.energy(1), Ok(Some(4)));
    }

    #[test]
    fn test_bad_energy_key() {
        let text = json!({
            "gamePlan": [" 1 "],
            "yourBotId": 1,
            "botEnergyMap": {"one": 4},
        })
        .to_string();
        let err = MoveRequest::parse(&text).unwrap().game_state().unwrap_err();
        assert!(matches!(err, BotError::Parse(_)));
    }

    fn league_json() -> Value {
        json!({
            "aiPlayerId": 1,
            "gameState": {
                "gamePlan": {
                    "width": 30,
                    "height": 30,
                    "startingPositions": [{"x": 5, "y": 5}, {"x": 15, "y": 5}],
                    "walls": [],
                },
                "players": [
                    {"id": 1, "name": "Foo Bot"},
                    {"id": 2, "name": "Bar Bot"},
                ],
                "playerStateMap": {
                    "1": {"segments": [
                        {"x": 5, "y": 5}, {"x": 4, "y": 5}, {"x": 3, "y": 5}, {"x": 2, "y": 5},
                    ]},
                    "2": {"segments": [
                        {"x": 15, "y": 5}, {"x": 16, "y": 5}, {"x": 17, "y": 5}, {"x": 18, "y": 5},
                    ], "energy": 3},
                },
                "livePlayers": [
                    {"id": 1, "name": "Foo Bot"},
                    {"id": 2, "name": "Bar Bot"},
                ],
            },
        })
    }

    #[test]
    fn test_league_request() {
        let request = MoveRequest::parse(&league_json().to_string()).unwrap();
        assert_eq!(request.agent_id(), 1);

        let state = request.game_state().unwrap();
        assert_eq!(state.width(), 30);
        assert_eq!(state.height(), 30);
        assert_eq!(state.all_agent_ids().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(state.location(1), Ok(Some(Point::new(2, 5))));
        assert_eq!(state.location(2), Ok(Some(Point::new(18, 5))));
        assert_eq!(state.location(3), Err(BotError::UnknownAgent(3)));
        assert_eq!(state.agent(1).unwrap().name, "Foo Bot");
        assert_eq!(state.energy(2), Ok(Some(3)));

        assert_eq!(state.obstacles().len(), 8);
        assert!(state.obstacles().contains(&Point::new(5, 5)));
        assert!(state.obstacles().contains(&Point::new(18, 5)));
    }

    #[test]
    fn test_league_walls_are_obstacles() {
        let mut value = league_json();
        value["gameState"]["gamePlan"]["walls"] = json!([{"x": 0, "y": 0}]);
        let state = MoveRequest::parse(&value.to_string()).unwrap().game_state().unwrap();
        assert_eq!(state.obstacles().len(), 9);
        assert!(state.obstacles().contains(&Point::new(0, 0)));
    }

    #[test]
    fn test_league_dead_player() {
        let mut value = league_json();
        value["gameState"]["livePlayers"] = json!([{"id": 1, "name": "Foo Bot"}]);
        let state = MoveRequest::parse(&value.to_string()).unwrap().game_state().unwrap();
        assert!(!state.is_live(2));
        assert_eq!(state.location(2), Ok(None));
        // the trail stays on the board
        assert!(state.obstacles().contains(&Point::new(16, 5)));
    }

    #[test]
    fn test_league_segment_off_board() {
        let mut value = league_json();
        value["gameState"]["playerStateMap"]["1"]["segments"] = json!([{"x": 31, "y": 0}]);
        let err = MoveRequest::parse(&value.to_string()).unwrap().game_state().unwrap_err();
        assert!(matches!(err, BotError::Parse(msg) if msg.contains("outside")));
    }

    #[test]
    fn test_unrecognized_request() {
        assert!(matches!(
            MoveRequest::parse("{\"foo\": 1}"),
            Err(BotError::Parse(_))
        ));
        assert!(matches!(MoveRequest::parse("not json"), Err(BotError::Parse(_))));
        assert!(matches!(MoveRequest::parse("[1, 2]"), Err(BotError::Parse(_))));
    }

    #[test]
    fn test_malformed_plan_in_request() {
        let text = json!({"gamePlan": ["  ", "   "], "yourBotId": 1}).to_string();
        let err = MoveRequest::parse(&text).unwrap().game_state().unwrap_err();
        assert!(matches!(err, BotError::Parse(msg) if msg.contains("non-rectangular")));
    }
}
