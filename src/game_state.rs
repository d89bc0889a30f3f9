// Immutable game state snapshot and its builder
//
// A snapshot is built once per decision request and never mutated. All derived
// sets (obstacles, head locations) are computed in `GameStateBuilder::build`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::error::{BotError, BotResult};
use crate::types::{AgentId, Point};

/// An agent on the board with its body trail
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    /// Occupied cells ordered tail to head
    pub segments: Vec<Point>,
    pub alive: bool,
}

impl Agent {
    pub fn new(id: AgentId, name: impl Into<String>) -> Self {
        Agent {
            id,
            name: name.into(),
            segments: Vec::new(),
            alive: true,
        }
    }

    pub fn with_segments(mut self, segments: impl IntoIterator<Item = Point>) -> Self {
        self.segments.extend(segments);
        self
    }

    pub fn add_segment(&mut self, point: Point) {
        self.segments.push(point);
    }

    /// Head cell (the most recent segment), if the agent has a body at all
    pub fn location(&self) -> Option<Point> {
        self.segments.last().copied()
    }
}

/// Read-only view of one turn
#[derive(Debug, Clone)]
pub struct GameState {
    width: i32,
    height: i32,
    agents: BTreeMap<AgentId, Agent>,
    live_ids: BTreeSet<AgentId>,
    locations: HashMap<AgentId, Point>,
    obstacles: HashSet<Point>,
    treasures: HashSet<Point>,
    batteries: HashSet<Point>,
    energy: HashMap<AgentId, i32>,
}

impl GameState {
    pub fn builder(width: i32, height: i32) -> GameStateBuilder {
        GameStateBuilder::new(width, height)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Ids of all agents, including dead ones
    pub fn all_agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agents.keys().copied()
    }

    pub fn live_agent_ids(&self) -> &BTreeSet<AgentId> {
        &self.live_ids
    }

    pub fn is_live(&self, id: AgentId) -> bool {
        self.live_ids.contains(&id)
    }

    pub fn agent(&self, id: AgentId) -> BotResult<&Agent> {
        self.agents.get(&id).ok_or(BotError::UnknownAgent(id))
    }

    /// Head location of a live agent; None for dead or body-less agents
    pub fn location(&self, id: AgentId) -> BotResult<Option<Point>> {
        self.assert_known(id)?;
        Ok(self.locations.get(&id).copied())
    }

    /// Energy level, when the source format carries one
    pub fn energy(&self, id: AgentId) -> BotResult<Option<i32>> {
        self.assert_known(id)?;
        Ok(self.energy.get(&id).copied())
    }

    /// Static obstacles plus every agent's full body
    pub fn obstacles(&self) -> &HashSet<Point> {
        &self.obstacles
    }

    pub fn treasures(&self) -> &HashSet<Point> {
        &self.treasures
    }

    pub fn batteries(&self) -> &HashSet<Point> {
        &self.batteries
    }

    pub fn is_obstacle(&self, point: &Point) -> bool {
        self.obstacles.contains(point)
    }

    /// Heads of live agents other than `id`
    pub fn opponent_heads(&self, id: AgentId) -> impl Iterator<Item = Point> + '_ {
        self.locations
            .iter()
            .filter(move |(&other, _)| other != id)
            .map(|(_, &p)| p)
    }

    fn assert_known(&self, id: AgentId) -> BotResult<()> {
        if self.agents.contains_key(&id) {
            Ok(())
        } else {
            Err(BotError::UnknownAgent(id))
        }
    }
}

/// Collects raw board content, then freezes it into a `GameState`
#[derive(Debug, Clone, Default)]
pub struct GameStateBuilder {
    width: i32,
    height: i32,
    agents: BTreeMap<AgentId, Agent>,
    live_ids: Option<BTreeSet<AgentId>>,
    static_obstacles: HashSet<Point>,
    treasures: HashSet<Point>,
    batteries: HashSet<Point>,
    energy: HashMap<AgentId, i32>,
}

impl GameStateBuilder {
    pub fn new(width: i32, height: i32) -> Self {
        GameStateBuilder {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Registers an agent, replacing any earlier one with the same id
    pub fn agent(mut self, agent: Agent) -> Self {
        self.agents.insert(agent.id, agent);
        self
    }

    /// Registers a known agent without a body (e.g. already dead)
    pub fn known_agent(mut self, id: AgentId) -> Self {
        self.agents.entry(id).or_insert_with(|| Agent {
            id,
            name: format!("bot {}", id),
            segments: Vec::new(),
            alive: false,
        });
        self
    }

    /// Overrides the alive flags: exactly these ids are live
    pub fn live_agents(mut self, ids: impl IntoIterator<Item = AgentId>) -> Self {
        self.live_ids = Some(ids.into_iter().collect());
        self
    }

    pub fn obstacle(mut self, point: Point) -> Self {
        self.static_obstacles.insert(point);
        self
    }

    pub fn obstacles(mut self, points: impl IntoIterator<Item = Point>) -> Self {
        self.static_obstacles.extend(points);
        self
    }

    pub fn treasure(mut self, point: Point) -> Self {
        self.treasures.insert(point);
        self
    }

    pub fn treasures(mut self, points: impl IntoIterator<Item = Point>) -> Self {
        self.treasures.extend(points);
        self
    }

    pub fn battery(mut self, point: Point) -> Self {
        self.batteries.insert(point);
        self
    }

    pub fn batteries(mut self, points: impl IntoIterator<Item = Point>) -> Self {
        self.batteries.extend(points);
        self
    }

    pub fn energy(mut self, id: AgentId, level: i32) -> Self {
        self.energy.insert(id, level);
        self
    }

    pub fn build(self) -> GameState {
        let GameStateBuilder {
            width,
            height,
            mut agents,
            live_ids,
            static_obstacles,
            treasures,
            batteries,
            energy,
        } = self;

        if let Some(live) = &live_ids {
            for id in live {
                agents.entry(*id).or_insert_with(|| Agent::new(*id, format!("bot {}", id)));
            }
            for agent in agents.values_mut() {
                agent.alive = live.contains(&agent.id);
            }
        }

        let live_ids: BTreeSet<AgentId> = agents
            .values()
            .filter(|a| a.alive)
            .map(|a| a.id)
            .collect();

        let locations = agents
            .values()
            .filter(|a| a.alive)
            .filter_map(|a| a.location().map(|p| (a.id, p)))
            .collect();

        let mut obstacles = static_obstacles;
        for agent in agents.values() {
            obstacles.extend(agent.segments.iter().copied());
        }

        GameState {
            width,
            height,
            agents,
            live_ids,
            locations,
            obstacles,
            treasures,
            batteries,
            energy,
        }
    }
}
