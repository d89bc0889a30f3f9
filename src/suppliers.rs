// Move supplier pipeline
//
// A supplier is plain data: a name, a weight, the candidate set it draws from
// and a predicate over the destinations of each candidate. Suppliers are kept
// in ordered slices; order matters for tie-breaking and for first-match mode.

use crate::config::WeightsConfig;
use crate::game_state::GameState;
use crate::moves::{Move, MoveSet};
use crate::types::{AgentId, Direction, Point, Topology};

/// Everything a predicate or evaluator needs to know about the acting agent
#[derive(Debug, Clone, Copy)]
pub struct TurnContext<'a> {
    pub state: &'a GameState,
    pub agent_id: AgentId,
    /// Head of the acting agent
    pub origin: Point,
    pub topology: Topology,
}

impl<'a> TurnContext<'a> {
    pub fn new(state: &'a GameState, agent_id: AgentId, origin: Point, topology: Topology) -> Self {
        TurnContext {
            state,
            agent_id,
            origin,
            topology,
        }
    }

    /// Cells visited by `mv`, or None if it leaves a bounded board
    pub fn destinations(&self, mv: &Move) -> Option<Vec<Point>> {
        mv.destinations(self.origin, self.topology, self.state.width(), self.state.height())
    }

    /// Number of blocked sides of `point`.
    /// The acting agent's own head is not counted; off-board sides are.
    pub fn obstacle_neighbours(&self, point: Point) -> usize {
        Direction::all()
            .iter()
            .filter(|&&d| {
                match self
                    .topology
                    .step(d, point, self.state.width(), self.state.height())
                {
                    None => true,
                    Some(n) => n != self.origin && self.state.is_obstacle(&n),
                }
            })
            .count()
    }

    /// True if another live agent's head touches `point`
    pub fn next_to_opponent_head(&self, point: Point) -> bool {
        let neighbours = self
            .topology
            .neighbours(point, self.state.width(), self.state.height());
        self.state
            .opponent_heads(self.agent_id)
            .any(|head| neighbours.contains(&head))
    }
}

/// Predicate over a candidate's destination cells
pub type MovePredicate = fn(&TurnContext<'_>, &[Point]) -> bool;

/// A candidate that passed its supplier's predicate
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub mv: Move,
    pub destinations: Vec<Point>,
}

#[derive(Debug, Clone, Copy)]
pub struct MoveSupplier {
    pub name: &'static str,
    pub weight: f64,
    pub move_set: MoveSet,
    pub predicate: MovePredicate,
}

impl MoveSupplier {
    pub fn safe_move(weight: f64) -> Self {
        MoveSupplier {
            name: "safe_move",
            weight,
            move_set: MoveSet::Single,
            predicate: is_safe,
        }
    }

    pub fn safe_haste_move(weight: f64) -> Self {
        MoveSupplier {
            name: "safe_haste_move",
            weight,
            move_set: MoveSet::StraightDouble,
            predicate: is_safe,
        }
    }

    pub fn safe_detour_move(weight: f64) -> Self {
        MoveSupplier {
            name: "safe_detour_move",
            weight,
            move_set: MoveSet::DetourDouble,
            predicate: is_safe,
        }
    }

    pub fn close_treasure_move(weight: f64) -> Self {
        MoveSupplier {
            name: "close_treasure_move",
            weight,
            move_set: MoveSet::Single,
            predicate: reaches_treasure,
        }
    }

    pub fn close_battery_move(weight: f64) -> Self {
        MoveSupplier {
            name: "close_battery_move",
            weight,
            move_set: MoveSet::Single,
            predicate: reaches_battery,
        }
    }

    pub fn reachable_treasure_move(weight: f64) -> Self {
        MoveSupplier {
            name: "reachable_treasure_move",
            weight,
            move_set: MoveSet::AllDouble,
            predicate: reaches_treasure,
        }
    }

    pub fn reachable_battery_move(weight: f64) -> Self {
        MoveSupplier {
            name: "reachable_battery_move",
            weight,
            move_set: MoveSet::AllDouble,
            predicate: reaches_battery,
        }
    }

    /// Lazily yields the candidates that satisfy this supplier's predicate,
    /// in candidate-set order
    pub fn candidates<'a>(&'a self, ctx: &'a TurnContext<'a>) -> impl Iterator<Item = Candidate> + 'a {
        self.move_set.moves().iter().filter_map(move |mv| {
            let destinations = ctx.destinations(mv)?;
            (self.predicate)(ctx, &destinations).then(|| Candidate {
                mv: *mv,
                destinations,
            })
        })
    }
}

/// Suppliers scored against each other in weighted mode
pub fn weighted_suppliers(weights: &WeightsConfig) -> Vec<MoveSupplier> {
    vec![
        MoveSupplier::safe_move(weights.safe_move),
        MoveSupplier::safe_haste_move(weights.safe_haste_move),
        MoveSupplier::safe_detour_move(weights.safe_detour_move),
    ]
}

/// Suppliers in first-match priority order.
/// A weak agent looks for batteries before treasures at each distance.
pub fn first_match_suppliers(weights: &WeightsConfig, low_energy: bool) -> Vec<MoveSupplier> {
    let close_treasure = MoveSupplier::close_treasure_move(weights.close_treasure_move);
    let close_battery = MoveSupplier::close_battery_move(weights.close_battery_move);
    let reachable_treasure = MoveSupplier::reachable_treasure_move(weights.reachable_treasure_move);
    let reachable_battery = MoveSupplier::reachable_battery_move(weights.reachable_battery_move);
    let safe = MoveSupplier::safe_move(weights.safe_move);

    if low_energy {
        vec![close_battery, close_treasure, reachable_battery, reachable_treasure, safe]
    } else {
        vec![close_treasure, close_battery, reachable_treasure, reachable_battery, safe]
    }
}

/// No destination is an obstacle
pub fn is_safe(ctx: &TurnContext<'_>, destinations: &[Point]) -> bool {
    destinations.iter().all(|p| !ctx.state.is_obstacle(p))
}

fn reaches_treasure(ctx: &TurnContext<'_>, destinations: &[Point]) -> bool {
    is_safe(ctx, destinations)
        && destinations
            .last()
            .is_some_and(|p| ctx.state.treasures().contains(p))
}

fn reaches_battery(ctx: &TurnContext<'_>, destinations: &[Point]) -> bool {
    is_safe(ctx, destinations)
        && destinations
            .last()
            .is_some_and(|p| ctx.state.batteries().contains(p))
}
