// Risk/reward evaluators
//
// Each evaluator looks at the destination cells of one candidate move and
// returns a signed contribution. The raw score of a move is the base score
// plus every evaluator's contribution.

use crate::config::ScoresConfig;
use crate::suppliers::TurnContext;
use crate::types::Point;

pub type EvaluatorFn = fn(&TurnContext<'_>, &[Point], &ScoresConfig) -> f64;

#[derive(Clone, Copy)]
pub struct Evaluator {
    pub name: &'static str,
    pub evaluate: EvaluatorFn,
}

/// Evaluators applied to every candidate, in order
pub const EVALUATORS: [Evaluator; 3] = [
    Evaluator {
        name: "nook_risk",
        evaluate: nook_risk,
    },
    Evaluator {
        name: "collision_risk",
        evaluate: collision_risk,
    },
    Evaluator {
        name: "wall_proximity_reward",
        evaluate: wall_proximity_reward,
    },
];

/// Base score plus the sum of all evaluators (before the supplier weight)
pub fn raw_score(ctx: &TurnContext<'_>, destinations: &[Point], scores: &ScoresConfig) -> f64 {
    scores.base_score
        + EVALUATORS
            .iter()
            .map(|e| (e.evaluate)(ctx, destinations, scores))
            .sum::<f64>()
}

/// Penalty when any destination is a near dead end
pub fn nook_risk(ctx: &TurnContext<'_>, destinations: &[Point], scores: &ScoresConfig) -> f64 {
    let in_nook = destinations
        .iter()
        .any(|&p| ctx.obstacle_neighbours(p) >= scores.nook_threshold);
    if in_nook {
        scores.nook_penalty
    } else {
        0.0
    }
}

/// Penalty when another live head could step onto any destination next turn
pub fn collision_risk(ctx: &TurnContext<'_>, destinations: &[Point], scores: &ScoresConfig) -> f64 {
    if destinations.iter().any(|&p| ctx.next_to_opponent_head(p)) {
        scores.collision_penalty
    } else {
        0.0
    }
}

/// Reward when every destination runs along a wall without being boxed in
pub fn wall_proximity_reward(
    ctx: &TurnContext<'_>,
    destinations: &[Point],
    scores: &ScoresConfig,
) -> f64 {
    let hugging = scores.wall_min_obstacles..=scores.wall_max_obstacles;
    let all_hug = !destinations.is_empty()
        && destinations
            .iter()
            .all(|&p| hugging.contains(&ctx.obstacle_neighbours(p)));
    if all_hug {
        scores.wall_reward
    } else {
        0.0
    }
}
