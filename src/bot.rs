// Decision engine
//
// `Bot` holds only immutable configuration and the supplier tables built from
// it, so one instance can serve any number of concurrent requests.

use log::debug;

use crate::config::{Config, DecisionMode};
use crate::error::BotResult;
use crate::game_state::GameState;
use crate::moves::Move;
use crate::scoring;
use crate::suppliers::{self, MoveSupplier, TurnContext};
use crate::types::{AgentId, Direction};

/// A candidate with its final (weighted) score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMove {
    pub mv: Move,
    pub supplier: &'static str,
    pub score: f64,
}

/// Outcome of one decision, with enough detail for logging and replay
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub chosen: Move,
    /// Winning candidate; None when the default move was used
    pub winner: Option<ScoredMove>,
    /// Number of candidates that survived their supplier's predicate
    pub candidates: usize,
}

impl Decision {
    fn fallback(default_move: Move) -> Self {
        Decision {
            chosen: default_move,
            winner: None,
            candidates: 0,
        }
    }

    pub fn is_default(&self) -> bool {
        self.winner.is_none()
    }
}

pub struct Bot {
    config: Config,
    default_move: Move,
    weighted: Vec<MoveSupplier>,
    first_match: Vec<MoveSupplier>,
    first_match_low_energy: Vec<MoveSupplier>,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        let default_move = config.decision.default_move().unwrap_or_else(|e| {
            log::warn!("{}, falling back to D", e);
            Move::single(Direction::Down)
        });

        Bot {
            default_move,
            weighted: suppliers::weighted_suppliers(&config.weights),
            first_match: suppliers::first_match_suppliers(&config.weights, false),
            first_match_low_energy: suppliers::first_match_suppliers(&config.weights, true),
            config,
        }
    }

    /// Constant name answered to the `NAME` request
    pub fn name(&self) -> &str {
        &self.config.bot.name
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn default_move(&self) -> Move {
        self.default_move
    }

    /// Computes the move for `agent_id` on this snapshot
    pub fn make_move(&self, agent_id: AgentId, state: &GameState) -> BotResult<Move> {
        Ok(self.decide(agent_id, state)?.chosen)
    }

    /// Computes the move and reports how it was reached.
    /// Agents outside the live set, registered or not, get the default move.
    pub fn decide(&self, agent_id: AgentId, state: &GameState) -> BotResult<Decision> {
        if !state.is_live(agent_id) {
            debug!("Agent {} is not live, using default move", agent_id);
            return Ok(Decision::fallback(self.default_move));
        }

        let origin = match state.location(agent_id)? {
            Some(origin) => origin,
            None => {
                debug!("Agent {} has no location, using default move", agent_id);
                return Ok(Decision::fallback(self.default_move));
            }
        };

        let ctx = TurnContext::new(state, agent_id, origin, self.config.decision.topology);

        let decision = match self.config.decision.mode {
            DecisionMode::Weighted => self.decide_weighted(&ctx),
            DecisionMode::FirstMatch => self.decide_first_match(&ctx)?,
        };

        debug!(
            "Agent {} at {}: {} ({} candidates, winner {:?})",
            agent_id, origin, decision.chosen, decision.candidates, decision.winner
        );

        Ok(decision)
    }

    /// Scores every candidate of every supplier and keeps the best.
    /// Ties go to the candidate enumerated last.
    fn decide_weighted(&self, ctx: &TurnContext<'_>) -> Decision {
        let mut scored = self.score_candidates(ctx);

        // sort_by is stable, so equal scores keep enumeration order
        scored.sort_by(|a, b| a.score.total_cmp(&b.score));

        let candidates = scored.len();
        match scored.pop() {
            Some(best) => Decision {
                chosen: best.mv,
                winner: Some(best),
                candidates,
            },
            None => Decision::fallback(self.default_move),
        }
    }

    /// All weighted-mode candidates with their final scores, in enumeration order
    pub fn score_candidates(&self, ctx: &TurnContext<'_>) -> Vec<ScoredMove> {
        let scores = &self.config.scores;
        self.weighted
            .iter()
            .flat_map(|supplier| {
                supplier.candidates(ctx).map(move |candidate| ScoredMove {
                    mv: candidate.mv,
                    supplier: supplier.name,
                    score: scoring::raw_score(ctx, &candidate.destinations, scores) * supplier.weight,
                })
            })
            .collect()
    }

    /// Takes the first candidate of the first supplier that has one
    fn decide_first_match(&self, ctx: &TurnContext<'_>) -> BotResult<Decision> {
        let low_energy = ctx
            .state
            .energy(ctx.agent_id)?
            .is_some_and(|e| e <= self.config.energy.low_energy_threshold);

        let ordered = if low_energy {
            &self.first_match_low_energy
        } else {
            &self.first_match
        };

        for supplier in ordered {
            if let Some(candidate) = supplier.candidates(ctx).next() {
                let raw = scoring::raw_score(ctx, &candidate.destinations, &self.config.scores);
                return Ok(Decision {
                    chosen: candidate.mv,
                    winner: Some(ScoredMove {
                        mv: candidate.mv,
                        supplier: supplier.name,
                        score: raw * supplier.weight,
                    }),
                    candidates: 1,
                });
            }
        }

        Ok(Decision::fallback(self.default_move))
    }
}
