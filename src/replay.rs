// Replay module for analyzing decision logs
//
// This module provides functionality to:
// 1. Parse JSONL decision logs
// 2. Re-run the decision engine on every logged request
// 3. Compare logged vs replayed moves
// 4. Generate a report

use log::{info, warn};
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::bot::Bot;
use crate::config::Config;
use crate::debug_logger::DecisionLogEntry;
use crate::moves::Move;
use crate::request::MoveRequest;
use crate::types::AgentId;

/// Result of replaying a single logged decision
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub sequence: u64,
    pub agent_id: AgentId,
    pub original_move: Move,
    pub replayed_move: Move,
    pub matches: bool,
    /// Weighted score of the replayed winner; None for the default move
    pub replayed_score: Option<f64>,
    pub supplier: Option<&'static str>,
    pub computation_time_us: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing decision logs
pub struct ReplayEngine {
    bot: Bot,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine {
            bot: Bot::new(config),
            verbose,
        }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<DecisionLogEntry>, String> {
        let file = File::open(log_path.as_ref())
            .map_err(|e| format!("Failed to open log file: {}", e))?;

        Self::parse_log(BufReader::new(file))
    }

    /// Parses JSONL log lines, skipping blank ones
    pub fn parse_log<R: BufRead>(reader: R) -> Result<Vec<DecisionLogEntry>, String> {
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: DecisionLogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Replays a single log entry and compares the result
    pub fn replay_entry(&self, entry: &DecisionLogEntry) -> Result<ReplayResult, String> {
        let original_move: Move = entry
            .chosen_move
            .parse()
            .map_err(|e| format!("Entry #{}: {}", entry.sequence, e))?;

        let request = MoveRequest::parse(&entry.request)
            .map_err(|e| format!("Entry #{}: {}", entry.sequence, e))?;
        if request.agent_id() != entry.agent_id {
            return Err(format!(
                "Entry #{}: logged agent {} does not match request agent {}",
                entry.sequence,
                entry.agent_id,
                request.agent_id()
            ));
        }

        let start_time = Instant::now();
        let state = request
            .game_state()
            .map_err(|e| format!("Entry #{}: {}", entry.sequence, e))?;
        let decision = self
            .bot
            .decide(entry.agent_id, &state)
            .map_err(|e| format!("Entry #{}: {}", entry.sequence, e))?;
        let computation_time_us = start_time.elapsed().as_micros();

        let result = ReplayResult {
            sequence: entry.sequence,
            agent_id: entry.agent_id,
            original_move,
            replayed_move: decision.chosen,
            matches: original_move == decision.chosen,
            replayed_score: decision.winner.as_ref().map(|w| w.score),
            supplier: decision.winner.as_ref().map(|w| w.supplier),
            computation_time_us,
        };

        if self.verbose {
            if result.matches {
                info!(
                    "#{}: MATCH - {} (score: {:?}, supplier: {:?})",
                    result.sequence, result.replayed_move, result.replayed_score, result.supplier
                );
            } else {
                warn!(
                    "#{}: MISMATCH - Original: {}, Replayed: {} (score: {:?}, supplier: {:?})",
                    result.sequence,
                    result.original_move,
                    result.replayed_move,
                    result.replayed_score,
                    result.supplier
                );
            }
        }

        Ok(result)
    }

    /// Replays all entries in parallel; results keep log order
    pub fn replay_all(&self, entries: &[DecisionLogEntry]) -> Vec<ReplayResult> {
        entries
            .par_iter()
            .filter_map(|entry| match self.replay_entry(entry) {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("Failed to replay: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Replays the entries with the given sequence numbers
    pub fn replay_sequences(
        &self,
        entries: &[DecisionLogEntry],
        sequences: &[u64],
    ) -> Result<Vec<ReplayResult>, String> {
        let selected = sequences
            .iter()
            .map(|seq| {
                entries
                    .iter()
                    .find(|e| e.sequence == *seq)
                    .cloned()
                    .ok_or_else(|| format!("Entry #{} not found in log file", seq))
            })
            .collect::<Result<Vec<_>, String>>()?;

        Ok(self.replay_all(&selected))
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let mismatches = total - matches;
        let match_rate = if total > 0 {
            (matches as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total,
            matches,
            mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Decisions: {}", stats.total);
        println!("Matches:         {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:      {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_time: f64 = results.iter().map(|r| r.computation_time_us as f64).sum::<f64>()
                / results.len() as f64;
            println!("Average Computation Time:   {:.1}us\n", avg_time);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "#{} (agent {}): {} → {} (score: {:?}, supplier: {:?})",
                    result.sequence,
                    result.agent_id,
                    result.original_move,
                    result.replayed_move,
                    result.replayed_score,
                    result.supplier
                );
            }
            println!();
        }
    }

    /// Validates that specific expected moves were logged
    pub fn validate_expected_moves(
        &self,
        entries: &[DecisionLogEntry],
        expected_moves: &[(u64, Vec<Move>)], // (sequence, acceptable_moves)
    ) -> Result<(), String> {
        for (sequence, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.sequence == *sequence)
                .ok_or_else(|| format!("Entry #{} not found in log", sequence))?;

            let actual_move: Move = entry
                .chosen_move
                .parse()
                .map_err(|e| format!("Entry #{}: {}", sequence, e))?;

            if !acceptable.contains(&actual_move) {
                return Err(format!(
                    "Entry #{}: Expected one of {:?}, but got {}",
                    sequence,
                    acceptable.iter().map(|m| m.to_string()).collect::<Vec<_>>(),
                    actual_move
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;
    use serde_json::json;

    fn entry(sequence: u64, chosen_move: &str) -> DecisionLogEntry {
        DecisionLogEntry {
            sequence,
            agent_id: 1,
            request: json!({"gamePlan": ["***", "* 1", "***"], "yourBotId": 1}).to_string(),
            chosen_move: chosen_move.to_string(),
            timestamp: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    fn engine() -> ReplayEngine {
        ReplayEngine::new(Config::default_hardcoded(), false)
    }

    #[test]
    fn test_replay_match_and_mismatch() {
        let engine = engine();
        let results = engine.replay_all(&[entry(1, "L"), entry(2, "U")]);
        assert_eq!(results.len(), 2);
        assert!(results[0].matches);
        assert!(!results[1].matches);
        assert_eq!(results[1].replayed_move, Move::single(Direction::Left));

        let stats = engine.generate_stats(&results);
        assert_eq!(stats.matches, 1);
        assert_eq!(stats.mismatches, 1);
        assert_eq!(stats.match_rate, 50.0);
    }

    #[test]
    fn test_bad_logged_move_is_skipped() {
        let engine = engine();
        assert!(engine.replay_entry(&entry(1, "")).is_err());
        assert_eq!(engine.replay_all(&[entry(1, "?"), entry(2, "L")]).len(), 1);
    }

    #[test]
    fn test_replay_sequences() {
        let engine = engine();
        let entries = vec![entry(1, "L"), entry(2, "L"), entry(3, "L")];
        let results = engine.replay_sequences(&entries, &[3, 1]).unwrap();
        assert_eq!(results.iter().map(|r| r.sequence).collect::<Vec<_>>(), vec![3, 1]);
        assert!(engine.replay_sequences(&entries, &[9]).is_err());
    }

    #[test]
    fn test_parse_log_skips_blank_lines() {
        let line = serde_json::to_string(&entry(5, "L")).unwrap();
        let text = format!("{}\n\n{}\n", line, line);
        let entries = ReplayEngine::parse_log(text.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(ReplayEngine::parse_log("{oops".as_bytes()).is_err());
    }

    #[test]
    fn test_validate_expected_moves() {
        let engine = engine();
        let entries = vec![entry(1, "L")];
        let left = Move::single(Direction::Left);
        let up = Move::single(Direction::Up);
        assert!(engine.validate_expected_moves(&entries, &[(1, vec![up, left])]).is_ok());
        assert!(engine.validate_expected_moves(&entries, &[(1, vec![up])]).is_err());
        assert!(engine.validate_expected_moves(&entries, &[(2, vec![left])]).is_err());
    }
}
