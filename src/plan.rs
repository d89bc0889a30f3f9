// ASCII game plan parser
//
// Each line is one board row. Characters:
//   '*'  obstacle
//   '!'  treasure
//   '+'  battery
//   ' '  empty
//   0-9  head of the agent with that id

use std::collections::HashMap;

use crate::error::{BotError, BotResult};
use crate::game_state::{Agent, GameState, GameStateBuilder};
use crate::types::Point;

pub const OBSTACLE: char = '*';
pub const TREASURE: char = '!';
pub const BATTERY: char = '+';
pub const EMPTY: char = ' ';

/// Parses plan lines into a builder so callers can add ids, liveness and energy
pub fn parse_game_plan<S: AsRef<str>>(lines: &[S]) -> BotResult<GameStateBuilder> {
    let width = assert_rectangular(lines)?;
    let mut builder = GameStateBuilder::new(width as i32, lines.len() as i32);
    let mut heads = HashMap::new();

    for (y, line) in lines.iter().enumerate() {
        for (x, c) in line.as_ref().chars().enumerate() {
            let location = Point::new(x as i32, y as i32);
            builder = match c {
                OBSTACLE => builder.obstacle(location),
                TREASURE => builder.treasure(location),
                BATTERY => builder.battery(location),
                EMPTY => builder,
                digit if digit.is_ascii_digit() => {
                    let id = digit.to_digit(10).unwrap_or_default();
                    if let Some(first) = heads.insert(id, location) {
                        return Err(BotError::Parse(format!(
                            "duplicate agent marker '{}' at {} and {}",
                            digit, first, location
                        )));
                    }
                    builder.agent(Agent::new(id, format!("bot {}", id)).with_segments([location]))
                }
                other => {
                    return Err(BotError::Parse(format!(
                        "unrecognized character {:?} at {}",
                        other, location
                    )))
                }
            };
        }
    }

    Ok(builder)
}

/// Shorthand for plans that need no extra metadata
pub fn game_state_from_plan<S: AsRef<str>>(lines: &[S]) -> BotResult<GameState> {
    Ok(parse_game_plan(lines)?.build())
}

fn assert_rectangular<S: AsRef<str>>(lines: &[S]) -> BotResult<usize> {
    let first = lines
        .first()
        .ok_or_else(|| BotError::Parse("empty game plan".to_string()))?;
    let width = first.as_ref().chars().count();
    if width == 0 {
        return Err(BotError::Parse("empty game plan".to_string()));
    }

    for (i, line) in lines.iter().enumerate() {
        let line_width = line.as_ref().chars().count();
        if line_width != width {
            return Err(BotError::Parse(format!(
                "non-rectangular plan: line {} width ({}) is different from the line 1 width ({})",
                i + 1,
                line_width,
                width
            )));
        }
    }

    Ok(width)
}
