// Integration tests for the weighted decision mode
//
// Each test builds a snapshot from an ASCII plan on the default toroidal board
// and checks a behavioural property of the chosen move rather than exact scores.

use toroid_bot::bot::Bot;
use toroid_bot::config::Config;
use toroid_bot::game_state::{Agent, GameState};
use toroid_bot::moves::Move;
use toroid_bot::plan::{game_state_from_plan, parse_game_plan};
use toroid_bot::types::{Direction, Point};

const BOT_ID: u32 = 1;

fn go(plan: &[&str]) -> Move {
    let state = game_state_from_plan(plan).expect("plan should parse");
    Bot::new(Config::default_hardcoded())
        .make_move(BOT_ID, &state)
        .expect("decision should succeed")
}

/// Agent walled in on three sides must take the only opening
#[test]
fn test_fills_nook_through_only_opening() {
    let chosen = go(&["***", "* 1", "***"]);
    assert_eq!(chosen.step1, Direction::Left);
}

/// Never step next to another agent's head
#[test]
fn test_avoids_cell_next_to_other_head() {
    let chosen = go(&["1 2  ", "     "]);
    assert_ne!(chosen.step1, Direction::Right);

    // a single row wraps vertically onto itself; the rule still holds
    let chosen = go(&["1 2  "]);
    assert_ne!(chosen.step1, Direction::Right);
}

/// Prefer running along a wall
#[test]
fn test_hugs_wall() {
    let chosen = go(&["    ", " 1  ", " ** ", "    "]);
    assert_eq!(chosen.step1, Direction::Right);
}

/// Moving off the right edge reappears on the left
#[test]
fn test_wraps_around_right_edge() {
    // only way out is through the right edge onto column 0
    let chosen = go(&["****", " **1", "****"]);
    assert_eq!(chosen.step1, Direction::Right);
}

#[test]
fn test_never_steps_onto_obstacle_when_a_free_neighbour_exists() {
    let plans: [&[&str]; 5] = [
        &[" * ", "*1 ", " * "],
        &["* *", "*1*", "***"],
        &["*2* ", " 1  ", "*** ", "  * "],
        &["  *  ", "**1**", "     ", "     "],
        &["1****", "     ", "*  2 "],
    ];

    for plan in plans {
        let state = game_state_from_plan(plan).unwrap();
        let origin = state.location(BOT_ID).unwrap().unwrap();
        let chosen = Bot::new(Config::default_hardcoded())
            .make_move(BOT_ID, &state)
            .unwrap();
        let first = chosen
            .step1
            .wrapped_destination_from(origin, state.width(), state.height());
        assert!(
            !state.obstacles().contains(&first),
            "plan {:?}: {} steps onto obstacle {}",
            plan,
            chosen,
            first
        );
    }
}

#[test]
fn test_same_snapshot_same_move() {
    let state = game_state_from_plan(&["  *   ", " 1  * ", "    2 ", "*     "]).unwrap();
    let bot = Bot::new(Config::default_hardcoded());
    let first = bot.make_move(BOT_ID, &state).unwrap();
    for _ in 0..10 {
        assert_eq!(bot.make_move(BOT_ID, &state).unwrap(), first);
    }
}

#[test]
fn test_boxed_in_agent_falls_back_to_default() {
    let chosen = go(&["***", "*1*", "***"]);
    assert_eq!(chosen, Move::single(Direction::Down));
}

#[test]
fn test_dead_agent_falls_back_to_default() {
    let state = parse_game_plan(&["   ", " 1 ", " 2 "])
        .unwrap()
        .live_agents([2])
        .build();
    let chosen = Bot::new(Config::default_hardcoded())
        .make_move(BOT_ID, &state)
        .unwrap();
    assert_eq!(chosen, Move::single(Direction::Down));
}

#[test]
fn test_configured_default_move() {
    let mut config = Config::default_hardcoded();
    config.decision.default_move = "L".to_string();
    let state = game_state_from_plan(&["***", "*1*", "***"]).unwrap();
    assert_eq!(
        Bot::new(config).make_move(BOT_ID, &state).unwrap(),
        Move::single(Direction::Left)
    );
}

/// Long trails built through the structured path block moves like plan obstacles
#[test]
fn test_body_trail_blocks_moves() {
    // agent 2's trail walls off everything but the cell above agent 1
    let state = GameState::builder(3, 3)
        .agent(Agent::new(1, "me").with_segments([Point::new(1, 1)]))
        .agent(Agent::new(2, "them").with_segments([
            Point::new(0, 2),
            Point::new(1, 2),
            Point::new(2, 2),
            Point::new(2, 1),
            Point::new(0, 1),
        ]))
        .live_agents([1])
        .build();

    let chosen = Bot::new(Config::default_hardcoded())
        .make_move(BOT_ID, &state)
        .unwrap();
    assert_eq!(chosen.step1, Direction::Up);
}
