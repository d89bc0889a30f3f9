// Move model and the fixed candidate move sets

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::{BotError, BotResult};
use crate::types::{Direction, Point, Topology};

/// One decision: a mandatory first step and an optional lookahead step.
/// Only `step1` is executed by the game; `step2` exists for scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub step1: Direction,
    pub step2: Option<Direction>,
}

impl Move {
    pub const fn single(step1: Direction) -> Self {
        Move { step1, step2: None }
    }

    pub const fn double(step1: Direction, step2: Direction) -> Self {
        Move {
            step1,
            step2: Some(step2),
        }
    }

    /// Builds a move from 1 or 2 steps
    pub fn try_from_steps(steps: &[Direction]) -> BotResult<Self> {
        match steps {
            [] => Err(BotError::InvalidMove("step1 is mandatory".to_string())),
            [step1] => Ok(Move::single(*step1)),
            [step1, step2] => Ok(Move::double(*step1, *step2)),
            _ => Err(BotError::InvalidMove(format!(
                "a move has at most 2 steps, got {}",
                steps.len()
            ))),
        }
    }

    pub fn is_double(&self) -> bool {
        self.step2.is_some()
    }

    pub fn steps(&self) -> impl Iterator<Item = Direction> {
        std::iter::once(self.step1).chain(self.step2)
    }

    /// Cells visited by this move from `origin`, in step order.
    /// Returns None if any step leaves a bounded board.
    pub fn destinations(
        &self,
        origin: Point,
        topology: Topology,
        width: i32,
        height: i32,
    ) -> Option<Vec<Point>> {
        let mut cells = Vec::with_capacity(2);
        let mut current = origin;
        for step in self.steps() {
            current = topology.step(step, current, width, height)?;
            cells.push(current);
        }
        Some(cells)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.step1)?;
        if let Some(step2) = self.step2 {
            write!(f, "{}", step2)?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let steps = s
            .trim()
            .chars()
            .map(|c| {
                Direction::from_char(c)
                    .ok_or_else(|| BotError::InvalidMove(format!("unknown direction '{}' in {:?}", c, s)))
            })
            .collect::<BotResult<Vec<_>>>()?;
        Move::try_from_steps(&steps)
    }
}

/// The fixed candidate sets suppliers draw from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSet {
    /// The 4 single-step moves
    Single,
    /// All 16 ordered direction pairs
    AllDouble,
    /// The 4 pairs repeating one direction (haste)
    StraightDouble,
    /// The 8 pairs of distinct, non-opposite directions (detour)
    DetourDouble,
}

struct MoveTables {
    single: Vec<Move>,
    all_double: Vec<Move>,
    straight_double: Vec<Move>,
    detour_double: Vec<Move>,
}

fn tables() -> &'static MoveTables {
    static TABLES: OnceLock<MoveTables> = OnceLock::new();
    TABLES.get_or_init(|| {
        let single = Direction::all().iter().map(|&d| Move::single(d)).collect();

        let all_double: Vec<Move> = Direction::all()
            .iter()
            .flat_map(|&d1| Direction::all().into_iter().map(move |d2| Move::double(d1, d2)))
            .collect();

        let straight_double = all_double
            .iter()
            .filter(|m| m.step2 == Some(m.step1))
            .copied()
            .collect();

        let detour_double = all_double
            .iter()
            .filter(|m| m.step2 != Some(m.step1) && m.step2 != Some(m.step1.opposite()))
            .copied()
            .collect();

        MoveTables {
            single,
            all_double,
            straight_double,
            detour_double,
        }
    })
}

impl MoveSet {
    pub fn moves(&self) -> &'static [Move] {
        let t = tables();
        match self {
            MoveSet::Single => &t.single,
            MoveSet::AllDouble => &t.all_double,
            MoveSet::StraightDouble => &t.straight_double,
            MoveSet::DetourDouble => &t.detour_double,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::*;

    #[test]
    fn test_move_set_sizes() {
        assert_eq!(MoveSet::Single.moves().len(), 4);
        assert_eq!(MoveSet::AllDouble.moves().len(), 16);
        assert_eq!(MoveSet::StraightDouble.moves().len(), 4);
        assert_eq!(MoveSet::DetourDouble.moves().len(), 8);
    }

    #[test]
    fn test_detour_excludes_straight_and_reversal() {
        for m in MoveSet::DetourDouble.moves() {
            let step2 = m.step2.unwrap();
            assert_ne!(step2, m.step1);
            assert_ne!(step2, m.step1.opposite());
        }
        assert!(MoveSet::DetourDouble.moves().contains(&Move::double(Up, Left)));
        assert!(!MoveSet::DetourDouble.moves().contains(&Move::double(Up, Down)));
    }

    #[test]
    fn test_enumeration_order_is_stable() {
        assert_eq!(MoveSet::Single.moves()[0], Move::single(Up));
        assert_eq!(MoveSet::Single.moves()[3], Move::single(Right));
        assert_eq!(MoveSet::AllDouble.moves()[1], Move::double(Up, Down));
        assert_eq!(MoveSet::StraightDouble.moves()[2], Move::double(Left, Left));
    }

    #[test]
    fn test_move_equality_needs_both_steps() {
        assert_eq!(Move::single(Up), Move::single(Up));
        assert_ne!(Move::single(Up), Move::double(Up, Up));
        assert_ne!(Move::double(Up, Left), Move::double(Left, Up));
    }

    #[test]
    fn test_render_and_parse() {
        assert_eq!(Move::double(Up, Right).to_string(), "UR");
        assert_eq!(Move::single(Down).to_string(), "D");
        assert_eq!("ur".parse::<Move>().unwrap(), Move::double(Up, Right));
        assert_eq!(" L ".parse::<Move>().unwrap(), Move::single(Left));
    }

    #[test]
    fn test_invalid_moves() {
        assert!(matches!("".parse::<Move>(), Err(BotError::InvalidMove(_))));
        assert!(matches!("UDL".parse::<Move>(), Err(BotError::InvalidMove(_))));
        assert!(matches!("X".parse::<Move>(), Err(BotError::InvalidMove(_))));
        assert!(matches!(Move::try_from_steps(&[]), Err(BotError::InvalidMove(_))));
    }

    #[test]
    fn test_destinations_toroidal() {
        let cells = Move::double(Right, Right)
            .destinations(Point::new(3, 0), Topology::Toroidal, 4, 2)
            .unwrap();
        assert_eq!(cells, vec![Point::new(0, 0), Point::new(1, 0)]);
    }

    #[test]
    fn test_destinations_bounded_off_board() {
        let origin = Point::new(1, 1);
        assert_eq!(
            Move::double(Up, Up).destinations(origin, Topology::Bounded, 3, 3),
            None
        );
        assert_eq!(
            Move::double(Up, Left).destinations(origin, Topology::Bounded, 3, 3),
            Some(vec![Point::new(1, 0), Point::new(0, 0)])
        );
    }
}
