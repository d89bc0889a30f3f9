// Coordinate and topology model
//
// Points use screen orientation: x grows to the right, y grows downward
// (y is the row index of an ASCII game plan).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Agent identifier, unique and stable for the duration of a game
pub type AgentId = u32;

/// 2D coordinate on the board
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Represents the four possible movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all directions in enumeration order
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    /// Unit delta (dx, dy) of this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Single-letter code used on the wire
    pub fn as_char(&self) -> char {
        match self {
            Direction::Up => 'U',
            Direction::Down => 'D',
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }

    pub fn from_char(c: char) -> Option<Direction> {
        match c.to_ascii_uppercase() {
            'U' => Some(Direction::Up),
            'D' => Some(Direction::Down),
            'L' => Some(Direction::Left),
            'R' => Some(Direction::Right),
            _ => None,
        }
    }

    /// Applies the delta without wrapping
    pub fn destination_from(&self, origin: Point) -> Point {
        let (dx, dy) = self.delta();
        Point::new(origin.x + dx, origin.y + dy)
    }

    /// Applies the delta, then wraps each coordinate into [0, dimension)
    pub fn wrapped_destination_from(&self, origin: Point, width: i32, height: i32) -> Point {
        let raw = self.destination_from(origin);
        Point::new(raw.x.rem_euclid(width), raw.y.rem_euclid(height))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Board edge behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Every edge wraps to the opposite edge
    #[default]
    Toroidal,
    /// Edges are walls; stepping off the board is never safe
    Bounded,
}

impl Topology {
    /// Destination of one step, or None if the step leaves a bounded board
    pub fn step(&self, direction: Direction, origin: Point, width: i32, height: i32) -> Option<Point> {
        match self {
            Topology::Toroidal => Some(direction.wrapped_destination_from(origin, width, height)),
            Topology::Bounded => {
                let next = direction.destination_from(origin);
                let inside = (0..width).contains(&next.x) && (0..height).contains(&next.y);
                inside.then_some(next)
            }
        }
    }

    /// The four neighbouring cells of a point, in direction order.
    /// Off-board neighbours are omitted on a bounded board.
    pub fn neighbours(&self, point: Point, width: i32, height: i32) -> Vec<Point> {
        Direction::all()
            .iter()
            .filter_map(|&d| self.step(d, point, width, height))
            .collect()
    }
}
