use std::fmt::{self, Display};

use log::debug;
use pathfinding::directed::{astar::astar, bfs::bfs};
use smallvec::SmallVec;

use crate::{Grid, Node};

/// Largest absolute value either velocity component may take.
pub const MAX_SPEED: i32 = 3;

/// Acceleration choices available on every hop, coasting included.
pub const DIRECTIONS: [Node; 9] = [
    Node::new(-1, -1),
    Node::new(-1, 0),
    Node::new(-1, 1),
    Node::new(0, -1),
    Node::new(0, 0),
    Node::new(0, 1),
    Node::new(1, -1),
    Node::new(1, 0),
    Node::new(1, 1),
];

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Outcome {
    Optimal(u32),
    NoSolution,
}

impl Outcome {
    pub fn hops(self) -> Option<u32> {
        match self {
            Outcome::Optimal(hops) => Some(hops),
            Outcome::NoSolution => None,
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Optimal(hops) => write!(f, "Optimal solution takes {} hops.", hops),
            Outcome::NoSolution => f.write_str("No solution."),
        }
    }
}

/// The result of a search together with how much work it took.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Search {
    /// States whose successors were generated.
    pub expanded: usize,
    /// Successors produced by those expansions, plus the start state.
    pub generated: usize,
    pub outcome: Outcome,
}

// (position, velocity)
type State = (Node, Node);

/// Lower bound on the hops needed to get from `from` to `to`.
///
/// A hop moves at most [`MAX_SPEED`] cells along each axis, so the Chebyshev
/// distance divided by it (rounded up) never overestimates, and it changes by
/// at most one between neighbouring states.
pub fn heuristic(from: Node, to: Node) -> u32 {
    let distance = from.x.abs_diff(to.x).max(from.y.abs_diff(to.y));
    distance.div_ceil(MAX_SPEED as u32)
}

// every legal (position, velocity) reachable in one hop
fn moves(grid: &Grid, point: Node, velocity: Node) -> SmallVec<[State; 9]> {
    DIRECTIONS
        .iter()
        .filter_map(|&delta| {
            let velocity = velocity + delta;
            if velocity.x.abs() > MAX_SPEED || velocity.y.abs() > MAX_SPEED {
                return None;
            }

            // only the landing cell matters, cells flown over are not checked
            let point = point + velocity;
            grid.is_open(point).then_some((point, velocity))
        })
        .collect()
}

/// Find the fewest hops from `start` (at rest) to `end`.
///
/// `start` and `end` are trusted to be open cells of `grid`; nothing here
/// checks them beyond what expanding the search does naturally.
pub fn solve(grid: &Grid, start: Node, end: Node) -> Outcome {
    search(grid, start, end).outcome
}

/// A* over (position, velocity) states, reporting search effort as well.
///
/// Every hop costs 1. Among states with the same estimated total, the one
/// with the most hops so far is tried first.
pub fn search(grid: &Grid, start: Node, end: Node) -> Search {
    let mut expanded = 0;
    let mut generated = 1;

    let result: Option<(Vec<State>, u32)> = astar(
        &(start, Node::default()),
        |&(point, velocity)| {
            let buffer = moves(grid, point, velocity);

            expanded += 1;
            generated += buffer.len();

            buffer.into_iter().map(|state| (state, 1))
        },
        |&(point, _)| heuristic(point, end),
        |&(point, _)| point == end,
    );

    let outcome = match result {
        Some((_states, hops)) => Outcome::Optimal(hops),
        None => Outcome::NoSolution,
    };

    debug!(
        "search {} -> {}: {} (expanded {}, generated {})",
        start, end, outcome, expanded, generated
    );

    Search {
        expanded,
        generated,
        outcome,
    }
}

/// Brute-force breadth-first search over the same state graph as [`solve`].
///
/// Much slower; used to cross-check the A* answer.
pub fn exhaustive(grid: &Grid, start: Node, end: Node) -> Outcome {
    exhaustive_from(grid, start, Node::default(), end)
}

pub(crate) fn exhaustive_from(grid: &Grid, point: Node, velocity: Node, end: Node) -> Outcome {
    let path = bfs(
        &(point, velocity),
        |&(point, velocity)| moves(grid, point, velocity),
        |&(point, _)| point == end,
    );

    match path {
        Some(path) => Outcome::Optimal(path.len() as u32 - 1),
        None => Outcome::NoSolution,
    }
}
