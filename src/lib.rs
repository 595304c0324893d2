use std::{
    fmt::{self, Display},
    ops::{Add, Index, IndexMut},
};

use itertools::Itertools;

mod parse;
mod run;
mod search;

pub use parse::{parse_cases, ParseError};
pub use run::{solve_all, verify_all, Mismatch};
pub use search::{exhaustive, heuristic, search, solve, Outcome, Search, DIRECTIONS, MAX_SPEED};

/// An integer pair, used both for grid cells and for velocities.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Node {
    pub x: i32,
    pub y: i32,
}

impl Node {
    pub const fn new(x: i32, y: i32) -> Node {
        Node { x, y }
    }
}

impl Add for Node {
    type Output = Node;
    fn add(self, rhs: Node) -> Node {
        Node::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Obstacle map of `width × height` cells; `grid[node]` is `true` for an obstacle.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// An obstacle-free grid.
    pub fn new(width: usize, height: usize) -> Grid {
        Grid {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, node: Node) -> bool {
        node.x >= 0
            && node.y >= 0
            && (node.x as usize) < self.width
            && (node.y as usize) < self.height
    }

    /// In bounds and not an obstacle.
    pub fn is_open(&self, node: Node) -> bool {
        self.contains(node) && !self[node]
    }

    pub fn obstacles(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    fn offset(&self, node: Node) -> usize {
        assert!(self.contains(node), "{} is outside the grid", node);
        node.y as usize * self.width + node.x as usize
    }
}

impl Index<Node> for Grid {
    type Output = bool;
    fn index(&self, node: Node) -> &Self::Output {
        &self.cells[self.offset(node)]
    }
}

impl IndexMut<Node> for Grid {
    fn index_mut(&mut self, node: Node) -> &mut Self::Output {
        let offset = self.offset(node);
        &mut self.cells[offset]
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self
            .cells
            .chunks(self.width.max(1))
            .map(|row| row.iter().map(|&c| if c { WALL } else { OPEN }).collect::<String>())
            .join("\n");
        f.write_str(&rows)
    }
}

const WALL: char = '#';
const OPEN: char = '.';

// Format: one line per row (y grows downwards), a # is an obstacle and
// anything else is open track. Short rows are padded with open cells.
pub fn parse_grid(picture: &str) -> Grid {
    let rows: Vec<&str> = picture.trim().lines().map(str::trim).collect();
    let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);

    let mut grid = Grid::new(width, rows.len());
    for (y, row) in rows.iter().enumerate() {
        for (x, c) in row.chars().enumerate() {
            grid[Node::new(x as i32, y as i32)] = c == WALL;
        }
    }

    grid
}

/// One problem instance as read from the input.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Case {
    /// 1-based position in the input.
    pub id: usize,
    pub width: usize,
    pub height: usize,
    pub grid: Grid,
    pub start: Node,
    pub end: Node,
    /// Number of obstacle rectangles declared for this case.
    pub num_obstacles: usize,
}

impl Case {
    pub fn solve(&self) -> Outcome {
        solve(&self.grid, self.start, self.end)
    }
}
