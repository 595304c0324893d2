use std::str::FromStr;

use itertools::iproduct;
use log::debug;
use thiserror::Error;

use crate::{Case, Grid, Node};

/// Largest number of cells a single case may declare.
pub const MAX_CELLS: u64 = 1 << 24;

/// Why an input could not be turned into cases. Case, obstacle and line
/// numbers are all 1-based.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ParseError {
    #[error("failed to read number of test cases")]
    MissingCount,
    #[error("failed to parse number of test cases")]
    InvalidCount,
    #[error("not enough information for test case {case}: missing {what}")]
    MissingLine { case: usize, what: &'static str },
    #[error("failed to parse {what} for test case {case} (line {line})")]
    InvalidLine {
        case: usize,
        line: usize,
        what: &'static str,
    },
    #[error("invalid grid dimensions for test case {case} (line {line})")]
    InvalidDimensions { case: usize, line: usize },
    #[error(
        "grid of {width}x{height} for test case {case} exceeds {limit} cells (line {line})",
        limit = MAX_CELLS
    )]
    GridTooLarge {
        case: usize,
        line: usize,
        width: i32,
        height: i32,
    },
    #[error("not enough information for obstacle {obstacle} in test case {case}")]
    MissingObstacle { case: usize, obstacle: usize },
    #[error("failed to parse obstacle {obstacle} for test case {case} (line {line})")]
    InvalidObstacle {
        case: usize,
        obstacle: usize,
        line: usize,
    },
    #[error("obstacle {obstacle} for test case {case} is out of grid bounds")]
    ObstacleOutOfBounds { case: usize, obstacle: usize },
    #[error("{which} point {point} for test case {case} is out of grid bounds")]
    PointOutOfBounds {
        case: usize,
        which: &'static str,
        point: Node,
    },
    #[error("{which} point {point} for test case {case} is on an obstacle")]
    PointBlocked {
        case: usize,
        which: &'static str,
        point: Node,
    },
    #[error("extra data found after the declared number of test cases (line {line})")]
    TrailingData { line: usize },
}

// Format:
// first line is the number of test cases, then per case
//   width height
//   startX startY endX endY
//   number of obstacles
//   x1 x2 y1 y2      (one line per obstacle, inclusive rectangle)
//
// Blank lines are only allowed after the last case.
pub fn parse_cases(input: &str) -> Result<Vec<Case>, ParseError> {
    let mut lines = input.lines().enumerate().map(|(ix, text)| (ix + 1, text));

    let (_, text) = lines.next().ok_or(ParseError::MissingCount)?;
    let [count] = fields::<usize, 1>(text).ok_or(ParseError::InvalidCount)?;

    let cases = (1..=count)
        .map(|id| parse_case(&mut lines, id))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some((line, _)) = lines.find(|(_, text)| !text.trim().is_empty()) {
        return Err(ParseError::TrailingData { line });
    }

    debug!("parsed {} cases", cases.len());
    Ok(cases)
}

fn parse_case<'a>(
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
    case: usize,
) -> Result<Case, ParseError> {
    let (line, [width, height]) = record::<i32, 2>(lines, case, "width and height")?;
    if width <= 0 || height <= 0 {
        return Err(ParseError::InvalidDimensions { case, line });
    }
    if width as u64 * height as u64 > MAX_CELLS {
        return Err(ParseError::GridTooLarge {
            case,
            line,
            width,
            height,
        });
    }

    let (_, [x1, y1, x2, y2]) = record::<i32, 4>(lines, case, "start and end points")?;
    let start = Node::new(x1, y1);
    let end = Node::new(x2, y2);

    let (_, [num_obstacles]) = record::<usize, 1>(lines, case, "number of obstacles")?;

    let mut grid = Grid::new(width as usize, height as usize);
    for obstacle in 1..=num_obstacles {
        let (line, text) = lines
            .next()
            .ok_or(ParseError::MissingObstacle { case, obstacle })?;
        let [x1, x2, y1, y2] = fields::<i32, 4>(text).ok_or(ParseError::InvalidObstacle {
            case,
            obstacle,
            line,
        })?;

        for (x, y) in iproduct!(x1..=x2, y1..=y2) {
            let cell = Node::new(x, y);
            if !grid.contains(cell) {
                return Err(ParseError::ObstacleOutOfBounds { case, obstacle });
            }
            grid[cell] = true;
        }
    }

    for (which, point) in [("start", start), ("end", end)] {
        if !grid.contains(point) {
            return Err(ParseError::PointOutOfBounds { case, which, point });
        }
        if grid[point] {
            return Err(ParseError::PointBlocked { case, which, point });
        }
    }

    Ok(Case {
        id: case,
        width: grid.width(),
        height: grid.height(),
        grid,
        start,
        end,
        num_obstacles,
    })
}

fn record<'a, T: FromStr, const N: usize>(
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
    case: usize,
    what: &'static str,
) -> Result<(usize, [T; N]), ParseError> {
    let (line, text) = lines.next().ok_or(ParseError::MissingLine { case, what })?;
    let values = fields(text).ok_or(ParseError::InvalidLine { case, line, what })?;
    Ok((line, values))
}

// exactly N whitespace-separated values
fn fields<T: FromStr, const N: usize>(text: &str) -> Option<[T; N]> {
    let values: Vec<T> = text
        .split_whitespace()
        .map(|token| token.parse().ok())
        .collect::<Option<_>>()?;
    values.try_into().ok()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parse_grid;

    const SAMPLE: &str = "2
5 5
4 0 4 4
1
1 4 2 3
3 3
0 0 2 2
2
1 1 0 2
0 2 1 1
";

    fn error(input: &str) -> String {
        parse_cases(input).unwrap_err().to_string()
    }

    #[test]
    fn single_case_with_obstacles() {
        let cases = parse_cases("1\n5 5\n4 0 4 4\n1\n1 4 2 3").unwrap();
        assert_eq!(
            cases,
            vec![Case {
                id: 1,
                width: 5,
                height: 5,
                grid: parse_grid(".....\n.....\n.####\n.####\n....."),
                start: Node::new(4, 0),
                end: Node::new(4, 4),
                num_obstacles: 1,
            }]
        );
    }

    #[test]
    fn multiple_cases_are_numbered_in_order() {
        let cases = parse_cases(SAMPLE).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].id, 1);
        assert_eq!(cases[1].id, 2);
        assert_eq!(cases[1].num_obstacles, 2);
        assert_eq!(cases[1].grid, parse_grid(".#.\n###\n.#."));
        assert_eq!(cases[1].start, Node::new(0, 0));
        assert_eq!(cases[1].end, Node::new(2, 2));
    }

    #[test]
    fn minimal_and_large_grids() {
        let tiny = parse_cases("1\n1 1\n0 0 0 0\n0").unwrap();
        assert_eq!(tiny[0].grid, Grid::new(1, 1));

        let large = parse_cases("1\n30 30\n0 0 29 29\n0").unwrap();
        assert_eq!((large[0].width, large[0].height), (30, 30));
        assert_eq!(large[0].grid.obstacles(), 0);
    }

    #[test]
    fn blocked_row() {
        let cases = parse_cases("1\n3 3\n0 0 2 2\n1\n0 2 1 1").unwrap();
        assert_eq!(cases[0].grid, parse_grid("...\n###\n..."));
    }

    #[test]
    fn reversed_rectangle_marks_nothing() {
        let cases = parse_cases("1\n3 3\n0 0 2 2\n1\n2 0 1 1").unwrap();
        assert_eq!(cases[0].grid.obstacles(), 0);
        assert_eq!(cases[0].num_obstacles, 1);
    }

    #[test]
    fn trailing_blank_lines_are_ignored() {
        assert_eq!(parse_cases("1\n1 1\n0 0 0 0\n0\n\n  \n").unwrap().len(), 1);
    }

    #[test]
    fn zero_cases() {
        assert_eq!(parse_cases("0").unwrap(), vec![]);
    }

    #[test]
    fn no_input() {
        assert_eq!(error(""), "failed to read number of test cases");
    }

    #[test]
    fn invalid_number_of_cases() {
        assert_eq!(error("a"), "failed to parse number of test cases");
        assert_eq!(error("-1"), "failed to parse number of test cases");
    }

    #[test]
    fn incomplete_case() {
        assert_eq!(
            error("1\n5 5"),
            "not enough information for test case 1: missing start and end points"
        );
        assert_eq!(
            error("2\n1 1\n0 0 0 0\n0"),
            "not enough information for test case 2: missing width and height"
        );
        assert_eq!(
            error("1\n5 5\n0 0 1 1"),
            "not enough information for test case 1: missing number of obstacles"
        );
    }

    #[test]
    fn missing_obstacle() {
        assert_eq!(
            error("1\n5 5\n0 0 1 1\n2\n0 0 3 3"),
            "not enough information for obstacle 2 in test case 1"
        );
    }

    #[test]
    fn extra_data_after_cases() {
        assert_eq!(
            parse_cases("1\n5 5\n4 0 4 4\n0\nextra data"),
            Err(ParseError::TrailingData { line: 5 })
        );
        assert_eq!(
            error("1\n5 5\n4 0 4 4\n0\nextra data"),
            "extra data found after the declared number of test cases (line 5)"
        );
    }

    #[test]
    fn obstacle_out_of_bounds() {
        assert_eq!(
            error("1\n3 3\n0 0 2 2\n1\n0 4 1 1"),
            "obstacle 1 for test case 1 is out of grid bounds"
        );
        assert_eq!(
            parse_cases("1\n3 3\n0 0 2 2\n1\n-1 0 1 1"),
            Err(ParseError::ObstacleOutOfBounds {
                case: 1,
                obstacle: 1
            })
        );
    }

    #[test]
    fn negative_dimensions() {
        assert_eq!(
            parse_cases("1\n-5 5\n0 0 4 4\n0"),
            Err(ParseError::InvalidDimensions { case: 1, line: 2 })
        );
        assert_eq!(
            error("1\n5 0\n0 0 4 4\n0"),
            "invalid grid dimensions for test case 1 (line 2)"
        );
    }

    #[test]
    fn oversized_grid_is_rejected_before_allocating() {
        assert_eq!(
            parse_cases("1\n2147483647 2147483647\n0 0 1 1\n0"),
            Err(ParseError::GridTooLarge {
                case: 1,
                line: 2,
                width: i32::MAX,
                height: i32::MAX
            })
        );
        assert_eq!(
            error("1\n4097 4096\n0 0 1 1\n0"),
            "grid of 4097x4096 for test case 1 exceeds 16777216 cells (line 2)"
        );
        assert_eq!(parse_cases("1\n4096 4096\n0 0 1 1\n0").unwrap().len(), 1);
    }

    #[test]
    fn non_integer_coordinates() {
        assert_eq!(
            error("1\n5 5\na b c d\n0"),
            "failed to parse start and end points for test case 1 (line 3)"
        );
    }

    #[test]
    fn wrong_number_of_fields() {
        assert_eq!(
            parse_cases("1\n5 5 5\n0 0 4 4\n0"),
            Err(ParseError::InvalidLine {
                case: 1,
                line: 2,
                what: "width and height"
            })
        );
        assert_eq!(
            parse_cases("1\n5 5\n0 0 4 4\n1\n0 1 2"),
            Err(ParseError::InvalidObstacle {
                case: 1,
                obstacle: 1,
                line: 5
            })
        );
    }

    #[test]
    fn endpoints_must_be_open_cells() {
        assert_eq!(
            error("1\n3 3\n0 0 3 2\n0"),
            "end point (3, 2) for test case 1 is out of grid bounds"
        );
        assert_eq!(
            error("1\n3 3\n1 1 2 2\n1\n1 1 1 1"),
            "start point (1, 1) for test case 1 is on an obstacle"
        );
    }
}
