use crate::error::{Endpoint, ParseError};
use std::{cmp::Ordering, fmt::Display};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Floor,
    Start,
    End,
}

impl Cell {
    fn from_glyph(glyph: char) -> Self {
        match glyph {
            '#' => Cell::Wall,
            'S' => Cell::Start,
            'C' => Cell::End,
            // anything that is not special counts as floor
            _ => Cell::Floor,
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, Cell::Wall)
    }

    pub fn glyph(&self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Floor => '.',
            Cell::Start => 'S',
            Cell::End => 'C',
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in the order rays are cast and edges are stored
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// (row, col) offset of a single move in this direction
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// The direction that leads from `from` to `to`, if the two points differ along exactly one
    /// axis.
    pub fn between(from: Point, to: Point) -> Option<Direction> {
        match (from.row.cmp(&to.row), from.col.cmp(&to.col)) {
            (Ordering::Greater, Ordering::Equal) => Some(Direction::Up),
            (Ordering::Less, Ordering::Equal) => Some(Direction::Down),
            (Ordering::Equal, Ordering::Greater) => Some(Direction::Left),
            (Ordering::Equal, Ordering::Less) => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Direction::Up => 'U',
            Direction::Down => 'D',
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }

    pub fn arrow(&self) -> char {
        match self {
            Direction::Up => '^',
            Direction::Down => 'v',
            Direction::Left => '<',
            Direction::Right => '>',
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Direction::Up => "up",
                Direction::Down => "down",
                Direction::Left => "left",
                Direction::Right => "right",
            }
        )
    }
}

/// A cell position, 0-indexed and row-major. The header line of a maze file is not counted.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Moves `distance` cells in `direction`. Returns `None` when that would leave the
    /// non-negative quadrant.
    pub fn offset(&self, direction: Direction, distance: usize) -> Option<Point> {
        let (dr, dc) = direction.delta();
        let row = offset_axis(self.row, dr, distance)?;
        let col = offset_axis(self.col, dc, distance)?;
        Some(Point { row, col })
    }
}

fn offset_axis(value: usize, delta: isize, distance: usize) -> Option<usize> {
    match delta {
        d if d < 0 => value.checked_sub(distance),
        d if d > 0 => value.checked_add(distance),
        _ => Some(value),
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// An immutable rectangular maze together with its two endpoints
#[derive(Clone, Debug, Serialize)]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
    start: Point,
    end: Point,
}

impl Grid {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn is_valid(&self, point: Point) -> bool {
        point.row < self.rows && point.col < self.columns
    }

    /// Cell at `point`; anything outside the grid reads as a wall
    pub fn get(&self, point: Point) -> Cell {
        if self.is_valid(point) {
            self.cells[point.row * self.columns + point.col]
        } else {
            Cell::Wall
        }
    }

    pub fn is_open(&self, point: Point) -> bool {
        self.get(point).is_open()
    }

    /// The adjacent point in `direction`, if it lies inside the grid and is not a wall
    pub fn open_neighbor(&self, point: Point, direction: Direction) -> Option<Point> {
        point
            .offset(direction, 1)
            .filter(|next| self.is_valid(*next) && self.is_open(*next))
    }

    /// Draws the maze with the cells of `path` (start to end, inclusive) replaced by arrows
    /// pointing towards the next cell.
    pub fn render_path(&self, path: &[Point]) -> String {
        let mut glyphs: Vec<char> = self.cells.iter().map(Cell::glyph).collect();

        for pair in path.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if self.get(from) != Cell::Floor {
                continue;
            }
            if let Some(direction) = Direction::between(from, to) {
                glyphs[from.row * self.columns + from.col] = direction.arrow();
            }
        }

        let mut out = String::with_capacity(self.rows * (self.columns + 1));
        for row in glyphs.chunks(self.columns) {
            out.extend(row);
            out.push('\n');
        }
        out
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.columns) {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Parses a maze from its lines. The first line holds `"<rows> <cols>"`, followed by `rows` lines
/// of exactly `cols` glyphs each. A single trailing empty line is dropped before validation.
pub fn parse_maze<S: AsRef<str>>(lines: &[S]) -> Result<Grid, ParseError> {
    let mut lines: Vec<&str> = lines
        .iter()
        .map(|line| line.as_ref().trim_end_matches('\r'))
        .collect();
    // rows are never zero width, so an empty last line cannot be data
    if lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    let header = lines.first().copied().unwrap_or_default();
    let (rows, columns) = parse_header(header).ok_or_else(|| ParseError::MalformedHeader {
        line: header.to_string(),
    })?;

    let data = &lines[1..];
    if data.len() < rows {
        return Err(ParseError::RowCountMismatch {
            expected: rows,
            found: data.len(),
        });
    }
    if data.len() > rows {
        warn!(
            "ignoring {} lines after the declared {} rows",
            data.len() - rows,
            rows
        );
    }

    let mut cells = Vec::with_capacity(rows * columns);
    let mut start: Option<Point> = None;
    let mut end: Option<Point> = None;

    for (row, line) in data.iter().take(rows).enumerate() {
        let found = line.chars().count();
        if found != columns {
            return Err(ParseError::RowLengthMismatch {
                row,
                expected: columns,
                found,
            });
        }

        for (col, glyph) in line.chars().enumerate() {
            let cell = Cell::from_glyph(glyph);
            let point = Point { row, col };
            match cell {
                Cell::Start => record_endpoint(&mut start, point, Endpoint::Start)?,
                Cell::End => record_endpoint(&mut end, point, Endpoint::End)?,
                _ => {}
            }
            cells.push(cell);
        }
    }

    let start = start.ok_or(ParseError::MissingEndpoint(Endpoint::Start))?;
    let end = end.ok_or(ParseError::MissingEndpoint(Endpoint::End))?;

    debug!(
        "parsed {}x{} maze, start {} end {}",
        rows, columns, start, end
    );

    Ok(Grid {
        rows,
        columns,
        cells,
        start,
        end,
    })
}

fn parse_header(line: &str) -> Option<(usize, usize)> {
    let mut parts = line.split_whitespace().map(str::parse::<usize>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(rows)), Some(Ok(columns)), None) if rows > 0 && columns > 0 => {
            // the cell count must be addressable
            rows.checked_mul(columns).map(|_| (rows, columns))
        }
        _ => None,
    }
}

fn record_endpoint(
    slot: &mut Option<Point>,
    point: Point,
    endpoint: Endpoint,
) -> Result<(), ParseError> {
    match slot {
        Some(first) => Err(ParseError::DuplicateEndpoint {
            endpoint,
            first: *first,
            second: point,
        }),
        None => {
            *slot = Some(point);
            Ok(())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let grid = parse_maze(&["2 3", "S.#", "#.C"]).unwrap();

        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.columns(), 3);
        assert_eq!(grid.start(), Point::new(0, 0));
        assert_eq!(grid.end(), Point::new(1, 2));
        assert_eq!(grid.get(Point::new(0, 2)), Cell::Wall);
        assert_eq!(grid.get(Point::new(1, 1)), Cell::Floor);
        assert_eq!(grid.to_string(), "S.#\n#.C\n");
    }

    #[test]
    fn test_unknown_glyphs_are_floor() {
        let grid = parse_maze(&["1 5", "S x C"]).unwrap();
        assert_eq!(grid.get(Point::new(0, 1)), Cell::Floor);
        assert_eq!(grid.get(Point::new(0, 2)), Cell::Floor);
    }

    #[test]
    fn test_trailing_blank_line_and_carriage_returns() {
        let grid = parse_maze(&["1 3\r", "S.C\r", ""]).unwrap();
        assert_eq!(grid.end(), Point::new(0, 2));

        // only one trailing blank line is tolerated, a second one is a real (short) row
        assert_eq!(
            parse_maze(&["2 3", "S.C", "", ""]).unwrap_err(),
            ParseError::RowLengthMismatch {
                row: 1,
                expected: 3,
                found: 0
            }
        );
    }

    #[test]
    fn test_last_row_of_spaces_is_data() {
        let grid = parse_maze(&["2 3", "S.C", "   "]).unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.get(Point::new(1, 1)), Cell::Floor);

        let grid = parse_maze(&["2 3", "S.C", "   ", ""]).unwrap();
        assert_eq!(grid.rows(), 2);
    }

    #[test]
    fn test_malformed_header() {
        for header in ["", "3", "3 x", "0 3", "3 -1", "3 3 3", "abc def"] {
            assert_eq!(
                parse_maze(&[header, "S.C"]).unwrap_err(),
                ParseError::MalformedHeader {
                    line: header.to_string()
                },
                "header {:?}",
                header
            );
        }
        assert!(matches!(
            parse_maze::<&str>(&[]),
            Err(ParseError::MalformedHeader { .. })
        ));
    }

    #[test]
    fn test_row_mismatches() {
        assert_eq!(
            parse_maze(&["2 3", "S.C", "##"]).unwrap_err(),
            ParseError::RowLengthMismatch {
                row: 1,
                expected: 3,
                found: 2
            }
        );
        assert_eq!(
            parse_maze(&["3 3", "S.C", "###"]).unwrap_err(),
            ParseError::RowCountMismatch {
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_extra_rows_are_ignored() {
        let grid = parse_maze(&["1 3", "S.C", "###"]).unwrap();
        assert_eq!(grid.rows(), 1);
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(
            parse_maze(&["1 3", "..C"]).unwrap_err(),
            ParseError::MissingEndpoint(Endpoint::Start)
        );
        assert_eq!(
            parse_maze(&["1 3", "S.."]).unwrap_err(),
            ParseError::MissingEndpoint(Endpoint::End)
        );
        assert_eq!(
            parse_maze(&["1 4", "S.SC"]).unwrap_err(),
            ParseError::DuplicateEndpoint {
                endpoint: Endpoint::Start,
                first: Point::new(0, 0),
                second: Point::new(0, 2),
            }
        );
    }

    #[test]
    fn test_direction_between() {
        let p = Point::new(2, 2);
        assert_eq!(Direction::between(p, Point::new(0, 2)), Some(Direction::Up));
        assert_eq!(Direction::between(p, Point::new(5, 2)), Some(Direction::Down));
        assert_eq!(Direction::between(p, Point::new(2, 0)), Some(Direction::Left));
        assert_eq!(Direction::between(p, Point::new(2, 9)), Some(Direction::Right));
        assert_eq!(Direction::between(p, p), None);
        assert_eq!(Direction::between(p, Point::new(3, 3)), None);
    }

    #[test]
    fn test_offset_and_neighbors() {
        let grid = parse_maze(&["2 2", "S#", ".C"]).unwrap();
        let origin = Point::new(0, 0);

        assert_eq!(origin.offset(Direction::Up, 1), None);
        assert_eq!(origin.offset(Direction::Right, 3), Some(Point::new(0, 3)));
        assert_eq!(grid.open_neighbor(origin, Direction::Right), None);
        assert_eq!(
            grid.open_neighbor(origin, Direction::Down),
            Some(Point::new(1, 0))
        );
        assert_eq!(grid.open_neighbor(Point::new(1, 1), Direction::Down), None);
    }

    #[test]
    fn test_render_path() {
        let grid = parse_maze(&["2 3", "S..", "#.C"]).unwrap();
        let path = [
            Point::new(0, 0),
            Point::new(0, 1),
            Point::new(1, 1),
            Point::new(1, 2),
        ];
        assert_eq!(grid.render_path(&path), "Sv.\n#>C\n");
    }
}
