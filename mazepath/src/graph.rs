use std::{collections::HashMap, fmt::Display};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::grid::{Direction, Grid, Point};

/// Anything the path finder can search over. Nodes are referenced by their grid position.
pub trait MapTrait {
    /// Return an iterator over every node of the map
    fn nodes(&self) -> impl Iterator<Item = Point>;

    /// Return an iterator over the neighbors of the provided node and the run length of the edge
    /// leading there (both endpoints included)
    fn neighbors_of(&self, node: Point) -> impl Iterator<Item = (Point, usize)>;

    /// Total number of directed edges
    fn edge_count(&self) -> usize;
}

/// A straight run from one decision cell to another
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub to: Point,
    /// Number of cells covered by the run, counting both endpoints
    pub weight: usize,
}

/// Compressed maze: only decision cells are nodes, corridors between them are folded into edges.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    adjacency: HashMap<Point, Vec<Edge>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) `node` together with its outgoing edges
    pub fn insert(&mut self, node: Point, edges: Vec<Edge>) {
        self.adjacency.insert(node, edges);
    }

    pub fn contains(&self, node: Point) -> bool {
        self.adjacency.contains_key(&node)
    }

    pub fn edges(&self, node: Point) -> Option<&[Edge]> {
        self.adjacency.get(&node).map(Vec::as_slice)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }
}

impl MapTrait for Graph {
    fn nodes(&self) -> impl Iterator<Item = Point> {
        self.adjacency.keys().copied()
    }

    fn neighbors_of(&self, node: Point) -> impl Iterator<Item = (Point, usize)> {
        self.edges(node)
            .unwrap_or_default()
            .iter()
            .map(|edge| (edge.to, edge.weight))
    }

    fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }
}

impl Display for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut nodes: Vec<&Point> = self.adjacency.keys().collect();
        nodes.sort();

        for node in nodes {
            write!(f, "{}:", node)?;
            for edge in &self.adjacency[node] {
                write!(f, " {}[{}]", edge.to, edge.weight)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Which cells of a grid become graph nodes
struct DecisionCells<'a> {
    grid: &'a Grid,
    flags: Vec<bool>,
}

impl<'a> DecisionCells<'a> {
    fn classify(grid: &'a Grid) -> Self {
        let mut flags = Vec::with_capacity(grid.rows() * grid.columns());
        for row in 0..grid.rows() {
            for col in 0..grid.columns() {
                flags.push(is_decision_cell(grid, Point { row, col }));
            }
        }
        Self { grid, flags }
    }

    fn contains(&self, point: Point) -> bool {
        self.grid.is_valid(point) && self.flags[point.row * self.grid.columns() + point.col]
    }

    /// Follows the corridor leaving `from` in `direction` until it reaches the next decision cell.
    fn cast_ray(&self, from: Point, direction: Direction) -> Option<Edge> {
        let mut current = self.grid.open_neighbor(from, direction)?;
        let mut weight = 2;

        while !self.contains(current) {
            // a corridor cell is open on both sides along its axis
            match self.grid.open_neighbor(current, direction) {
                Some(next) => {
                    current = next;
                    weight += 1;
                }
                None => break,
            }
        }

        Some(Edge {
            to: current,
            weight,
        })
    }
}

/// Start and end always qualify. Any other open cell qualifies unless it is a plain corridor,
/// i.e. open exactly towards two opposite sides. The grid boundary counts as a wall.
fn is_decision_cell(grid: &Grid, point: Point) -> bool {
    if !grid.is_open(point) {
        return false;
    }
    if point == grid.start() || point == grid.end() {
        return true;
    }

    let open: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|direction| grid.open_neighbor(point, *direction).is_some())
        .collect();

    !matches!(
        open.as_slice(),
        [Direction::Up, Direction::Down] | [Direction::Left, Direction::Right]
    )
}

/// Builds the compressed graph of `grid`. Every decision cell except the end gets one edge per
/// open direction; the end is present with no outgoing edges.
pub fn compile_graph(grid: &Grid) -> Graph {
    let decisions = DecisionCells::classify(grid);
    let mut graph = Graph::new();

    for row in 0..grid.rows() {
        for col in 0..grid.columns() {
            let point = Point { row, col };
            if point == grid.end() || !decisions.contains(point) {
                continue;
            }

            let edges = Direction::ALL
                .into_iter()
                .filter_map(|direction| decisions.cast_ray(point, direction))
                .collect();
            graph.insert(point, edges);
        }
    }
    graph.insert(grid.end(), Vec::new());

    debug!(
        "compiled graph: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    graph
}
