//! Shortest paths through text mazes.
//!
//! A maze file is parsed into a [`Grid`], compressed into a [`Graph`] whose nodes are the cells
//! where a walker has a choice (start, end, turns, junctions, dead ends) and whose edges are the
//! straight corridors between them. [`PathFinder`] runs Dijkstra over that graph and the result
//! is turned back into a [`Route`] of straight runs.

pub mod error;
pub mod find;
pub mod graph;
pub mod grid;
pub mod heap;
pub mod maze;
pub mod route;
pub mod util;

pub use error::{Endpoint, FindError, HeapError, ParseError, RouteError};
pub use find::{
    find_shortest_path, find_shortest_path_with, LogSink, PathFinder, PathFinderState, PathResult,
    ProgressEvent, ProgressSink, SearchConfig, SearchPolicy, UNREACHABLE,
};
pub use graph::{compile_graph, Edge, Graph, MapTrait};
pub use grid::{parse_maze, Cell, Direction, Grid, Point};
pub use heap::MinQueue;
pub use maze::Maze;
pub use route::{reconstruct_path, Route, Step};
pub use util::{line_ending, parse_maze_text, split_lines, LineEnding};
