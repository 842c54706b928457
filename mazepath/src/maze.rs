use crate::error::{FindError, ParseError};
use crate::find::{PathFinder, PathResult, ProgressSink, SearchConfig};
use crate::graph::{compile_graph, Graph};
use crate::grid::{parse_maze, Grid};
use crate::util::parse_maze_text;

/// One loaded maze: the grid, its compiled graph and the configuration searches over it use.
/// Loading another maze means creating another `Maze`; nothing is shared between instances.
#[derive(Clone, Debug)]
pub struct Maze {
    grid: Grid,
    graph: Graph,
    config: SearchConfig,
}

impl Maze {
    pub fn new(grid: Grid, config: SearchConfig) -> Self {
        let graph = compile_graph(&grid);
        Self {
            grid,
            graph,
            config,
        }
    }

    pub fn from_lines<S: AsRef<str>>(lines: &[S], config: SearchConfig) -> Result<Self, ParseError> {
        Ok(Self::new(parse_maze(lines)?, config))
    }

    pub fn from_text(text: &str, config: SearchConfig) -> Result<Self, ParseError> {
        Ok(Self::new(parse_maze_text(text)?, config))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }

    /// A fresh search from start to end, to be driven step by step
    pub fn path_finder(&self) -> PathFinder {
        PathFinder::new(&self.graph, self.grid.start(), self.grid.end(), self.config)
    }

    pub fn solve<P: ProgressSink + ?Sized>(&self, progress: &mut P) -> Result<PathResult, FindError> {
        self.path_finder().finish(&self.graph, progress)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::find::{PathFinderState, SearchPolicy};
    use crate::grid::Direction;

    #[test]
    fn test_solve() {
        let maze = Maze::from_text("3 4\nS..#\n##.#\nC...\n", SearchConfig::default()).unwrap();
        let result = maze.solve(&mut ()).unwrap();

        assert_eq!(result.distance, Some(6));
        let route = result.route().unwrap();
        assert_eq!(
            route.directions(),
            vec![Direction::Right, Direction::Down, Direction::Left]
        );
        assert_eq!(route.run_lengths(), vec![3, 3, 3]);
    }

    #[test]
    fn test_stepping_matches_solve() {
        let config = SearchConfig {
            policy: SearchPolicy::Exhaustive,
        };
        let maze = Maze::from_lines(&["2 4", "S..C", "...."], config).unwrap();

        let mut finder = maze.path_finder();
        let mut steps = 0;
        while !finder.step(maze.graph(), &mut ()).unwrap().is_done() {
            steps += 1;
        }

        assert!(steps > 1);
        assert_eq!(finder.state(), PathFinderState::Found);
        assert_eq!(
            finder.into_result().distance,
            maze.solve(&mut ()).unwrap().distance
        );
    }
}
