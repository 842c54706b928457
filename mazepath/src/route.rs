use std::{collections::HashMap, fmt::Display};

use serde::{Deserialize, Serialize};

use crate::error::RouteError;
use crate::grid::{Direction, Point};

/// One straight run of a route
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub direction: Direction,
    /// Cells covered by the run, both ends included
    pub run_length: usize,
}

/// A path from start to end as a sequence of straight runs.
///
/// `total_length` counts single-cell moves, so consecutive runs do not count the cell they share
/// twice and a route from a cell to itself has length 0.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub steps: Vec<Step>,
    pub total_length: usize,
}

impl Route {
    pub fn from_steps(steps: Vec<Step>) -> Self {
        let total_length = steps.iter().map(|step| step.run_length.saturating_sub(1)).sum();
        Self {
            steps,
            total_length,
        }
    }

    pub fn directions(&self) -> Vec<Direction> {
        self.steps.iter().map(|step| step.direction).collect()
    }

    pub fn run_lengths(&self) -> Vec<usize> {
        self.steps.iter().map(|step| step.run_length).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of cells on the path, start and end included
    pub fn cell_count(&self) -> usize {
        self.total_length + 1
    }

    /// Where the route ends when walked from `start`
    pub fn destination(&self, start: Point) -> Option<Point> {
        self.steps.iter().try_fold(start, |at, step| {
            at.offset(step.direction, step.run_length.saturating_sub(1))
        })
    }

    /// Every cell visited when walking the route from `start`, one per move
    pub fn cells(&self, start: Point) -> Vec<Point> {
        let mut cells = Vec::with_capacity(self.cell_count());
        cells.push(start);

        let mut current = start;
        for step in &self.steps {
            for _ in 1..step.run_length {
                match current.offset(step.direction, 1) {
                    Some(next) => current = next,
                    None => return cells,
                }
                cells.push(current);
            }
        }
        cells
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}{}", step.direction.as_char(), step.run_length)?;
        }
        Ok(())
    }
}

/// Walks the predecessor links back from `end` to `start` and returns the route in start to end
/// order.
pub fn reconstruct_path(
    predecessors: &HashMap<Point, Point>,
    start: Point,
    end: Point,
) -> Result<Route, RouteError> {
    let mut steps = Vec::new();
    let mut current = end;

    while current != start {
        let previous = match predecessors.get(&current) {
            Some(previous) => *previous,
            None if current == end => return Err(RouteError::UnreachableEnd(end)),
            None => {
                return Err(RouteError::InvalidPredecessorChain {
                    at: current,
                    reason: "missing predecessor",
                })
            }
        };

        // every hop uses up one link, more hops than links means the chain loops
        if steps.len() >= predecessors.len() {
            return Err(RouteError::InvalidPredecessorChain {
                at: current,
                reason: "chain does not lead back to the start",
            });
        }

        let direction =
            Direction::between(previous, current).ok_or(RouteError::InvalidPredecessorChain {
                at: current,
                reason: "predecessor is not on the same row or column",
            })?;

        steps.push(Step {
            direction,
            run_length: previous.row.abs_diff(current.row)
                + previous.col.abs_diff(current.col)
                + 1,
        });
        current = previous;
    }

    steps.reverse();
    Ok(Route::from_steps(steps))
}
