use std::collections::{HashMap, HashSet};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::{FindError, RouteError};
use crate::graph::MapTrait;
use crate::grid::Point;
use crate::heap::MinQueue;
use crate::route::{reconstruct_path, Route};

/// Distance of a node that has not been reached (yet)
pub const UNREACHABLE: usize = usize::MAX;

/// When the search is allowed to stop
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum SearchPolicy {
    /// Stop as soon as the goal is taken off the frontier. Sufficient because all edge weights
    /// are positive.
    #[default]
    EarlyExit,
    /// Keep going until the frontier is empty, computing distances to every reachable node.
    Exhaustive,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub policy: SearchPolicy,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum PathFinderState {
    Unstarted,
    Running,
    Found,
    Exhausted,
}

impl PathFinderState {
    pub fn is_done(&self) -> bool {
        matches!(self, PathFinderState::Found | PathFinderState::Exhausted)
    }
}

/// Receives notifications while a search runs, e.g. to animate it. Notifications never influence
/// the search, every method defaults to doing nothing.
pub trait ProgressSink {
    /// `point` was taken off the frontier and its distance is final
    fn on_visit(&mut self, _point: Point) {}

    /// A shorter distance to `point` was found
    fn on_relax(&mut self, _point: Point, _distance: usize) {}

    /// The edge `from -> to` was looked at
    fn on_edge_explored(&mut self, _from: Point, _to: Point) {}
}

impl ProgressSink for () {}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ProgressEvent {
    Visited(Point),
    Relaxed { point: Point, distance: usize },
    EdgeExplored { from: Point, to: Point },
}

/// Buffers the events so they can be replayed at a different pace
impl ProgressSink for Vec<ProgressEvent> {
    fn on_visit(&mut self, point: Point) {
        self.push(ProgressEvent::Visited(point));
    }

    fn on_relax(&mut self, point: Point, distance: usize) {
        self.push(ProgressEvent::Relaxed { point, distance });
    }

    fn on_edge_explored(&mut self, from: Point, to: Point) {
        self.push(ProgressEvent::EdgeExplored { from, to });
    }
}

/// Forwards every event to the `trace` log level
#[derive(Copy, Clone, Debug, Default)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn on_visit(&mut self, point: Point) {
        trace!("visit {}", point);
    }

    fn on_relax(&mut self, point: Point, distance: usize) {
        trace!("relax {} to {}", point, distance);
    }

    fn on_edge_explored(&mut self, from: Point, to: Point) {
        trace!("explore {} -> {}", from, to);
    }
}

/// Outcome of a finished search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResult {
    pub start: Point,
    pub goal: Point,
    /// Moves needed to reach the goal, `None` if it cannot be reached
    pub distance: Option<usize>,
    pub predecessors: HashMap<Point, Point>,
    pub status: PathFinderState,
}

impl PathResult {
    pub fn is_found(&self) -> bool {
        self.status == PathFinderState::Found
    }

    /// The route to the goal. Fails with [`RouteError::UnreachableEnd`] if the search did not
    /// find one.
    pub fn route(&self) -> Result<Route, RouteError> {
        if !self.is_found() {
            return Err(RouteError::UnreachableEnd(self.goal));
        }
        reconstruct_path(&self.predecessors, self.start, self.goal)
    }
}

/// Dijkstra search over a [`MapTrait`], advanced one frontier entry at a time with
/// [`PathFinder::step`] so a host can observe it in between.
///
/// Edge weights are run lengths that include both end cells. Every hop therefore adds
/// `weight - 1` to the distance, which keeps the shared cell between two consecutive runs from
/// being counted twice; distances come out as the number of single-cell moves.
///
/// The frontier has no decrease-key. An improved distance pushes a fresh entry and the outdated
/// one is skipped when it comes up, since its node is finalized by then.
#[derive(Debug)]
pub struct PathFinder {
    start: Point,
    goal: Point,
    config: SearchConfig,
    distances: HashMap<Point, usize>,
    predecessors: HashMap<Point, Point>,
    finalized: HashSet<Point>,
    frontier: MinQueue,
    state: PathFinderState,
}

impl PathFinder {
    pub fn new<M: MapTrait>(map: &M, start: Point, goal: Point, config: SearchConfig) -> Self {
        let distances = map.nodes().map(|node| (node, UNREACHABLE)).collect();
        // a node is finalized once, so each edge leads to at most one push, plus the seed
        let frontier = MinQueue::new(map.edge_count() + 1);

        Self {
            start,
            goal,
            config,
            distances,
            predecessors: HashMap::new(),
            finalized: HashSet::new(),
            frontier,
            state: PathFinderState::Unstarted,
        }
    }

    /// Runs until the search is done
    pub fn finish<M: MapTrait, P: ProgressSink + ?Sized>(
        mut self,
        map: &M,
        progress: &mut P,
    ) -> Result<PathResult, FindError> {
        self.run(map, progress, || false)?;
        Ok(self.into_result())
    }

    /// Runs until the search is done or `should_abort` returns true. The abort check is polled
    /// once before every step.
    pub fn run<M: MapTrait, P: ProgressSink + ?Sized, A: FnMut() -> bool>(
        &mut self,
        map: &M,
        progress: &mut P,
        mut should_abort: A,
    ) -> Result<PathFinderState, FindError> {
        loop {
            if self.state.is_done() {
                return Ok(self.state);
            }
            if should_abort() {
                self.abort();
                return Ok(self.state);
            }
            self.step(map, progress)?;
        }
    }

    /// Advances the search by one frontier entry. The first call only seeds the frontier with the
    /// start.
    pub fn step<M: MapTrait, P: ProgressSink + ?Sized>(
        &mut self,
        map: &M,
        progress: &mut P,
    ) -> Result<PathFinderState, FindError> {
        match self.state {
            PathFinderState::Found | PathFinderState::Exhausted => return Ok(self.state),
            PathFinderState::Unstarted => {
                self.distances.insert(self.start, 0);
                self.frontier.push(self.start, 0)?;
                self.state = PathFinderState::Running;
                debug!("searching from {} to {}", self.start, self.goal);
                return Ok(self.state);
            }
            PathFinderState::Running => {}
        }

        let Some((current, priority)) = self.frontier.pop_entry() else {
            self.state = match (self.config.policy, self.distance(self.goal)) {
                (SearchPolicy::Exhaustive, Some(_)) => PathFinderState::Found,
                _ => PathFinderState::Exhausted,
            };
            debug!(
                "frontier empty after {} nodes: {:?}",
                self.finalized.len(),
                self.state
            );
            return Ok(self.state);
        };

        if !self.finalized.insert(current) {
            trace!("skipping stale entry {} ({})", current, priority);
            return Ok(self.state);
        }
        progress.on_visit(current);

        if current == self.goal && self.config.policy == SearchPolicy::EarlyExit {
            self.state = PathFinderState::Found;
            debug!(
                "reached {} at distance {} after {} nodes",
                current,
                priority,
                self.finalized.len()
            );
            return Ok(self.state);
        }

        let base = self.distances.get(&current).copied().unwrap_or(priority);
        for (neighbor, weight) in map.neighbors_of(current) {
            progress.on_edge_explored(current, neighbor);
            if self.finalized.contains(&neighbor) {
                continue;
            }

            let candidate = base + weight.saturating_sub(1);
            let known = self.distances.entry(neighbor).or_insert(UNREACHABLE);
            if candidate < *known {
                *known = candidate;
                self.predecessors.insert(neighbor, current);
                progress.on_relax(neighbor, candidate);
                self.frontier.push(neighbor, candidate)?;
            }
        }

        Ok(self.state)
    }

    /// Stops the search for good and throws away everything computed so far
    pub fn abort(&mut self) {
        debug!("search from {} aborted", self.start);
        self.frontier.clear();
        self.finalized.clear();
        self.predecessors.clear();
        self.distances
            .values_mut()
            .for_each(|distance| *distance = UNREACHABLE);
        self.state = PathFinderState::Exhausted;
    }

    pub fn into_result(self) -> PathResult {
        let distance = match self.state {
            PathFinderState::Found => self.distance(self.goal),
            _ => None,
        };

        PathResult {
            start: self.start,
            goal: self.goal,
            distance,
            predecessors: self.predecessors,
            status: self.state,
        }
    }

    pub fn state(&self) -> PathFinderState {
        self.state
    }

    /// Best known distance to `point`
    pub fn distance(&self, point: Point) -> Option<usize> {
        self.distances
            .get(&point)
            .copied()
            .filter(|distance| *distance != UNREACHABLE)
    }

    pub fn distances(&self) -> &HashMap<Point, usize> {
        &self.distances
    }

    pub fn predecessors(&self) -> &HashMap<Point, Point> {
        &self.predecessors
    }

    pub fn is_finalized(&self, point: Point) -> bool {
        self.finalized.contains(&point)
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn goal(&self) -> Point {
        self.goal
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }
}

/// Searches `map` with the default (early exit) configuration
pub fn find_shortest_path<M: MapTrait, P: ProgressSink + ?Sized>(
    map: &M,
    start: Point,
    goal: Point,
    progress: &mut P,
) -> Result<PathResult, FindError> {
    find_shortest_path_with(map, start, goal, SearchConfig::default(), progress)
}

pub fn find_shortest_path_with<M: MapTrait, P: ProgressSink + ?Sized>(
    map: &M,
    start: Point,
    goal: Point,
    config: SearchConfig,
    progress: &mut P,
) -> Result<PathResult, FindError> {
    PathFinder::new(map, start, goal, config).finish(map, progress)
}
