use crate::grid::Point;

/// Which of the two special cells an endpoint error refers to
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Endpoint {
    Start,
    End,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Start => write!(f, "start ('S')"),
            Endpoint::End => write!(f, "end ('C')"),
        }
    }
}

/// Errors that reject a maze while it is being loaded. Nothing of a maze that fails to parse is
/// kept around.
#[derive(thiserror::Error, Debug, Eq, PartialEq)]
pub enum ParseError {
    #[error("malformed header {line:?}: expected two positive integers \"<rows> <cols>\"")]
    MalformedHeader { line: String },

    #[error("row {row} has {found} cells, expected {expected}")]
    RowLengthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("expected {expected} rows but only {found} were present")]
    RowCountMismatch { expected: usize, found: usize },

    #[error("maze has no {0} cell")]
    MissingEndpoint(Endpoint),

    #[error("maze has more than one {endpoint} cell: {first} and {second}")]
    DuplicateEndpoint {
        endpoint: Endpoint,
        first: Point,
        second: Point,
    },
}

#[derive(thiserror::Error, Debug, Eq, PartialEq)]
pub enum HeapError {
    #[error("capacity {capacity} is less than the {provided} provided entries")]
    CapacityError { capacity: usize, provided: usize },

    #[error("heap has reached its capacity of {0}, can't push new items")]
    HeapFull(usize),
}

/// Failures of the search engine itself. "No path" is not one of them, see
/// [`crate::PathFinderState::Exhausted`].
#[derive(thiserror::Error, Debug, Eq, PartialEq)]
pub enum FindError {
    #[error("frontier heap failure: {0}")]
    Heap(#[from] HeapError),
}

#[derive(thiserror::Error, Debug, Eq, PartialEq)]
pub enum RouteError {
    #[error("end {0} is not reachable from the start")]
    UnreachableEnd(Point),

    /// The predecessor links are inconsistent. Valid search results never produce this.
    #[error("invalid predecessor chain at {at}: {reason}")]
    InvalidPredecessorChain { at: Point, reason: &'static str },
}
