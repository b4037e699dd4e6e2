use grid_util::point::Point;
use thiserror::Error;

/// Failures that stop a search from producing a [SearchReport](crate::path::SearchReport).
///
/// Running out of frontier or being cancelled are not errors, they are reported through
/// [SearchStatus](crate::path::SearchStatus).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("cell ({}, {}) lies outside the grid", .point.y, .point.x)]
    OutOfBounds { point: Point },

    #[error("cell ({}, {}) is a wall", .point.y, .point.x)]
    Blocked { point: Point },

    /// The parent chain broke before the start was reached. Only a corrupted search context
    /// can cause this.
    #[error("no parent recorded for ({}, {}) while reconstructing the path", .point.y, .point.x)]
    MissingParent { point: Point },
}

pub type Result<T> = std::result::Result<T, SearchError>;

/// Problems in the textual grid format accepted by [PathingGrid](crate::pathing_grid::PathingGrid).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridParseError {
    #[error("grid text is empty")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown cell symbol {symbol:?} at ({row}, {col})")]
    UnknownSymbol { symbol: char, row: usize, col: usize },

    #[error("expected exactly one {marker} marker, found {count}")]
    MarkerCount { marker: &'static str, count: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown search algorithm {0:?}")]
pub struct UnknownAlgorithm(pub String);
