//! # grid_visualizer
//!
//! The search engine behind an interactive grid pathfinding visualizer. A [PathingGrid] holds
//! walls, terrain, via points and the start/finish markers; a search strategy
//! ([breadth-first](solver::BfsSolver), [depth-first](solver::DfsSolver),
//! [greedy best-first](solver::GreedySolver) or [A*](solver::AstarSolver)) explores it one
//! frontier iteration at a time, stamping expanded cells as visited and finally drawing the
//! path.
//!
//! All four strategies share a single driver loop ([search::Search]); they only differ in how
//! the frontier is ordered, which node is taken out of it and whether a better route may
//! replace a queued one. Between iterations the driver hands the grid to a [Pacer], which is
//! where a front end renders frames and where the animation speed is applied. Cancellation is
//! cooperative through a [CancellationToken].
//!
//! ```
//! use grid_visualizer::{rc, run_search, NoDelay, PathingGrid, SearchControl, SearchStatus};
//! use grid_visualizer::solver::AstarSolver;
//!
//! let mut grid = PathingGrid::new(5, 5);
//! let report = run_search(
//!     &mut grid,
//!     &AstarSolver::new(),
//!     rc(0, 0),
//!     rc(4, 4),
//!     &[],
//!     &SearchControl::immediate(),
//!     &mut NoDelay,
//! )
//! .unwrap();
//! assert_eq!(report.status, SearchStatus::Found);
//! assert_eq!(report.path_length, 9);
//! ```
pub mod cell;
pub mod control;
pub mod error;
pub mod frontier;
pub mod path;
pub mod pathing_grid;
pub mod search;
pub mod solver;

use grid_util::point::Point;

pub use cell::{Cell, CellState};
pub use control::{
    CancellationToken, NoDelay, Pacer, Pause, SearchControl, StepDelay, ThreadSleep,
};
pub use error::{GridParseError, SearchError};
pub use path::{run_search, SearchReport, SearchStatus};
pub use pathing_grid::{Marker, PathingGrid};
pub use solver::{Algorithm, GridSolver};

/// Cost of entering a terrain cell for cost-aware strategies. Ordinary cells cost 1.
pub const TERRAIN_COST: i32 = 5;
/// Initial delay between search iterations.
pub const DEFAULT_STEP_DELAY_MS: u64 = 1;
/// Delay after each cell stamped onto the drawn path.
pub const PATH_STAMP_DELAY_MS: u64 = 20;
/// Edge length of a drawn cell, used to size a grid from a viewport.
pub const CELL_SIZE_PX: usize = 27;

/// The cell at `row`, `col`. Points store the column in `x` and the row in `y`.
pub fn rc(row: i32, col: i32) -> Point {
    Point::new(col, row)
}
