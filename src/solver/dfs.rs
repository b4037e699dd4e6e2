use crate::frontier::{Frontier, SearchNode};
use crate::solver::GridSolver;

/// Depth-first search: last-in first-out, the first discovery of a cell is final.
#[derive(Clone, Copy, Debug, Default)]
pub struct DfsSolver;

impl GridSolver for DfsSolver {
    fn name(&self) -> &'static str {
        "dfs"
    }

    fn extract(&self, frontier: &mut Frontier) -> Option<SearchNode> {
        frontier.pop_back()
    }
}
