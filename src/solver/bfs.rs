use crate::solver::GridSolver;

/// Breadth-first search: first-in first-out, the first discovery of a cell is final.
#[derive(Clone, Copy, Debug, Default)]
pub struct BfsSolver;

impl GridSolver for BfsSolver {
    fn name(&self) -> &'static str {
        "bfs"
    }
}
