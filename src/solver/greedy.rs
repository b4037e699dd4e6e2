use crate::frontier::SearchNode;
use crate::solver::GridSolver;

/// Greedy best-first search. Expands the queued cell closest to the target by heuristic alone
/// and ignores the cost travelled so far.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedySolver;

impl GridSolver for GreedySolver {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn priority(&self, node: &SearchNode) -> i32 {
        node.heuristic
    }

    fn should_replace(&self, existing: &SearchNode, candidate: &SearchNode) -> bool {
        candidate.heuristic < existing.heuristic
    }
}
