use grid_util::point::Point;

use crate::frontier::SearchNode;
use crate::pathing_grid::PathingGrid;
use crate::solver::GridSolver;
use crate::TERRAIN_COST;

/// A* search with the Manhattan heuristic. Ordinary cells cost 1 to enter, terrain costs
/// `terrain_cost`.
#[derive(Clone, Debug)]
pub struct AstarSolver {
    pub terrain_cost: i32,
}

impl AstarSolver {
    pub fn new() -> AstarSolver {
        AstarSolver {
            terrain_cost: TERRAIN_COST,
        }
    }
}

impl Default for AstarSolver {
    fn default() -> AstarSolver {
        AstarSolver::new()
    }
}

impl GridSolver for AstarSolver {
    fn name(&self) -> &'static str {
        "astar"
    }

    fn priority(&self, node: &SearchNode) -> i32 {
        node.estimate()
    }

    fn should_replace(&self, existing: &SearchNode, candidate: &SearchNode) -> bool {
        candidate.cost < existing.cost
    }

    fn cost(&self, grid: &PathingGrid, _from: &Point, to: &Point) -> i32 {
        grid.weighted_step_cost(to, self.terrain_cost)
    }
}
