use crate::error::UnknownAlgorithm;
use crate::frontier::{Frontier, SearchNode};
use crate::pathing_grid::PathingGrid;
use core::fmt;
use grid_util::point::Point;
use std::str::FromStr;

pub mod astar;
pub mod bfs;
pub mod dfs;
pub mod greedy;

pub use astar::AstarSolver;
pub use bfs::BfsSolver;
pub use dfs::DfsSolver;
pub use greedy::GreedySolver;

/// [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry) between two cells.
pub fn manhattan(p1: &Point, p2: &Point) -> i32 {
    (p1.x - p2.x).abs() + (p1.y - p2.y).abs()
}

/// Frontier policy of a search strategy. The search driver is written once against this trait;
/// a strategy only decides which node leaves the frontier next, how the frontier is ordered and
/// when a queued node is replaced by a newly discovered route to the same cell.
pub trait GridSolver {
    fn name(&self) -> &'static str;

    /// Removes the next node to expand. The frontier has been sorted by
    /// [priority](Self::priority) beforehand.
    fn extract(&self, frontier: &mut Frontier) -> Option<SearchNode> {
        frontier.pop_front()
    }

    /// Sort key of the frontier, lower first. Ties keep insertion order.
    fn priority(&self, _node: &SearchNode) -> i32 {
        0
    }

    /// Whether `candidate` should take over the frontier slot (and parent) of `existing`.
    fn should_replace(&self, _existing: &SearchNode, _candidate: &SearchNode) -> bool {
        false
    }

    /// Cost of stepping between two adjacent cells. Strategies that ignore cost count hops.
    fn cost(&self, _grid: &PathingGrid, _from: &Point, _to: &Point) -> i32 {
        1
    }

    fn heuristic(&self, point: &Point, goal: &Point) -> i32 {
        manhattan(point, goal)
    }
}

/// The selectable search strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    Bfs,
    Dfs,
    Greedy,
    #[default]
    Astar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Greedy,
        Algorithm::Astar,
    ];

    pub fn solver(self) -> Box<dyn GridSolver> {
        match self {
            Algorithm::Bfs => Box::new(BfsSolver),
            Algorithm::Dfs => Box::new(DfsSolver),
            Algorithm::Greedy => Box::new(GreedySolver),
            Algorithm::Astar => Box::new(AstarSolver::new()),
        }
    }

    /// Short identifier accepted by [FromStr].
    pub fn id(self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::Greedy => "greedy",
            Algorithm::Astar => "astar",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            Algorithm::Bfs => "Breadth-First Search",
            Algorithm::Dfs => "Depth-First Search",
            Algorithm::Greedy => "Greedy Best-First Search",
            Algorithm::Astar => "A* Search",
        };
        f.write_str(label)
    }
}

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_ascii_lowercase();
        Algorithm::ALL
            .into_iter()
            .find(|a| a.id() == id)
            .ok_or(UnknownAlgorithm(s.to_owned()))
    }
}
