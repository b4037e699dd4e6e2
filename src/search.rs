use crate::error::{Result, SearchError};
use crate::frontier::{Frontier, FxIndexMap, SearchNode};
use crate::pathing_grid::PathingGrid;
use crate::solver::GridSolver;
use grid_util::point::Point;
use log::{debug, warn};

/// Parent index of the root of the search tree.
pub(crate) const ROOT: usize = usize::MAX;

/// Frontier and parent map of a search, reused across the legs of a via search.
///
/// The parent map is keyed by cell and stores the insertion index of the parent cell in the same
/// map, so the search tree is a flat list of back references rather than linked nodes. Entries
/// are never removed during a leg, which keeps every stored index valid; a decrease-key only
/// overwrites the parent index in place.
#[derive(Clone, Debug, Default)]
pub struct SearchContext {
    pub(crate) frontier: Frontier,
    pub(crate) parents: FxIndexMap<Point, usize>,
    pub(crate) expanded: Vec<Point>,
}

impl SearchContext {
    pub fn new() -> SearchContext {
        SearchContext::default()
    }

    pub fn reset(&mut self) {
        self.frontier.clear();
        self.parents.clear();
        self.expanded.clear();
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Whether a cell has been discovered in the current leg, queued or expanded.
    pub fn discovered(&self, point: &Point) -> bool {
        self.parents.contains_key(point)
    }

    /// The cell a discovered cell was reached from. [None] for the root and unknown cells.
    pub fn parent(&self, point: &Point) -> Option<Point> {
        let &ix = self.parents.get(point)?;
        self.parents.get_index(ix).map(|(p, _)| *p)
    }

    /// Cells in the order they were stamped as visited.
    pub fn expanded(&self) -> &[Point] {
        &self.expanded
    }
}

/// Lifecycle of a single-leg search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchState {
    Ready,
    Running,
    Found,
    Exhausted,
    Cancelled,
}

impl SearchState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SearchState::Found | SearchState::Exhausted | SearchState::Cancelled
        )
    }
}

/// One leg of a search from `start` to `goal`, driven one frontier iteration at a time by
/// [step](Search::step). The strategy only supplies the frontier policy; the loop is shared.
/// Creating a search clears whatever the context held from a previous leg.
pub struct Search<'a, S: GridSolver + ?Sized> {
    solver: &'a S,
    context: &'a mut SearchContext,
    start: Point,
    goal: Point,
    state: SearchState,
    goal_cost: i32,
}

impl<'a, S: GridSolver + ?Sized> Search<'a, S> {
    pub fn new(
        solver: &'a S,
        context: &'a mut SearchContext,
        start: Point,
        goal: Point,
    ) -> Search<'a, S> {
        context.reset();
        Search {
            solver,
            context,
            start,
            goal,
            state: SearchState::Ready,
            goal_cost: 0,
        }
    }

    pub fn state(&self) -> SearchState {
        self.state
    }
    pub fn start(&self) -> Point {
        self.start
    }
    pub fn goal(&self) -> Point {
        self.goal
    }
    pub fn context(&self) -> &SearchContext {
        self.context
    }
    /// Accumulated step cost of the route to the goal, once found.
    pub fn goal_cost(&self) -> Option<i32> {
        (self.state == SearchState::Found).then_some(self.goal_cost)
    }

    /// Moves a search that has not finished yet into [SearchState::Cancelled].
    pub fn cancel(&mut self) {
        if !self.state.is_terminal() {
            debug!("{} search towards {} cancelled", self.solver.name(), self.goal);
            self.state = SearchState::Cancelled;
        }
    }

    fn begin(&mut self) {
        let heuristic = self.solver.heuristic(&self.start, &self.goal);
        self.context
            .frontier
            .push(SearchNode::new(self.start, heuristic, 0));
        self.context.parents.insert(self.start, ROOT);
        self.state = SearchState::Running;
        debug!(
            "{} search from {} to {} started",
            self.solver.name(),
            self.start,
            self.goal
        );
    }

    /// Runs one iteration of the search loop: pops a node, finishes if it is the goal, otherwise
    /// stamps it as visited and queues or improves its neighbours. Calling this on a finished
    /// search returns its final state without touching the grid.
    pub fn step(&mut self, grid: &mut PathingGrid) -> Result<SearchState> {
        match self.state {
            SearchState::Ready => self.begin(),
            SearchState::Running => {}
            state => return Ok(state),
        }
        let solver = self.solver;
        let start = self.start;
        let goal = self.goal;
        let context = &mut *self.context;

        let Some(node) = solver.extract(&mut context.frontier) else {
            warn!("Frontier exhausted before reaching {}", goal);
            self.state = SearchState::Exhausted;
            return Ok(self.state);
        };
        if node.point == goal {
            self.goal_cost = node.cost;
            self.state = SearchState::Found;
            debug!(
                "Reached {} after {} expansions, cost {}",
                goal,
                context.expanded.len(),
                node.cost
            );
            return Ok(self.state);
        }

        // The seed of a leg is never stamped, neither are marker cells.
        if node.point != start && grid.stamp_visited(node.point) {
            context.expanded.push(node.point);
        }
        let parent_ix = context
            .parents
            .get_index_of(&node.point)
            .ok_or(SearchError::MissingParent { point: node.point })?;

        for neighbour in grid.neighbours(&node.point) {
            let candidate = SearchNode::new(
                neighbour,
                solver.heuristic(&neighbour, &goal),
                node.cost + solver.cost(grid, &node.point, &neighbour),
            );
            match context.frontier.get(&neighbour).copied() {
                Some(existing) => {
                    if solver.should_replace(&existing, &candidate) {
                        context.frontier.replace(candidate);
                        context.parents.insert(neighbour, parent_ix);
                    }
                }
                // Expanded cells are closed for the rest of the leg.
                None if context.parents.contains_key(&neighbour) => {}
                None => {
                    context.frontier.push(candidate);
                    context.parents.insert(neighbour, parent_ix);
                }
            }
        }
        context.frontier.sort_by_priority(|n| solver.priority(n));
        Ok(self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellState;
    use crate::rc;
    use crate::solver::{AstarSolver, BfsSolver, DfsSolver, GreedySolver};

    fn run_to_end<S: GridSolver + ?Sized>(
        search: &mut Search<S>,
        grid: &mut PathingGrid,
    ) -> SearchState {
        loop {
            let state = search.step(grid).unwrap();
            if state.is_terminal() {
                return state;
            }
        }
    }

    #[test]
    fn state_machine_transitions() {
        let mut grid = PathingGrid::new(1, 3);
        let mut context = SearchContext::new();
        let mut search = Search::new(&BfsSolver, &mut context, rc(0, 0), rc(0, 2));
        assert_eq!(search.state(), SearchState::Ready);
        assert_eq!(search.step(&mut grid).unwrap(), SearchState::Running);
        assert_eq!(search.step(&mut grid).unwrap(), SearchState::Running);
        assert_eq!(search.step(&mut grid).unwrap(), SearchState::Found);
        assert_eq!(search.goal_cost(), Some(2));
        // Terminal states are sticky.
        assert_eq!(search.step(&mut grid).unwrap(), SearchState::Found);
        assert_eq!(grid.to_string(), "SoF\n");
    }

    /// Asserts that the case in which start and goal are equal is handled correctly.
    #[test]
    fn equal_start_goal() {
        let mut grid = PathingGrid::new(3, 3);
        let mut context = SearchContext::new();
        let solver = AstarSolver::new();
        let mut search = Search::new(&solver, &mut context, rc(1, 1), rc(1, 1));
        assert_eq!(search.step(&mut grid).unwrap(), SearchState::Found);
        assert!(search.context().expanded().is_empty());
        assert_eq!(grid.count(CellState::Visited), 0);
    }

    #[test]
    fn exhausts_when_walled_off() {
        let mut grid: PathingGrid = "S#.\n##.\n..F".parse().unwrap();
        let mut context = SearchContext::new();
        let mut search = Search::new(&GreedySolver, &mut context, grid.start(), grid.finish());
        assert_eq!(run_to_end(&mut search, &mut grid), SearchState::Exhausted);
        assert!(search.context().expanded().is_empty());
        assert_eq!(search.goal_cost(), None);
    }

    #[test]
    fn cancel_is_terminal() {
        let mut grid = PathingGrid::new(4, 4);
        let mut context = SearchContext::new();
        let mut search = Search::new(&DfsSolver, &mut context, grid.start(), grid.finish());
        search.step(&mut grid).unwrap();
        search.cancel();
        assert_eq!(search.step(&mut grid).unwrap(), SearchState::Cancelled);
        assert_eq!(grid.count(CellState::Visited), 0);
    }

    #[test]
    fn bfs_expands_in_insertion_order() {
        // Expansion around the centre follows down, right, up, left.
        let mut grid = PathingGrid::with_markers(3, 3, rc(1, 1), rc(0, 0));
        let mut context = SearchContext::new();
        let mut search = Search::new(&BfsSolver, &mut context, rc(1, 1), rc(0, 0));
        assert_eq!(run_to_end(&mut search, &mut grid), SearchState::Found);
        assert_eq!(
            search.context().expanded(),
            &[
                rc(2, 1),
                rc(1, 2),
                rc(0, 1),
                rc(1, 0),
                rc(2, 2),
                rc(2, 0),
                rc(0, 2)
            ]
        );
    }

    #[test]
    fn dfs_dives_into_the_last_neighbour() {
        let mut grid = PathingGrid::with_markers(3, 3, rc(1, 1), rc(2, 2));
        let mut context = SearchContext::new();
        let mut search = Search::new(&DfsSolver, &mut context, rc(1, 1), rc(2, 2));
        run_to_end(&mut search, &mut grid);
        // Left is queued last, so it is expanded first.
        assert_eq!(search.context().expanded()[0], rc(1, 0));
    }

    #[test]
    fn astar_walks_around_terrain() {
        // S T .
        // . . .
        // . . F
        let mut grid: PathingGrid = "ST.\n...\n..F".parse().unwrap();
        let mut context = SearchContext::new();
        let solver = AstarSolver::new();
        let mut search = Search::new(&solver, &mut context, rc(0, 0), rc(0, 2));
        assert_eq!(run_to_end(&mut search, &mut grid), SearchState::Found);
        assert_eq!(search.goal_cost(), Some(4));
        assert_eq!(search.context().parent(&rc(0, 2)), Some(rc(1, 2)));
        assert_eq!(search.context().parent(&rc(0, 0)), None);
    }

    #[test]
    fn astar_decrease_key_rewires_parent() {
        // . . . . .
        // . T T . .
        // S T . . F
        // (1, 2) is first queued from (2, 2) at cost 11, then reached from (0, 2) at cost 9.
        let mut grid: PathingGrid = ".....\n.TT..\nST..F".parse().unwrap();
        let mut context = SearchContext::new();
        let solver = AstarSolver::new();
        let mut search = Search::new(&solver, &mut context, grid.start(), grid.finish());
        assert_eq!(run_to_end(&mut search, &mut grid), SearchState::Found);
        assert_eq!(search.goal_cost(), Some(8));
        let queued = search.context().frontier().get(&rc(1, 2)).copied().unwrap();
        assert_eq!(queued.cost, 9);
        assert_eq!(search.context().parent(&rc(1, 2)), Some(rc(0, 2)));
        assert_eq!(grid.to_string(), "ooo..\noTT..\nStooF\n");
    }

    #[test]
    fn unmarked_seed_is_not_stamped() {
        let mut grid = PathingGrid::new(1, 5);
        let mut context = SearchContext::new();
        let mut search = Search::new(&BfsSolver, &mut context, rc(0, 1), rc(0, 3));
        assert_eq!(run_to_end(&mut search, &mut grid), SearchState::Found);
        // (0, 0) is expanded as well, but it holds the start marker.
        assert_eq!(search.context().expanded(), &[rc(0, 2)]);
        assert_eq!(grid.get_cell(0, 1), Some(CellState::Empty));
        assert_eq!(grid.to_string(), "S.o.F\n");
    }

    #[test]
    fn new_search_forgets_previous_leg() {
        let mut grid = PathingGrid::new(1, 4);
        let mut context = SearchContext::new();
        let mut first = Search::new(&BfsSolver, &mut context, rc(0, 0), rc(0, 3));
        assert_eq!(run_to_end(&mut first, &mut grid), SearchState::Found);
        assert_eq!(first.context().expanded(), &[rc(0, 1), rc(0, 2)]);

        let mut second = Search::new(&BfsSolver, &mut context, rc(0, 3), rc(0, 0));
        second.cancel();
        assert_eq!(second.step(&mut grid).unwrap(), SearchState::Cancelled);
        assert!(second.context().expanded().is_empty());
        assert!(!second.context().discovered(&rc(0, 1)));
        assert!(second.context().frontier().is_empty());
    }
}
