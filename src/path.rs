use crate::control::{Pacer, Pause, SearchControl};
use crate::error::{Result, SearchError};
use crate::pathing_grid::PathingGrid;
use crate::search::{Search, SearchContext, SearchState};
use crate::solver::{manhattan, Algorithm, GridSolver};
use grid_util::point::Point;
use itertools::Itertools;
use log::{debug, info, warn};
use std::iter;

/// How a search ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchStatus {
    Found,
    NotFound,
    Cancelled,
}

/// Outcome of [run_search].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchReport {
    pub status: SearchStatus,
    /// Cells from start to finish, through every via point. Empty unless found.
    pub path: Vec<Point>,
    /// Number of cells on the path, start and finish included.
    pub path_length: usize,
    /// Accumulated step cost of the path as seen by the strategy.
    pub path_cost: i32,
    /// Expanded cells in the order they were stamped, over all legs.
    pub visit_order: Vec<Point>,
    /// Index of the leg whose frontier ran dry, for [SearchStatus::NotFound].
    pub failed_leg: Option<usize>,
}

impl SearchReport {
    fn unfinished(status: SearchStatus, visit_order: Vec<Point>) -> SearchReport {
        SearchReport {
            status,
            path: Vec::new(),
            path_length: 0,
            path_cost: 0,
            visit_order,
            failed_leg: None,
        }
    }
    pub fn is_found(&self) -> bool {
        self.status == SearchStatus::Found
    }
    pub fn expansions(&self) -> usize {
        self.visit_order.len()
    }
}

/// Checks that consecutive cells of a path are four-connected.
pub fn is_contiguous(path: &[Point]) -> bool {
    path.iter().tuple_windows().all(|(a, b)| manhattan(a, b) == 1)
}

/// Walks the parent map backwards from `goal` until `start` is reached and returns the cells in
/// start to goal order. A broken chain is reported as [SearchError::MissingParent].
pub fn reconstruct_path(context: &SearchContext, start: Point, goal: Point) -> Result<Vec<Point>> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        // A chain longer than the map can only come from a cycle.
        if path.len() > context.parents.len() {
            return Err(SearchError::MissingParent { point: current });
        }
        current = context
            .parent(&current)
            .ok_or(SearchError::MissingParent { point: current })?;
        path.push(current);
    }
    path.reverse();
    Ok(path)
}

/// Stamps every non-marker cell of `path` as [Path](crate::cell::CellState::Path), in order,
/// pausing after each stamp. Returns [false] if cancellation was observed before a stamp.
pub fn stamp_path<P: Pacer + ?Sized>(
    grid: &mut PathingGrid,
    path: &[Point],
    control: &SearchControl,
    pacer: &mut P,
) -> bool {
    for &point in path {
        if control.is_cancelled() {
            return false;
        }
        if grid.state(point).is_some_and(|s| !s.is_marker()) {
            grid.stamp_path(point);
            pacer.pause(Pause::PathStamp, grid, control.path_delay);
        }
    }
    true
}

fn validate(grid: &PathingGrid, point: Point) -> Result<()> {
    if !grid.in_bounds(point) {
        return Err(SearchError::OutOfBounds { point });
    }
    if grid.is_wall(point) {
        return Err(SearchError::Blocked { point });
    }
    Ok(())
}

/// Drives one leg to a terminal state, polling cancellation before every iteration and pausing
/// after every iteration that did not finish the leg.
fn run_leg<S, P>(
    grid: &mut PathingGrid,
    solver: &S,
    context: &mut SearchContext,
    from: Point,
    to: Point,
    control: &SearchControl,
    pacer: &mut P,
) -> Result<(SearchState, Option<i32>)>
where
    S: GridSolver + ?Sized,
    P: Pacer + ?Sized,
{
    let mut search = Search::new(solver, context, from, to);
    loop {
        if control.is_cancelled() {
            search.cancel();
        }
        let state = search.step(grid)?;
        if state.is_terminal() {
            return Ok((state, search.goal_cost()));
        }
        pacer.pause(Pause::Expansion, grid, control.step_delay.get());
    }
}

/// Searches from `start` to `finish` with the given strategy, passing through `via` in order.
///
/// Every consecutive pair of waypoints is searched as an independent leg with a fresh frontier
/// and parent map, its target serving as the heuristic goal. The leg paths are joined without
/// repeating the junction cells and, once all legs succeeded, the whole path is stamped onto the
/// grid. Invalid waypoints are rejected before anything is stamped.
pub fn run_search<S, P>(
    grid: &mut PathingGrid,
    solver: &S,
    start: Point,
    finish: Point,
    via: &[Point],
    control: &SearchControl,
    pacer: &mut P,
) -> Result<SearchReport>
where
    S: GridSolver + ?Sized,
    P: Pacer + ?Sized,
{
    let waypoints: Vec<Point> = iter::once(start)
        .chain(via.iter().copied())
        .chain(iter::once(finish))
        .collect();
    for &point in &waypoints {
        validate(grid, point)?;
    }
    info!(
        "Running {} from {} to {} through {} via points",
        solver.name(),
        start,
        finish,
        via.len()
    );

    let mut context = SearchContext::new();
    let mut visit_order = Vec::new();
    let mut path = vec![start];
    let mut path_cost = 0;
    for (leg, (&from, &to)) in waypoints.iter().tuple_windows().enumerate() {
        let (state, cost) = run_leg(grid, solver, &mut context, from, to, control, pacer)?;
        visit_order.extend_from_slice(context.expanded());
        match (state, cost) {
            (SearchState::Found, Some(cost)) => {
                let leg_path = reconstruct_path(&context, from, to)?;
                debug!("Leg {} from {} to {}: {} cells", leg, from, to, leg_path.len());
                path.extend(leg_path.into_iter().skip(1));
                path_cost += cost;
            }
            (SearchState::Cancelled, _) => {
                info!("Search cancelled during leg {}", leg);
                return Ok(SearchReport::unfinished(
                    SearchStatus::Cancelled,
                    visit_order,
                ));
            }
            _ => {
                warn!("No path from {} to {} (leg {})", from, to, leg);
                let mut report = SearchReport::unfinished(SearchStatus::NotFound, visit_order);
                report.failed_leg = Some(leg);
                return Ok(report);
            }
        }
    }

    if !stamp_path(grid, &path, control, pacer) {
        info!("Search cancelled while drawing the path");
        return Ok(SearchReport::unfinished(
            SearchStatus::Cancelled,
            visit_order,
        ));
    }
    info!(
        "Found a path of {} cells with cost {} after {} expansions",
        path.len(),
        path_cost,
        visit_order.len()
    );
    Ok(SearchReport {
        status: SearchStatus::Found,
        path_length: path.len(),
        path,
        path_cost,
        visit_order,
        failed_leg: None,
    })
}

impl PathingGrid {
    /// Clears the previous path and runs `algorithm` from the start marker to the finish marker
    /// through the placed via points.
    pub fn search<P: Pacer + ?Sized>(
        &mut self,
        algorithm: Algorithm,
        control: &SearchControl,
        pacer: &mut P,
    ) -> Result<SearchReport> {
        self.clear_path();
        let solver = algorithm.solver();
        let (start, finish) = (self.start(), self.finish());
        let via = self.via_points().to_vec();
        run_search(self, solver.as_ref(), start, finish, &via, control, pacer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellState;
    use crate::control::NoDelay;
    use crate::rc;
    use crate::solver::{AstarSolver, BfsSolver};
    use std::time::Duration;

    #[test]
    fn reconstructs_in_start_to_goal_order() {
        let mut grid = PathingGrid::new(1, 4);
        let mut context = SearchContext::new();
        let mut search = Search::new(&BfsSolver, &mut context, rc(0, 0), rc(0, 3));
        while !search.step(&mut grid).unwrap().is_terminal() {}
        let path = reconstruct_path(&context, rc(0, 0), rc(0, 3)).unwrap();
        assert_eq!(path, vec![rc(0, 0), rc(0, 1), rc(0, 2), rc(0, 3)]);
        assert!(is_contiguous(&path));
    }

    #[test]
    fn broken_parent_chain_is_an_error() {
        let context = SearchContext::new();
        assert_eq!(
            reconstruct_path(&context, rc(0, 0), rc(0, 3)),
            Err(SearchError::MissingParent { point: rc(0, 3) })
        );
    }

    #[test]
    fn start_equal_to_goal_needs_no_parents() {
        let context = SearchContext::new();
        assert_eq!(
            reconstruct_path(&context, rc(2, 2), rc(2, 2)),
            Ok(vec![rc(2, 2)])
        );
    }

    #[test]
    fn invalid_waypoints_are_rejected_up_front() {
        let mut grid: PathingGrid = "S#F".parse().unwrap();
        let control = SearchControl::immediate();
        let solver = AstarSolver::new();
        assert_eq!(
            run_search(&mut grid, &solver, rc(0, 0), rc(0, 9), &[], &control, &mut NoDelay),
            Err(SearchError::OutOfBounds { point: rc(0, 9) })
        );
        assert_eq!(
            run_search(
                &mut grid,
                &solver,
                rc(0, 0),
                rc(0, 2),
                &[rc(0, 1)],
                &control,
                &mut NoDelay
            ),
            Err(SearchError::Blocked { point: rc(0, 1) })
        );
        assert_eq!(grid.to_string(), "S#F\n");
    }

    #[test]
    fn stamping_skips_markers() {
        let mut grid: PathingGrid = "S.V.F".parse().unwrap();
        let control = SearchControl::immediate();
        let mut stamps = 0;
        let mut pacer = |kind: Pause, _: &PathingGrid, _: Duration| {
            assert_eq!(kind, Pause::PathStamp);
            stamps += 1;
        };
        let path: Vec<Point> = (0..5).map(|c| rc(0, c)).collect();
        assert!(stamp_path(&mut grid, &path, &control, &mut pacer));
        assert_eq!(stamps, 2);
        assert_eq!(grid.to_string(), "S*V*F\n");
        assert_eq!(grid.count(CellState::Path), 2);
    }

    #[test]
    fn grid_search_uses_markers_and_via_points() {
        let mut grid: PathingGrid = "S..\n.V.\n..F".parse().unwrap();
        let report = grid
            .search(Algorithm::Bfs, &SearchControl::immediate(), &mut NoDelay)
            .unwrap();
        assert!(report.is_found());
        assert_eq!(report.path_length, 5);
        assert!(report.path.contains(&rc(1, 1)));
        assert_eq!(grid.count(CellState::Via), 1);
    }
}
