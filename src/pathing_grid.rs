use crate::cell::{Cell, CellState};
use crate::error::GridParseError;
use crate::{rc, CELL_SIZE_PX, TERRAIN_COST};
use core::fmt;
use grid_util::point::Point;
use log::debug;
use smallvec::SmallVec;
use std::str::FromStr;

/// Pixels at the top of the viewport taken up by the toolbar.
const VIEWPORT_HEADER_PX: usize = 70;
/// Columns of the viewport taken up by the side panel.
const VIEWPORT_PANEL_COLS: usize = 13;

/// Offsets in (row, col) order: down, right, up, left. The order decides tie-breaks.
const NEIGHBOUR_OFFSETS: [(i32, i32); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

/// The two draggable markers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    Start,
    Finish,
}

impl Marker {
    fn resting(self) -> CellState {
        match self {
            Marker::Start => CellState::Start,
            Marker::Finish => CellState::Finish,
        }
    }
    fn dragged(self) -> CellState {
        match self {
            Marker::Start => CellState::XStart,
            Marker::Finish => CellState::XFinish,
        }
    }
}

/// [PathingGrid] is the fixed-size cell model shared by the editor and the search engine. Its
/// shape never changes after creation; only cell states are mutated. It tracks where the start
/// and finish markers are and the via points in the order they were placed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathingGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    start: Point,
    finish: Point,
    via_points: Vec<Point>,
}

impl PathingGrid {
    /// Creates an empty grid with the start in the top left and the finish in the bottom right
    /// corner.
    pub fn new(rows: usize, cols: usize) -> PathingGrid {
        let rows = rows.max(1);
        let cols = cols.max(1);
        PathingGrid::with_markers(rows, cols, rc(0, 0), rc(rows as i32 - 1, cols as i32 - 1))
    }

    /// Creates an empty grid with the markers at the given positions, clamped into bounds. A grid
    /// holds at least two cells; if both markers land on the same cell, the finish moves to the
    /// next cell in row-major order.
    pub fn with_markers(rows: usize, cols: usize, start: Point, finish: Point) -> PathingGrid {
        let height = rows.max(1);
        let width = if height == 1 { cols.max(2) } else { cols.max(1) };
        let clamp = |p: Point| {
            Point::new(
                p.x.clamp(0, width as i32 - 1),
                p.y.clamp(0, height as i32 - 1),
            )
        };
        let start = clamp(start);
        let mut finish = clamp(finish);
        if finish == start {
            let ix = (start.y as usize * width + start.x as usize + 1) % (width * height);
            finish = Point::new((ix % width) as i32, (ix / width) as i32);
        }
        let mut grid = PathingGrid {
            width,
            height,
            cells: vec![Cell::default(); width * height],
            start,
            finish,
            via_points: Vec::new(),
        };
        let (start, finish) = (grid.start, grid.finish);
        grid.set_state(start, CellState::Start);
        grid.set_state(finish, CellState::Finish);
        grid
    }

    /// Sizes the grid to fit a viewport of the given pixel dimensions, leaving room for the
    /// toolbar and side panel, and puts the markers on the same row some distance apart.
    pub fn for_viewport(width_px: usize, height_px: usize) -> PathingGrid {
        let rows = (height_px.saturating_sub(VIEWPORT_HEADER_PX) / CELL_SIZE_PX).max(1);
        let cols = (width_px / CELL_SIZE_PX)
            .saturating_sub(VIEWPORT_PANEL_COLS)
            .max(1);
        let row = 7usize.min(rows - 1) as i32;
        let start = rc(row, 7usize.min(cols - 1) as i32);
        let mut finish = rc(row, cols.saturating_sub(10) as i32);
        if finish == start {
            finish = rc(rows as i32 - 1, cols as i32 - 1);
        }
        debug!("Viewport {}x{} maps to a {}x{} grid", width_px, height_px, rows, cols);
        PathingGrid::with_markers(rows, cols, start, finish)
    }

    pub fn rows(&self) -> usize {
        self.height
    }
    pub fn cols(&self) -> usize {
        self.width
    }
    pub fn start(&self) -> Point {
        self.start
    }
    pub fn finish(&self) -> Point {
        self.finish
    }
    /// Via points in placement order.
    pub fn via_points(&self) -> &[Point] {
        &self.via_points
    }

    pub fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < self.width && (p.y as usize) < self.height
    }
    fn index(&self, p: Point) -> Option<usize> {
        self.in_bounds(p)
            .then(|| p.y as usize * self.width + p.x as usize)
    }

    pub fn cell(&self, p: Point) -> Option<&Cell> {
        let ix = self.index(p)?;
        Some(&self.cells[ix])
    }
    fn cell_mut(&mut self, p: Point) -> Option<&mut Cell> {
        let ix = self.index(p)?;
        Some(&mut self.cells[ix])
    }
    pub fn state(&self, p: Point) -> Option<CellState> {
        self.cell(p).map(|c| c.state)
    }
    /// Overwrites the state of a cell without any marker bookkeeping. Returns [false] when the
    /// point is out of bounds.
    pub fn set_state(&mut self, p: Point, state: CellState) -> bool {
        match self.cell_mut(p) {
            Some(cell) => {
                cell.state = state;
                true
            }
            None => false,
        }
    }

    fn row_col(row: usize, col: usize) -> Option<Point> {
        Some(rc(i32::try_from(row).ok()?, i32::try_from(col).ok()?))
    }
    pub fn get_cell(&self, row: usize, col: usize) -> Option<CellState> {
        self.state(PathingGrid::row_col(row, col)?)
    }
    pub fn set_cell_state(&mut self, row: usize, col: usize, state: CellState) -> bool {
        match PathingGrid::row_col(row, col) {
            Some(p) => self.set_state(p, state),
            None => false,
        }
    }

    pub fn is_wall(&self, p: Point) -> bool {
        self.state(p) == Some(CellState::Wall)
    }
    pub fn can_move_to(&self, p: Point) -> bool {
        self.state(p).is_some_and(CellState::is_traversable)
    }
    /// Whether entering the cell costs the terrain weight. A path stamp laid over terrain still
    /// counts as terrain.
    pub fn is_terrain(&self, p: Point) -> bool {
        self.cell(p).is_some_and(|c| {
            c.state.is_terrain()
                || (c.state == CellState::Path && c.prev_state == Some(CellState::Terrain))
        })
    }

    /// The four-connected neighbours of a cell that are in bounds and not walls, in the order
    /// down, right, up, left.
    pub fn neighbours(&self, p: &Point) -> SmallVec<[Point; 4]> {
        NEIGHBOUR_OFFSETS
            .iter()
            .map(|(dr, dc)| Point::new(p.x + dc, p.y + dr))
            .filter(|n| self.can_move_to(*n))
            .collect()
    }

    /// Cost of stepping onto `to`: 1 for ordinary cells, [TERRAIN_COST] for terrain.
    pub fn step_cost(&self, _from: &Point, to: &Point) -> i32 {
        self.weighted_step_cost(to, TERRAIN_COST)
    }
    pub fn weighted_step_cost(&self, to: &Point, terrain_cost: i32) -> i32 {
        if self.is_terrain(*to) {
            terrain_cost
        } else {
            1
        }
    }

    /// Marks a popped cell as expanded. Markers are left alone, terrain becomes visited terrain.
    /// Returns whether the cell was stamped.
    pub(crate) fn stamp_visited(&mut self, p: Point) -> bool {
        let terrain = self.is_terrain(p);
        match self.cell_mut(p) {
            Some(cell) if !cell.state.is_marker() => {
                cell.state = if terrain {
                    CellState::VisitedTerrain
                } else {
                    CellState::Visited
                };
                cell.prev_state = None;
                true
            }
            _ => false,
        }
    }

    /// Marks a cell as part of the drawn path, remembering terrain underneath.
    pub(crate) fn stamp_path(&mut self, p: Point) {
        let terrain = self.is_terrain(p);
        if let Some(cell) = self.cell_mut(p) {
            if cell.state.is_marker() {
                return;
            }
            cell.state = CellState::Path;
            cell.prev_state = terrain.then_some(CellState::Terrain);
        }
    }

    /// Turns an ordinary cell into a wall. Marker cells are refused.
    pub fn place_wall(&mut self, p: Point) -> bool {
        match self.cell_mut(p) {
            Some(cell) if !cell.state.is_marker() => {
                cell.state = CellState::Wall;
                cell.prev_state = None;
                true
            }
            _ => false,
        }
    }
    pub fn remove_wall(&mut self, p: Point) -> bool {
        match self.cell_mut(p) {
            Some(cell) if cell.state == CellState::Wall => {
                cell.state = CellState::Empty;
                true
            }
            _ => false,
        }
    }
    /// Paints terrain on an empty cell.
    pub fn place_terrain(&mut self, p: Point) -> bool {
        match self.cell_mut(p) {
            Some(cell) if cell.state == CellState::Empty => {
                cell.state = CellState::Terrain;
                true
            }
            _ => false,
        }
    }

    /// Appends a via point. Walls and other markers are refused.
    pub fn place_via(&mut self, p: Point) -> bool {
        let terrain = self.is_terrain(p);
        match self.cell_mut(p) {
            Some(cell) if !cell.state.is_marker() && cell.state.is_traversable() => {
                cell.prev_state = terrain.then_some(CellState::Terrain);
                cell.state = CellState::Via;
                self.via_points.push(p);
                true
            }
            _ => false,
        }
    }
    pub fn remove_via(&mut self, p: Point) -> bool {
        let Some(pos) = self.via_points.iter().position(|v| *v == p) else {
            return false;
        };
        self.via_points.remove(pos);
        if let Some(cell) = self.cell_mut(p) {
            cell.state = cell.prev_state.take().unwrap_or(CellState::Empty);
        }
        true
    }

    fn marker_position(&self, marker: Marker) -> Point {
        match marker {
            Marker::Start => self.start,
            Marker::Finish => self.finish,
        }
    }

    /// Lifts a marker so it can be dragged; it shows as XStart/XFinish until dropped.
    pub fn pick_up(&mut self, marker: Marker) {
        let p = self.marker_position(marker);
        self.set_state(p, marker.dragged());
    }

    /// Moves a marker to `to`, restoring what it covered and saving what it now covers. Moving
    /// onto the other marker or a via point is refused.
    pub fn drag_marker(&mut self, marker: Marker, to: Point) -> bool {
        let from = self.marker_position(marker);
        if from == to {
            return true;
        }
        match self.state(to) {
            Some(state) if !state.is_marker() => {}
            _ => return false,
        }
        let shown = match self.state(from) {
            Some(state) if state == marker.dragged() => marker.dragged(),
            _ => marker.resting(),
        };
        if let Some(cell) = self.cell_mut(from) {
            cell.state = cell.prev_state.take().unwrap_or(CellState::Empty);
        }
        if let Some(cell) = self.cell_mut(to) {
            // A path stamp is not worth restoring, the terrain under it is.
            cell.prev_state = Some(match cell.state {
                CellState::Path => cell.prev_state.unwrap_or(CellState::Empty),
                state => state,
            });
            cell.state = shown;
        }
        match marker {
            Marker::Start => self.start = to,
            Marker::Finish => self.finish = to,
        }
        true
    }

    pub fn drop_marker(&mut self, marker: Marker) {
        let p = self.marker_position(marker);
        self.set_state(p, marker.resting());
    }

    fn for_each_cell(&mut self, f: impl FnMut(&mut Cell)) {
        self.cells.iter_mut().for_each(f);
    }

    /// Removes path and visited stamps, restoring terrain that was stamped over.
    pub fn clear_path(&mut self) {
        self.for_each_cell(|cell| match cell.state {
            CellState::Path => cell.state = cell.prev_state.take().unwrap_or(CellState::Empty),
            CellState::Visited => cell.state = CellState::Empty,
            CellState::VisitedTerrain => cell.state = CellState::Terrain,
            _ => {}
        });
    }
    /// Removes visited stamps only.
    pub fn reset_visited(&mut self) {
        self.for_each_cell(|cell| match cell.state {
            CellState::Visited => cell.state = CellState::Empty,
            CellState::VisitedTerrain => cell.state = CellState::Terrain,
            _ => {}
        });
    }
    pub fn clear_walls(&mut self) {
        self.for_each_cell(|cell| {
            if cell.state == CellState::Wall {
                cell.state = CellState::Empty;
            }
        });
    }
    pub fn clear_terrain(&mut self) {
        self.for_each_cell(|cell| match cell.state {
            CellState::Terrain => cell.state = CellState::Empty,
            CellState::VisitedTerrain => cell.state = CellState::Visited,
            CellState::Path => cell.prev_state = None,
            _ => {}
        });
    }

    /// Number of cells currently in the given state.
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|c| c.state == state).count()
    }
}

impl fmt::Display for PathingGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks(self.width) {
            let line: String = row.iter().map(|c| c.state.symbol()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Parses the format produced by [Display]: one line per row, one symbol per cell. Blank lines
/// and surrounding whitespace are ignored. Via points are registered in row-major order.
impl FromStr for PathingGrid {
    type Err = GridParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let width = match lines.first() {
            Some(first) => first.chars().count(),
            None => return Err(GridParseError::Empty),
        };
        let mut cells = Vec::with_capacity(width * lines.len());
        let mut starts = Vec::new();
        let mut finishes = Vec::new();
        let mut via_points = Vec::new();
        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(GridParseError::Ragged {
                    row,
                    expected: width,
                    found,
                });
            }
            for (col, symbol) in line.chars().enumerate() {
                let state = CellState::from_symbol(symbol).ok_or(GridParseError::UnknownSymbol {
                    symbol,
                    row,
                    col,
                })?;
                let p = rc(row as i32, col as i32);
                match state {
                    CellState::Start => starts.push(p),
                    CellState::Finish => finishes.push(p),
                    CellState::Via => via_points.push(p),
                    _ => {}
                }
                cells.push(Cell::new(state));
            }
        }
        if starts.len() != 1 {
            return Err(GridParseError::MarkerCount {
                marker: "start",
                count: starts.len(),
            });
        }
        if finishes.len() != 1 {
            return Err(GridParseError::MarkerCount {
                marker: "finish",
                count: finishes.len(),
            });
        }
        Ok(PathingGrid {
            width,
            height: lines.len(),
            cells,
            start: starts[0],
            finish: finishes[0],
            via_points,
        })
    }
}
