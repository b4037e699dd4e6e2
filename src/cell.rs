use core::fmt;

/// Visual and logical state of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CellState {
    #[default]
    Empty,
    Wall,
    Start,
    Finish,
    Path,
    Visited,
    VisitedTerrain,
    Terrain,
    Via,
    /// Start marker while it is being dragged.
    XStart,
    /// Finish marker while it is being dragged.
    XFinish,
}

impl CellState {
    /// Start, finish and via markers, including dragged ones. These are never stamped by a search.
    pub fn is_marker(self) -> bool {
        matches!(
            self,
            CellState::Start
                | CellState::Finish
                | CellState::XStart
                | CellState::XFinish
                | CellState::Via
        )
    }

    pub fn is_terrain(self) -> bool {
        matches!(self, CellState::Terrain | CellState::VisitedTerrain)
    }

    pub fn is_traversable(self) -> bool {
        self != CellState::Wall
    }

    /// Single character used by the textual grid format.
    pub fn symbol(self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::Wall => '#',
            CellState::Start | CellState::XStart => 'S',
            CellState::Finish | CellState::XFinish => 'F',
            CellState::Path => '*',
            CellState::Visited => 'o',
            CellState::VisitedTerrain => 't',
            CellState::Terrain => 'T',
            CellState::Via => 'V',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<CellState> {
        Some(match symbol {
            '.' => CellState::Empty,
            '#' => CellState::Wall,
            'S' => CellState::Start,
            'F' => CellState::Finish,
            '*' => CellState::Path,
            'o' => CellState::Visited,
            't' => CellState::VisitedTerrain,
            'T' => CellState::Terrain,
            'V' => CellState::Via,
            _ => return None,
        })
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A grid cell. `prev_state` holds whatever a marker or path stamp covered up, so it can be
/// restored once the cell is vacated or cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Cell {
    pub state: CellState,
    pub prev_state: Option<CellState>,
}

impl Cell {
    pub fn new(state: CellState) -> Cell {
        Cell {
            state,
            prev_state: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_round_trip_except_dragged_markers() {
        for state in [
            CellState::Empty,
            CellState::Wall,
            CellState::Start,
            CellState::Finish,
            CellState::Path,
            CellState::Visited,
            CellState::VisitedTerrain,
            CellState::Terrain,
            CellState::Via,
        ] {
            assert_eq!(CellState::from_symbol(state.symbol()), Some(state));
        }
        assert_eq!(CellState::XStart.symbol(), 'S');
        assert_eq!(CellState::from_symbol('?'), None);
    }

    #[test]
    fn markers_are_traversable_but_walls_are_not() {
        assert!(CellState::XFinish.is_marker());
        assert!(CellState::XFinish.is_traversable());
        assert!(!CellState::Terrain.is_marker());
        assert!(!CellState::Wall.is_traversable());
        assert!(CellState::VisitedTerrain.is_terrain());
    }
}
