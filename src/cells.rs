use rand::seq::SliceRandom;
use rand::Rng;
use serde_derive::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::units::{ColumnIndex, ColumnsCount, RowIndex};

/// Address of a single maze cell.
///
/// Coordinates are signed so that a step off the top or left edge of the grid is still
/// representable and can be rejected by the grid's bounds check rather than wrapping around.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd, Serialize, Deserialize)]
pub struct GridCoordinate {
    pub row: isize,
    pub col: isize,
}

impl GridCoordinate {
    pub fn new(row: isize, col: isize) -> GridCoordinate {
        GridCoordinate { row, col }
    }

    #[inline]
    pub fn from_row_column_indices(row_index: RowIndex, col_index: ColumnIndex) -> GridCoordinate {
        let (RowIndex(row), ColumnIndex(col)) = (row_index, col_index);
        GridCoordinate::new(row as isize, col as isize)
    }

    #[inline]
    pub fn from_row_major_index(index: usize, columns: ColumnsCount) -> GridCoordinate {
        let ColumnsCount(width) = columns;
        GridCoordinate::new((index / width) as isize, (index % width) as isize)
    }

    /// The coordinate one step away in `dir`. Never fails, the result may lie outside any grid.
    #[inline]
    pub fn offset(self, dir: CompassPrimary) -> GridCoordinate {
        let (row_delta, col_delta) = dir.delta();
        GridCoordinate::new(self.row + row_delta, self.col + col_delta)
    }

    /// The direction leading from `self` to `other` when they are orthogonal neighbours
    /// exactly one step apart.
    pub fn direction_to(self, other: GridCoordinate) -> Option<CompassPrimary> {
        match (other.row - self.row, other.col - self.col) {
            (-1, 0) => Some(CompassPrimary::North),
            (1, 0) => Some(CompassPrimary::South),
            (0, -1) => Some(CompassPrimary::West),
            (0, 1) => Some(CompassPrimary::East),
            _ => None,
        }
    }
}

impl From<(isize, isize)> for GridCoordinate {
    fn from(row_col_pair: (isize, isize)) -> GridCoordinate {
        GridCoordinate::new(row_col_pair.0, row_col_pair.1)
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Which of the two wall matrices a boundary lives in.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Serialize, Deserialize)]
pub enum WallOrientation {
    /// Between two cells of the same row, stored in the vertical walls matrix.
    Vertical,
    /// Between two cells of the same column, stored in the horizontal walls matrix.
    Horizontal,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

pub type DirectionSmallVec = SmallVec<[CompassPrimary; 4]>;

/// Up, down, left, right.
pub const ALL_DIRECTIONS: [CompassPrimary; 4] = [CompassPrimary::North,
                                                 CompassPrimary::South,
                                                 CompassPrimary::West,
                                                 CompassPrimary::East];

impl CompassPrimary {
    /// (row delta, column delta) of a single step in this direction.
    #[inline]
    pub fn delta(self) -> (isize, isize) {
        match self {
            CompassPrimary::North => (-1, 0),
            CompassPrimary::South => (1, 0),
            CompassPrimary::West => (0, -1),
            CompassPrimary::East => (0, 1),
        }
    }

    #[inline]
    pub fn wall_orientation(self) -> WallOrientation {
        match self {
            CompassPrimary::North | CompassPrimary::South => WallOrientation::Horizontal,
            CompassPrimary::East | CompassPrimary::West => WallOrientation::Vertical,
        }
    }

    /// Matrix (row, column) of the wall crossed when stepping from `from` in this direction.
    /// The index is only meaningful when the destination cell is inside the grid.
    #[inline]
    pub fn wall_index(self, from: GridCoordinate) -> (isize, isize) {
        match self {
            CompassPrimary::North => (from.row - 1, from.col),
            CompassPrimary::West => (from.row, from.col - 1),
            CompassPrimary::South | CompassPrimary::East => (from.row, from.col),
        }
    }
}

/// A uniformly random permutation of the four directions.
pub fn shuffled_directions<R: Rng + ?Sized>(rng: &mut R) -> DirectionSmallVec {
    let mut dirs = ALL_DIRECTIONS.iter().cloned().collect::<DirectionSmallVec>();
    dirs.shuffle(rng);
    dirs
}
