use log::{debug, trace};
use rand::Rng;
use smallvec::IntoIter;

use crate::cells::{shuffled_directions, CompassPrimary, DirectionSmallVec, GridCoordinate};
use crate::grid::{Grid, GridError};
use crate::units::{ColumnsCount, RowsCount};

/// Apply the recursive backtracker maze generation algorithm to a fresh grid.
///
/// A randomised depth first walk from `start`: every time a cell is entered it is marked
/// visited and its four neighbours are tried in a uniformly random order. A wall is only ever
/// opened when moving into a cell that has not been visited yet, so the passages form a tree,
/// and as every direction of every visited cell gets tried the tree spans the whole grid.
///
/// Fails with `OutOfBounds` before touching the grid if `start` is not a cell of the grid.
pub fn recursive_backtracker<R>(grid: &mut Grid, start: GridCoordinate, rng: &mut R) -> Result<(), GridError>
    where R: Rng + ?Sized
{
    recursive_backtracker_with_order(grid, start, |_| shuffled_directions(&mut *rng))
}

/// The recursive backtracker with the neighbour visiting order of each cell decided by
/// `neighbour_order`, called once as each cell is entered.
///
/// The walk keeps its own stack of partially explored cells instead of recursing, so long
/// corridors cannot exhaust the call stack. The order in which cells are entered, and so the
/// order `neighbour_order` is called in, is the same as the plain recursive walk.
pub fn recursive_backtracker_with_order<F>(grid: &mut Grid,
                                           start: GridCoordinate,
                                           mut neighbour_order: F)
                                           -> Result<(), GridError>
    where F: FnMut(GridCoordinate) -> DirectionSmallVec
{
    if grid.is_visited(start)? {
        return Ok(());
    }
    grid.mark_visited(start)?;
    debug!("Carving {}x{} maze from {}", grid.rows().0, grid.columns().0, start);

    let mut stack: Vec<(GridCoordinate, IntoIter<[CompassPrimary; 4]>)> =
        Vec::with_capacity(grid.size());
    stack.push((start, neighbour_order(start).into_iter()));

    while let Some(frame) = stack.last_mut() {
        let cell = frame.0;
        let next_dir = match frame.1.next() {
            Some(dir) => dir,
            None => {
                // all directions tried, backtrack
                let _ = stack.pop();
                continue;
            }
        };

        let next_cell = cell.offset(next_dir);
        if !grid.is_valid_coordinate(next_cell) || grid.is_visited(next_cell)? {
            continue;
        }

        trace!("Opening wall {} -> {}", cell, next_cell);
        grid.open_wall_between(cell, next_cell)?;
        grid.mark_visited(next_cell)?;
        stack.push((next_cell, neighbour_order(next_cell).into_iter()));
    }

    debug!("Carved {} passages", grid.open_walls_count());
    Ok(())
}

/// Create a `rows` x `columns` grid and carve a maze into it from a uniformly random start
/// cell. Returns the carved grid with the start cell chosen.
pub fn carve_maze<R>(rows: RowsCount,
                     columns: ColumnsCount,
                     rng: &mut R)
                     -> Result<(Grid, GridCoordinate), GridError>
    where R: Rng + ?Sized
{
    let mut grid = Grid::new(rows, columns)?;
    let start = grid.random_cell(&mut *rng);
    recursive_backtracker(&mut grid, start, rng)?;
    Ok((grid, start))
}
