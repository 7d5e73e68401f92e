use log::debug;
use petgraph::algo::{connected_components, is_cyclic_undirected};
use petgraph::graph::{NodeIndex, UnGraph};
use rand::Rng;
use smallvec::SmallVec;
use std::error;
use std::fmt;

use crate::cells::{CompassPrimary, GridCoordinate, WallOrientation, ALL_DIRECTIONS};
use crate::units::{ColumnsCount, EdgesCount, NodesCount, RowsCount};

pub type CoordinateSmallVec = SmallVec<[GridCoordinate; 4]>;

/// Rectangular grid of cells plus the open/closed state of every interior wall.
///
/// All three matrices are sized once on creation. `true` in a wall matrix means the passage
/// is open, `false` means a wall stands there.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    rows: RowsCount,
    columns: ColumnsCount,
    visited: Vec<Vec<bool>>,
    vertical_walls: Vec<Vec<bool>>,   // rows x (columns - 1)
    horizontal_walls: Vec<Vec<bool>>, // (rows - 1) x columns
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GridError {
    InvalidDimensions { rows: usize, columns: usize },
    OutOfBounds(GridCoordinate),
    NotAdjacent(GridCoordinate, GridCoordinate),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            GridError::InvalidDimensions { rows, columns } => {
                write!(f, "invalid grid dimensions {}x{}, both must be at least 1", rows, columns)
            }
            GridError::OutOfBounds(coord) => write!(f, "coordinate {} is outside the grid", coord),
            GridError::NotAdjacent(a, b) => {
                write!(f, "cells {} and {} are not orthogonal neighbours", a, b)
            }
        }
    }
}

impl error::Error for GridError {}

/// An interior wall that is still standing, addressed by its wall matrix indices.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub struct WallSegment {
    pub orientation: WallOrientation,
    pub row: usize,
    pub col: usize,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: rows: {:?}, columns: {:?}, open walls: {:?}",
               self.rows, self.columns, self.open_walls_count())
    }
}

impl Grid {
    pub fn new(rows: RowsCount, columns: ColumnsCount) -> Result<Grid, GridError> {
        let (RowsCount(r), ColumnsCount(c)) = (rows, columns);
        if r < 1 || c < 1 {
            return Err(GridError::InvalidDimensions { rows: r, columns: c });
        }
        debug!("Allocating {}x{} maze grid", r, c);

        Ok(Grid {
            rows,
            columns,
            visited: vec![vec![false; c]; r],
            vertical_walls: vec![vec![false; c - 1]; r],
            horizontal_walls: vec![vec![false; c]; r - 1],
        })
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        self.columns
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.rows.0 * self.columns.0
    }

    /// Node and spanning tree edge counts of the passage graph.
    pub fn graph_size(&self) -> (NodesCount, EdgesCount) {
        let cells_count = self.size();
        (NodesCount(cells_count), EdgesCount(cells_count - 1))
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: GridCoordinate) -> bool {
        coord.row >= 0 && coord.col >= 0 && (coord.row as usize) < self.rows.0 &&
        (coord.col as usize) < self.columns.0
    }

    pub fn is_visited(&self, coord: GridCoordinate) -> Result<bool, GridError> {
        self.check_bounds(coord)?;
        Ok(self.visited[coord.row as usize][coord.col as usize])
    }

    /// Visiting is one way only, marking an already visited cell changes nothing.
    pub fn mark_visited(&mut self, coord: GridCoordinate) -> Result<(), GridError> {
        self.check_bounds(coord)?;
        self.visited[coord.row as usize][coord.col as usize] = true;
        Ok(())
    }

    pub fn visited_count(&self) -> usize {
        self.visited.iter().map(|row| row.iter().filter(|&&v| v).count()).sum()
    }

    /// Open the single wall shared by two orthogonally adjacent cells.
    pub fn open_wall_between(&mut self, a: GridCoordinate, b: GridCoordinate) -> Result<(), GridError> {
        let (orientation, row, col) = self.wall_between(a, b)?;
        match orientation {
            WallOrientation::Vertical => self.vertical_walls[row][col] = true,
            WallOrientation::Horizontal => self.horizontal_walls[row][col] = true,
        }
        Ok(())
    }

    pub fn is_wall_open(&self, a: GridCoordinate, b: GridCoordinate) -> Result<bool, GridError> {
        let (orientation, row, col) = self.wall_between(a, b)?;
        Ok(match orientation {
            WallOrientation::Vertical => self.vertical_walls[row][col],
            WallOrientation::Horizontal => self.horizontal_walls[row][col],
        })
    }

    /// `[r][c]` is the wall between columns `c` and `c + 1` of row `r`.
    #[inline]
    pub fn vertical_walls(&self) -> &[Vec<bool>] {
        &self.vertical_walls
    }

    /// `[r][c]` is the wall between rows `r` and `r + 1` of column `c`.
    #[inline]
    pub fn horizontal_walls(&self) -> &[Vec<bool>] {
        &self.horizontal_walls
    }

    pub fn open_walls_count(&self) -> usize {
        self.vertical_walls
            .iter()
            .chain(self.horizontal_walls.iter())
            .map(|row| row.iter().filter(|&&open| open).count())
            .sum()
    }

    /// Every interior wall still standing, vertical walls first, each matrix in row-major order.
    /// The outer border is implicit and never reported.
    pub fn closed_walls<'a>(&'a self) -> impl Iterator<Item = WallSegment> + 'a {
        fn standing(matrix: &[Vec<bool>],
                    orientation: WallOrientation)
                    -> impl Iterator<Item = WallSegment> + '_ {
            matrix.iter().enumerate().flat_map(move |(row, walls)| {
                walls.iter()
                     .enumerate()
                     .filter(|&(_, &open)| !open)
                     .map(move |(col, _)| WallSegment { orientation, row, col })
            })
        }

        standing(&self.vertical_walls, WallOrientation::Vertical)
            .chain(standing(&self.horizontal_walls, WallOrientation::Horizontal))
    }

    pub fn neighbour_at_direction(&self,
                                  coord: GridCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<GridCoordinate> {
        let neighbour_coord = coord.offset(direction);
        if self.is_valid_coordinate(neighbour_coord) {
            Some(neighbour_coord)
        } else {
            None
        }
    }

    /// Cells to the North, South, East or West of a particular cell, but not
    /// necessarily linked by a passage.
    pub fn neighbours(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        ALL_DIRECTIONS.iter()
                      .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
                      .collect()
    }

    /// Cells that are linked to a particular cell by an open passage.
    /// Returns None if the coordinate is outside the grid.
    pub fn links(&self, coord: GridCoordinate) -> Option<CoordinateSmallVec> {
        if !self.is_valid_coordinate(coord) {
            return None;
        }
        let linked = self.neighbours(coord)
                         .into_iter()
                         .filter(|&neighbour| self.is_wall_open(coord, neighbour).unwrap_or(false))
                         .collect();
        Some(linked)
    }

    pub fn is_neighbour_linked(&self, coord: GridCoordinate, direction: CompassPrimary) -> bool {
        self.neighbour_at_direction(coord, direction)
            .map_or(false, |neighbour| self.is_wall_open(coord, neighbour).unwrap_or(false))
    }

    /// Uniformly chosen cell of the grid.
    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> GridCoordinate {
        let index = rng.gen_range(0..self.size());
        GridCoordinate::from_row_major_index(index, self.columns)
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: GridCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.row as usize * self.columns.0 + coord.col as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter {
            current_cell_number: 0,
            columns: self.columns,
            cells_count: self.size(),
        }
    }

    /// The open passages as an undirected graph. Node `i` is the cell with row-major index `i`
    /// and carries its coordinate.
    pub fn passage_graph(&self) -> UnGraph<GridCoordinate, ()> {
        let (NodesCount(nodes), EdgesCount(edges)) = self.graph_size();
        let mut graph = UnGraph::<GridCoordinate, ()>::with_capacity(nodes, edges);
        for coord in self {
            let _ = graph.add_node(coord);
        }

        for (row, walls) in self.vertical_walls.iter().enumerate() {
            for (col, _) in walls.iter().enumerate().filter(|&(_, &open)| open) {
                let a = self.node_index(row, col);
                graph.add_edge(a, NodeIndex::new(a.index() + 1), ());
            }
        }
        for (row, walls) in self.horizontal_walls.iter().enumerate() {
            for (col, _) in walls.iter().enumerate().filter(|&(_, &open)| open) {
                let a = self.node_index(row, col);
                graph.add_edge(a, NodeIndex::new(a.index() + self.columns.0), ());
            }
        }
        graph
    }

    /// Do the open passages form a spanning tree - every cell reachable, no loops.
    pub fn is_perfect_maze(&self) -> bool {
        let graph = self.passage_graph();
        connected_components(&graph) == 1 && !is_cyclic_undirected(&graph)
    }

    #[inline]
    fn check_bounds(&self, coord: GridCoordinate) -> Result<(), GridError> {
        if self.is_valid_coordinate(coord) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds(coord))
        }
    }

    fn wall_between(&self,
                    a: GridCoordinate,
                    b: GridCoordinate)
                    -> Result<(WallOrientation, usize, usize), GridError> {
        self.check_bounds(a)?;
        self.check_bounds(b)?;
        let dir = a.direction_to(b).ok_or(GridError::NotAdjacent(a, b))?;
        let (row, col) = dir.wall_index(a);
        Ok((dir.wall_orientation(), row as usize, col as usize))
    }

    #[inline]
    fn node_index(&self, row: usize, col: usize) -> NodeIndex {
        NodeIndex::new(row * self.columns.0 + col)
    }
}

/// Row-major iteration over every cell coordinate.
#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    columns: ColumnsCount,
    cells_count: usize,
}

impl Iterator for CellIter {
    type Item = GridCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = GridCoordinate::from_row_major_index(self.current_cell_number,
                                                             self.columns);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}
impl ExactSizeIterator for CellIter {} // default impl using size_hint()

impl<'a> IntoIterator for &'a Grid {
    type Item = GridCoordinate;
    type IntoIter = CellIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn small_grid(rows: usize, cols: usize) -> Grid {
        Grid::new(RowsCount(rows), ColumnsCount(cols)).expect("valid grid dimensions")
    }

    fn gc(row: isize, col: isize) -> GridCoordinate {
        GridCoordinate::new(row, col)
    }

    #[test]
    fn rejects_empty_dimensions() {
        assert_eq!(Grid::new(RowsCount(0), ColumnsCount(3)),
                   Err(GridError::InvalidDimensions { rows: 0, columns: 3 }));
        assert_eq!(Grid::new(RowsCount(3), ColumnsCount(0)),
                   Err(GridError::InvalidDimensions { rows: 3, columns: 0 }));
    }

    #[test]
    fn matrices_sized_from_dimensions() {
        let g = small_grid(3, 5);
        assert_eq!(g.size(), 15);
        assert_eq!(g.vertical_walls().len(), 3);
        assert!(g.vertical_walls().iter().all(|row| row.len() == 4));
        assert_eq!(g.horizontal_walls().len(), 2);
        assert!(g.horizontal_walls().iter().all(|row| row.len() == 5));
        assert_eq!(g.open_walls_count(), 0);
        assert_eq!(g.visited_count(), 0);
    }

    #[test]
    fn single_cell_grid_has_no_walls() {
        let g = small_grid(1, 1);
        assert!(g.vertical_walls().iter().all(|row| row.is_empty()));
        assert!(g.horizontal_walls().is_empty());
        assert_eq!(g.closed_walls().count(), 0);
    }

    #[test]
    fn visiting_is_idempotent() {
        let mut g = small_grid(2, 2);
        assert_eq!(g.is_visited(gc(1, 0)), Ok(false));
        g.mark_visited(gc(1, 0)).unwrap();
        let once = g.clone();
        g.mark_visited(gc(1, 0)).unwrap();
        assert_eq!(g, once);
        assert_eq!(g.is_visited(gc(1, 0)), Ok(true));
        assert_eq!(g.visited_count(), 1);
    }

    #[test]
    fn out_of_bounds_access_fails() {
        let mut g = small_grid(2, 3);
        assert_eq!(g.is_visited(gc(-1, 0)), Err(GridError::OutOfBounds(gc(-1, 0))));
        assert_eq!(g.is_visited(gc(0, 3)), Err(GridError::OutOfBounds(gc(0, 3))));
        assert_eq!(g.mark_visited(gc(2, 0)), Err(GridError::OutOfBounds(gc(2, 0))));
        assert_eq!(g.open_wall_between(gc(0, 2), gc(0, 3)),
                   Err(GridError::OutOfBounds(gc(0, 3))));
        assert_eq!(g.visited_count(), 0);
        assert_eq!(g.open_walls_count(), 0);
    }

    #[test]
    fn non_adjacent_cells_cannot_be_opened() {
        let mut g = small_grid(3, 3);
        for &(a, b) in &[(gc(0, 0), gc(1, 1)), (gc(0, 0), gc(0, 2)), (gc(1, 1), gc(1, 1))] {
            assert_eq!(g.open_wall_between(a, b), Err(GridError::NotAdjacent(a, b)));
        }
        assert_eq!(g.open_walls_count(), 0);
    }

    #[test]
    fn opening_walls_sets_shared_flag() {
        let mut g = small_grid(2, 2);

        g.open_wall_between(gc(0, 1), gc(0, 0)).unwrap();
        assert!(g.vertical_walls()[0][0]);
        assert_eq!(g.is_wall_open(gc(0, 0), gc(0, 1)), Ok(true));

        g.open_wall_between(gc(0, 1), gc(1, 1)).unwrap();
        assert!(g.horizontal_walls()[0][1]);
        assert_eq!(g.is_wall_open(gc(1, 1), gc(0, 1)), Ok(true));

        assert_eq!(g.is_wall_open(gc(1, 0), gc(1, 1)), Ok(false));
        assert_eq!(g.open_walls_count(), 2);
    }

    #[test]
    fn closed_walls_lists_standing_segments() {
        let mut g = small_grid(2, 2);
        assert_eq!(g.closed_walls().count(), 4);

        g.open_wall_between(gc(0, 0), gc(1, 0)).unwrap();
        g.open_wall_between(gc(1, 0), gc(1, 1)).unwrap();
        let closed = g.closed_walls().collect::<Vec<_>>();
        assert_eq!(closed,
                   vec![WallSegment { orientation: WallOrientation::Vertical, row: 0, col: 0 },
                        WallSegment { orientation: WallOrientation::Horizontal, row: 0, col: 1 }]);
    }

    #[test]
    fn neighbour_cells() {
        let g = small_grid(10, 10);

        let check_expected_neighbours = |coord, expected_neighbours: &[GridCoordinate]| {
            let neighbours: Vec<GridCoordinate> = g.neighbours(coord).iter().cloned().sorted().collect();
            let expected: Vec<GridCoordinate> = expected_neighbours.iter().cloned().sorted().collect();
            assert_eq!(neighbours, expected);
        };

        // corners
        check_expected_neighbours(gc(0, 0), &[gc(1, 0), gc(0, 1)]);
        check_expected_neighbours(gc(0, 9), &[gc(0, 8), gc(1, 9)]);
        check_expected_neighbours(gc(9, 0), &[gc(8, 0), gc(9, 1)]);
        check_expected_neighbours(gc(9, 9), &[gc(9, 8), gc(8, 9)]);

        // side
        check_expected_neighbours(gc(0, 1), &[gc(0, 0), gc(1, 1), gc(0, 2)]);

        // Some place with 4 neighbours inside the grid
        check_expected_neighbours(gc(1, 1), &[gc(0, 1), gc(1, 0), gc(2, 1), gc(1, 2)]);
    }

    #[test]
    fn links_follow_open_walls() {
        let mut g = small_grid(3, 3);
        assert_eq!(g.links(gc(1, 1)).unwrap().len(), 0);
        assert_eq!(g.links(gc(3, 3)), None);

        g.open_wall_between(gc(1, 1), gc(0, 1)).unwrap();
        g.open_wall_between(gc(1, 1), gc(1, 2)).unwrap();
        let links = g.links(gc(1, 1)).unwrap().iter().cloned().sorted().collect::<Vec<_>>();
        assert_eq!(links, vec![gc(0, 1), gc(1, 2)]);
        assert!(g.is_neighbour_linked(gc(1, 1), CompassPrimary::North));
        assert!(g.is_neighbour_linked(gc(1, 2), CompassPrimary::West));
        assert!(!g.is_neighbour_linked(gc(1, 1), CompassPrimary::South));
        assert!(!g.is_neighbour_linked(gc(0, 0), CompassPrimary::North));
    }

    #[test]
    fn grid_coordinate_as_index() {
        let g = small_grid(3, 3);
        let indices = g.iter()
                       .map(|coord| g.grid_coordinate_to_index(coord))
                       .collect::<Vec<_>>();
        let expected = (0..9).map(Some).collect::<Vec<Option<usize>>>();
        assert_eq!(expected, indices);

        assert_eq!(g.grid_coordinate_to_index(gc(2, 3)), None);
        assert_eq!(g.grid_coordinate_to_index(gc(-1, 0)), None);
    }

    #[test]
    fn cell_iter() {
        let g = small_grid(2, 2);
        assert_eq!(g.iter().len(), 4);
        assert_eq!(g.iter().collect::<Vec<GridCoordinate>>(),
                   &[gc(0, 0), gc(0, 1), gc(1, 0), gc(1, 1)]);
    }

    #[test]
    fn random_cell() {
        let g = small_grid(4, 7);
        let mut rng = XorShiftRng::seed_from_u64(99);
        for _ in 0..1000 {
            assert!(g.is_valid_coordinate(g.random_cell(&mut rng)));
        }
    }

    #[test]
    fn passage_graph_matches_open_walls() {
        let mut g = small_grid(2, 2);
        g.open_wall_between(gc(0, 0), gc(0, 1)).unwrap();
        g.open_wall_between(gc(0, 1), gc(1, 1)).unwrap();
        let graph = g.passage_graph();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph[NodeIndex::new(3)], gc(1, 1));
        assert!(graph.find_edge(NodeIndex::new(0), NodeIndex::new(1)).is_some());
        assert!(graph.find_edge(NodeIndex::new(1), NodeIndex::new(3)).is_some());
        assert!(!g.is_perfect_maze());

        g.open_wall_between(gc(1, 1), gc(1, 0)).unwrap();
        assert!(g.is_perfect_maze());

        g.open_wall_between(gc(1, 0), gc(0, 0)).unwrap();
        assert!(!g.is_perfect_maze());
    }
}
