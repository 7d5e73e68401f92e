use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use crate::cells::GridCoordinate;
use crate::grid::{Grid, GridError};
use crate::units::{ColumnsCount, RowsCount};

/// Passage distances from one start cell to every cell of a grid.
///
/// Every step between linked cells costs one, so a breadth first flood fill gives the shortest
/// distance the first time a cell is reached. Cells walled off from the start have no distance.
#[derive(Debug, Clone)]
pub struct Distances {
    start_coordinate: GridCoordinate,
    rows: RowsCount,
    columns: ColumnsCount,
    distances: Vec<Option<usize>>,
    max_distance: usize,
}

impl Distances {
    pub fn new(grid: &Grid, start_coordinate: GridCoordinate) -> Result<Distances, GridError> {
        let start_index = grid.grid_coordinate_to_index(start_coordinate)
                              .ok_or(GridError::OutOfBounds(start_coordinate))?;

        let mut distances = vec![None; grid.size()];
        distances[start_index] = Some(0);
        let mut max = 0;

        let mut frontier = VecDeque::new();
        frontier.push_back(start_coordinate);
        while let Some(cell_coord) = frontier.pop_front() {
            let distance_to_cell = grid.grid_coordinate_to_index(cell_coord)
                                       .and_then(|index| distances[index])
                                       .ok_or(GridError::OutOfBounds(cell_coord))?;
            if distance_to_cell > max {
                max = distance_to_cell;
            }

            let links = grid.links(cell_coord).ok_or(GridError::OutOfBounds(cell_coord))?;
            for link_coordinate in links {
                if let Some(link_index) = grid.grid_coordinate_to_index(link_coordinate) {
                    if distances[link_index].is_none() {
                        distances[link_index] = Some(distance_to_cell + 1);
                        frontier.push_back(link_coordinate);
                    }
                }
            }
        }

        Ok(Distances {
            start_coordinate,
            rows: grid.rows(),
            columns: grid.columns(),
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> GridCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> usize {
        self.max_distance
    }

    pub fn distance_from_start_to(&self, coord: GridCoordinate) -> Option<usize> {
        let in_grid = coord.row >= 0 && coord.col >= 0 && (coord.row as usize) < self.rows.0 &&
                      (coord.col as usize) < self.columns.0;
        if in_grid {
            self.distances[coord.row as usize * self.columns.0 + coord.col as usize]
        } else {
            None
        }
    }

    /// Cells at the maximum distance from the start, in row-major order.
    pub fn furthest_points_on_grid(&self) -> Vec<GridCoordinate> {
        let furthest_distance = self.max();
        self.distances
            .iter()
            .enumerate()
            .filter(|&(_, distance)| *distance == Some(furthest_distance))
            .map(|(index, _)| GridCoordinate::from_row_major_index(index, self.columns))
            .collect()
    }
}

/// Walk back from `end_point` to the start of `distances_from_start`, always stepping to a
/// linked neighbour one closer to the start. None if the end is not reachable.
pub fn shortest_path(grid: &Grid,
                     distances_from_start: &Distances,
                     end_point: GridCoordinate)
                     -> Option<Vec<GridCoordinate>> {

    let mut current_distance = distances_from_start.distance_from_start_to(end_point)?;
    let mut path = vec![end_point];
    let mut current_coord = end_point;

    while current_distance > 0 {
        let closer = grid.links(current_coord)?
                         .into_iter()
                         .find(|&link| {
                             distances_from_start.distance_from_start_to(link) ==
                             Some(current_distance - 1)
                         })?;
        current_coord = closer;
        current_distance -= 1;
        path.push(current_coord);
    }

    path.reverse();
    Some(path)
}

/// How the goal cell of a maze is chosen once the start cell is known.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GoalPolicy {
    /// The grid corner furthest from the start as the crow flies (Manhattan distance).
    OppositeCorner,
    /// The cell with the longest passage route from the start.
    FurthestCell,
}

impl Default for GoalPolicy {
    fn default() -> GoalPolicy {
        GoalPolicy::OppositeCorner
    }
}

#[derive(Eq, PartialEq, Clone, Debug)]
pub struct ParseGoalPolicyError(String);

impl fmt::Display for ParseGoalPolicyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown goal policy '{}', expected 'corner' or 'furthest'", self.0)
    }
}

impl std::error::Error for ParseGoalPolicyError {}

impl FromStr for GoalPolicy {
    type Err = ParseGoalPolicyError;

    fn from_str(s: &str) -> Result<GoalPolicy, ParseGoalPolicyError> {
        match s {
            "corner" => Ok(GoalPolicy::OppositeCorner),
            "furthest" => Ok(GoalPolicy::FurthestCell),
            other => Err(ParseGoalPolicyError(other.to_string())),
        }
    }
}

/// Pick the goal cell for a maze started at `start`.
pub fn choose_goal(grid: &Grid,
                   start: GridCoordinate,
                   policy: GoalPolicy)
                   -> Result<GridCoordinate, GridError> {
    match policy {
        GoalPolicy::OppositeCorner => opposite_corner(grid, start),
        GoalPolicy::FurthestCell => {
            let distances = Distances::new(grid, start)?;
            Ok(distances.furthest_points_on_grid()
                        .first()
                        .cloned()
                        .unwrap_or(start))
        }
    }
}

/// The corner with the greatest Manhattan distance from `start`. Ties go to the corner
/// furthest down and to the right.
pub fn opposite_corner(grid: &Grid, start: GridCoordinate) -> Result<GridCoordinate, GridError> {
    if !grid.is_valid_coordinate(start) {
        return Err(GridError::OutOfBounds(start));
    }
    let last_row = grid.rows().0 as isize - 1;
    let last_col = grid.columns().0 as isize - 1;
    let corners = [GridCoordinate::new(0, 0),
                   GridCoordinate::new(0, last_col),
                   GridCoordinate::new(last_row, 0),
                   GridCoordinate::new(last_row, last_col)];

    // max_by_key keeps the last of equal maxima
    let corner = corners.iter()
                        .cloned()
                        .max_by_key(|c| (c.row - start.row).abs() + (c.col - start.col).abs())
                        .unwrap_or(start);
    Ok(corner)
}

/// Works only as long as we are looking at a perfect maze, otherwise you get back some arbitrary path.
pub fn longest_path(grid: &Grid) -> Option<Vec<GridCoordinate>> {
    let first_distances = Distances::new(grid, GridCoordinate::new(0, 0)).ok()?;

    // The start of the longest path is just the point furthest away from an arbitrary initial point
    let long_path_start = *first_distances.furthest_points_on_grid().first()?;
    let distances_from_start = Distances::new(grid, long_path_start).ok()?;
    let end_point = *distances_from_start.furthest_points_on_grid().first()?;

    shortest_path(grid, &distances_from_start, end_point)
}
