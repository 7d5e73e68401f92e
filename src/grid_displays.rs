use fnv::FnvHashSet;
use std::fmt;

use crate::cells::{CompassPrimary, GridCoordinate};
use crate::grid::Grid;
use crate::units::{ColumnIndex, RowIndex};

pub trait GridDisplay {
    /// Render the contents of a grid cell as text.
    /// The String should be 3 glyphs long, padded if required.
    fn render_cell_body(&self, _: GridCoordinate) -> String {
        String::from("   ")
    }
}

#[derive(Debug, Clone)]
pub struct StartEndPointsDisplay {
    start: Option<GridCoordinate>,
    end: Option<GridCoordinate>,
}

impl StartEndPointsDisplay {
    pub fn new(start: Option<GridCoordinate>, end: Option<GridCoordinate>) -> StartEndPointsDisplay {
        StartEndPointsDisplay { start, end }
    }
}

impl GridDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, coord: GridCoordinate) -> String {
        if self.start == Some(coord) {
            String::from(" S ")
        } else if self.end == Some(coord) {
            String::from(" G ")
        } else {
            String::from("   ")
        }
    }
}

/// Marks every cell on a path, with the path ends shown as start and goal.
#[derive(Debug, Clone)]
pub struct PathDisplay {
    ends: StartEndPointsDisplay,
    on_path_coordinates: FnvHashSet<GridCoordinate>,
}

impl PathDisplay {
    pub fn new(path: &[GridCoordinate]) -> PathDisplay {
        PathDisplay {
            ends: StartEndPointsDisplay::new(path.first().cloned(), path.last().cloned()),
            on_path_coordinates: path.iter().cloned().collect(),
        }
    }
}

impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, coord: GridCoordinate) -> String {
        let ends = self.ends.render_cell_body(coord);
        if ends.trim().is_empty() && self.on_path_coordinates.contains(&coord) {
            String::from(" . ")
        } else {
            ends
        }
    }
}

/// ASCII drawing of a maze, `+---+` for horizontal walls and `|` for vertical ones.
/// Cell bodies come from the optional `GridDisplay`.
pub struct MazeText<'a> {
    grid: &'a Grid,
    display: Option<&'a dyn GridDisplay>,
}

impl<'a> MazeText<'a> {
    pub fn new(grid: &'a Grid, display: Option<&'a dyn GridDisplay>) -> MazeText<'a> {
        MazeText { grid, display }
    }
}

impl<'a> fmt::Display for MazeText<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const CORNER: &str = "+";
        const WALL_LR_3: &str = "---";
        const WALL_UD: &str = "|";
        const OPEN_LR_3: &str = "   ";
        const OPEN_UD: &str = " ";

        let rows_count = self.grid.rows().0;
        let columns_count = self.grid.columns().0;

        // The north most boundary is never open
        let mut output = String::from(CORNER);
        for _ in 0..columns_count {
            output.push_str(WALL_LR_3);
            output.push_str(CORNER);
        }
        output.push('\n');

        for row in 0..rows_count {
            // Each cell uses the southern wall of the cell above as its own northern wall, so
            // only the body, the eastern boundary and the southern boundary are drawn.
            let mut row_middle_section_render = String::from(WALL_UD);
            let mut row_bottom_section_render = String::from(CORNER);

            for col in 0..columns_count {
                let coord = GridCoordinate::from_row_column_indices(RowIndex(row), ColumnIndex(col));
                let body = self.display
                               .map(|d| d.render_cell_body(coord))
                               .unwrap_or_else(|| String::from(OPEN_LR_3));
                let east_open = self.grid.is_neighbour_linked(coord, CompassPrimary::East);
                let south_open = self.grid.is_neighbour_linked(coord, CompassPrimary::South);

                row_middle_section_render.push_str(&body);
                row_middle_section_render.push_str(if east_open { OPEN_UD } else { WALL_UD });
                row_bottom_section_render.push_str(if south_open { OPEN_LR_3 } else { WALL_LR_3 });
                row_bottom_section_render.push_str(CORNER);
            }

            output.push_str(&row_middle_section_render);
            output.push('\n');
            output.push_str(&row_bottom_section_render);
            output.push('\n');
        }

        write!(f, "{}", output)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", MazeText::new(self, None))
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::units::{ColumnsCount, RowsCount};

    fn gc(row: isize, col: isize) -> GridCoordinate {
        GridCoordinate::new(row, col)
    }

    fn carved_two_by_two() -> Grid {
        let mut g = Grid::new(RowsCount(2), ColumnsCount(2)).unwrap();
        g.open_wall_between(gc(0, 0), gc(1, 0)).unwrap();
        g.open_wall_between(gc(1, 0), gc(1, 1)).unwrap();
        g.open_wall_between(gc(1, 1), gc(0, 1)).unwrap();
        g
    }

    #[test]
    fn renders_walls() {
        let expected = "+---+---+\n\
                        |   |   |\n\
                        +   +   +\n\
                        |       |\n\
                        +---+---+\n";
        assert_eq!(carved_two_by_two().to_string(), expected);
    }

    #[test]
    fn renders_fully_walled_grid() {
        let g = Grid::new(RowsCount(1), ColumnsCount(2)).unwrap();
        assert_eq!(g.to_string(), "+---+---+\n|   |   |\n+---+---+\n");
    }

    #[test]
    fn renders_start_and_goal() {
        let g = carved_two_by_two();
        let markers = StartEndPointsDisplay::new(Some(gc(0, 0)), Some(gc(0, 1)));
        let text = MazeText::new(&g, Some(&markers)).to_string();
        assert_eq!(text.lines().nth(1), Some("| S | G |"));
    }

    #[test]
    fn renders_path() {
        let g = Grid::new(RowsCount(1), ColumnsCount(4)).unwrap();
        let path = PathDisplay::new(&[gc(0, 0), gc(0, 1), gc(0, 2)]);
        let text = MazeText::new(&g, Some(&path)).to_string();
        assert_eq!(text.lines().nth(1), Some("| S | . | G |   |"));
    }
}
