use itertools::Itertools;
use serde_derive::{Deserialize, Serialize};

use crate::cells::GridCoordinate;
use crate::grid::Grid;

/// Read-only copy of a carved maze for handing to a renderer or saving.
///
/// `true` in a wall matrix is an open passage, `false` a wall to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeSnapshot {
    pub rows: usize,
    pub cols: usize,
    pub start: GridCoordinate,
    pub goal: GridCoordinate,
    pub vertical_walls: Vec<Vec<bool>>,
    pub horizontal_walls: Vec<Vec<bool>>,
}

impl MazeSnapshot {
    pub fn new(grid: &Grid, start: GridCoordinate, goal: GridCoordinate) -> MazeSnapshot {
        MazeSnapshot {
            rows: grid.rows().0,
            cols: grid.columns().0,
            start,
            goal,
            vertical_walls: grid.vertical_walls().to_vec(),
            horizontal_walls: grid.horizontal_walls().to_vec(),
        }
    }

    pub fn open_walls_count(&self) -> usize {
        self.vertical_walls
            .iter()
            .chain(self.horizontal_walls.iter())
            .flatten()
            .filter(|&&open| open)
            .count()
    }
}

/// Serialize the maze passages as text: each line is a pair of numbers.
/// Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based row-major
/// vertex indices.
pub fn edge_list(grid: &Grid) -> String {
    let graph = grid.passage_graph();
    let header = format!("{} {}", graph.node_count(), graph.edge_count());
    let edges = graph.raw_edges()
                     .iter()
                     .map(|edge| format!("{} {}", edge.source().index() + 1, edge.target().index() + 1));

    let mut graph_data = std::iter::once(header).chain(edges).join("\n");
    graph_data.push('\n');
    graph_data
}
