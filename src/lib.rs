//! **mazes** generates perfect mazes with the recursive backtracker and exposes them as
//! matrices of open and closed walls for a renderer to consume.

pub mod cells;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod pathing;
pub mod snapshot;
pub mod units;
