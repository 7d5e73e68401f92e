use docopt::Docopt;
use error_chain::bail;
use log::info;
use mazes::{
    cells::GridCoordinate,
    generators,
    grid::Grid,
    grid_displays::{GridDisplay, MazeText, PathDisplay, StartEndPointsDisplay},
    pathing::{self, GoalPolicy},
    snapshot::{self, MazeSnapshot},
    units::{ColumnsCount, RowsCount},
};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use serde_derive::Deserialize;
use std::{
    fs::File,
    io,
    io::prelude::*,
};

const USAGE: &str = "Mazes

Usage:
    mazes_driver -h | --help
    mazes_driver [--rows=<r>] [--cols=<c>] [--seed=<s>] [(--start-row=<y> --start-col=<x>)] [--goal=<policy>] [--show-path] [--text-out=<path>] [--save-walls=<path>] [--save-edges=<path>] [--quiet]

Options:
    -h --help              Show this screen.
    --rows=<r>             Number of rows of cells in the maze [default: 15].
    --cols=<c>             Number of columns of cells in the maze [default: 25].
    --seed=<s>             Seed for the random number generator. Random when not given, the seed used is logged.
    --start-row=<y>        Row of the cell the carving starts from. Random when not given.
    --start-col=<x>        Column of the cell the carving starts from. Given together with --start-row.
    --goal=<policy>        How the goal cell is chosen: corner (the corner furthest from the start) or furthest (longest route from the start) [default: corner].
    --show-path            Mark the route from the start to the goal in the text rendering.
    --text-out=<path>      Output file path for a textual rendering of the maze instead of the screen.
    --save-walls=<path>    Serialize the maze to a JSON file: dimensions, start, goal and both wall matrices (true is an open passage).
    --save-edges=<path>    Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
    --quiet                Do not print the maze to the screen.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_rows: usize,
    flag_cols: usize,
    flag_seed: Option<u64>,
    flag_start_row: Option<isize>,
    flag_start_col: Option<isize>,
    flag_goal: String,
    flag_show_path: bool,
    flag_text_out: String,
    flag_save_walls: String,
    flag_save_edges: String,
    flag_quiet: bool,
}

// We'll put our errors in an `errors` module, and other modules in
// this crate will `use errors::*;` to get access to everything
// `error_chain!` creates.
mod errors {
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
            Json(::serde_json::Error);
            Grid(::mazes::grid::GridError);
            GoalPolicy(::mazes::pathing::ParseGoalPolicyError);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;
    let goal_policy: GoalPolicy = args.flag_goal.parse()?;

    let seed = args.flag_seed.unwrap_or_else(|| rand::thread_rng().gen());
    let mut rng = XorShiftRng::seed_from_u64(seed);

    let mut maze_grid = Grid::new(RowsCount(args.flag_rows), ColumnsCount(args.flag_cols))?;
    let start = start_coordinate(&maze_grid, args.flag_start_row, args.flag_start_col, &mut rng)?;

    generators::recursive_backtracker(&mut maze_grid, start, &mut rng)?;
    let goal = pathing::choose_goal(&maze_grid, start, goal_policy)?;
    info!("Carved {}x{} maze with seed {}: start {}, goal {}, {} passages",
          args.flag_rows,
          args.flag_cols,
          seed,
          start,
          goal,
          maze_grid.open_walls_count());

    let text = render_text(&maze_grid, &args, start, goal)?;
    if !args.flag_text_out.is_empty() {
        write_text_to_file(&text, &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    } else if !args.flag_quiet {
        print!("{}", text);
    }

    if !args.flag_save_walls.is_empty() {
        let maze_snapshot = MazeSnapshot::new(&maze_grid, start, goal);
        let json = serde_json::to_string_pretty(&maze_snapshot)?;
        write_text_to_file(&json, &args.flag_save_walls)
            .chain_err(|| format!("Failed to write maze walls to file {}", args.flag_save_walls))?;
        info!("Saved wall matrices to {}", args.flag_save_walls);
    }

    if !args.flag_save_edges.is_empty() {
        write_text_to_file(&snapshot::edge_list(&maze_grid), &args.flag_save_edges)
            .chain_err(|| format!("Failed to write maze graph to text file {}", args.flag_save_edges))?;
        info!("Saved passage edges to {}", args.flag_save_edges);
    }

    Ok(())
}

/// Text rendering with the start and goal marked, and the route between them if asked for.
fn render_text(maze_grid: &Grid,
               maze_args: &MazeArgs,
               start: GridCoordinate,
               goal: GridCoordinate)
               -> Result<String> {

    let display: Box<dyn GridDisplay> = if maze_args.flag_show_path {
        let distances = pathing::Distances::new(maze_grid, start)?;
        let path = pathing::shortest_path(maze_grid, &distances, goal)
            .ok_or("No route from the start to the goal, the maze is not perfect.")?;
        Box::new(PathDisplay::new(&path))
    } else {
        Box::new(StartEndPointsDisplay::new(Some(start), Some(goal)))
    };

    Ok(MazeText::new(maze_grid, Some(display.as_ref())).to_string())
}

/// The start cell from the command line, or a random cell when neither half is given.
fn start_coordinate<R: Rng>(maze_grid: &Grid,
                            start_row: Option<isize>,
                            start_col: Option<isize>,
                            rng: &mut R)
                            -> Result<GridCoordinate> {
    match (start_row, start_col) {
        (Some(row), Some(col)) => Ok(GridCoordinate::new(row, col)),
        (None, None) => Ok(maze_grid.random_cell(rng)),
        (Some(_), None) | (None, Some(_)) => {
            bail!("--start-row and --start-col must be given together")
        }
    }
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
