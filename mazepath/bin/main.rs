use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use mazepath::{
    LogSink, Maze, MapTrait, PathFinderState, Point, Route, RouteError, SearchConfig,
    SearchPolicy,
};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "mazepath")]
#[command(about = "Find the shortest path from 'S' to 'C' through a text maze.", long_about = None)]
struct Cli {
    /// Path to the maze file (first line "<rows> <cols>", then the rows)
    maze: String,

    /// Keep searching until the frontier is empty instead of stopping at the end cell
    #[arg(long, default_value_t = false)]
    exhaustive: bool,

    /// Log every visited node, relaxation and explored edge
    #[arg(long, default_value_t = false)]
    trace: bool,

    /// Print the result as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Print the compiled graph of decision cells
    #[arg(long, default_value_t = false)]
    show_graph: bool,

    /// Print the maze with the path drawn in
    #[arg(long, default_value_t = false)]
    show_path: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    rows: usize,
    columns: usize,
    start: Point,
    end: Point,
    nodes: usize,
    edges: usize,
    status: PathFinderState,
    distance: Option<usize>,
    route: Option<&'a Route>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.trace { "trace" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = SearchConfig {
        policy: if cli.exhaustive {
            SearchPolicy::Exhaustive
        } else {
            SearchPolicy::EarlyExit
        },
    };

    let text =
        std::fs::read_to_string(&cli.maze).with_context(|| format!("reading {}", &cli.maze))?;
    let maze = Maze::from_text(&text, config).with_context(|| format!("parsing {}", &cli.maze))?;
    let grid = maze.grid();

    info!(
        "loaded {}x{} maze, {} decision cells, {} edges",
        grid.rows(),
        grid.columns(),
        maze.graph().node_count(),
        maze.graph().edge_count()
    );

    if cli.show_graph {
        print!("{}", maze.graph());
    }

    let result = if cli.trace {
        maze.solve(&mut LogSink)?
    } else {
        maze.solve(&mut ())?
    };

    let route = match result.route() {
        Ok(route) => Some(route),
        Err(RouteError::UnreachableEnd(_)) => None,
        Err(e) => return Err(e).context("reconstructing the path"),
    };

    if cli.json {
        let report = Report {
            rows: grid.rows(),
            columns: grid.columns(),
            start: grid.start(),
            end: grid.end(),
            nodes: maze.graph().node_count(),
            edges: maze.graph().edge_count(),
            status: result.status,
            distance: result.distance,
            route: route.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match &route {
            Some(route) => {
                println!(
                    "Path from start to end is {} cells long ({} moves)",
                    route.cell_count(),
                    route.total_length
                );
                println!("{}", route);
            }
            None => println!("No path from {} to {}", grid.start(), grid.end()),
        }
    }

    if cli.show_path {
        if let Some(route) = &route {
            print!("{}", grid.render_path(&route.cells(grid.start())));
        }
    }

    Ok(())
}
