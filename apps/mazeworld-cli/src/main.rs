use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use mazeworld_assets::{BuiltinLoader, ModelAsset, gltf::parse_model};
use mazeworld_common::GridPos;
use mazeworld_engine::{
    Engine, EngineConfig, FixedStepHost, LaunchOptions, LoadingHooks, load_single_player_test,
};
use mazeworld_maze::carve;
use mazeworld_render::{DebugTextRenderer, VisualNode};
use mazeworld_tools::{EngineInspector, render_light_map, render_maze, render_maze_with};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mazeworld-cli", about = "CLI for mazeworld mazes and the test scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Engine config file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable wall collision
    #[arg(long, global = true)]
    noclip: bool,

    /// Prefix for relative asset paths
    #[arg(long, global = true)]
    path_root: Option<String>,

    /// Launch query string, e.g. "?noclip"
    #[arg(long, global = true, default_value = "")]
    query: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Copy)]
struct MazeArgs {
    /// Maze width in cells
    #[arg(long, default_value = "8")]
    width: usize,
    /// Maze height in cells
    #[arg(long, default_value = "8")]
    height: usize,
    /// Carving seed
    #[arg(short, long, default_value = "42")]
    seed: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Carve a maze and draw it
    Maze {
        #[command(flatten)]
        maze: MazeArgs,
    },
    /// Carve a maze and draw the path between two cells
    Path {
        #[command(flatten)]
        maze: MazeArgs,
        /// Start cell as x,y
        #[arg(long, default_value = "0,0", value_parser = parse_pos)]
        from: GridPos,
        /// End cell as x,y
        #[arg(long, value_parser = parse_pos)]
        to: Option<GridPos>,
    },
    /// Light a maze from one cell and dump the light map
    Light {
        #[command(flatten)]
        maze: MazeArgs,
        /// Light source cell as x,y
        #[arg(long, default_value = "0,0", value_parser = parse_pos)]
        at: GridPos,
    },
    /// Run the single-player test scene headless
    Run {
        #[command(flatten)]
        maze: MazeArgs,
        /// Number of frames to run
        #[arg(short, long, default_value = "120")]
        frames: u64,
        /// Frame step in milliseconds
        #[arg(long, default_value = "16")]
        step_ms: u64,
        /// Polls each asset takes to load
        #[arg(long, default_value = "2")]
        latency: u32,
        /// Place a marble at x,y (repeatable)
        #[arg(long = "marble", value_parser = parse_pos)]
        marbles: Vec<GridPos>,
    },
    /// Parse a glTF model and print its resolved render properties
    Props {
        /// Path to a .gltf or .glb file
        file: PathBuf,
    },
}

fn parse_pos(text: &str) -> Result<GridPos, String> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got {text:?}"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in {text:?}: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in {text:?}: {e}"))?;
    Ok(GridPos::new(x, y))
}

fn load_config(cli: &Cli) -> anyhow::Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            EngineConfig::from_yaml_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    if let Some(root) = &cli.path_root {
        config.path_root = root.clone();
    }
    let mut launch = LaunchOptions::from_query(&cli.query);
    launch.noclip |= cli.noclip;
    Ok(config.with_launch_options(launch))
}

fn print_tree(node: &VisualNode, depth: usize) {
    let transparent = node
        .material
        .as_ref()
        .map_or("-".to_string(), |m| m.transparent.to_string());
    println!(
        "{:indent$}{} transparent={} receiveShadow={} castShadow={}",
        "",
        node.name,
        transparent,
        node.receive_shadow,
        node.cast_shadow,
        indent = depth * 2
    );
    for child in &node.children {
        print_tree(child, depth + 1);
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Info => {
            println!("mazeworld-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("maze: {}", mazeworld_maze::crate_info());
            println!("assets: {}", mazeworld_assets::crate_info());
            println!("render: {}", mazeworld_render::crate_info());
            println!("engine: {}", mazeworld_engine::crate_info());
            println!("tools: {}", mazeworld_tools::crate_info());
            println!(
                "config: path_root={:?} noclip={} policy={:?}",
                config.path_root, config.noclip, config.load_failure
            );
        }
        Commands::Maze { maze } => {
            let grid = carve(maze.width, maze.height, maze.seed);
            print!("{}", render_maze(&grid));
        }
        Commands::Path { maze, from, to } => {
            let mut grid = carve(maze.width, maze.height, maze.seed);
            let to = to.unwrap_or_else(|| {
                GridPos::new(maze.width as i32 - 1, maze.height as i32 - 1)
            });
            let path = grid
                .find_path(from, to)
                .with_context(|| format!("finding path {from} -> {to}"))?
                .unwrap_or_default();
            print!(
                "{}",
                render_maze_with(&grid, |p| path.contains(&p).then_some('*'))
            );
            println!("Path {from} -> {to}: {} cells", path.len());
        }
        Commands::Light { maze, at } => {
            let mut grid = carve(maze.width, maze.height, maze.seed);
            anyhow::ensure!(grid.get(at).is_some(), "light source {at} is off the grid");
            grid.propagate_light(at);
            print!("{}", render_light_map(&grid));
        }
        Commands::Run {
            maze,
            frames,
            step_ms,
            latency,
            marbles,
        } => {
            let loader = BuiltinLoader::new().with_latency(latency);
            let mut engine =
                Engine::with_renderer(config, Box::new(loader), DebugTextRenderer::new());
            engine.set_loading_hooks(
                LoadingHooks::new()
                    .on_progress(|progress| tracing::debug!(%progress, "loading"))
                    .on_loading_finished(|| tracing::info!("assets ready")),
            );

            let mut host = FixedStepHost::new(Duration::from_millis(step_ms), frames);
            engine.load(&mut host)?;
            let scene =
                load_single_player_test(&mut engine, maze.width, maze.height, maze.seed, &marbles)?;
            let ticks = engine.run(&mut host)?;

            if let Some(frame) = host.last_frame() {
                print!("{frame}");
            }
            println!("{}", EngineInspector::summary(&engine));
            if let Some(info) = EngineInspector::inspect_entity(&engine, scene.player) {
                println!("{info}");
                print!(
                    "{}",
                    render_maze_with(engine.maze(), |p| (p == info.grid).then_some('@'))
                );
            }
            println!("ran {ticks} ticks");
        }
        Commands::Props { file } => {
            let bytes =
                std::fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            let name = file
                .file_stem()
                .map_or("model".to_string(), |s| s.to_string_lossy().into_owned());
            let root = parse_model(&name, &bytes)
                .with_context(|| format!("parsing {}", file.display()))?;
            print_tree(&ModelAsset::new(root).instance(), 0);
        }
    }

    Ok(())
}
