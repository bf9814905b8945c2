use anyhow::{anyhow, bail, Context};
use config::{Config, File};
use hexboard::{
    timed, BoardRenderer, BoardState, GameConfig, GameModel, Point,
    RenderConfig, SavedGame, Viewport,
};
use log::{info, warn, LevelFilter};
use simple_logger::SimpleLogger;
use std::{
    fs::{self, OpenOptions},
    io::{BufReader, Write},
    path::{Path, PathBuf},
    process,
};
use structopt::StructOpt;
use strum::{Display, EnumString};

/// CLI for running hex board simulations.
#[derive(Debug, StructOpt)]
#[structopt(name = "hexboard")]
struct Opt {
    /// Path to a config file that defines the board to be created. Supported
    /// formats: JSON, TOML
    #[structopt(short, long)]
    config: Option<PathBuf>,

    /// Path to a saved game to load (.json or .bin)
    #[structopt(short, long)]
    saved: Option<PathBuf>,

    /// Path to a JSON board state (a map of cell keys to cell records) to
    /// apply before the simulation runs
    #[structopt(long)]
    state: Option<PathBuf>,

    /// Number of generations to run before writing output
    #[structopt(short, long, default_value = "0")]
    turns: u64,

    /// If given, the final game will be saved to this directory. The exact
    /// files that appear in the directory are defined by the output formats.
    /// See `--output-formats` for more info
    #[structopt(short, long)]
    output: Option<PathBuf>,

    /// The format(s) to output the game in. Supported formats:
    ///
    /// bin - Binary representation that can be reloaded by this CLI later
    ///
    /// cfg - The full config object used for the game, in TOML format
    ///
    /// json - JSON representation. Similar to the binary format, but slower
    ///   and much less compact
    ///
    /// svg - 2D rendering of the whole board
    #[structopt(short = "f", long)]
    output_formats: Vec<OutputFormat>,

    /// Don't draw grid lines in rendered output formats
    #[structopt(long)]
    hide_grid: bool,

    /// The logging level to use. See
    /// https://docs.rs/log/0.4.11/log/enum.LevelFilter.html for options
    #[structopt(long, default_value = "info")]
    log_level: LevelFilter,
}

/// Different output formats.
#[derive(Copy, Clone, Debug, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
enum OutputFormat {
    // If you change this, make sure to update the help text for
    // `--output-formats`!
    /// Export the game in a serialized binary format, which can be
    /// deserialized later to recover the game
    Bin,
    /// Export the game's full config in a human-readable file
    Cfg,
    /// Export the game in a serialized JSON format. This is similar to the
    /// bin format, but is human readable at the cost of being slower and much
    /// less compact
    Json,
    /// Render the board as a 2D SVG
    Svg,
}

impl OutputFormat {
    fn file_ext(self) -> &'static str {
        match self {
            Self::Bin => "bin",
            Self::Cfg => "toml",
            Self::Json => "json",
            Self::Svg => "svg",
        }
    }
}

fn load_config(config_path: &Path) -> anyhow::Result<GameConfig> {
    let mut settings = Config::new();
    let config_path = config_path.to_str().ok_or_else(|| {
        anyhow!("invalid character in path {:?}", config_path)
    })?;
    settings
        .merge(File::with_name(config_path))
        .context("error reading config file")?;
    settings.try_into().context("error reading config")
}

fn open_file(path: &Path) -> anyhow::Result<fs::File> {
    OpenOptions::new()
        .read(true)
        .open(path)
        .with_context(|| format!("error opening file {:?}", path))
}

/// Load a saved game, picking the format based on file extension
fn load_saved(path: &Path) -> anyhow::Result<GameModel> {
    let saved = match path.extension().and_then(|ext| ext.to_str()) {
        Some("bin") => SavedGame::from_bin(BufReader::new(open_file(path)?))?,
        Some("json") => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("error reading file {:?}", path))?;
            SavedGame::from_json(&json)?
        }
        _ => bail!("saved game {:?} must be a .bin or .json file", path),
    };
    let (game, report) = GameModel::restore(&saved)?;
    if !report.skipped.is_empty() {
        warn!("Skipped {} invalid cell(s)", report.skipped.len());
    }
    info!("Loaded game from {:?} at turn {}", path, game.turn());
    Ok(game)
}

/// Screen size that fits the whole board at the viewport's scale
fn board_screen_size(game: &GameModel, viewport: &Viewport) -> Point {
    let board = game.board();
    // Odd rows stick out one extra fine unit to the right
    viewport.world_to_screen(Point::new(
        board.cols() as f64 * 2.0 + 1.0,
        board.rows() as f64 * 2.0 + 1.0,
    ))
}

/// Generate an output form of the game in the given format.
fn gen_output(
    output_dir: &Path,
    output_format: OutputFormat,
    game: &GameModel,
    renderer: &BoardRenderer,
) -> anyhow::Result<()> {
    fn generate_bytes(
        output_format: OutputFormat,
        game: &GameModel,
        renderer: &BoardRenderer,
    ) -> Vec<u8> {
        match output_format {
            OutputFormat::Bin => game.save().to_bin(),
            OutputFormat::Cfg => {
                toml::to_string_pretty(game.config())
                    // Panics only if config format isn't serializable (a bug)
                    .expect("error serializing config")
                    .into_bytes()
            }
            OutputFormat::Json => game.save().to_json().into_bytes(),
            OutputFormat::Svg => {
                let viewport = Viewport::default();
                let screen_size = board_screen_size(game, &viewport);
                renderer
                    .render_as_svg(game, &viewport, screen_size)
                    .into_bytes()
            }
        }
    }

    let output_file_path = output_dir
        .join("board")
        .with_extension(output_format.file_ext());

    timed!(
        format!(
            "Generating {} output and writing to {:?}",
            output_format, &output_file_path
        ),
        log::Level::Info,
        {
            let bytes = generate_bytes(output_format, game, renderer);
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&output_file_path)
                .with_context(|| {
                    format!("error opening output file {:?}", &output_file_path)
                })?;
            file.write_all(&bytes).with_context(|| {
                format!("error writing to file {:?}", &output_file_path)
            })?;
        }
    );

    Ok(())
}

/// Run the CLI with some options
fn run(opt: Opt) -> anyhow::Result<()> {
    SimpleLogger::new().with_level(opt.log_level).init()?;

    let mut game = match (&opt.config, &opt.saved) {
        (Some(config_path), None) => {
            let config = load_config(config_path)?;
            GameModel::new(config)?
        }
        (None, Some(saved_path)) => load_saved(saved_path)?,
        (None, None) => GameModel::new(GameConfig::default())?,
        (Some(_), Some(_)) => bail!(
            "can't pass both --config (to create a new game) \
            and --saved (to load an existing game)"
        ),
    };

    if let Some(state_path) = &opt.state {
        let state: BoardState =
            serde_json::from_reader(BufReader::new(open_file(state_path)?))
                .with_context(|| {
                    format!("error deserializing board state {:?}", state_path)
                })?;
        let report = game.load_state(&state);
        for key in &report.skipped {
            warn!("Invalid cell key {:?} in {:?}", key, state_path);
        }
    }

    if opt.turns > 0 {
        timed!(format!("Running {} turn(s)", opt.turns), log::Level::Info, {
            for _ in 0..opt.turns {
                game.step();
            }
        });
        info!("Finished at turn {}", game.turn());
    }

    // If an output dir was specified, write out output format(s) there
    if let Some(output_dir) = opt.output {
        if opt.output_formats.is_empty() {
            bail!("output dir was specified, but no output formats were given")
        }
        fs::create_dir_all(&output_dir)?;

        let renderer = BoardRenderer::new(RenderConfig {
            show_grid: !opt.hide_grid,
            ..Default::default()
        })
        .context("invalid render config")?;
        for output_format in opt.output_formats {
            gen_output(&output_dir, output_format, &game, &renderer)?;
        }
    }

    Ok(())
}

fn main() {
    let exit_code = match run(Opt::from_args()) {
        Ok(_) => 0,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            1
        }
    };
    process::exit(exit_code);
}
