use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use gazetype::config::Config;
use gazetype::geometry::KeyboardGeometry;
use gazetype::layouts::KnownLayout;
use gazetype::loader::load_key_coordinates;
use gazetype::{EngineBuildParams, GtResult};
use std::process;
use tracing::Level;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about = "Word inference from eye-typing gaze traces", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Key centers, one `<char>\t<x>\t<y>` per line. Built-in QWERTY if omitted.
    #[arg(global = true, short = 'k', long)]
    keymap: Option<String>,

    /// Vocabulary, one word per line
    #[arg(global = true, short = 'v', long, default_value = "data/vocab.txt")]
    vocab: String,

    /// JSON config used as the base; explicit flags override it
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Segment a stream and rank the vocabulary with the fast aligner
    Rank(cmd::rank::RankArgs),
    /// Score a stream with the dynamic-programming aligner
    Align(cmd::align::AlignArgs),
    /// Print a synthetic gaze stream for a word
    Simulate(cmd::simulate::SimulateArgs),
    /// Learn alignment weights from labelled streams
    Train(cmd::train::TrainArgs),
}

fn fail(context: &str, e: impl std::fmt::Display) -> ! {
    eprintln!("\n❌ {}:", context);
    eprintln!("   {}", e);
    process::exit(1);
}

fn resolve_config(cli: &Cli, cli_config: &Config, sub_matches: &ArgMatches) -> GtResult<Config> {
    match &cli.config {
        Some(path) => {
            let mut config = Config::load_from_file(path)?;
            config.merge_from_cli(cli_config, sub_matches);
            Ok(config)
        }
        None => Ok(cli_config.clone()),
    }
}

fn load_geometry(keymap: Option<&str>) -> GtResult<KeyboardGeometry> {
    match keymap {
        Some(path) => {
            let centers = load_key_coordinates(path)?;
            KeyboardGeometry::from_centers(KnownLayout::Qwerty, &centers)
        }
        None => Ok(KeyboardGeometry::standard(KnownLayout::Qwerty)),
    }
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Commands::Simulate(args) = &cli.command {
        let geometry = load_geometry(cli.keymap.as_deref())
            .unwrap_or_else(|e| fail("Failed to load keyboard", e));
        if let Err(e) = cmd::simulate::run(args, &geometry) {
            fail("Simulation failed", e);
        }
        return;
    }

    let (cli_config, sub_name) = match &cli.command {
        Commands::Rank(args) => (&args.config, "rank"),
        Commands::Align(args) => (&args.config, "align"),
        Commands::Train(args) => (&args.config, "train"),
        Commands::Simulate(_) => unreachable!("handled above"),
    };
    let sub_matches = matches
        .subcommand_matches(sub_name)
        .unwrap_or_else(|| fail("Argument error", format!("missing '{}' matches", sub_name)));

    let config = resolve_config(&cli, cli_config, sub_matches)
        .unwrap_or_else(|e| fail("Failed to load config", e));

    let mut engine =
        EngineBuildParams::load_from_disk(cli.keymap.as_deref(), &cli.vocab, Some(config))
            .unwrap_or_else(|e| fail("FATAL ERROR INITIALIZING ENGINE", e));

    let result = match &cli.command {
        Commands::Rank(args) => cmd::rank::run(args, &engine),
        Commands::Align(args) => cmd::align::run(args, &mut engine),
        Commands::Train(args) => cmd::train::run(args, &mut engine),
        Commands::Simulate(_) => Ok(()),
    };

    if let Err(e) = result {
        fail("Command failed", e);
    }
}
