//! `layertree`: edit and inspect a map layer tree.
//!
//! Usage:
//!   layertree [--input FILE] [--config FILE] <command> ...
//!
//! The layers are read as a JSON array from `--input`, or from stdin. Results
//! are written to stdout as JSON (or text for `render --text`).

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use layertree::cli::{self, CliError, EditCommand};
use layertree::config::LayerTreeConfig;

#[derive(Parser, Debug)]
#[command(name = "layertree")]
#[command(version, about, long_about = None)]
struct Args {
    /// Layers file (default: stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Tree config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Show debug output on stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Toggle the visibility of one leaf
    ToggleLeaf { layer: String, path: String },
    /// Toggle a group, or the layer itself when PATH is empty
    ToggleGroup {
        layer: String,
        #[arg(default_value = "")]
        path: String,
    },
    /// Set a leaf's transparency slider (0 = opaque, 255 = transparent)
    Opacity { layer: String, path: String, value: u8 },
    /// Print the derived request params of a layer
    Params { layer: String },
    /// Print the aggregate visibility of a node
    Visibility {
        layer: String,
        #[arg(default_value = "")]
        path: String,
    },
    /// Render the tree view
    Render {
        /// Menu key of the open edit menu
        #[arg(long)]
        menu: Option<String>,
        /// Draw as indented text instead of JSON
        #[arg(long)]
        text: bool,
    },
}

fn main() {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "warn" };
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = format!("layertree={log_level}").parse() {
        filter = filter.add_directive(directive);
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    if let Err(e) = run(&args).and_then(|out| cli::write_output(io::stdout().lock(), &out)) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<String, CliError> {
    let config = match &args.config {
        Some(path) => LayerTreeConfig::load(path)?,
        None => LayerTreeConfig::default(),
    };
    let raw = match &args.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let layers = cli::extract_layers(raw.trim())?;

    match &args.command {
        Command::ToggleLeaf { layer, path } => {
            cli::run_edit(&layers, layer, path, &EditCommand::ToggleLeaf, &config)
        }
        Command::ToggleGroup { layer, path } => {
            cli::run_edit(&layers, layer, path, &EditCommand::ToggleGroup, &config)
        }
        Command::Opacity { layer, path, value } => {
            cli::run_edit(&layers, layer, path, &EditCommand::Opacity(*value), &config)
        }
        Command::Params { layer } => cli::layer_params(&layers, layer),
        Command::Visibility { layer, path } => {
            Ok(cli::node_visibility(&layers, layer, path)?.to_string())
        }
        Command::Render { menu, text: true } => {
            let view = cli::render(&layers, menu.as_deref(), &config)?;
            Ok(view.to_string().trim_end().to_string())
        }
        Command::Render { menu, text: false } => {
            cli::render_json(&layers, menu.as_deref(), &config)
        }
    }
}
