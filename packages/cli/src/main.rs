mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    deserialize, init, roundtrip, serialize, session, ConvertArgs, InitArgs, RoundtripArgs,
    SessionArgs,
};
use tracing_subscriber::EnvFilter;

/// Commonplace editor bridge tools
#[derive(Parser, Debug)]
#[command(name = "commonplace")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log bridge activity (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default editor config
    Init(InitArgs),

    /// Convert text to a document tree (JSON)
    Deserialize(ConvertArgs),

    /// Convert a document tree (JSON) to text
    Serialize(ConvertArgs),

    /// Check whether input survives the text bridge unchanged
    Roundtrip(RoundtripArgs),

    /// Replay a scripted editing session against a headless editor
    Session(SessionArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Deserialize(args) => deserialize(args),
        Command::Serialize(args) => serialize(args),
        Command::Roundtrip(args) => roundtrip(args),
        Command::Session(args) => session(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
