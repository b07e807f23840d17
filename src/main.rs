//! KMK Macropad Configurator - headless command line
//!
//! Manages the saved keypad project (keymap, macros, wiring, lighting) and
//! generates the KMK `code.py` script from it.

use clap::{Parser, Subcommand};
use kmkpad::cli::{
    ColorArgs, GenerateArgs, InitArgs, KeycodesArgs, MacrosArgs, ProfileArgs, ValidateArgs,
};
use kmkpad::constants::APP_NAME;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "KMKPAD_LOG";

/// KMK Macropad Configurator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output to stderr (overridden by KMKPAD_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a default project in the save directory
    Init(InitArgs),
    /// Generate the KMK code.py script
    Generate(GenerateArgs),
    /// Check the project for problems before exporting
    Validate(ValidateArgs),
    /// List KMK keycodes
    Keycodes(KeycodesArgs),
    /// List macros
    Macros(MacrosArgs),
    /// Manage hardware profiles
    Profile(ProfileArgs),
    /// Color keys by category or group
    Color(ColorArgs),
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match &cli.command {
        Commands::Init(args) => args.execute(),
        Commands::Generate(args) => args.execute(),
        Commands::Validate(args) => args.execute(),
        Commands::Keycodes(args) => args.execute(),
        Commands::Macros(args) => args.execute(),
        Commands::Profile(args) => args.execute(),
        Commands::Color(args) => args.execute(),
    };

    if let Err(err) = result {
        eprintln!("{APP_NAME}: {err}");
        std::process::exit(err.exit_code());
    }
}
