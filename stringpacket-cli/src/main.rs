use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stringpacket_cli::{
    run_build_worksheet_command, run_clean_source_command, run_import_deliverable_command,
    run_scan_source_command,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,

    /// Configuration file (defaults to <DIR>/stringpacket.toml when present)
    #[arg(long, global = true)]
    config: Option<String>,

    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Build TranslationPacket.tsv from the template locale's files.
    BuildWorksheet {
        /// Base directory (defaults to the current directory)
        dir: Option<String>,
    },

    /// Normalize apostrophes and inline markup in the template locale's files.
    CleanSource {
        /// Base directory (defaults to the current directory)
        dir: Option<String>,
    },

    /// Import translated deliverables into per-locale files.
    ImportDeliverable {
        /// Base directory (defaults to the current directory)
        dir: Option<String>,

        /// Deliverable to import (HTML or TSV). Without it, every *.html in DIR is imported.
        #[arg(short, long)]
        input: Option<String>,

        /// Locale of the deliverable (defaults to the input's file stem)
        #[arg(short, long)]
        locale: Option<String>,
    },

    /// Collect localizable literals from Swift sources into Localizable.strings.
    ScanSource {
        /// Package directory (defaults to the current directory)
        dir: Option<String>,

        /// Locale of the strings file to update (defaults to the template locale)
        #[arg(short, long)]
        locale: Option<String>,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = args.config.as_deref();
    let result = match &args.commands {
        Commands::BuildWorksheet { dir } => run_build_worksheet_command(dir.as_deref(), config),
        Commands::CleanSource { dir } => run_clean_source_command(dir.as_deref(), config),
        Commands::ImportDeliverable { dir, input, locale } => run_import_deliverable_command(
            dir.as_deref(),
            input.as_deref(),
            locale.as_deref(),
            config,
        ),
        Commands::ScanSource { dir, locale } => {
            run_scan_source_command(dir.as_deref(), locale.as_deref(), config)
        }
    };

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}
