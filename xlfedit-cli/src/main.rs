mod edit;
mod export;
mod formats;
mod stats;
mod view;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use xlfedit::FilterStatus;
use xlfedit_cli::load_state;

use crate::{
    edit::run_edit_set_command,
    export::{ExportArgs, run_export_command},
    formats::print_formats,
    stats::print_stats,
    view::{ViewOptions, print_view},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List the translation units of a file.
    View {
        /// The input file to view
        #[arg(short, long)]
        input: String,

        /// Only show units with this status: all, translated, missing or changed
        #[arg(short, long, default_value = "all", value_parser = parse_status)]
        status: FilterStatus,

        /// Case-insensitive text to look for in ids, targets, sources and notes
        #[arg(short, long)]
        query: Option<String>,

        /// Show only this page of the matches (1-based)
        #[arg(long)]
        page: Option<usize>,

        /// Units per page
        #[arg(long, default_value_t = xlfedit::state::DEFAULT_PAGE_SIZE)]
        page_size: usize,

        /// Display full values without truncation
        #[arg(long)]
        full: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show translation progress for a file.
    Stats {
        /// The input file
        #[arg(short, long)]
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit translation targets.
    Edit {
        #[command(subcommand)]
        command: EditCommands,
    },

    /// Export a file as XLIFF or JSON.
    Export {
        /// The input file
        #[arg(short, long)]
        input: String,

        /// xliff, json (shape of the input), json-flat, json-nested or json-wrapped
        #[arg(short, long, default_value = "xliff")]
        format: String,

        /// Write to this file instead of an automatically named one
        #[arg(short, long, conflicts_with = "out_dir")]
        output: Option<String>,

        /// Directory for the automatically named file (defaults to the input's directory)
        #[arg(long)]
        out_dir: Option<String>,

        /// Base name for the automatically named file
        #[arg(long)]
        base_name: Option<String>,

        /// Do not append the target language to the file name
        #[arg(long)]
        no_locale_suffix: bool,
    },

    /// Show the detected format of a file and the exports it supports.
    Formats {
        /// The input file
        #[arg(short, long)]
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
enum EditCommands {
    /// Set the target text of one unit.
    Set {
        /// The input file
        #[arg(short, long)]
        input: String,

        /// Unit id
        #[arg(short, long)]
        key: String,

        /// New target text
        #[arg(short, long)]
        value: String,

        /// Write here instead of overwriting the input
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn parse_status(s: &str) -> Result<FilterStatus, String> {
    s.parse().map_err(|_| {
        format!(
            "Unknown status: '{}'. Supported: all, translated, missing, changed",
            s
        )
    })
}

/// Diagnostics go to stderr; `XLFEDIT_LOG` wins over `RUST_LOG`, default `warn`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("XLFEDIT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(commands: Commands) -> Result<(), String> {
    match commands {
        Commands::View {
            input,
            status,
            query,
            page,
            page_size,
            full,
            json,
        } => {
            if page == Some(0) || page_size == 0 {
                return Err("--page and --page-size start at 1".to_string());
            }
            let mut state = load_state(&input)?;
            let options = ViewOptions {
                status,
                query,
                page: page.map(|p| p - 1),
                page_size,
                full,
                json,
            };
            print_view(&mut state, &options)
        }
        Commands::Stats { input, json } => {
            let state = load_state(&input)?;
            print_stats(&state, json)
        }
        Commands::Edit { command } => match command {
            EditCommands::Set {
                input,
                key,
                value,
                output,
            } => run_edit_set_command(input, key, value, output),
        },
        Commands::Export {
            input,
            format,
            output,
            out_dir,
            base_name,
            no_locale_suffix,
        } => run_export_command(ExportArgs {
            input,
            format,
            output,
            out_dir,
            base_name,
            no_locale_suffix,
        }),
        Commands::Formats { input, json } => {
            let state = load_state(&input)?;
            print_formats(&state, json)
        }
    }
}

fn main() {
    init_tracing();
    let args = Args::parse();

    if let Err(e) = run(args.commands) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
