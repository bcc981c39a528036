//! Command-line frontend for the typfmt formatter.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "typfmt",
    about = "A formatter for Typst documents",
    version,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    format: FormatArgs,
}

#[derive(Args)]
struct FormatArgs {
    /// Files to format (default: read stdin)
    files: Vec<PathBuf>,

    /// Maximum line width
    #[arg(short, long)]
    column: Option<usize>,

    /// Spaces per indentation level
    #[arg(long)]
    tab_width: Option<usize>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rewrite the files instead of printing them
    #[arg(short, long)]
    inplace: bool,

    /// List files that would change and fail if there are any
    #[arg(long)]
    check: bool,

    /// Print the syntax tree instead of formatting
    #[arg(long)]
    ast: bool,

    /// Report the status of every file
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Format every .typ file below a directory in place
    FormatAll {
        /// Directory to search (default: current directory)
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Only report files that would change
        #[arg(long)]
        check: bool,

        /// Maximum line width
        #[arg(short, long)]
        column: Option<usize>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::FormatAll { dir, check, column }) => {
            commands::load_config(None, column, None)
                .and_then(|config| commands::format_all::run(&dir, config, check))
        }
        None => {
            let args = cli.format;
            commands::load_config(args.config.as_deref(), args.column, args.tab_width).and_then(
                |config| {
                    let options = commands::format::Options {
                        inplace: args.inplace,
                        check: args.check,
                        ast: args.ast,
                        verbose: args.verbose,
                    };
                    commands::format::run(&args.files, config, options)
                },
            )
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
