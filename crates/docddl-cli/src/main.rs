mod commands;
mod logging;
mod output;

use clap::{ArgAction, Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "docddl",
    version,
    about = "Extract tables from PDF and DOCX specifications and emit banking schema DDL"
)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options for the default run (scan, then write DDL).
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Directory holding the PDF and DOCX specifications
    #[arg(long, value_name = "DIR", default_value = ".", global = true)]
    dir: PathBuf,

    /// Output file for table DDL
    #[arg(long, value_name = "FILE", default_value = "final_tables.sql")]
    tables_out: PathBuf,

    /// Output file for view DDL
    #[arg(long, value_name = "FILE", default_value = "final_views.sql")]
    views_out: PathBuf,

    /// Custom JSON schema file (default: built-in banking schema)
    #[arg(long, value_name = "FILE", global = true)]
    schema: Option<PathBuf>,

    /// Discard tables with fewer rows than this
    #[arg(long, value_name = "N", default_value_t = 1, global = true)]
    min_rows: usize,

    /// Completeness share of the quality score, between 0 and 1
    #[arg(long, value_name = "SHARE", global = true)]
    completeness_weight: Option<Decimal>,

    /// Number of best tables listed in the tables file
    #[arg(long, value_name = "N", default_value_t = 5)]
    top: usize,

    /// Write the quality report as JSON
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Write draft DDL for every extracted table under this directory
    #[arg(long, value_name = "DIR")]
    drafts: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and rank tables without writing any files
    Scan {
        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Inspect and validate schema configuration
    Schema {
        #[command(subcommand)]
        action: SchemaAction,
    },
}

#[derive(Subcommand)]
enum SchemaAction {
    /// Print the DDL of the active schema
    Show,
    /// Validate a custom schema file
    Validate {
        /// Path to JSON schema file
        file: PathBuf,
    },
    /// Print the built-in schema as JSON, a starting point for custom schemas
    Dump,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let result = match cli.command {
        None => commands::generate::run(&cli.run, cli.quiet),
        Some(Commands::Scan { output }) => commands::scan::run(&cli.run, &output),
        Some(Commands::Schema { action }) => match action {
            SchemaAction::Show => commands::schema::show(cli.run.schema.as_deref()),
            SchemaAction::Validate { file } => commands::schema::validate(&file),
            SchemaAction::Dump => commands::schema::dump(),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
