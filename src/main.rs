use std::path::PathBuf;

use clap::Parser;
use convene_tools::{Result, ToolError, sync};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_tracing()?;

    if !cli.input.exists() {
        return Err(ToolError::MissingInput(cli.input));
    }

    println!("Reading {}...", cli.input.display());
    let report = sync::seed(&cli.input, &cli.out_dir, &cli.var)?;

    println!("Found {} rooms, {} days.\n", report.rooms, report.days);
    println!("Exporting TSV files:");
    for table in &report.tables {
        println!("  {}: {} row(s)", table.file, table.rows);
    }
    println!("\nDone. Files written to {}", cli.out_dir.display());
    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Flatten conference event data into spreadsheet-ready TSV tables."
)]
struct Cli {
    /// Event data file containing the bound object literal.
    #[arg(long, default_value = "data/g2-conference.js")]
    input: PathBuf,

    /// Directory receiving the four TSV files.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Name the object literal is bound to in the input file.
    #[arg(long, default_value = "EVENT_DATA")]
    var: String,
}
