use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;

use nearby_places::cli::{create_spinner, init_logging};
use nearby_places::config::FileConfig;
use nearby_places::exporter::{ExportOptions, Table, build_table, export_table, load_inputs};

/// Number of rows shown in the console preview
const PREVIEW_ROWS: usize = 10;

/// Combine every result set JSON file in a directory into one spreadsheet
///
/// Examples:
///   # Export all *.json in the current directory to combined_data.xlsx
///   places-export
///
///   # Export a data directory without the source_file column
///   places-export -d data -o places.xlsx --no-source-column
#[derive(Parser, Debug)]
#[command(name = "places-export")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches nearby-places.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory to scan for *.json result sets (not recursive)
    #[arg(short = 'd', long)]
    dir: Option<PathBuf>,

    /// Output spreadsheet path (overwritten if it exists)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Leave out the source_file column
    #[arg(long)]
    no_source_column: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config =
        FileConfig::resolve(args.config.as_deref()).context("Failed to load config")?;
    let verbose = args.verbose || file_config.verbose;
    init_logging(verbose);

    let export_config = file_config.export;
    let input_dir = args.dir.unwrap_or(export_config.input_dir);
    let output = args.output.unwrap_or(export_config.output);
    let options = ExportOptions {
        source_column: export_config.source_column && !args.no_source_column,
    };

    println!("nearby-places - Spreadsheet Exporter");
    println!("====================================");
    println!();

    let spinner = create_spinner(&format!("Loading JSON files from {}...", input_dir.display()));
    let start = Instant::now();
    let inputs = match load_inputs(&input_dir) {
        Ok(inputs) => inputs,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e).context("Failed to load result sets");
        }
    };
    spinner.finish_with_message(format!(
        "Loaded {} files [{:.1}s]",
        inputs.len(),
        start.elapsed().as_secs_f32()
    ));

    if verbose {
        for input in &inputs {
            println!("  {}: {} places", input.path.display(), input.results.len());
        }
    }

    let table = build_table(&inputs, options.source_column);
    print_preview(&table);

    let spinner = create_spinner("Writing spreadsheet...");
    let start = Instant::now();
    let summary = match export_table(&inputs, &table, &output) {
        Ok(summary) => summary,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e).context("Failed to write spreadsheet");
        }
    };
    spinner.finish_with_message(format!(
        "Wrote {} rows [{:.1}s]",
        summary.rows,
        start.elapsed().as_secs_f32()
    ));

    println!();
    println!("Summary");
    println!("=======");
    println!("Files processed: {}", summary.files.len());
    println!("Total rows: {}", summary.rows);
    println!("Total columns: {}", summary.columns.len());
    println!();
    println!("Rows by source file:");
    for (name, rows) in &summary.files {
        println!("  {}: {}", name, rows);
    }
    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );
    println!();
    println!("Output: {}", summary.output.display());

    Ok(())
}

fn print_preview(table: &Table) {
    let shown = table.rows.len().min(PREVIEW_ROWS);
    if shown == 0 {
        println!("No places in the input files; the spreadsheet will hold only a header row.");
        return;
    }

    println!();
    println!("Preview (first {} of {} rows):", shown, table.rows.len());
    let name_idx = table.column_index("name");
    let id_idx = table.column_index("place_id");
    let address_idx = table.column_index("address");
    for row in table.rows.iter().take(shown) {
        let text = |idx: Option<usize>| {
            idx.and_then(|i| row.cells[i].as_text())
                .unwrap_or("")
                .to_string()
        };
        println!(
            "  {} | {} | {}",
            text(name_idx),
            text(id_idx),
            text(address_idx)
        );
    }
    println!();
}
