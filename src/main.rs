use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

mod classify;
mod loader;
mod pipeline;
mod schema;
mod scrub;
mod table;
mod writer;

#[derive(Parser)]
#[command(
    name = "subitem-cleaner",
    version,
    about = "Clean Monday.com subitem exports",
    long_about = "Fills incomplete subitem rows from the nearest preceding complete row, strips duplicated header blocks and template label rows, and writes a highlighted copy next to the input. Run without arguments to pick the file in a dialog."
)]
struct Cli {
    /// Input Excel export (omit to choose one in a file dialog)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Do not open the produced file when done
    #[arg(long = "no-open")]
    no_open: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let input = match cli.file.or_else(pick_file) {
        Some(path) => path,
        // Cancelled dialog: nothing to do, nothing to report.
        None => return ExitCode::SUCCESS,
    };

    eprintln!("processing {} ...", input.display());
    match run(&input, cli.no_open) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(input: &Path, no_open: bool) -> Result<()> {
    let report = pipeline::process_file(input)?;
    println!("{}", report.output.display());
    eprintln!(
        "{} rows in, {} rows out ({} filled, {} removed)",
        report.rows_read, report.rows_written, report.rows_filled, report.rows_dropped
    );
    if !no_open {
        open::that(&report.output)?;
    }
    Ok(())
}

fn pick_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Select the Excel export")
        .add_filter("Excel", &["xlsx"])
        .pick_file()
}
