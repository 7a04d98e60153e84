//! CLI tool for sheetgrid - expands a logical cell matrix and outputs JSON
//!
//! Usage:
//!   sheetgrid_cli <rows.json>                   # Output JSON to stdout
//!   sheetgrid_cli <rows.json> -o out.json       # Output JSON to file
//!   sheetgrid_cli <rows.json> --columns 6       # Reject spans wider than 6 columns
//!
//! Set `RUST_LOG=debug` for diagnostics.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use sheetgrid::layout::{check_row_spans, expand_rows};
use sheetgrid::{GridCell, GridError};
use tracing_subscriber::EnvFilter;

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        fail("Usage: sheetgrid_cli <rows.json> [-o output.json] [--columns N]");
    }

    let input_path = &args[1];
    let mut output_path = None;
    let mut columns = None;
    let mut rest = args[2..].iter();
    while let Some(flag) = rest.next() {
        match (flag.as_str(), rest.next()) {
            ("-o", Some(path)) => output_path = Some(path.clone()),
            ("--columns", Some(n)) => match n.parse::<usize>() {
                Ok(n) => columns = Some(n),
                Err(e) => fail(&format!("Invalid column count {n}: {e}")),
            },
            _ => fail(&format!("Unexpected argument: {flag}")),
        }
    }

    if let Err(e) = run(input_path, output_path.as_deref(), columns) {
        fail(&format!("Error: {e}"));
    }
}

fn run(
    input_path: &str,
    output_path: Option<&str>,
    columns: Option<usize>,
) -> Result<(), GridError> {
    let data = fs::read_to_string(input_path)?;
    let rows: Vec<Vec<GridCell>> = serde_json::from_str(&data)?;

    if let Some(columns) = columns {
        check_row_spans(&rows, columns)?;
    }

    let expanded = expand_rows(&rows);
    tracing::info!(
        logical_rows = rows.len(),
        physical_rows = expanded.len(),
        "expanded layout"
    );

    let json = serde_json::to_string_pretty(&expanded)?;
    match output_path {
        Some(path) => {
            fs::write(path, &json)?;
            eprintln!("Written: {path}");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
