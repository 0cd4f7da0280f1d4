use anyhow::{Context, Result};
use clap::{Arg, Command};
use std::path::{Path, PathBuf};

use aglog_parser::{decode_file, export_to_csv, parse_offset, DecodeOptions};

fn build_command() -> Command {
    Command::new("aglog")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Decode agricultural drone controller logs into per-category records. Optionally exports each category to CSV.")
        .arg(
            Arg::new("file")
                .help("Controller log file to decode")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("offset")
                .long("offset")
                .help("Timestamp offset as signed HH:MM (default: +05:30)")
                .value_name("HH:MM"),
        )
        .arg(
            Arg::new("csv")
                .long("csv")
                .help("Export each non-empty category to a CSV file")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory for CSV output files (default: same as input file)")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Report skipped lines and extra decoding detail")
                .action(clap::ArgAction::SetTrue),
        )
}

fn main() -> Result<()> {
    let matches = build_command().get_matches();

    let input = PathBuf::from(matches.get_one::<String>("file").expect("required arg"));
    let mut options = DecodeOptions {
        debug: matches.get_flag("debug"),
        ..DecodeOptions::default()
    };
    if let Some(offset) = matches.get_one::<String>("offset") {
        options.timestamp_offset = parse_offset(offset)?;
    }

    println!("Parsing log file: {}", input.display());
    let data = decode_file(&input, &options)
        .with_context(|| format!("Failed to decode {}", input.display()))?;

    println!("Decoded {} records", data.total_records());
    for (category, count) in data.summary() {
        println!("  {:<22} {}", category, count);
    }

    if matches.get_flag("csv") {
        let output_dir = matches.get_one::<String>("output-dir").map(Path::new);
        let written = export_to_csv(&data, &input, output_dir)?;
        for path in &written {
            println!("Exported: {}", path.display());
        }
    }

    println!("Loaded file: {}", input.display());
    Ok(())
}
