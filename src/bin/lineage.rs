//! lineage CLI — inspect and slice lineage matrices stored as JSON
//!
//! Commands:
//!   lineage show    — print shape, names and colours
//!   lineage subset  — select rows and columns
//!   lineage get     — select with a single index expression
//!   lineage rename  — replace lineage names
//!   lineage palette — print the default colours for n lineages

use lineage_core::{categorical_colors, AxisIndex, Lineage, PaletteConfig};
use lineage_core::color::categorical_colors_with;
use log::info;
use std::env;
use std::error::Error;
use std::process;

type CliResult = Result<(), Box<dyn Error>>;

fn print_usage() {
    println!(
        r#"
lineage — labeled fate-probability matrices

Usage: lineage <command> [options]

Commands:
  show    <file.json>                         Print shape, names and colors
  subset  <file.json> <rows> [cols]           Select rows and columns (JSON to stdout)
  get     <file.json> <index>                 Select with a single index expression
  rename  <file.json> <name,name,...>         Replace all lineage names
  palette <n> [--palette config.json]         Print the default colors for n lineages

Index expressions:
  :            everything
  1:8:2        slice (start:stop:step, negatives count from the end)
  mask=0110    boolean mask
  foo,2,bar    list mixing lineage names and positions
  3            single position (kept as an axis of size 1)
  baz          single lineage name
  name=0       lineage name that would otherwise read as a position or slice
               (also per list item: foo,name=2,0); names containing ',' cannot
               be given on the command line

Examples:
  lineage subset probs.json mask=1100 baz,bar
  lineage get probs.json baz
  lineage palette 25
"#
    );
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    let result = match args[1].as_str() {
        "show" => cmd_show(&args[2..]),
        "subset" => cmd_subset(&args[2..]),
        "get" => cmd_get(&args[2..]),
        "rename" => cmd_rename(&args[2..]),
        "palette" => cmd_palette(&args[2..]),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            process::exit(2);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn load(path: &str) -> Result<Lineage, Box<dyn Error>> {
    let data = std::fs::read_to_string(path)?;
    let doc: serde_json::Value = serde_json::from_str(&data)?;
    let lineage = Lineage::from_json(&doc)?;
    info!("Loaded {} from {}", lineage.summary(), path);
    Ok(lineage)
}

fn emit(lineage: &Lineage) -> CliResult {
    println!("{}", serde_json::to_string_pretty(lineage)?);
    Ok(())
}

fn require<'a>(args: &'a [String], n: usize, usage: &str) -> Result<&'a [String], Box<dyn Error>> {
    if args.len() < n {
        return Err(format!("Usage: lineage {}", usage).into());
    }
    Ok(args)
}

fn cmd_show(args: &[String]) -> CliResult {
    let args = require(args, 1, "show <file.json>")?;
    let lineage = load(&args[0])?;
    let (rows, cols) = lineage.shape();
    println!("  Cells:    {}", rows);
    println!("  Lineages: {}", cols);
    for (name, color) in lineage.names().iter().zip(lineage.colors()) {
        println!("    {:<24} {}", name, color);
    }
    Ok(())
}

fn cmd_subset(args: &[String]) -> CliResult {
    let args = require(args, 2, "subset <file.json> <rows> [cols]")?;
    let lineage = load(&args[0])?;
    let rows: AxisIndex = args[1].parse()?;
    let cols: AxisIndex = match args.get(2) {
        Some(c) => c.parse()?,
        None => AxisIndex::Full,
    };
    let sub = lineage.subset(rows, cols)?;
    info!("Selected {}", sub.summary());
    emit(&sub)
}

fn cmd_get(args: &[String]) -> CliResult {
    let args = require(args, 2, "get <file.json> <index>")?;
    let lineage = load(&args[0])?;
    let index: AxisIndex = args[1].parse()?;
    emit(&lineage.get(index)?)
}

fn cmd_rename(args: &[String]) -> CliResult {
    let args = require(args, 2, "rename <file.json> <name,name,...>")?;
    let mut lineage = load(&args[0])?;
    lineage.set_names(args[1].split(',').map(str::trim))?;
    emit(&lineage)
}

fn cmd_palette(args: &[String]) -> CliResult {
    let args = require(args, 1, "palette <n> [--palette config.json]")?;
    let n: usize = args[0].parse()?;
    let colors = match args.iter().position(|a| a == "--palette") {
        Some(i) => {
            let path = args.get(i + 1).ok_or("--palette requires a file")?;
            let config: PaletteConfig = serde_json::from_str(&std::fs::read_to_string(path)?)?;
            info!("Using palette config {:?}", config);
            categorical_colors_with(n, &config)
        }
        None => categorical_colors(n),
    };
    for color in colors {
        println!("{}", color);
    }
    Ok(())
}
