use std::env;
use std::fs;
use std::io::{self, Read};

use sqlpaste_core::{parse_pasted, DebugVerbosity, ParseConfig, PasteInput};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_cli(env::args().skip(1).collect())
}

#[derive(Debug, Default)]
struct CliOptions {
    config: ParseConfig,
    input_file: Option<String>,
    structure_file: Option<String>,
    input_is_structure: bool,
    show_help: bool,
}

/// Parse a share in `[0, 1]`, or `(0, 1]` when `allow_zero` is false.
fn parse_fraction(
    flag: &str,
    value: Option<&String>,
    allow_zero: bool,
) -> Result<f64, Box<dyn std::error::Error>> {
    let value = value.ok_or_else(|| format!("Missing value for {}", flag))?;
    let parsed = value
        .parse::<f64>()
        .map_err(|_| format!("Invalid value for {}: {}", flag, value))?;
    if !(0.0..=1.0).contains(&parsed) {
        return Err(format!("Value for {} must be between 0 and 1: {}", flag, value).into());
    }
    if parsed == 0.0 && !allow_zero {
        return Err(format!("Value for {} must be greater than 0: {}", flag, value).into());
    }
    Ok(parsed)
}

fn parse_args(args: &[String]) -> Result<CliOptions, Box<dyn std::error::Error>> {
    let mut options = CliOptions::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                options.show_help = true;
            }
            "--structure" => {
                let path = args
                    .get(i + 1)
                    .ok_or("Missing value for --structure")?;
                options.structure_file = Some(path.clone());
                i += 1;
            }
            "--as-structure" => {
                options.input_is_structure = true;
            }
            "--threshold" => {
                options.config.majority_threshold = parse_fraction("--threshold", args.get(i + 1), false)?;
                i += 1;
            }
            "--min-fill" => {
                options.config.min_row_fill = parse_fraction("--min-fill", args.get(i + 1), true)?;
                i += 1;
            }
            "--keep-decorations" => {
                options.config.skip_decorations = false;
            }
            "--debug" => {
                options.config.debug = true;
            }
            "--verbose" => {
                options.config.debug = true;
                options.config.verbosity = DebugVerbosity::Verbose;
            }
            arg => {
                if arg.starts_with('-') && arg != "-" {
                    return Err(format!("Unknown option: {}", arg).into());
                }
                if options.input_file.is_none() {
                    options.input_file = Some(arg.to_string());
                }
            }
        }
        i += 1;
    }

    Ok(options)
}

fn read_path(path: &str) -> Result<String, Box<dyn std::error::Error>> {
    if path == "-" {
        return read_stdin();
    }
    fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e).into())
}

fn read_stdin() -> Result<String, Box<dyn std::error::Error>> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

// Extract the main logic into a separate function so we can call it from tests
fn run_cli(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let options = parse_args(&args)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    #[cfg(feature = "trace")]
    init_tracing();

    let input = build_input(&options)?;
    let result = parse_pasted(&input, &options.config).map_err(|e| e.to_string())?;

    for warning in &result.warnings {
        anstream::eprintln!("\x1b[33mwarning\x1b[0m: {}", warning);
    }

    println!("{}", serde_json::to_string_pretty(&result.columns)?);

    anstream::eprintln!(
        "Parsed {} column(s) from {} sampled row(s)",
        result.columns.len(),
        result.rows_sampled
    );
    Ok(())
}

fn build_input(options: &CliOptions) -> Result<PasteInput, Box<dyn std::error::Error>> {
    let mut input = PasteInput::default();

    if let Some(path) = &options.structure_file {
        input.structure_dump = Some(read_path(path)?);
    }

    // The main input comes from stdin unless a file was named or only a structure dump was given
    let main_text = match &options.input_file {
        Some(path) => Some(read_path(path)?),
        None if options.structure_file.is_none() => Some(read_stdin()?),
        None => None,
    };

    if options.input_is_structure {
        if input.structure_dump.is_some() {
            return Err("--as-structure cannot be combined with --structure".into());
        }
        input.structure_dump = main_text;
    } else {
        input.result_set = main_text;
    }

    Ok(input)
}

#[cfg(feature = "trace")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

fn print_help() {
    println!("sqlpaste-cli - infer column schemas from pasted SQL output");
    println!();
    println!("USAGE:");
    println!("    sqlpaste-cli [OPTIONS] [FILE]");
    println!();
    println!("ARGS:");
    println!("    <FILE>    Pasted query results (reads from stdin if not provided, '-' for stdin)");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help              Print this help message");
    println!("    --structure <FILE>      INFORMATION_SCHEMA.COLUMNS listing to merge with the results");
    println!("    --as-structure          Treat the main input as a structure listing instead of results");
    println!("    --threshold <F>         Share of samples a type needs to win the vote (default 0.8)");
    println!("    --min-fill <F>          Share of columns a row must fill to be sampled (default 0.5)");
    println!("    --keep-decorations      Keep dashed separators and row-count footers as data");
    println!("    --debug                 Print classification decisions to stderr");
    println!("    --verbose               Like --debug, plus per-row detail");
    println!();
    println!("EXAMPLES:");
    println!("    sqlpaste-cli results.txt");
    println!("    sqlpaste-cli --structure columns.txt results.txt");
    println!("    pbpaste | sqlpaste-cli --as-structure");
}
