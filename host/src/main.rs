//! HL7 SIU File Parser Host Application
//!
//! Reads a file of concatenated SIU^S12 messages and emits a JSON array of
//! appointment records.
//!
//! # Features
//!
//! - One record per message, input order preserved
//! - Selectable handling of malformed messages (`skip`, `fail`, `warn`)
//! - Warnings and errors on stderr, data on stdout or a file
//! - Non-zero exit code when the error policy demands it

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;

use siu::parse_batch;

/// How malformed messages in the batch are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorPolicy {
    /// Drop them silently
    Skip,
    /// Abort on the first one
    Fail,
    /// Report them on stderr and keep going
    Warn,
}

#[derive(Debug)]
struct Options {
    input: PathBuf,
    output: Option<PathBuf>,
    pretty: bool,
    errors: ErrorPolicy,
}

/// Print usage information
fn print_usage() {
    eprintln!("Usage: hl7-parse [options] <file.hl7>");
    eprintln!();
    eprintln!("Parse HL7 SIU^S12 messages from a file and emit JSON.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <file>          Write JSON to a file instead of stdout");
    eprintln!("  -p, --pretty                 Pretty-print the JSON output");
    eprintln!("  -e, --errors <skip|fail|warn>  Malformed-message handling (default: warn)");
    eprintln!("  -h, --help                   Show this help message");
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut input = None;
    let mut output = None;
    let mut pretty = false;
    let mut errors = ErrorPolicy::Warn;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-p" | "--pretty" => pretty = true,
            "-o" | "--output" => {
                let value = iter.next().ok_or("--output requires a file path")?;
                output = Some(PathBuf::from(value));
            }
            "-e" | "--errors" => {
                let value = iter.next().ok_or("--errors requires a mode")?;
                errors = match value.as_str() {
                    "skip" => ErrorPolicy::Skip,
                    "fail" => ErrorPolicy::Fail,
                    "warn" => ErrorPolicy::Warn,
                    other => return Err(format!("unknown error mode {other:?}")),
                };
            }
            other if other.starts_with('-') => {
                return Err(format!("unknown option {other:?}"));
            }
            other => {
                if input.replace(PathBuf::from(other)).is_some() {
                    return Err("more than one input file given".to_owned());
                }
            }
        }
    }

    Ok(Options {
        input: input.ok_or("no input file given")?,
        output,
        pretty,
        errors,
    })
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        process::exit(1);
    }

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {message}");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    let content = match fs::read_to_string(&options.input) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("Error: could not read {}: {err}", options.input.display());
            process::exit(1);
        }
    };

    let outcomes = parse_batch(&content);
    let total = outcomes.len();
    let mut records = Vec::new();
    let mut failed = 0;

    for outcome in outcomes {
        match outcome {
            Ok(parsed) => {
                for warning in &parsed.warnings {
                    eprintln!("Warning: {warning}");
                }
                records.push(parsed.record);
            }
            Err(err) => match options.errors {
                ErrorPolicy::Fail => {
                    eprintln!("Error: {err}");
                    process::exit(1);
                }
                ErrorPolicy::Warn => {
                    eprintln!("Error: {err}");
                    failed += 1;
                }
                ErrorPolicy::Skip => {
                    failed += 1;
                }
            },
        }
    }

    let json = if options.pretty {
        serde_json::to_string_pretty(&records)
    } else {
        serde_json::to_string(&records)
    };
    let json = match json {
        Ok(json) => json,
        Err(err) => {
            eprintln!("Error: could not serialize records: {err}");
            process::exit(1);
        }
    };

    match &options.output {
        Some(path) => {
            if let Err(err) = fs::write(path, &json) {
                eprintln!("Error: could not write {}: {err}", path.display());
                process::exit(1);
            }
            println!(
                "Parsed {} of {} messages to {}",
                records.len(),
                total,
                path.display()
            );
        }
        None => println!("{json}"),
    }

    if failed > 0 {
        eprintln!("{failed} of {total} messages failed to parse");
    }
}
