//! `scriptjson` CLI: decode lenient JSON and produce script-safe output.
//!
//! ## Usage
//!
//! ```sh
//! # Lenient input (comments, undefined) to strict JSON
//! echo '{"a": 1, /* note */ "b": undefined}' | scriptjson decode
//!
//! # Pretty-print from file to file
//! scriptjson decode --pretty -i page.js -o page.json
//!
//! # Re-encode for embedding in a <script> block
//! scriptjson encode -i data.json
//!
//! # Validate only
//! scriptjson check -i data.json
//!
//! # Tighter nesting limit for untrusted input
//! scriptjson --max-depth 32 check -i upload.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scriptjson_core::{Limits, Node, Serializer, Value};
use std::io::{self, Read};

#[derive(Parser)]
#[command(
    name = "scriptjson",
    version,
    about = "Lenient JSON decoder and script-safe encoder"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Maximum nesting depth of arrays and objects
    #[arg(long, global = true)]
    max_depth: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode lenient JSON to strict JSON
    Decode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Indent the output
        #[arg(long)]
        pretty: bool,
    },
    /// Re-encode lenient JSON as compact, script-safe text
    Encode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Validate input and print the kind of its top-level value
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut limits = Limits::default();
    if let Some(max_depth) = cli.max_depth {
        limits.max_depth = max_depth;
    }

    match cli.command {
        Commands::Decode {
            input,
            output,
            pretty,
        } => {
            let value = read_value(input.as_deref(), &limits)?;
            let json = if pretty {
                serde_json::to_string_pretty(&value)
            } else {
                serde_json::to_string(&value)
            }
            .context("Failed to convert value to JSON")?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Encode { input, output } => {
            let value = read_value(input.as_deref(), &limits)?;
            let text = Serializer::new()
                .with_limits(limits)
                .serialize(&Node::from(&value))
                .context("Failed to encode value")?;
            write_output(output.as_deref(), &text)?;
        }
        Commands::Check { input } => {
            let value = read_value(input.as_deref(), &limits)?;
            println!("ok: {}", value.kind());
        }
    }

    Ok(())
}

fn read_value(path: Option<&str>, limits: &Limits) -> Result<Value> {
    let text = read_input(path)?;
    scriptjson_core::parse_with_limits(&text, limits).context("Failed to decode input")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
