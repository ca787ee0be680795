//! State Layout Information Tool
//!
//! This binary reads propagation settings from a JSON file and prints how they
//! decompose the flat state vector: the kind, start index, size and bodies of
//! every segment, and the total state size.
//!
//! Usage:
//!   cargo run --bin layout_info -- [--json] path/to/settings.json

use clap::{ArgAction, Parser};
use integrated_states::propagation::{PropagatorSettings, StateLayout};

/// Type alias for the error type used throughout this module
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// State Layout Information Tool
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Displays the flat state vector layout of propagation settings",
    long_about = None
)]
struct Args {
    /// Print the layout as JSON
    #[arg(short, long, action = ArgAction::SetTrue)]
    json: bool,

    /// Propagation settings file
    filename: String,
}

/// Prints a section header with a title and separator line
fn print_section_header(title: &str) {
    println!("\n{}:", title);
    println!("-------------------------------------------------------");
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = PropagatorSettings::from_json_file(&args.filename)?;
    let layout = StateLayout::from_settings(&settings)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&layout)?);
        return Ok(());
    }

    print_section_header(&format!("State layout of {}", args.filename));
    println!("{}", layout);
    println!(
        "{} segments, top-level settings type: {}",
        layout.segments().len(),
        settings.state_type()
    );
    Ok(())
}
