//! ReceiptDesk CLI
//!
//! Launches the desktop ledger by default; also exposes search, stats,
//! and export directly from the command line.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::HumanDuration;
use receiptdesk::{format_amount, AppConfig, Ledger};

/// ReceiptDesk - Desktop receipt ledger
///
/// Live search highlighting, drag-and-drop receipt intake,
/// and an animated dashboard over a plain JSON ledger.
#[derive(Parser)]
#[command(name = "receiptdesk")]
#[command(author = "ReceiptDesk Contributors")]
#[command(version)]
#[command(about = "Desktop receipt ledger", long_about = None)]
struct Cli {
    /// Data directory (ledger + stored images)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search receipts matching a pattern
    Search {
        /// Search pattern (use -- before pattern if it starts with -)
        #[arg(allow_hyphen_values = true)]
        pattern: String,

        /// Maximum results
        #[arg(short, long, default_value = "100")]
        max: usize,
    },

    /// Show ledger statistics
    Stats,

    /// Export the ledger
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Format (csv, json)
        #[arg(short, long, default_value = "csv")]
        format: String,
    },
}

fn main() {
    env_logger::init();
    log::info!("ReceiptDesk starting up");

    let cli = Cli::parse();

    let config = match cli.data_dir {
        Some(dir) => AppConfig::with_data_dir(dir),
        None => AppConfig::default(),
    };

    let result = match cli.command {
        None => receiptdesk::gui::run(config),

        Some(Commands::Search { pattern, max }) => cmd_search(&config, &pattern, max),

        Some(Commands::Stats) => cmd_stats(&config),

        Some(Commands::Export { output, format }) => cmd_export(&config, &output, &format),
    };

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

/// Search command implementation
fn cmd_search(config: &AppConfig, pattern: &str, max_results: usize) -> receiptdesk::Result<()> {
    println!(
        "{} Searching for '{}' in {}",
        style("→").cyan().bold(),
        style(pattern).yellow(),
        config.ledger_path.display()
    );

    let start = Instant::now();
    let ledger = Ledger::load(&config.ledger_path)?;
    let results = ledger.search(pattern, max_results);

    println!();
    println!(
        "Found {} results in {}:",
        style(results.len()).green(),
        HumanDuration(start.elapsed())
    );
    println!();

    for (i, receipt) in results.iter().enumerate() {
        println!(
            "  {} \u{1F9FE} {} — {} ({})",
            style(format!("{:3}.", i + 1)).dim(),
            style(&receipt.vendor).cyan(),
            style(format_amount(receipt.total)).yellow(),
            receipt.date.format("%Y-%m-%d")
        );
        if let Some(name) = receipt.image_name() {
            println!("      {} {}", style("Image:").dim(), name);
        }
    }

    Ok(())
}

/// Stats command implementation
fn cmd_stats(config: &AppConfig) -> receiptdesk::Result<()> {
    let ledger = Ledger::load(&config.ledger_path)?;
    let stats = ledger.stats();

    println!("{} Ledger statistics", style("→").cyan().bold());
    println!();
    println!("  {} {}", style("Receipts:").bold(), stats.count);
    println!(
        "  {} {}",
        style("Total Spend:").bold(),
        style(format_amount(stats.total_sum)).yellow()
    );
    println!(
        "  {} {}",
        style("Total Tax:").bold(),
        format_amount(stats.tax_sum)
    );

    Ok(())
}

/// Export command implementation
fn cmd_export(config: &AppConfig, output: &PathBuf, format: &str) -> receiptdesk::Result<()> {
    println!(
        "{} Exporting ledger to {}",
        style("→").cyan().bold(),
        style(output.display()).yellow()
    );

    let ledger = Ledger::load(&config.ledger_path)?;
    let mut file = std::fs::File::create(output)?;

    match format {
        "json" => ledger.export_json(&mut file)?,
        _ => ledger.export_csv(&mut file)?,
    }
    file.flush()?;

    println!(
        "{} Exported {} receipts to {}",
        style("✓").green().bold(),
        ledger.len(),
        output.display()
    );

    Ok(())
}
