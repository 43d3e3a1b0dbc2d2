//! ReceiptDesk - Desktop receipt ledger
//!
//! Renders a ledger of scanned receipts and layers the interactive behaviors
//! on top: debounced live-search highlighting, drag-and-drop receipt intake,
//! animated dashboard counters, and a zoomable image viewer.
//!
//! # Features
//!
//! - **Live search**: keystrokes are debounced (300 ms) and matching rows are
//!   emphasized in place; non-matching rows are dimmed, never removed
//! - **Receipt intake**: native file dialog, drag-and-drop, and direct
//!   selection changes all feed one selection state with a submit guard
//! - **Dashboard**: animated count / total / tax counters
//! - **Export**: CSV and JSON ledger export from the CLI
//!
//! # Example
//!
//! ```no_run
//! use receiptdesk::{Ledger, highlight};
//!
//! fn main() -> receiptdesk::Result<()> {
//!     let ledger = Ledger::load("data/receipts.json")?;
//!
//!     let states = highlight::scan_rows(
//!         "coffee",
//!         ledger.receipts.iter().map(|r| r.display_text()),
//!     );
//!     println!("{} rows classified", states.len());
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod gui;
pub mod highlight;
pub mod intake;
pub mod ledger;

// Re-export main types
pub use error::{DeskError, Result};
pub use highlight::{RowState, SearchHighlighter};
pub use intake::{FileIntake, ZoneState};
pub use ledger::{Ledger, LedgerStats, Receipt};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Format a monetary amount as a display string
pub fn format_amount(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", -amount)
    } else {
        format!("${:.2}", amount)
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Ledger JSON file
    pub ledger_path: std::path::PathBuf,
    /// Directory receipt images are copied into
    pub images_dir: std::path::PathBuf,
    /// Maximum CLI search results
    pub max_search_results: usize,
    /// Accepted receipt image extensions (lowercase)
    pub accepted_extensions: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::with_data_dir(default_data_dir())
    }
}

impl AppConfig {
    /// Build a configuration rooted at the given data directory
    pub fn with_data_dir(data_dir: std::path::PathBuf) -> Self {
        Self {
            ledger_path: data_dir.join("receipts.json"),
            images_dir: data_dir.join("images"),
            max_search_results: 100,
            accepted_extensions: ["jpg", "jpeg", "png", "gif"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Default data directory: the platform-local app data dir, falling back to
/// `./data` when the platform reports none
pub fn default_data_dir() -> std::path::PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("receiptdesk"))
        .unwrap_or_else(|| std::path::PathBuf::from("data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_render_with_two_decimals() {
        assert_eq!(format_amount(4.5), "$4.50");
        assert_eq!(format_amount(0.0), "$0.00");
        assert_eq!(format_amount(1234.567), "$1234.57");
    }

    #[test]
    fn negative_amounts_keep_the_sign_outside_the_symbol() {
        assert_eq!(format_amount(-3.0), "-$3.00");
    }

    #[test]
    fn config_paths_hang_off_the_data_dir() {
        let cfg = AppConfig::with_data_dir("/tmp/rd-test".into());
        assert_eq!(cfg.ledger_path, std::path::Path::new("/tmp/rd-test/receipts.json"));
        assert_eq!(cfg.images_dir, std::path::Path::new("/tmp/rd-test/images"));
    }
}
