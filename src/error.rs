//! Error types for ReceiptDesk

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ReceiptDesk operations
#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Failed to open ledger '{0}': {1}")]
    LedgerOpen(PathBuf, std::io::Error),

    #[error("Ledger '{0}' is not valid JSON: {1}")]
    LedgerParse(PathBuf, serde_json::Error),

    #[error("Failed to write ledger '{0}': {1}")]
    LedgerWrite(PathBuf, std::io::Error),

    #[error("Images directory '{0}' is not usable: {1}")]
    ImagesDirUnusable(PathBuf, std::io::Error),

    #[error("Failed to store receipt image '{0}': {1}")]
    ImageStore(PathBuf, std::io::Error),

    #[error("No receipt file selected")]
    EmptySubmission,

    #[error("No receipt with id '{0}'")]
    UnknownReceipt(String),

    #[error("Invalid filter pattern: {0}")]
    InvalidFilter(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GUI error: {0}")]
    Gui(String),
}

/// Result type alias for ReceiptDesk operations
pub type Result<T> = std::result::Result<T, DeskError>;

impl DeskError {
    /// Check if this error is user-recoverable (the operation was blocked,
    /// the user corrects and retries)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DeskError::EmptySubmission | DeskError::InvalidFilter(_)
        )
    }
}
