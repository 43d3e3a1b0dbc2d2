//! Receipt records and the JSON ledger store
//!
//! The ledger is the desk's single source of truth: a flat JSON file of
//! receipt records, loaded whole at startup and written back whole on every
//! mutation. Records keep the field set of the original store (vendor, date,
//! total, tax, image path, raw OCR text).

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DeskError, Result};
use crate::format_amount;

/// A single receipt record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Receipt {
    pub id: String,
    /// When the record entered the ledger
    pub created_at: DateTime<Utc>,
    /// Purchase date as reviewed by the user
    pub date: NaiveDate,
    pub vendor: String,
    pub total: f64,
    pub tax: f64,
    /// Stored image, relative or absolute
    #[serde(default)]
    pub image_path: Option<PathBuf>,
    /// Raw OCR text, kept for later review
    #[serde(default)]
    pub raw_text: String,
}

impl Receipt {
    /// Create a record for a freshly ingested image. Amount fields start at
    /// zero until the user reviews the receipt; OCR is not this layer's job.
    pub fn unreviewed(image_path: PathBuf, now: DateTime<Utc>) -> Self {
        Self {
            id: format!("r-{}", now.timestamp_millis()),
            created_at: now,
            date: now.date_naive(),
            vendor: "Unreviewed".to_string(),
            total: 0.0,
            tax: 0.0,
            image_path: Some(image_path),
            raw_text: String::new(),
        }
    }

    /// The full visible text of this receipt's table row. Search highlighting
    /// matches against exactly this string, formatted cells included.
    pub fn display_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.vendor,
            self.date.format("%Y-%m-%d"),
            format_amount(self.total),
            format_amount(self.tax),
        )
    }

    /// File name of the stored image, if any
    pub fn image_name(&self) -> Option<&str> {
        self.image_path
            .as_deref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
    }
}

/// Aggregate numbers for the dashboard cards
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LedgerStats {
    pub count: usize,
    pub total_sum: f64,
    pub tax_sum: f64,
}

/// The receipt ledger: a JSON file plus its in-memory records
pub struct Ledger {
    path: PathBuf,
    pub receipts: Vec<Receipt>,
}

impl Ledger {
    /// An empty ledger that will persist to `path` once something is added
    pub fn empty(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            receipts: Vec::new(),
        }
    }

    /// Load the ledger. A missing file yields an empty ledger; a present but
    /// unreadable or malformed file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Ok(Self {
                path,
                receipts: Vec::new(),
            });
        }

        let data = std::fs::read_to_string(&path)
            .map_err(|e| DeskError::LedgerOpen(path.clone(), e))?;
        let receipts = serde_json::from_str(&data)
            .map_err(|e| DeskError::LedgerParse(path.clone(), e))?;

        Ok(Self { path, receipts })
    }

    /// Write all records back to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DeskError::LedgerWrite(self.path.clone(), e))?;
        }
        let data = serde_json::to_string_pretty(&self.receipts)
            .map_err(|e| DeskError::LedgerParse(self.path.clone(), e))?;
        std::fs::write(&self.path, data)
            .map_err(|e| DeskError::LedgerWrite(self.path.clone(), e))?;
        Ok(())
    }

    /// Append a record and persist. Bumps the id if it collides with an
    /// existing record (timestamp ids can collide within a millisecond).
    pub fn append(&mut self, mut receipt: Receipt) -> Result<()> {
        let mut bump = 0u32;
        let base = receipt.id.clone();
        while self.receipts.iter().any(|r| r.id == receipt.id) {
            bump += 1;
            receipt.id = format!("{}-{}", base, bump);
        }
        self.receipts.push(receipt);
        self.save()
    }

    /// Remove a record by id and persist
    pub fn remove(&mut self, id: &str) -> Result<Receipt> {
        let idx = self
            .receipts
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| DeskError::UnknownReceipt(id.to_string()))?;
        let removed = self.receipts.remove(idx);
        self.save()?;
        Ok(removed)
    }

    pub fn get(&self, id: &str) -> Option<&Receipt> {
        self.receipts.iter().find(|r| r.id == id)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }

    /// Dashboard numbers
    pub fn stats(&self) -> LedgerStats {
        LedgerStats {
            count: self.receipts.len(),
            total_sum: self.receipts.iter().map(|r| r.total).sum(),
            tax_sum: self.receipts.iter().map(|r| r.tax).sum(),
        }
    }

    /// Case-insensitive substring search over row text, newest first
    pub fn search(&self, pattern: &str, max_results: usize) -> Vec<&Receipt> {
        let needle = pattern.trim().to_lowercase();
        self.receipts
            .iter()
            .rev()
            .filter(|r| needle.is_empty() || r.display_text().to_lowercase().contains(&needle))
            .take(max_results)
            .collect()
    }

    /// Write the ledger as CSV
    pub fn export_csv(&self, mut out: impl Write) -> Result<()> {
        writeln!(out, "id,created_at,date,vendor,total,tax,image_path")?;
        for r in &self.receipts {
            writeln!(
                out,
                "\"{}\",\"{}\",\"{}\",\"{}\",{:.2},{:.2},\"{}\"",
                r.id,
                r.created_at.to_rfc3339(),
                r.date.format("%Y-%m-%d"),
                r.vendor.replace('"', "\"\""),
                r.total,
                r.tax,
                r.image_path
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            )?;
        }
        Ok(())
    }

    /// Write the ledger as JSON
    pub fn export_json(&self, mut out: impl Write) -> Result<()> {
        let data = serde_json::to_string_pretty(&self.receipts)
            .map_err(|e| DeskError::LedgerParse(self.path.clone(), e))?;
        out.write_all(data.as_bytes())?;
        writeln!(out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn receipt(id: &str, vendor: &str, total: f64, tax: f64) -> Receipt {
        Receipt {
            id: id.to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            vendor: vendor.to_string(),
            total,
            tax,
            image_path: None,
            raw_text: String::new(),
        }
    }

    #[test]
    fn display_text_includes_formatted_amounts() {
        let r = receipt("r-1", "Coffee", 4.5, 0.3);
        let text = r.display_text();
        assert!(text.contains("Coffee"));
        assert!(text.contains("$4.50"));
        assert!(text.contains("$0.30"));
    }

    #[test]
    fn load_of_missing_file_yields_empty_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::load(dir.path().join("receipts.json")).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn append_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipts.json");

        let mut ledger = Ledger::load(&path).unwrap();
        ledger.append(receipt("r-1", "Grocer", 20.0, 1.2)).unwrap();
        ledger.append(receipt("r-2", "Cafe", 4.5, 0.3)).unwrap();

        let reloaded = Ledger::load(&path).unwrap();
        assert_eq!(reloaded.receipts, ledger.receipts);
    }

    #[test]
    fn append_bumps_colliding_ids() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = Ledger::load(dir.path().join("receipts.json")).unwrap();
        ledger.append(receipt("r-1", "A", 1.0, 0.0)).unwrap();
        ledger.append(receipt("r-1", "B", 2.0, 0.0)).unwrap();
        assert_eq!(ledger.receipts[1].id, "r-1-1");
    }

    #[test]
    fn remove_unknown_id_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = Ledger::load(dir.path().join("receipts.json")).unwrap();
        assert!(matches!(
            ledger.remove("nope"),
            Err(DeskError::UnknownReceipt(_))
        ));
    }

    #[test]
    fn stats_sum_totals_and_taxes() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = Ledger::load(dir.path().join("receipts.json")).unwrap();
        ledger.append(receipt("r-1", "A", 10.0, 1.0)).unwrap();
        ledger.append(receipt("r-2", "B", 5.5, 0.5)).unwrap();

        let stats = ledger.stats();
        assert_eq!(stats.count, 2);
        assert!((stats.total_sum - 15.5).abs() < f64::EPSILON);
        assert!((stats.tax_sum - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn search_is_case_insensitive_and_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = Ledger::load(dir.path().join("receipts.json")).unwrap();
        ledger.append(receipt("r-1", "Coffee Shop", 4.5, 0.3)).unwrap();
        ledger.append(receipt("r-2", "Tea House", 3.0, 0.2)).unwrap();
        ledger.append(receipt("r-3", "COFFEE ROASTERS", 12.0, 0.9)).unwrap();

        let hits = ledger.search("coffee", 10);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "r-3");
        assert_eq!(hits[1].id, "r-1");
    }

    #[test]
    fn csv_export_has_header_and_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = Ledger::load(dir.path().join("receipts.json")).unwrap();
        ledger.append(receipt("r-1", "Grocer", 20.0, 1.2)).unwrap();

        let mut buf = Vec::new();
        ledger.export_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("id,created_at"));
        assert!(lines[1].contains("Grocer"));
        assert!(lines[1].contains("20.00"));
    }
}
