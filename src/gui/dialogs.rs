use chrono::NaiveDate;
use eframe::egui;
use regex::Regex;

use crate::error::Result;
use crate::ledger::Receipt;

// ============================================================================
// Amount / date filter types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilterMode {
    None,
    After,
    Before,
    Between,
}

impl DateFilterMode {
    pub fn label(&self) -> &'static str {
        match self {
            DateFilterMode::None => "None",
            DateFilterMode::After => "After",
            DateFilterMode::Before => "Before",
            DateFilterMode::Between => "Between",
        }
    }
    pub fn all() -> &'static [DateFilterMode] {
        &[
            DateFilterMode::None,
            DateFilterMode::After,
            DateFilterMode::Before,
            DateFilterMode::Between,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountFilterMode {
    None,
    GreaterThan,
    LessThan,
    Between,
}

impl AmountFilterMode {
    pub fn label(&self) -> &'static str {
        match self {
            AmountFilterMode::None => "None",
            AmountFilterMode::GreaterThan => ">",
            AmountFilterMode::LessThan => "<",
            AmountFilterMode::Between => "Between",
        }
    }
    pub fn all() -> &'static [AmountFilterMode] {
        &[
            AmountFilterMode::None,
            AmountFilterMode::GreaterThan,
            AmountFilterMode::LessThan,
            AmountFilterMode::Between,
        ]
    }
}

// ============================================================================
// Filter state + compilation
// ============================================================================

#[derive(Clone)]
pub struct SearchFilters {
    pub vendor_pattern: String,
    pub date_mode: DateFilterMode,
    pub date_start: String,
    pub date_end: String,
    pub amount_mode: AmountFilterMode,
    pub amount_value: String,
    pub amount_end: String,
}

impl SearchFilters {
    pub fn new() -> Self {
        Self {
            vendor_pattern: String::new(),
            date_mode: DateFilterMode::None,
            date_start: String::new(),
            date_end: String::new(),
            amount_mode: AmountFilterMode::None,
            amount_value: String::new(),
            amount_end: String::new(),
        }
    }

    pub fn clear_all(&mut self) {
        *self = Self::new();
    }

    pub fn has_any_filter(&self) -> bool {
        !self.vendor_pattern.is_empty()
            || self.date_mode != DateFilterMode::None
            || self.amount_mode != AmountFilterMode::None
    }

    /// Compile into an applicable filter. Invalid regexes are
    /// user-recoverable errors; unparsable bounds are ignored.
    pub fn compile(&self) -> Result<ReceiptFilter> {
        let vendor = if self.vendor_pattern.is_empty() {
            None
        } else {
            Some(Regex::new(&self.vendor_pattern)?)
        };

        let (amount_min, amount_max) = match self.amount_mode {
            AmountFilterMode::None => (None, None),
            AmountFilterMode::GreaterThan => (parse_amount_str(&self.amount_value), None),
            AmountFilterMode::LessThan => (None, parse_amount_str(&self.amount_value)),
            AmountFilterMode::Between => (
                parse_amount_str(&self.amount_value),
                parse_amount_str(&self.amount_end),
            ),
        };

        let (date_min, date_max) = match self.date_mode {
            DateFilterMode::None => (None, None),
            DateFilterMode::After => (parse_date_str(&self.date_start), None),
            DateFilterMode::Before => (None, parse_date_str(&self.date_start)),
            DateFilterMode::Between => (
                parse_date_str(&self.date_start),
                parse_date_str(&self.date_end),
            ),
        };

        Ok(ReceiptFilter {
            vendor,
            amount_min,
            amount_max,
            date_min,
            date_max,
        })
    }
}

/// A compiled, applicable filter
#[derive(Debug)]
pub struct ReceiptFilter {
    vendor: Option<Regex>,
    amount_min: Option<f64>,
    amount_max: Option<f64>,
    date_min: Option<NaiveDate>,
    date_max: Option<NaiveDate>,
}

impl ReceiptFilter {
    pub fn matches(&self, receipt: &Receipt) -> bool {
        if let Some(re) = &self.vendor {
            if !re.is_match(&receipt.vendor) {
                return false;
            }
        }
        if let Some(min) = self.amount_min {
            if receipt.total < min {
                return false;
            }
        }
        if let Some(max) = self.amount_max {
            if receipt.total > max {
                return false;
            }
        }
        if let Some(min) = self.date_min {
            if receipt.date < min {
                return false;
            }
        }
        if let Some(max) = self.date_max {
            if receipt.date > max {
                return false;
            }
        }
        true
    }
}

// ============================================================================
// Filter dialog
// ============================================================================

/// Returns true while the dialog should remain open.
pub fn show_filters_dialog(
    ctx: &egui::Context,
    filters: &mut SearchFilters,
    applied: &mut bool,
) -> bool {
    let mut open = true;

    egui::Window::new("Receipt Filters")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .default_width(420.0)
        .show(ctx, |ui| {
            ui.spacing_mut().item_spacing.y = 6.0;

            // --- Vendor ---
            ui.heading("Vendor");
            ui.horizontal(|ui| {
                ui.label("Regex:");
                ui.text_edit_singleline(&mut filters.vendor_pattern)
                    .on_hover_text("e.g. ^Whole|Market$");
            });
            ui.separator();

            // --- Date ---
            ui.heading("Purchase Date");
            ui.horizontal(|ui| {
                ui.label("Mode:");
                egui::ComboBox::from_id_salt("date_mode")
                    .selected_text(filters.date_mode.label())
                    .show_ui(ui, |ui| {
                        for mode in DateFilterMode::all() {
                            ui.selectable_value(&mut filters.date_mode, *mode, mode.label());
                        }
                    });
            });
            if filters.date_mode != DateFilterMode::None {
                ui.horizontal(|ui| {
                    ui.label("Start:");
                    ui.text_edit_singleline(&mut filters.date_start)
                        .on_hover_text("YYYY-MM-DD");
                });
                if filters.date_mode == DateFilterMode::Between {
                    ui.horizontal(|ui| {
                        ui.label("End:");
                        ui.text_edit_singleline(&mut filters.date_end)
                            .on_hover_text("YYYY-MM-DD");
                    });
                }
            }
            ui.separator();

            // --- Amount ---
            ui.heading("Total");
            ui.horizontal(|ui| {
                ui.label("Mode:");
                egui::ComboBox::from_id_salt("amount_mode")
                    .selected_text(filters.amount_mode.label())
                    .show_ui(ui, |ui| {
                        for mode in AmountFilterMode::all() {
                            ui.selectable_value(&mut filters.amount_mode, *mode, mode.label());
                        }
                    });
            });
            if filters.amount_mode != AmountFilterMode::None {
                ui.horizontal(|ui| {
                    ui.label("Value:");
                    ui.text_edit_singleline(&mut filters.amount_value)
                        .on_hover_text("e.g. 25 or $25.00");
                });
                if filters.amount_mode == AmountFilterMode::Between {
                    ui.horizontal(|ui| {
                        ui.label("End:");
                        ui.text_edit_singleline(&mut filters.amount_end)
                            .on_hover_text("e.g. $100.00");
                    });
                }
            }
            ui.separator();

            // --- Buttons ---
            ui.horizontal(|ui| {
                if ui.button("Apply").clicked() {
                    *applied = true;
                    open = false;
                }
                if ui.button("Clear").clicked() {
                    filters.clear_all();
                }
                if ui.button("Cancel").clicked() {
                    open = false;
                }
            });
        });

    open
}

// ============================================================================
// Blocking notice (the submit guard's alert)
// ============================================================================

/// Returns true while the notice should remain open.
pub fn show_notice_dialog(ctx: &egui::Context, message: &str) -> bool {
    let mut open = true;

    egui::Window::new("Notice")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(message);
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                open = false;
            }
        });

    open
}

// ============================================================================
// Confirm dialog
// ============================================================================

/// Returns `Some(true)` for confirmed, `Some(false)` for cancelled, `None`
/// while open.
pub fn show_confirm_dialog(ctx: &egui::Context, message: &str) -> Option<bool> {
    let mut result: Option<bool> = None;
    let mut open = true;

    egui::Window::new("Confirm")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut open)
        .show(ctx, |ui| {
            ui.label(message);
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Yes").clicked() {
                    result = Some(true);
                }
                if ui.button("No").clicked() {
                    result = Some(false);
                }
            });
        });

    if !open {
        return Some(false);
    }
    result
}

// ============================================================================
// About dialog
// ============================================================================

pub fn show_about_dialog(ctx: &egui::Context) -> bool {
    let mut open = true;

    egui::Window::new("About ReceiptDesk")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("ReceiptDesk");
                ui.label(format!("Version {}", crate::VERSION));
                ui.add_space(10.0);
                ui.label("Desktop receipt ledger");
                ui.label("Live search, drag-and-drop intake, dashboard");
                ui.add_space(10.0);
                if ui.button("OK").clicked() {
                    open = false;
                }
            });
        });

    open
}

// ============================================================================
// Parsing helpers
// ============================================================================

pub fn parse_amount_str(s: &str) -> Option<f64> {
    let s = s.trim().trim_start_matches('$');
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_date_str(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

// ============================================================================
// OS helpers (clipboard, open)
// ============================================================================

pub fn copy_to_clipboard(text: &str) {
    if let Ok(mut clipboard) = arboard::Clipboard::new() {
        let _ = clipboard.set_text(text.to_owned());
    }
}

pub fn open_file(path: &std::path::Path) {
    let _ = open::that(path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn receipt(vendor: &str, total: f64, date: &str) -> Receipt {
        Receipt {
            id: "r-test".to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
            date: parse_date_str(date).unwrap(),
            vendor: vendor.to_string(),
            total,
            tax: 0.0,
            image_path: None,
            raw_text: String::new(),
        }
    }

    #[test]
    fn amount_strings_accept_dollar_prefix() {
        assert_eq!(parse_amount_str("$25.00"), Some(25.0));
        assert_eq!(parse_amount_str(" 4.5 "), Some(4.5));
        assert_eq!(parse_amount_str("not-money"), None);
    }

    #[test]
    fn date_strings_require_iso_format() {
        assert_eq!(
            parse_date_str("2025-06-01"),
            NaiveDate::from_ymd_opt(2025, 6, 1)
        );
        assert_eq!(parse_date_str("06/01/2025"), None);
    }

    #[test]
    fn compiled_filter_applies_all_bounds() {
        let mut filters = SearchFilters::new();
        filters.vendor_pattern = "^Whole".to_string();
        filters.amount_mode = AmountFilterMode::Between;
        filters.amount_value = "10".to_string();
        filters.amount_end = "50".to_string();
        filters.date_mode = DateFilterMode::After;
        filters.date_start = "2025-01-01".to_string();

        let filter = filters.compile().unwrap();
        assert!(filter.matches(&receipt("Whole Foods", 25.0, "2025-06-01")));
        assert!(!filter.matches(&receipt("Cafe", 25.0, "2025-06-01")));
        assert!(!filter.matches(&receipt("Whole Foods", 75.0, "2025-06-01")));
        assert!(!filter.matches(&receipt("Whole Foods", 25.0, "2024-06-01")));
    }

    #[test]
    fn invalid_regex_is_a_recoverable_error() {
        let mut filters = SearchFilters::new();
        filters.vendor_pattern = "(".to_string();
        let err = filters.compile().unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn empty_filters_match_everything() {
        let filters = SearchFilters::new();
        assert!(!filters.has_any_filter());
        let filter = filters.compile().unwrap();
        assert!(filter.matches(&receipt("Anything", 0.0, "2025-06-01")));
    }
}
