//! Main ReceiptDesk application

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;
use eframe::egui;

use crate::gui::colors;
use crate::gui::dialogs::{self, ReceiptFilter, SearchFilters};
use crate::gui::effects::{BannerKind, BannerTray, CountUp, CounterStyle, RippleLayer};
use crate::gui::table::{SortColumn, SortOrder, TableState};
use crate::gui::viewer::ImageViewer;
use crate::highlight::{self, QueryEdge, RowState, SearchHighlighter};
use crate::intake::{self, FileIntake, ZoneState};
use crate::ledger::Ledger;
use crate::{AppConfig, Receipt};

/// Message types for background operations
pub enum BackgroundMessage {
    IngestProgress(String),
    IngestComplete(Vec<PathBuf>),
    IngestError(String),
}

/// The three dashboard cards
struct DashboardCounters {
    count: CountUp,
    total: CountUp,
    tax: CountUp,
}

impl DashboardCounters {
    fn new(stats: crate::LedgerStats, now: Instant) -> Self {
        Self {
            count: CountUp::new(stats.count as f64, CounterStyle::Count, now),
            total: CountUp::new(stats.total_sum, CounterStyle::Currency, now),
            tax: CountUp::new(stats.tax_sum, CounterStyle::Currency, now),
        }
    }

    fn sync(&mut self, stats: crate::LedgerStats, now: Instant) {
        self.count.retarget(stats.count as f64, now);
        self.total.retarget(stats.total_sum, now);
        self.tax.retarget(stats.tax_sum, now);
    }

    fn animating(&self, now: Instant) -> bool {
        !(self.count.finished(now) && self.total.finished(now) && self.tax.finished(now))
    }
}

/// Main application state
pub struct DeskApp {
    config: AppConfig,
    ledger: Ledger,
    /// Search state
    highlighter: SearchHighlighter,
    /// Per-receipt highlight states, keyed to ledger storage order
    row_states: Vec<RowState>,
    focus_search: bool,
    search_first_frame: bool,
    /// Receipt intake (None when the images dir is unusable)
    intake: Option<FileIntake>,
    zone_rect: Option<egui::Rect>,
    is_ingesting: bool,
    ingest_progress: String,
    /// Channel for background messages
    bg_receiver: Receiver<BackgroundMessage>,
    bg_sender: Sender<BackgroundMessage>,
    /// Table display state
    table: TableState,
    /// Display order (indices into ledger.receipts)
    display_indices: Vec<usize>,
    /// Advanced filters
    filters: SearchFilters,
    active_filter: Option<ReceiptFilter>,
    show_filters: bool,
    /// Dialogs
    show_about: bool,
    notice: Option<String>,
    confirm_delete: Option<String>,
    /// Transient effects
    counters: DashboardCounters,
    banners: BannerTray,
    ripples: RippleLayer,
    viewer: ImageViewer,
    /// Status bar message
    status_message: String,
}

impl DeskApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let now = Instant::now();
        let (bg_sender, bg_receiver) = channel();

        let mut banners = BannerTray::default();
        let ledger = match Ledger::load(&config.ledger_path) {
            Ok(ledger) => ledger,
            Err(e) => {
                log::error!("ledger load failed: {}", e);
                banners.push(BannerKind::Error, format!("Could not load ledger: {}", e), now);
                Ledger::empty(&config.ledger_path)
            }
        };

        let mut intake = None;
        FileIntake::attach(&mut intake, &config.images_dir);

        let counters = DashboardCounters::new(ledger.stats(), now);
        let row_states = vec![RowState::Neutral; ledger.len()];

        let mut app = Self {
            config,
            ledger,
            highlighter: SearchHighlighter::new(),
            row_states,
            focus_search: false,
            search_first_frame: true,
            intake,
            zone_rect: None,
            is_ingesting: false,
            ingest_progress: String::new(),
            bg_receiver,
            bg_sender,
            table: TableState::default(),
            display_indices: Vec::new(),
            filters: SearchFilters::new(),
            active_filter: None,
            show_filters: false,
            show_about: false,
            notice: None,
            confirm_delete: None,
            counters,
            banners,
            ripples: RippleLayer::default(),
            viewer: ImageViewer::default(),
            status_message: "Ready".to_string(),
        };
        app.refresh_display();
        app
    }

    // ------------------------------------------------------------------
    // Display order and highlight state
    // ------------------------------------------------------------------

    /// Recompute the display order from filters and sort state
    fn refresh_display(&mut self) {
        let receipts = &self.ledger.receipts;
        let mut indices: Vec<usize> = (0..receipts.len())
            .filter(|&i| {
                self.active_filter
                    .as_ref()
                    .map(|f| f.matches(&receipts[i]))
                    .unwrap_or(true)
            })
            .collect();

        let column = self.table.sort_column;
        let order = self.table.sort_order;
        indices.sort_by(|&a, &b| {
            let ra = &receipts[a];
            let rb = &receipts[b];
            let cmp = match column {
                SortColumn::Vendor => ra.vendor.to_lowercase().cmp(&rb.vendor.to_lowercase()),
                SortColumn::Date => ra.date.cmp(&rb.date),
                SortColumn::Total => ra.total.total_cmp(&rb.total),
                SortColumn::Tax => ra.tax.total_cmp(&rb.tax),
                SortColumn::Added => ra.created_at.cmp(&rb.created_at).then(a.cmp(&b)),
            };
            if order == SortOrder::Descending {
                cmp.reverse()
            } else {
                cmp
            }
        });

        self.display_indices = indices;
        self.status_message = format!("{} receipts", self.display_indices.len());
    }

    /// Full re-scan of every row against the current query
    fn refresh_row_states(&mut self) {
        if self.highlighter.is_active() {
            self.row_states = highlight::scan_rows(
                &self.highlighter.query,
                self.ledger.receipts.iter().map(|r| r.display_text()),
            );
        } else {
            self.row_states = vec![RowState::Neutral; self.ledger.len()];
        }
    }

    fn selected_receipt(&self) -> Option<&Receipt> {
        self.table
            .selected
            .and_then(|i| self.display_indices.get(i))
            .and_then(|&idx| self.ledger.receipts.get(idx))
    }

    // ------------------------------------------------------------------
    // Background ingestion
    // ------------------------------------------------------------------

    /// Process background messages
    fn process_messages(&mut self, now: Instant) {
        let messages: Vec<BackgroundMessage> =
            std::iter::from_fn(|| self.bg_receiver.try_recv().ok()).collect();

        for msg in messages {
            match msg {
                BackgroundMessage::IngestProgress(text) => {
                    self.ingest_progress = text;
                }
                BackgroundMessage::IngestComplete(stored) => {
                    let count = stored.len();
                    for path in stored {
                        let receipt = Receipt::unreviewed(path, Utc::now());
                        if let Err(e) = self.ledger.append(receipt) {
                            log::error!("ledger append failed: {}", e);
                            self.banners.push(
                                BannerKind::Error,
                                format!("Could not save receipt: {}", e),
                                now,
                            );
                        }
                    }
                    self.is_ingesting = false;
                    self.ingest_progress.clear();
                    if let Some(intake) = &mut self.intake {
                        intake.reset();
                    }
                    self.banners.push(
                        BannerKind::Success,
                        format!("\u{2713} Added {} receipt{}", count, if count == 1 { "" } else { "s" }),
                        now,
                    );
                    self.counters.sync(self.ledger.stats(), now);
                    self.refresh_display();
                    self.refresh_row_states();
                }
                BackgroundMessage::IngestError(text) => {
                    self.is_ingesting = false;
                    self.ingest_progress.clear();
                    self.banners.push(BannerKind::Error, text, now);
                }
            }
        }
    }

    /// Submit the intake selection: guard, then ingest on a background thread
    fn submit_receipt(&mut self) {
        if self.is_ingesting {
            return;
        }
        let Some(intake) = &self.intake else {
            return;
        };

        let files = match intake.try_submit() {
            Ok(files) => files,
            Err(e) => {
                log::debug!("submission blocked: {}", e);
                self.notice = Some("Please select a file to upload".to_string());
                return;
            }
        };

        self.is_ingesting = true;
        self.ingest_progress = "Uploading & Processing Receipt...".to_string();

        let images_dir = intake.images_dir().to_path_buf();
        let tx = self.bg_sender.clone();

        thread::spawn(move || {
            let mut stored = Vec::new();
            for file in files {
                let _ = tx.send(BackgroundMessage::IngestProgress(format!(
                    "Storing {}...",
                    file.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default()
                )));
                match intake::store_image(&images_dir, &file) {
                    Ok(path) => stored.push(path),
                    Err(e) => {
                        let _ = tx.send(BackgroundMessage::IngestError(format!(
                            "Could not store {}: {}",
                            file.display(),
                            e
                        )));
                        return;
                    }
                }
            }
            let _ = tx.send(BackgroundMessage::IngestComplete(stored));
        });
    }

    // ------------------------------------------------------------------
    // Global input dispatch
    // ------------------------------------------------------------------

    /// One dispatcher for window-wide events, keyed by event type: keyboard
    /// shortcuts, click ripples, and OS file drag/drop. Runs once per frame.
    fn dispatch_global_input(&mut self, ctx: &egui::Context, now: Instant) {
        // Ctrl/Cmd + K focuses the search field
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::K)) {
            self.focus_search = true;
        }

        // Escape closes the image viewer
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) && self.viewer.is_open() {
            self.viewer.close();
        }

        // Table navigation, only while no text field wants the keyboard
        if !ctx.wants_keyboard_input() {
            if ctx.input(|i| i.key_pressed(egui::Key::ArrowDown)) {
                self.table.select_next(self.display_indices.len());
            }
            if ctx.input(|i| i.key_pressed(egui::Key::ArrowUp)) {
                self.table.select_prev();
            }
            if ctx.input(|i| i.key_pressed(egui::Key::Enter)) {
                self.open_selected_image();
            }
            if ctx.input(|i| i.key_pressed(egui::Key::Delete)) {
                self.request_delete_selected();
            }
        }

        // Click ripples
        let click_pos = ctx.input(|i| {
            if i.pointer.primary_pressed() {
                i.pointer.press_origin()
            } else {
                None
            }
        });
        if let Some(pos) = click_pos {
            self.ripples.spawn(pos, now);
        }

        // OS file drag and drop feeds the intake
        if let Some(intake) = &mut self.intake {
            let dropped: Vec<PathBuf> = ctx.input(|i| {
                i.raw
                    .dropped_files
                    .iter()
                    .filter_map(|f| f.path.clone())
                    .collect()
            });
            let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());

            if !dropped.is_empty() {
                log::info!("dropped {} file(s) onto intake zone", dropped.len());
                intake.on_drop(dropped);
            } else if hovering {
                // Highlight the zone while the pointer is over it; some
                // platforms report no position mid-drag, which counts as over
                let pointer = ctx.input(|i| i.pointer.latest_pos());
                let over = match (pointer, self.zone_rect) {
                    (Some(pos), Some(rect)) => rect.contains(pos),
                    _ => true,
                };
                if over {
                    intake.on_drag_over();
                } else {
                    intake.on_drag_leave();
                }
            } else if intake.zone_state() == ZoneState::DragActive {
                intake.on_drag_leave();
            }
        }
    }

    fn open_selected_image(&mut self) {
        let Some(receipt) = self.selected_receipt() else {
            return;
        };
        match &receipt.image_path {
            Some(path) => self.viewer.open(path.clone()),
            None => self.status_message = "No image stored for this receipt".to_string(),
        }
    }

    fn request_delete_selected(&mut self) {
        if let Some(receipt) = self.selected_receipt() {
            self.confirm_delete = Some(receipt.id.clone());
        }
    }

    // ------------------------------------------------------------------
    // Panels
    // ------------------------------------------------------------------

    /// Render menu bar
    fn render_menu(&mut self, ctx: &egui::Context, now: Instant) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Reload Ledger").clicked() {
                        self.reload_ledger(now);
                        ui.close_menu();
                    }
                    if ui.button("Export CSV...").clicked() {
                        self.export_csv(now);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    if ui.button("Copy Vendor").clicked() {
                        if let Some(receipt) = self.selected_receipt() {
                            dialogs::copy_to_clipboard(&receipt.vendor);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Copy Image Path").clicked() {
                        if let Some(path) = self
                            .selected_receipt()
                            .and_then(|r| r.image_path.as_deref())
                        {
                            dialogs::copy_to_clipboard(&path.display().to_string());
                        }
                        ui.close_menu();
                    }
                    if ui.button("Open Image Externally").clicked() {
                        if let Some(path) = self
                            .selected_receipt()
                            .and_then(|r| r.image_path.as_deref())
                        {
                            dialogs::open_file(path);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Delete Receipt").clicked() {
                        self.request_delete_selected();
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.button("Filters...").clicked() {
                        self.show_filters = true;
                        ui.close_menu();
                    }
                    if ui.button("Clear Filters").clicked() {
                        self.filters.clear_all();
                        self.active_filter = None;
                        self.refresh_display();
                        ui.close_menu();
                    }
                });

                ui.menu_button("Help", |ui| {
                    if ui.button("About ReceiptDesk").clicked() {
                        self.show_about = true;
                        ui.close_menu();
                    }
                });
            });
        });
    }

    /// Render search bar
    fn render_search_bar(&mut self, ctx: &egui::Context, now: Instant) {
        egui::TopBottomPanel::top("search_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Search:");
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.highlighter.query)
                        .desired_width(ui.available_width() - 90.0)
                        .hint_text("Type to highlight matching receipts (Ctrl+K)"),
                );

                if self.search_first_frame {
                    response.request_focus();
                    self.search_first_frame = false;
                }
                if self.focus_search {
                    response.request_focus();
                    self.focus_search = false;
                }

                if response.changed()
                    && self.highlighter.on_query_changed(now) == QueryEdge::Cleared
                {
                    // Clearing takes effect immediately, no timer
                    self.row_states = vec![RowState::Neutral; self.ledger.len()];
                }

                // Active-search affordance, shown the moment a query exists
                if self.highlighter.is_active() {
                    ui.painter().rect_stroke(
                        response.rect.expand(2.0),
                        egui::CornerRadius::same(4),
                        egui::Stroke::new(1.5, colors::ACCENT_BLUE),
                        egui::StrokeKind::Outside,
                    );
                }

                if ui.button("Filters...").clicked() {
                    self.show_filters = true;
                }
            });
        });
    }

    /// Render the dashboard cards
    fn render_stats(&mut self, ctx: &egui::Context, now: Instant) {
        egui::TopBottomPanel::top("stats_row").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.columns(3, |cols| {
                let cards = [
                    (&self.counters.count, "Receipts"),
                    (&self.counters.total, "Total Spend"),
                    (&self.counters.tax, "Total Tax"),
                ];
                for (col, (counter, caption)) in cols.iter_mut().zip(cards) {
                    col.group(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.label(
                                egui::RichText::new(counter.text(now))
                                    .size(24.0)
                                    .strong(),
                            );
                            ui.label(egui::RichText::new(caption).weak());
                        });
                    });
                }
            });
            ui.add_space(4.0);
        });
    }

    /// Render the banner tray
    fn render_banners(&mut self, ctx: &egui::Context) {
        if self.banners.is_empty() {
            return;
        }
        let mut dismiss: Option<usize> = None;
        egui::TopBottomPanel::top("banner_tray").show(ctx, |ui| {
            for (i, banner) in self.banners.iter().enumerate() {
                let fill = colors::banner_fill_color(banner.kind);
                let accent = colors::banner_accent_color(banner.kind);
                let response = egui::Frame::group(ui.style())
                    .fill(fill)
                    .stroke(egui::Stroke::new(1.0, accent))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.colored_label(accent, &banner.message);
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    ui.label(egui::RichText::new("\u{2715}").weak());
                                },
                            );
                        });
                    })
                    .response
                    .interact(egui::Sense::click());
                if response.clicked() {
                    dismiss = Some(i);
                }
            }
        });
        if let Some(i) = dismiss {
            self.banners.dismiss(i);
        }
    }

    /// Render the receipt intake zone
    fn render_intake_panel(&mut self, ctx: &egui::Context) {
        if self.intake.is_none() {
            return;
        }

        let mut activate_zone = false;
        let mut submit = false;

        egui::SidePanel::right("intake_panel")
            .default_width(260.0)
            .show(ctx, |ui| {
                let Some(intake) = &self.intake else {
                    return;
                };
                ui.add_space(8.0);
                ui.heading("Add Receipt");
                ui.add_space(8.0);

                let zone_state = intake.zone_state();
                let response = egui::Frame::group(ui.style())
                    .fill(colors::zone_fill_color(zone_state))
                    .stroke(egui::Stroke::new(2.0, colors::zone_border_color(zone_state)))
                    .inner_margin(egui::Margin::same(16))
                    .show(ui, |ui| {
                        ui.set_min_height(140.0);
                        ui.vertical_centered(|ui| {
                            ui.label(egui::RichText::new("\u{1F4C4}").size(32.0));
                            ui.add_space(4.0);
                            ui.label(egui::RichText::new(intake.prompt()).strong());
                            if zone_state != ZoneState::Confirmed {
                                ui.label(egui::RichText::new(intake::PROMPT_HINT).weak());
                                ui.label(
                                    egui::RichText::new(intake::PROMPT_FORMATS)
                                        .weak()
                                        .small(),
                                );
                            }
                        });
                    })
                    .response
                    .interact(egui::Sense::click());

                self.zone_rect = Some(response.rect);
                if response.clicked() {
                    activate_zone = true;
                }

                ui.add_space(8.0);
                if ui
                    .add_enabled(!self.is_ingesting, egui::Button::new("Submit receipt"))
                    .clicked()
                {
                    submit = true;
                }
            });

        if activate_zone {
            self.activate_zone();
        }
        if submit {
            self.submit_receipt();
        }
    }

    /// Click on the zone opens the native picker; picking alone selects,
    /// submission is still explicit
    fn activate_zone(&mut self) {
        let Some(intake) = &mut self.intake else {
            return;
        };
        let extensions: Vec<&str> = self
            .config
            .accepted_extensions
            .iter()
            .map(|s| s.as_str())
            .collect();
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Receipt images", &extensions)
            .pick_file()
        {
            intake.on_control_changed(vec![path]);
        }
    }

    /// Render status bar
    fn render_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.is_ingesting {
                    ui.spinner();
                    ui.label(&self.ingest_progress);
                    return;
                }

                ui.label(format!("{} receipts", self.display_indices.len()));
                ui.separator();

                if let Some(receipt) = self.selected_receipt() {
                    if let Some(path) = receipt.image_path.as_deref() {
                        let size = std::fs::metadata(path)
                            .map(|m| humansize::format_size(m.len(), humansize::DECIMAL))
                            .unwrap_or_else(|_| "missing".to_string());
                        ui.label(format!("Image: {} ({})", path.display(), size));
                    } else {
                        ui.label(format!("{} — no image", receipt.vendor));
                    }
                } else {
                    ui.label(&self.status_message);
                }
            });
        });
    }

    /// Render the results table
    fn render_results_table(&mut self, ui: &mut egui::Ui) {
        use egui_extras::{Column, TableBuilder};

        let available_height = ui.available_height();
        let row_count = self.display_indices.len();

        let header_label = |column: SortColumn, name: &str, state: &TableState| {
            if state.sort_column == column {
                format!("{}{}", name, state.sort_order.indicator())
            } else {
                name.to_string()
            }
        };

        let vendor_header = header_label(SortColumn::Vendor, "Vendor", &self.table);
        let date_header = header_label(SortColumn::Date, "Date", &self.table);
        let total_header = header_label(SortColumn::Total, "Total", &self.table);
        let tax_header = header_label(SortColumn::Tax, "Tax", &self.table);
        let added_header = header_label(SortColumn::Added, "Added", &self.table);

        let mut clicked_column: Option<SortColumn> = None;
        let mut new_selection: Option<usize> = None;
        let mut open_image: Option<PathBuf> = None;

        let sort_column = self.table.sort_column;
        let current_selection = self.table.selected;

        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::initial(220.0).at_least(60.0).clip(true))
            .column(Column::initial(100.0).at_least(60.0).clip(true))
            .column(Column::initial(90.0).at_least(50.0).clip(true))
            .column(Column::initial(90.0).at_least(50.0).clip(true))
            .column(Column::remainder().at_least(80.0).clip(true))
            .min_scrolled_height(0.0)
            .max_scroll_height(available_height)
            .sense(egui::Sense::click())
            .header(20.0, |mut header| {
                for (column, label) in [
                    (SortColumn::Vendor, &vendor_header),
                    (SortColumn::Date, &date_header),
                    (SortColumn::Total, &total_header),
                    (SortColumn::Tax, &tax_header),
                    (SortColumn::Added, &added_header),
                ] {
                    header.col(|ui| {
                        if ui
                            .selectable_label(sort_column == column, label)
                            .on_hover_text("Click to sort")
                            .clicked()
                        {
                            clicked_column = Some(column);
                        }
                    });
                }
            })
            .body(|body| {
                body.rows(20.0, row_count, |mut row| {
                    let row_index = row.index();
                    let is_selected = current_selection == Some(row_index);
                    if is_selected {
                        row.set_selected(true);
                    }

                    let Some(&entry_idx) = self.display_indices.get(row_index) else {
                        return;
                    };
                    let Some(receipt) = self.ledger.receipts.get(entry_idx) else {
                        return;
                    };
                    let state = self
                        .row_states
                        .get(entry_idx)
                        .copied()
                        .unwrap_or_default();
                    let tint = colors::row_text_color(state);

                    let cell_text = |text: String| {
                        let rich = egui::RichText::new(text);
                        match tint {
                            Some(color) => rich.color(color),
                            None => rich,
                        }
                    };

                    let cells = [
                        format!(
                            "{}{} {}",
                            colors::row_marker(state),
                            "\u{1F9FE}",
                            receipt.vendor
                        ),
                        receipt.date.format("%Y-%m-%d").to_string(),
                        crate::format_amount(receipt.total),
                        crate::format_amount(receipt.tax),
                        receipt.image_name().unwrap_or("\u{2014}").to_string(),
                    ];

                    for cell in cells {
                        row.col(|ui| {
                            let response = ui.selectable_label(is_selected, cell_text(cell.clone()));
                            if response.clicked() {
                                new_selection = Some(row_index);
                            }
                            if response.double_clicked() {
                                if let Some(path) = receipt.image_path.clone() {
                                    open_image = Some(path);
                                }
                            }
                        });
                    }
                });
            });

        if let Some(idx) = new_selection {
            self.table.selected = Some(idx);
        }
        if let Some(path) = open_image {
            self.viewer.open(path);
        }
        if let Some(column) = clicked_column {
            self.table.sort_clicked(column);
            self.refresh_display();
        }
    }

    // ------------------------------------------------------------------
    // Dialogs and overlays
    // ------------------------------------------------------------------

    fn render_dialogs(&mut self, ctx: &egui::Context, now: Instant) {
        if self.show_filters {
            let mut applied = false;
            self.show_filters = dialogs::show_filters_dialog(ctx, &mut self.filters, &mut applied);
            if applied {
                self.apply_filters(now);
            }
        }

        if let Some(message) = self.notice.clone() {
            if !dialogs::show_notice_dialog(ctx, &message) {
                self.notice = None;
            }
        }

        if let Some(id) = self.confirm_delete.clone() {
            let vendor = self
                .ledger
                .get(&id)
                .map(|r| r.vendor.clone())
                .unwrap_or_else(|| id.clone());
            match dialogs::show_confirm_dialog(ctx, &format!("Delete receipt from {}?", vendor)) {
                Some(true) => {
                    self.confirm_delete = None;
                    self.delete_receipt(&id, now);
                }
                Some(false) => self.confirm_delete = None,
                None => {}
            }
        }

        if self.show_about {
            self.show_about = dialogs::show_about_dialog(ctx);
        }
    }

    fn apply_filters(&mut self, now: Instant) {
        if !self.filters.has_any_filter() {
            self.active_filter = None;
            self.refresh_display();
            return;
        }
        match self.filters.compile() {
            Ok(filter) => {
                self.active_filter = Some(filter);
                self.table.clear_selection();
                self.refresh_display();
            }
            Err(e) => {
                self.banners.push(BannerKind::Error, format!("{}", e), now);
            }
        }
    }

    fn delete_receipt(&mut self, id: &str, now: Instant) {
        match self.ledger.remove(id) {
            Ok(removed) => {
                log::info!("deleted receipt {}", removed.id);
                self.banners
                    .push(BannerKind::Info, format!("Deleted receipt from {}", removed.vendor), now);
            }
            Err(e) => {
                self.banners.push(BannerKind::Error, format!("{}", e), now);
            }
        }
        self.table.clear_selection();
        self.counters.sync(self.ledger.stats(), now);
        self.refresh_display();
        self.refresh_row_states();
    }

    fn reload_ledger(&mut self, now: Instant) {
        match Ledger::load(&self.config.ledger_path) {
            Ok(ledger) => {
                self.ledger = ledger;
                self.table.clear_selection();
                self.counters.sync(self.ledger.stats(), now);
                self.refresh_display();
                self.refresh_row_states();
                self.banners.push(BannerKind::Info, "Ledger reloaded", now);
            }
            Err(e) => {
                self.banners.push(BannerKind::Error, format!("{}", e), now);
            }
        }
    }

    fn export_csv(&mut self, now: Instant) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("receipts.csv")
            .save_file()
        else {
            return;
        };
        let result = std::fs::File::create(&path)
            .map_err(crate::DeskError::from)
            .and_then(|file| self.ledger.export_csv(file));
        match result {
            Ok(()) => self.banners.push(
                BannerKind::Success,
                format!("Exported {} receipts to {}", self.ledger.len(), path.display()),
                now,
            ),
            Err(e) => self.banners.push(BannerKind::Error, format!("{}", e), now),
        }
    }

    /// Fullscreen overlay while a submission is being ingested
    fn render_loading_overlay(&self, ctx: &egui::Context) {
        if !self.is_ingesting {
            return;
        }
        let screen = ctx.screen_rect();
        egui::Area::new(egui::Id::new("loading_overlay"))
            .order(egui::Order::Foreground)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                let (rect, _) = ui.allocate_exact_size(screen.size(), egui::Sense::click());
                ui.painter().rect_filled(
                    rect,
                    egui::CornerRadius::ZERO,
                    egui::Color32::from_black_alpha(160),
                );
                ui.scope_builder(
                    egui::UiBuilder::new().max_rect(egui::Rect::from_center_size(
                        rect.center(),
                        egui::vec2(260.0, 80.0),
                    )),
                    |ui| {
                        ui.vertical_centered(|ui| {
                            ui.spinner();
                            ui.add_space(6.0);
                            ui.label(&self.ingest_progress);
                        });
                    },
                );
            });
    }

    fn render_ripples(&self, ctx: &egui::Context, now: Instant) {
        if self.ripples.is_empty() {
            return;
        }
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("ripple_layer"),
        ));
        for ripple in self.ripples.iter() {
            let t = ripple.age_fraction(now);
            let radius = 10.0 + 50.0 * t;
            let alpha = ((1.0 - t) * 70.0) as u8;
            painter.circle_filled(
                ripple.center,
                radius,
                egui::Color32::from_white_alpha(alpha),
            );
        }
    }

    /// Schedule the next repaint from the nearest pending deadline
    fn schedule_repaint(&self, ctx: &egui::Context, now: Instant) {
        if self.is_ingesting
            || !self.ripples.is_empty()
            || self.counters.animating(now)
        {
            ctx.request_repaint_after(Duration::from_millis(16));
            return;
        }

        let next = [
            self.highlighter.next_deadline(),
            self.banners.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min();

        if let Some(deadline) = next {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }
    }
}

impl eframe::App for DeskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.process_messages(now);
        self.dispatch_global_input(ctx, now);

        // Fire the debounced highlight pass
        if let Some(query) = self.highlighter.poll(now) {
            log::debug!("highlight pass for '{}'", query);
            self.row_states = highlight::scan_rows(
                &query,
                self.ledger.receipts.iter().map(|r| r.display_text()),
            );
        }

        self.banners.sweep(now);
        self.ripples.sweep(now);

        self.render_menu(ctx, now);
        self.render_search_bar(ctx, now);
        self.render_stats(ctx, now);
        self.render_banners(ctx);
        self.render_status_bar(ctx);
        self.render_intake_panel(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_results_table(ui);
        });

        self.render_dialogs(ctx, now);
        self.viewer.show(ctx);
        self.render_loading_overlay(ctx);
        self.render_ripples(ctx, now);

        self.schedule_repaint(ctx, now);
    }
}
