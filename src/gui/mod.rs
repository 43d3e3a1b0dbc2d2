pub mod app;
pub mod colors;
pub mod dialogs;
pub mod effects;
pub mod table;
pub mod viewer;

/// Entry point: launch the native GUI window
pub fn run(config: crate::AppConfig) -> crate::Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("ReceiptDesk — Receipt Ledger")
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "ReceiptDesk",
        native_options,
        Box::new(move |cc| Ok(Box::new(app::DeskApp::new(cc, config)))),
    )
    .map_err(|e| crate::DeskError::Gui(format!("{}", e)))
}
