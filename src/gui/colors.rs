use eframe::egui::Color32;

use crate::gui::effects::BannerKind;
use crate::highlight::RowState;
use crate::intake::ZoneState;

/// Warm emphasis used for matched rows and their accent bar.
pub const ACCENT_WARM: Color32 = Color32::from_rgb(212, 165, 116);
/// Active-search input border.
pub const ACCENT_BLUE: Color32 = Color32::from_rgb(100, 160, 230);
/// Confirmed-selection green.
pub const ACCENT_GREEN: Color32 = Color32::from_rgb(122, 159, 126);
/// Error red.
pub const ACCENT_RED: Color32 = Color32::from_rgb(205, 92, 92);

/// Text colour override for a row in the given highlight state. `None` means
/// the theme default.
pub fn row_text_color(state: RowState) -> Option<Color32> {
    match state {
        RowState::Neutral => None,
        RowState::Matched => Some(ACCENT_WARM),
        RowState::Unmatched => Some(Color32::from_gray(110)),
    }
}

/// Accent-bar marker shown in front of a matched row's first cell.
pub fn row_marker(state: RowState) -> &'static str {
    match state {
        RowState::Matched => "\u{258D} ",
        _ => "",
    }
}

/// Border colour of the drop zone per affordance state.
pub fn zone_border_color(state: ZoneState) -> Color32 {
    match state {
        ZoneState::Idle => Color32::from_gray(90),
        ZoneState::DragActive => ACCENT_BLUE,
        ZoneState::Confirmed => ACCENT_GREEN,
    }
}

/// Fill colour of the drop zone per affordance state.
pub fn zone_fill_color(state: ZoneState) -> Color32 {
    match state {
        ZoneState::Idle => Color32::from_gray(28),
        ZoneState::DragActive => Color32::from_rgb(24, 34, 48),
        ZoneState::Confirmed => Color32::from_rgb(26, 38, 28),
    }
}

/// Banner background per kind.
pub fn banner_fill_color(kind: BannerKind) -> Color32 {
    match kind {
        BannerKind::Info => Color32::from_rgb(26, 36, 48),
        BannerKind::Success => Color32::from_rgb(24, 40, 28),
        BannerKind::Error => Color32::from_rgb(48, 24, 24),
    }
}

/// Banner accent / text tint per kind.
pub fn banner_accent_color(kind: BannerKind) -> Color32 {
    match kind {
        BannerKind::Info => ACCENT_BLUE,
        BannerKind::Success => ACCENT_GREEN,
        BannerKind::Error => ACCENT_RED,
    }
}
