//! Receipt file intake
//!
//! Unifies three ways of choosing a receipt image (the native file dialog,
//! drag-and-drop onto the window, and a direct selection change) into one
//! selection state with one visible acknowledgment. The drop zone's hover
//! highlight is independent of whether a file is already confirmed.
//!
//! The component attaches only when its images directory is usable; a missing
//! or unwritable directory degrades silently to non-attachment, the same way
//! the rest of the desk treats missing page elements.

use std::path::{Path, PathBuf};

use crate::error::{DeskError, Result};

/// Default drop-zone prompt
pub const PROMPT_IDLE: &str = "Drop receipt image here";
/// Secondary prompt lines shown under the main one
pub const PROMPT_HINT: &str = "or click to browse";
pub const PROMPT_FORMATS: &str = "Supports: JPG, PNG, GIF";

/// Visible state of the drop-zone affordance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZoneState {
    #[default]
    Idle,
    /// A drag is hovering the zone
    DragActive,
    /// A file has been selected and acknowledged
    Confirmed,
}

/// Selection state shared by picker, drag-and-drop, and direct changes
pub struct FileIntake {
    images_dir: PathBuf,
    selection: Vec<PathBuf>,
    confirmed: bool,
    drag_hover: bool,
}

impl FileIntake {
    /// Attach into `slot` if nothing is attached yet. Attaching twice leaves
    /// exactly one zone; an unusable images directory leaves `slot` empty.
    pub fn attach(slot: &mut Option<FileIntake>, images_dir: &Path) {
        if slot.is_some() {
            return;
        }
        match Self::new(images_dir) {
            Ok(intake) => *slot = Some(intake),
            Err(e) => log::warn!("receipt intake not attached: {}", e),
        }
    }

    fn new(images_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(images_dir)
            .map_err(|e| DeskError::ImagesDirUnusable(images_dir.to_path_buf(), e))?;
        Ok(Self {
            images_dir: images_dir.to_path_buf(),
            selection: Vec::new(),
            confirmed: false,
            drag_hover: false,
        })
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Affordance state; an active drag reads over a confirmed selection
    pub fn zone_state(&self) -> ZoneState {
        if self.drag_hover {
            ZoneState::DragActive
        } else if self.confirmed {
            ZoneState::Confirmed
        } else {
            ZoneState::Idle
        }
    }

    /// Prompt text for the zone. Confirmed selections acknowledge the first
    /// file by name, even when several were dropped.
    pub fn prompt(&self) -> String {
        if self.confirmed {
            let name = self
                .selection
                .first()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
                .unwrap_or("selected file");
            format!("\u{2713} {}", name)
        } else {
            PROMPT_IDLE.to_string()
        }
    }

    pub fn selection(&self) -> &[PathBuf] {
        &self.selection
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// The native picker reported a selection
    pub fn on_control_changed(&mut self, files: Vec<PathBuf>) {
        if files.is_empty() {
            return;
        }
        self.selection = files;
        self.confirmed = true;
    }

    /// A drag entered or moved over the zone
    pub fn on_drag_over(&mut self) {
        self.drag_hover = true;
    }

    /// The drag left without dropping
    pub fn on_drag_leave(&mut self) {
        self.drag_hover = false;
    }

    /// Files were dropped on the zone. The whole list becomes the selection;
    /// only the first file is named in the acknowledgment.
    pub fn on_drop(&mut self, files: Vec<PathBuf>) {
        self.drag_hover = false;
        if files.is_empty() {
            return;
        }
        self.selection = files;
        self.confirmed = true;
    }

    /// Submission guard: yields the selection, or blocks with
    /// [`DeskError::EmptySubmission`] when nothing is selected.
    pub fn try_submit(&self) -> Result<Vec<PathBuf>> {
        if self.selection.is_empty() {
            return Err(DeskError::EmptySubmission);
        }
        Ok(self.selection.clone())
    }

    /// Back to the idle prompt after a completed submission
    pub fn reset(&mut self) {
        self.selection.clear();
        self.confirmed = false;
        self.drag_hover = false;
    }
}

/// Copy a receipt image into the images directory, deduplicating the file
/// name if needed. Returns the stored path.
pub fn store_image(images_dir: &Path, source: &Path) -> Result<PathBuf> {
    let name = source
        .file_name()
        .ok_or_else(|| {
            DeskError::ImageStore(
                source.to_path_buf(),
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "no file name"),
            )
        })?
        .to_owned();

    let mut target = images_dir.join(&name);
    let mut bump = 0u32;
    while target.exists() {
        bump += 1;
        let stem = Path::new(&name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("receipt");
        let ext = Path::new(&name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        let bumped = if ext.is_empty() {
            format!("{}-{}", stem, bump)
        } else {
            format!("{}-{}.{}", stem, bump, ext)
        };
        target = images_dir.join(bumped);
    }

    std::fs::copy(source, &target)
        .map_err(|e| DeskError::ImageStore(source.to_path_buf(), e))?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attached(dir: &Path) -> FileIntake {
        let mut slot = None;
        FileIntake::attach(&mut slot, dir);
        slot.expect("intake should attach to a writable dir")
    }

    #[test]
    fn attach_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut slot = None;
        FileIntake::attach(&mut slot, dir.path());
        assert!(slot.is_some());

        // Second attach must not replace the zone or its state
        slot.as_mut().unwrap().on_drop(vec![PathBuf::from("receipt.jpg")]);
        FileIntake::attach(&mut slot, dir.path());
        assert!(slot.as_ref().unwrap().has_selection());
    }

    #[test]
    fn attach_degrades_silently_on_unusable_dir() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        // A plain file cannot become the images directory
        let mut slot = None;
        FileIntake::attach(&mut slot, &blocker);
        assert!(slot.is_none());
    }

    #[test]
    fn drop_sets_selection_and_acknowledges_first_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut intake = attached(dir.path());

        let files = vec![PathBuf::from("receipt.jpg"), PathBuf::from("second.png")];
        intake.on_drop(files.clone());

        assert_eq!(intake.selection(), files.as_slice());
        assert_eq!(intake.prompt(), "\u{2713} receipt.jpg");
        assert_eq!(intake.zone_state(), ZoneState::Confirmed);
    }

    #[test]
    fn empty_drop_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut intake = attached(dir.path());
        intake.on_drag_over();
        intake.on_drop(Vec::new());
        assert!(!intake.has_selection());
        assert_eq!(intake.zone_state(), ZoneState::Idle);
    }

    #[test]
    fn drag_hover_overrides_confirmed_and_clears_on_leave() {
        let dir = tempfile::tempdir().unwrap();
        let mut intake = attached(dir.path());
        intake.on_control_changed(vec![PathBuf::from("receipt.jpg")]);
        assert_eq!(intake.zone_state(), ZoneState::Confirmed);

        intake.on_drag_over();
        assert_eq!(intake.zone_state(), ZoneState::DragActive);
        intake.on_drag_leave();
        assert_eq!(intake.zone_state(), ZoneState::Confirmed);
    }

    #[test]
    fn submit_with_no_selection_is_blocked() {
        let dir = tempfile::tempdir().unwrap();
        let intake = attached(dir.path());
        assert!(matches!(
            intake.try_submit(),
            Err(DeskError::EmptySubmission)
        ));
    }

    #[test]
    fn submit_yields_full_selection_and_reset_returns_to_idle() {
        let dir = tempfile::tempdir().unwrap();
        let mut intake = attached(dir.path());
        let files = vec![PathBuf::from("a.jpg"), PathBuf::from("b.jpg")];
        intake.on_drop(files.clone());

        assert_eq!(intake.try_submit().unwrap(), files);

        intake.reset();
        assert_eq!(intake.zone_state(), ZoneState::Idle);
        assert_eq!(intake.prompt(), PROMPT_IDLE);
    }

    #[test]
    fn store_image_deduplicates_names() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("images");
        std::fs::create_dir_all(&images).unwrap();

        let src = dir.path().join("receipt.jpg");
        std::fs::write(&src, b"fake-jpeg").unwrap();

        let first = store_image(&images, &src).unwrap();
        let second = store_image(&images, &src).unwrap();
        assert_eq!(first.file_name().unwrap(), "receipt.jpg");
        assert_eq!(second.file_name().unwrap(), "receipt-1.jpg");
        assert!(first.exists() && second.exists());
    }
}
