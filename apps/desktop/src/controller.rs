//! Upload workflow state, kept apart from the widgets so the transitions
//! are testable without a UI.

use std::path::{Path, PathBuf};

use crate::file_info;

/// The user's current selection. Replaced wholesale by any later pick.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
    /// Coarse media type sniffed from the extension, e.g. `image/png`.
    pub media_type: String,
}

impl SelectedFile {
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let size_bytes = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        let media_type = file_info::media_type_for_path(path).to_string();
        Self {
            path: path.to_path_buf(),
            name,
            size_bytes,
            media_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    Idle,
    FileSelected,
    Analyzing,
    ResultShown,
    Error,
}

/// State machine behind the upload screen. Widgets read the visibility
/// queries; event handlers drive the transitions.
pub struct UploadController {
    state: UiState,
    selected: Option<SelectedFile>,
}

impl UploadController {
    pub fn new() -> Self {
        Self {
            state: UiState::Idle,
            selected: None,
        }
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    /// A new pick replaces the previous one and hides any shown result,
    /// so at most one selection and one result are ever active.
    pub fn select_file(&mut self, file: SelectedFile) {
        self.selected = Some(file);
        self.state = UiState::FileSelected;
    }

    /// Returns true when an analysis may start. Rejected without a
    /// selection, and while a request is already outstanding.
    pub fn begin_analyze(&mut self) -> bool {
        if self.selected.is_none() || self.state == UiState::Analyzing {
            return false;
        }
        self.state = UiState::Analyzing;
        true
    }

    pub fn finish_analyze(&mut self) {
        if self.state == UiState::Analyzing {
            self.state = UiState::ResultShown;
        }
    }

    pub fn fail_analyze(&mut self) {
        if self.state == UiState::Analyzing {
            self.state = UiState::Error;
        }
    }

    /// Dismissing the error dialog returns to the pre-analyze state, with
    /// the analyze action offered again for the still-selected file.
    pub fn dismiss_error(&mut self) {
        if self.state == UiState::Error {
            self.state = UiState::FileSelected;
        }
    }

    pub fn analyze_visible(&self) -> bool {
        matches!(self.state, UiState::FileSelected | UiState::Error)
    }

    pub fn loading_visible(&self) -> bool {
        self.state == UiState::Analyzing
    }

    pub fn result_visible(&self) -> bool {
        self.state == UiState::ResultShown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> SelectedFile {
        SelectedFile {
            path: PathBuf::from(name),
            name: name.to_string(),
            size_bytes: 42,
            media_type: "image/png".to_string(),
        }
    }

    #[test]
    fn selection_shows_analyze_and_hides_result() {
        let mut c = UploadController::new();
        assert_eq!(c.state(), UiState::Idle);
        assert!(!c.analyze_visible());

        c.select_file(file("a.png"));
        assert_eq!(c.state(), UiState::FileSelected);
        assert!(c.analyze_visible());
        assert!(!c.result_visible());
        assert_eq!(c.selected().unwrap().name, "a.png");
    }

    #[test]
    fn new_selection_replaces_previous_and_discards_result() {
        let mut c = UploadController::new();
        c.select_file(file("a.png"));
        assert!(c.begin_analyze());
        c.finish_analyze();
        assert!(c.result_visible());

        c.select_file(file("b.png"));
        assert!(!c.result_visible());
        assert!(c.analyze_visible());
        assert_eq!(c.selected().unwrap().name, "b.png");
    }

    #[test]
    fn analyze_without_selection_is_a_no_op() {
        let mut c = UploadController::new();
        assert!(!c.begin_analyze());
        assert_eq!(c.state(), UiState::Idle);
    }

    #[test]
    fn second_analyze_while_in_flight_is_rejected() {
        let mut c = UploadController::new();
        c.select_file(file("a.png"));
        assert!(c.begin_analyze());
        assert!(c.loading_visible());
        assert!(!c.begin_analyze());
        assert_eq!(c.state(), UiState::Analyzing);
    }

    #[test]
    fn failure_hides_loading_and_restores_analyze_after_dismiss() {
        let mut c = UploadController::new();
        c.select_file(file("a.png"));
        assert!(c.begin_analyze());
        c.fail_analyze();
        assert!(!c.loading_visible());
        assert_eq!(c.state(), UiState::Error);

        c.dismiss_error();
        assert!(c.analyze_visible());
        assert_eq!(c.state(), UiState::FileSelected);
    }
}
