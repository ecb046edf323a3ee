use crate::error::AnalyzeError;
use crate::models::analysis_types::AnalysisResult;
use crate::models::selection_types::{FileCandidate, SelectedFile};
use crate::services::analyze_client::AnalyzeClient;
use crate::services::preview_service;
use crate::widget::dom::{Target, View, DRAGOVER_CLASS};
use crate::widget::render;
use serde::Serialize;

pub const INVALID_FILE_MESSAGE: &str = "Please upload an image file (JPG, PNG).";
pub const SERVER_ERROR_PREFIX: &str = "Analysis failed: ";
pub const TRANSPORT_ERROR_MESSAGE: &str = "An error occurred during analysis.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum UiMode {
    Empty,
    Previewing { results_shown: bool },
    Loading,
}

/// Whether a click should keep bubbling to enclosing handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Propagation {
    Continue,
    Stop,
}

/// Upload widget state machine.
///
/// Holds the one selected image and drives the page through `V`. Each DOM
/// event maps to one `on_*` method; analysis is split into
/// [`begin_analyze`](Self::begin_analyze) and
/// [`finish_analyze`](Self::finish_analyze) so a host can release its lock
/// while the request is in flight. While `Loading`, selection changes and
/// further analyze requests are refused.
pub struct UploadWidget<V: View> {
    view: V,
    selection: Option<SelectedFile>,
    mode: UiMode,
}

impl<V: View> UploadWidget<V> {
    /// Binds to a page already in its authored empty state.
    pub fn new(view: V) -> Self {
        Self {
            view,
            selection: None,
            mode: UiMode::Empty,
        }
    }

    pub fn mode(&self) -> UiMode {
        self.mode
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selection.as_ref()
    }

    pub fn is_analyze_enabled(&self) -> bool {
        self.selection.is_some() && self.mode != UiMode::Loading
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn on_drag_over(&mut self) {
        self.view.toggle_class(Target::DropZone, DRAGOVER_CLASS, true);
    }

    pub fn on_drag_leave(&mut self) {
        self.view.toggle_class(Target::DropZone, DRAGOVER_CLASS, false);
    }

    pub fn on_drop(&mut self, files: Vec<FileCandidate>) -> bool {
        self.view.toggle_class(Target::DropZone, DRAGOVER_CLASS, false);
        match files.into_iter().next() {
            Some(file) => self.accept_file(file),
            None => false,
        }
    }

    /// Clicking anywhere in the drop zone opens the picker, except on the
    /// remove button.
    pub fn on_drop_zone_click(&mut self, target: Target) {
        if target != Target::RemoveButton {
            self.view.open_picker();
        }
    }

    pub fn on_file_input_change(&mut self, files: Vec<FileCandidate>) -> bool {
        match files.into_iter().next() {
            Some(file) => self.accept_file(file),
            None => false,
        }
    }

    pub fn on_remove_click(&mut self) -> Propagation {
        self.reset();
        Propagation::Stop
    }

    /// Takes `file` as the selection if it declares an image type.
    pub fn accept_file(&mut self, file: FileCandidate) -> bool {
        if self.mode == UiMode::Loading {
            tracing::debug!(file = %file.name, "ignoring file while analysis is in flight");
            return false;
        }
        if !file.is_image() {
            tracing::info!(file = %file.name, mime = %file.mime, "rejected non-image file");
            self.view.alert(INVALID_FILE_MESSAGE);
            return false;
        }

        let preview = preview_service::data_uri(&file.mime, &file.bytes);
        tracing::info!(file = %file.name, size = file.bytes.len(), "image selected");
        self.selection = Some(file.into());

        self.view.set_src(Target::ImagePreview, preview);
        self.view.set_hidden(Target::UploadContent, true);
        self.view.set_hidden(Target::PreviewContainer, false);
        self.view.set_disabled(Target::AnalyzeButton, false);
        self.view.set_hidden(Target::Results, true);
        self.mode = UiMode::Previewing {
            results_shown: false,
        };
        true
    }

    /// Returns to the empty state. Refused while a request is in flight.
    pub fn reset(&mut self) -> bool {
        if self.mode == UiMode::Loading {
            tracing::debug!("ignoring remove while analysis is in flight");
            return false;
        }

        self.selection = None;
        self.view.clear_value(Target::FileInput);
        self.view.set_src(Target::ImagePreview, "");
        self.view.set_hidden(Target::UploadContent, false);
        self.view.set_hidden(Target::PreviewContainer, true);
        self.view.set_disabled(Target::AnalyzeButton, true);
        self.view.set_hidden(Target::Results, true);
        self.mode = UiMode::Empty;
        true
    }

    /// Enters `Loading` and hands back the file to submit, or `None` when
    /// there is nothing to analyze or a request is already running.
    pub fn begin_analyze(&mut self) -> Option<SelectedFile> {
        if self.mode == UiMode::Loading {
            tracing::debug!("analysis already in flight");
            return None;
        }
        let file = self.selection.clone()?;

        self.view.set_hidden(Target::Loading, false);
        self.view.set_disabled(Target::AnalyzeButton, true);
        self.view.set_hidden(Target::Results, true);
        self.mode = UiMode::Loading;
        Some(file)
    }

    /// Renders the outcome, then always clears the loading state.
    pub fn finish_analyze(&mut self, outcome: Result<AnalysisResult, AnalyzeError>) {
        if self.mode != UiMode::Loading {
            tracing::warn!("analysis outcome arrived outside of loading state");
            return;
        }

        let results_shown = match outcome {
            Ok(result) => {
                tracing::info!(
                    ai_generated = ?result.ai_detection.as_ref().map(|ai| ai.is_ai_generated),
                    confidence = ?result.ai_detection.as_ref().map(|ai| ai.confidence_score),
                    risk = ?result.misuse_check.as_ref().map(|m| m.risk_level.as_str()),
                    "analysis complete"
                );
                self.render_results(&result);
                true
            }
            Err(AnalyzeError::Server(message)) => {
                tracing::warn!(%message, "server rejected analysis");
                self.view.alert(format!("{}{}", SERVER_ERROR_PREFIX, message));
                false
            }
            Err(AnalyzeError::Transport(message)) => {
                tracing::error!(%message, "analysis request failed");
                self.view.alert(TRANSPORT_ERROR_MESSAGE);
                false
            }
        };

        self.view.set_hidden(Target::Loading, true);
        self.view.set_disabled(Target::AnalyzeButton, false);
        self.mode = UiMode::Previewing { results_shown };
    }

    /// Runs one full analyze round trip. Returns `false` when nothing was sent.
    pub async fn analyze<C>(&mut self, client: &C) -> bool
    where
        C: AnalyzeClient + ?Sized,
    {
        let Some(file) = self.begin_analyze() else {
            return false;
        };
        let outcome = client.analyze(&file).await;
        self.finish_analyze(outcome);
        true
    }

    pub fn render_results(&mut self, result: &AnalysisResult) {
        for patch in render::result_patches(result) {
            self.view.apply(patch);
        }
    }
}
