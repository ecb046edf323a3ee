//! The markup contract and the seam the controller drives it through.
//!
//! Every element the widget touches is named by a [`Target`], which
//! serializes to the CSS selector the page uses. Updates are expressed as
//! [`ViewPatch`] values so the same controller can drive a webview (via
//! [`PatchBuffer`]) or an in-memory page (via [`DomState`]).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

pub const HIDDEN_CLASS: &str = "hidden";
pub const DRAGOVER_CLASS: &str = "dragover";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    #[serde(rename = "#drop-zone")]
    DropZone,
    #[serde(rename = "#file-input")]
    FileInput,
    #[serde(rename = "#image-preview")]
    ImagePreview,
    #[serde(rename = "#preview-container")]
    PreviewContainer,
    #[serde(rename = ".upload-content")]
    UploadContent,
    #[serde(rename = "#analyze-btn")]
    AnalyzeButton,
    #[serde(rename = "#remove-btn")]
    RemoveButton,
    #[serde(rename = "#results")]
    Results,
    #[serde(rename = "#loading")]
    Loading,
    #[serde(rename = "#gemini-verdict")]
    AiVerdict,
    #[serde(rename = "#gemini-score")]
    AiScore,
    #[serde(rename = "#gemini-confidence")]
    AiConfidenceBar,
    #[serde(rename = "#gemini-reasoning")]
    AiReasoning,
    #[serde(rename = "#checker-verdict")]
    MisuseVerdict,
    #[serde(rename = "#checker-risk")]
    MisuseRisk,
    #[serde(rename = "#checker-details")]
    MisuseDetails,
}

impl Target {
    pub const ALL: [Target; 16] = [
        Target::DropZone,
        Target::FileInput,
        Target::ImagePreview,
        Target::PreviewContainer,
        Target::UploadContent,
        Target::AnalyzeButton,
        Target::RemoveButton,
        Target::Results,
        Target::Loading,
        Target::AiVerdict,
        Target::AiScore,
        Target::AiConfidenceBar,
        Target::AiReasoning,
        Target::MisuseVerdict,
        Target::MisuseRisk,
        Target::MisuseDetails,
    ];

    pub fn selector(&self) -> &'static str {
        match self {
            Target::DropZone => "#drop-zone",
            Target::FileInput => "#file-input",
            Target::ImagePreview => "#image-preview",
            Target::PreviewContainer => "#preview-container",
            Target::UploadContent => ".upload-content",
            Target::AnalyzeButton => "#analyze-btn",
            Target::RemoveButton => "#remove-btn",
            Target::Results => "#results",
            Target::Loading => "#loading",
            Target::AiVerdict => "#gemini-verdict",
            Target::AiScore => "#gemini-score",
            Target::AiConfidenceBar => "#gemini-confidence",
            Target::AiReasoning => "#gemini-reasoning",
            Target::MisuseVerdict => "#checker-verdict",
            Target::MisuseRisk => "#checker-risk",
            Target::MisuseDetails => "#checker-details",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleProperty {
    Width,
    Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ViewPatch {
    /// Adds or removes the `hidden` class.
    SetHidden { target: Target, hidden: bool },
    SetDisabled { target: Target, disabled: bool },
    ToggleClass { target: Target, class: String, on: bool },
    /// Replaces the whole class list.
    SetClassName { target: Target, class_name: String },
    SetText { target: Target, text: String },
    SetStyle { target: Target, property: StyleProperty, value: String },
    SetSrc { target: Target, src: String },
    ClearValue { target: Target },
    OpenPicker,
    Alert { message: String },
}

/// Anything that can receive view updates from the widget.
pub trait View {
    fn apply(&mut self, patch: ViewPatch);

    fn set_hidden(&mut self, target: Target, hidden: bool) {
        self.apply(ViewPatch::SetHidden { target, hidden });
    }

    fn set_disabled(&mut self, target: Target, disabled: bool) {
        self.apply(ViewPatch::SetDisabled { target, disabled });
    }

    fn toggle_class(&mut self, target: Target, class: &str, on: bool) {
        self.apply(ViewPatch::ToggleClass {
            target,
            class: class.to_string(),
            on,
        });
    }

    fn set_text(&mut self, target: Target, text: impl Into<String>)
    where
        Self: Sized,
    {
        self.apply(ViewPatch::SetText {
            target,
            text: text.into(),
        });
    }

    fn set_src(&mut self, target: Target, src: impl Into<String>)
    where
        Self: Sized,
    {
        self.apply(ViewPatch::SetSrc {
            target,
            src: src.into(),
        });
    }

    fn clear_value(&mut self, target: Target) {
        self.apply(ViewPatch::ClearValue { target });
    }

    fn open_picker(&mut self) {
        self.apply(ViewPatch::OpenPicker);
    }

    fn alert(&mut self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.apply(ViewPatch::Alert {
            message: message.into(),
        });
    }
}

/// Collects patches until the host drains and forwards them.
#[derive(Debug, Default)]
pub struct PatchBuffer {
    patches: Vec<ViewPatch>,
}

impl PatchBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patches(&self) -> &[ViewPatch] {
        &self.patches
    }

    pub fn drain(&mut self) -> Vec<ViewPatch> {
        std::mem::take(&mut self.patches)
    }
}

impl View for PatchBuffer {
    fn apply(&mut self, patch: ViewPatch) {
        self.patches.push(patch);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementState {
    pub classes: BTreeSet<String>,
    pub disabled: bool,
    pub text: String,
    pub src: String,
    pub value: String,
    pub style: HashMap<StyleProperty, String>,
}

impl ElementState {
    pub fn is_hidden(&self) -> bool {
        self.classes.contains(HIDDEN_CLASS)
    }

    pub fn class_name(&self) -> String {
        self.classes.iter().cloned().collect::<Vec<_>>().join(" ")
    }

    pub fn style(&self, property: StyleProperty) -> Option<&str> {
        self.style.get(&property).map(String::as_str)
    }
}

/// An in-memory copy of the page, starting from the markup's authored state.
#[derive(Debug, Clone)]
pub struct DomState {
    elements: HashMap<Target, ElementState>,
    alerts: Vec<String>,
    picker_opened: usize,
}

impl DomState {
    pub fn new() -> Self {
        let mut elements: HashMap<Target, ElementState> = Target::ALL
            .iter()
            .map(|t| (*t, ElementState::default()))
            .collect();

        for target in [Target::PreviewContainer, Target::Results, Target::Loading] {
            if let Some(el) = elements.get_mut(&target) {
                el.classes.insert(HIDDEN_CLASS.to_string());
            }
        }
        if let Some(el) = elements.get_mut(&Target::AnalyzeButton) {
            el.disabled = true;
        }

        Self {
            elements,
            alerts: Vec::new(),
            picker_opened: 0,
        }
    }

    pub fn element(&self, target: Target) -> &ElementState {
        // Every target is inserted in `new`.
        &self.elements[&target]
    }

    pub fn is_hidden(&self, target: Target) -> bool {
        self.element(target).is_hidden()
    }

    pub fn is_disabled(&self, target: Target) -> bool {
        self.element(target).disabled
    }

    pub fn text(&self, target: Target) -> &str {
        &self.element(target).text
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn picker_opened(&self) -> usize {
        self.picker_opened
    }

    fn element_mut(&mut self, target: Target) -> &mut ElementState {
        self.elements.entry(target).or_default()
    }
}

impl Default for DomState {
    fn default() -> Self {
        Self::new()
    }
}

impl View for DomState {
    fn apply(&mut self, patch: ViewPatch) {
        match patch {
            ViewPatch::SetHidden { target, hidden } => {
                let el = self.element_mut(target);
                if hidden {
                    el.classes.insert(HIDDEN_CLASS.to_string());
                } else {
                    el.classes.remove(HIDDEN_CLASS);
                }
            }
            ViewPatch::SetDisabled { target, disabled } => {
                self.element_mut(target).disabled = disabled;
            }
            ViewPatch::ToggleClass { target, class, on } => {
                let el = self.element_mut(target);
                if on {
                    el.classes.insert(class);
                } else {
                    el.classes.remove(&class);
                }
            }
            ViewPatch::SetClassName { target, class_name } => {
                self.element_mut(target).classes =
                    class_name.split_whitespace().map(str::to_string).collect();
            }
            ViewPatch::SetText { target, text } => {
                self.element_mut(target).text = text;
            }
            ViewPatch::SetStyle {
                target,
                property,
                value,
            } => {
                self.element_mut(target).style.insert(property, value);
            }
            ViewPatch::SetSrc { target, src } => {
                self.element_mut(target).src = src;
            }
            ViewPatch::ClearValue { target } => {
                self.element_mut(target).value.clear();
            }
            ViewPatch::OpenPicker => self.picker_opened += 1,
            ViewPatch::Alert { message } => self.alerts.push(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_starts_with_preview_hidden_and_analyze_disabled() {
        let dom = DomState::new();
        assert!(dom.is_hidden(Target::PreviewContainer));
        assert!(dom.is_hidden(Target::Results));
        assert!(dom.is_hidden(Target::Loading));
        assert!(!dom.is_hidden(Target::UploadContent));
        assert!(dom.is_disabled(Target::AnalyzeButton));
    }

    #[test]
    fn class_name_replaces_existing_classes() {
        let mut dom = DomState::new();
        dom.toggle_class(Target::AiVerdict, "stale", true);
        dom.apply(ViewPatch::SetClassName {
            target: Target::AiVerdict,
            class_name: "value badge positive".into(),
        });
        let el = dom.element(Target::AiVerdict);
        assert!(!el.classes.contains("stale"));
        assert_eq!(el.class_name(), "badge positive value");
    }

    #[test]
    fn patches_serialize_with_selectors() {
        let patch = ViewPatch::SetHidden {
            target: Target::UploadContent,
            hidden: true,
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"op": "set_hidden", "target": ".upload-content", "hidden": true})
        );
    }

    #[test]
    fn selectors_match_serialized_names() {
        for target in Target::ALL {
            let json = serde_json::to_value(target).unwrap();
            assert_eq!(json.as_str(), Some(target.selector()));
        }
    }

    #[test]
    fn buffer_drain_empties() {
        let mut buffer = PatchBuffer::new();
        buffer.open_picker();
        assert_eq!(buffer.drain(), vec![ViewPatch::OpenPicker]);
        assert!(buffer.patches().is_empty());
    }
}
