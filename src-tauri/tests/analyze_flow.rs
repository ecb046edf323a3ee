use futures::future::BoxFuture;
use futures::FutureExt;
use photo_verdict_lib::error::AnalyzeError;
use photo_verdict_lib::models::analysis_types::{AiDetection, AnalysisResult, MisuseCheck};
use photo_verdict_lib::models::selection_types::{FileCandidate, SelectedFile};
use photo_verdict_lib::services::analyze_client::{interpret_response, AnalyzeClient};
use photo_verdict_lib::widget::controller::{SERVER_ERROR_PREFIX, TRANSPORT_ERROR_MESSAGE};
use photo_verdict_lib::widget::dom::StyleProperty;
use photo_verdict_lib::widget::render::{GREEN, ORANGE, RED};
use photo_verdict_lib::widget::{DomState, PatchBuffer, Target, UiMode, UploadWidget, ViewPatch};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Returns a canned outcome and counts calls.
struct CannedClient {
    outcome: Result<AnalysisResult, AnalyzeError>,
    calls: AtomicUsize,
}

impl CannedClient {
    fn new(outcome: Result<AnalysisResult, AnalyzeError>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AnalyzeClient for CannedClient {
    fn analyze<'a>(
        &'a self,
        _file: &'a SelectedFile,
    ) -> BoxFuture<'a, Result<AnalysisResult, AnalyzeError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.outcome.clone();
        async move { outcome }.boxed()
    }
}

fn result(score: f64, ai: bool, misuse: bool, risk: &str) -> AnalysisResult {
    AnalysisResult {
        ai_detection: Some(AiDetection {
            is_ai_generated: ai,
            confidence_score: score,
            reasoning: "six fingers on the left hand".into(),
        }),
        misuse_check: Some(MisuseCheck {
            misuse_detected: misuse,
            risk_level: risk.into(),
            details: "resembles a public figure".into(),
        }),
    }
}

fn selected_widget() -> UploadWidget<DomState> {
    let mut widget = UploadWidget::new(DomState::new());
    widget.on_drop(vec![FileCandidate {
        name: "photo.jpg".into(),
        mime: "image/jpeg".into(),
        bytes: vec![0xFF, 0xD8, 0xFF],
    }]);
    widget
}

#[tokio::test]
async fn analyze_without_selection_sends_nothing() {
    let client = CannedClient::new(Ok(result(50.0, false, false, "Low")));
    let mut widget = UploadWidget::new(DomState::new());

    assert!(!widget.analyze(&client).await);
    assert_eq!(client.calls(), 0);
    assert!(widget.view().is_hidden(Target::Loading));
    assert_eq!(widget.mode(), UiMode::Empty);
}

#[tokio::test]
async fn success_renders_both_panels() {
    let client = CannedClient::new(Ok(result(73.0, true, false, "Low")));
    let mut widget = selected_widget();

    assert!(widget.analyze(&client).await);
    assert_eq!(client.calls(), 1);

    let dom = widget.view();
    assert!(!dom.is_hidden(Target::Results));
    assert_eq!(dom.text(Target::AiScore), "73%");
    assert_eq!(
        dom.element(Target::AiConfidenceBar).style(StyleProperty::Width),
        Some("73%")
    );
    assert_eq!(dom.text(Target::AiVerdict), "YES");
    assert_eq!(dom.element(Target::AiVerdict).class_name(), "badge negative value");
    assert_eq!(dom.text(Target::AiReasoning), "six fingers on the left hand");

    assert_eq!(dom.text(Target::MisuseVerdict), "CLEAR");
    assert_eq!(dom.element(Target::MisuseVerdict).class_name(), "badge positive value");
    assert_eq!(dom.text(Target::MisuseRisk), "Low");
    assert_eq!(dom.text(Target::MisuseDetails), "resembles a public figure");
    assert_eq!(
        widget.mode(),
        UiMode::Previewing {
            results_shown: true
        }
    );
}

#[tokio::test]
async fn misuse_detected_uses_negative_badge() {
    let client = CannedClient::new(Ok(result(10.0, false, true, "High")));
    let mut widget = selected_widget();
    widget.analyze(&client).await;

    let dom = widget.view();
    assert_eq!(dom.text(Target::AiVerdict), "NO");
    assert_eq!(dom.text(Target::MisuseVerdict), "DETECTED");
    assert_eq!(dom.element(Target::MisuseVerdict).class_name(), "badge negative value");
}

#[tokio::test]
async fn risk_level_drives_color() {
    for (risk, color) in [("High", RED), ("Medium", ORANGE), ("Low", GREEN), ("Unknown", GREEN)] {
        let client = CannedClient::new(Ok(result(40.0, false, false, risk)));
        let mut widget = selected_widget();
        widget.analyze(&client).await;
        assert_eq!(
            widget.view().element(Target::MisuseRisk).style(StyleProperty::Color),
            Some(color),
            "risk level {risk}"
        );
    }
}

#[tokio::test]
async fn server_error_alerts_and_keeps_preview() {
    let client = CannedClient::new(Err(AnalyzeError::Server("bad image".into())));
    let mut widget = selected_widget();
    let src_before = widget.view().element(Target::ImagePreview).src.clone();

    widget.analyze(&client).await;

    let dom = widget.view();
    assert_eq!(dom.alerts().len(), 1);
    assert!(dom.alerts()[0].contains("bad image"));
    assert!(dom.alerts()[0].starts_with(SERVER_ERROR_PREFIX));
    assert!(!dom.is_hidden(Target::PreviewContainer));
    assert_eq!(dom.element(Target::ImagePreview).src, src_before);
    assert!(dom.is_hidden(Target::Results));
    assert_eq!(widget.selected_file().unwrap().name, "photo.jpg");
}

#[tokio::test]
async fn transport_error_shows_generic_alert() {
    let client = CannedClient::new(Err(AnalyzeError::Transport("connection refused".into())));
    let mut widget = selected_widget();

    widget.analyze(&client).await;

    let dom = widget.view();
    assert_eq!(dom.alerts(), [TRANSPORT_ERROR_MESSAGE.to_string()]);
    assert!(!dom.is_hidden(Target::PreviewContainer));
    assert!(widget.selected_file().is_some());
}

#[tokio::test]
async fn loading_cleared_and_analyze_enabled_exactly_once() {
    let outcomes = [
        Ok(result(73.0, true, true, "Medium")),
        Err(AnalyzeError::Server("bad image".into())),
        Err(AnalyzeError::Transport("timed out".into())),
    ];

    for outcome in outcomes {
        let client = CannedClient::new(outcome);
        let mut widget = UploadWidget::new(PatchBuffer::new());
        widget.on_drop(vec![FileCandidate {
            name: "a.png".into(),
            mime: "image/png".into(),
            bytes: vec![7],
        }]);
        widget.view_mut().drain();

        widget.analyze(&client).await;
        let patches = widget.view().patches();

        let loading_shown = ViewPatch::SetHidden {
            target: Target::Loading,
            hidden: false,
        };
        let loading_hidden = ViewPatch::SetHidden {
            target: Target::Loading,
            hidden: true,
        };
        let enabled = ViewPatch::SetDisabled {
            target: Target::AnalyzeButton,
            disabled: false,
        };
        let disabled = ViewPatch::SetDisabled {
            target: Target::AnalyzeButton,
            disabled: true,
        };

        assert_eq!(patches.iter().filter(|p| **p == loading_shown).count(), 1);
        assert_eq!(patches.iter().filter(|p| **p == loading_hidden).count(), 1);
        assert_eq!(patches.iter().filter(|p| **p == disabled).count(), 1);
        assert_eq!(patches.iter().filter(|p| **p == enabled).count(), 1);

        // Cleanup comes last.
        let n = patches.len();
        assert_eq!(patches[n - 2], loading_hidden);
        assert_eq!(patches[n - 1], enabled);
        assert!(widget.is_analyze_enabled());
    }
}

#[tokio::test]
async fn remove_after_results_returns_to_empty() {
    let client = CannedClient::new(Ok(result(73.0, true, false, "Low")));
    let mut widget = selected_widget();
    widget.analyze(&client).await;

    widget.on_remove_click();

    let dom = widget.view();
    assert_eq!(widget.mode(), UiMode::Empty);
    assert!(dom.is_hidden(Target::Results));
    assert!(dom.is_disabled(Target::AnalyzeButton));
    assert_eq!(dom.element(Target::ImagePreview).src, "");
}

#[tokio::test]
async fn new_file_after_results_hides_them() {
    let client = CannedClient::new(Ok(result(73.0, true, false, "Low")));
    let mut widget = selected_widget();
    widget.analyze(&client).await;

    widget.on_file_input_change(vec![FileCandidate {
        name: "next.png".into(),
        mime: "image/png".into(),
        bytes: vec![9],
    }]);

    assert!(widget.view().is_hidden(Target::Results));
    assert_eq!(
        widget.mode(),
        UiMode::Previewing {
            results_shown: false
        }
    );
}

#[tokio::test]
async fn loosely_typed_body_still_renders_each_panel() {
    let body = r#"{
        "ai_detection": {"is_ai_generated": "true", "confidence_score": "85", "reasoning": "waxy skin"},
        "misuse_check": {"misuse_detected": false, "risk_level": "Medium"}
    }"#;
    let client = CannedClient::new(interpret_response(200, body));
    let mut widget = selected_widget();

    widget.analyze(&client).await;

    let dom = widget.view();
    assert!(dom.alerts().is_empty());
    assert!(!dom.is_hidden(Target::Results));
    assert_eq!(dom.text(Target::AiVerdict), "YES");
    assert_eq!(dom.text(Target::AiScore), "85%");
    assert_eq!(dom.text(Target::MisuseVerdict), "CLEAR");
    assert_eq!(
        dom.element(Target::MisuseRisk).style(StyleProperty::Color),
        Some(ORANGE)
    );
    assert_eq!(dom.text(Target::MisuseDetails), "");
}

#[tokio::test]
async fn missing_panel_blanks_stale_values() {
    let mut widget = selected_widget();
    widget
        .analyze(&CannedClient::new(Ok(result(73.0, true, true, "High"))))
        .await;

    let only_ai = r#"{"ai_detection": {"is_ai_generated": false, "confidence_score": 20, "reasoning": "film grain"}}"#;
    widget
        .analyze(&CannedClient::new(interpret_response(200, only_ai)))
        .await;

    let dom = widget.view();
    assert_eq!(dom.text(Target::AiScore), "20%");
    assert_eq!(dom.text(Target::MisuseVerdict), "");
    assert_eq!(dom.text(Target::MisuseRisk), "");
    assert_eq!(dom.text(Target::MisuseDetails), "");
    assert_eq!(
        widget.mode(),
        UiMode::Previewing {
            results_shown: true
        }
    );
}
