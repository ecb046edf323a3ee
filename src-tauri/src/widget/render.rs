use crate::models::analysis_types::{AiDetection, AnalysisResult, MisuseCheck};
use crate::widget::dom::{StyleProperty, Target, ViewPatch};

pub const POSITIVE_BADGE: &str = "value badge positive";
pub const NEGATIVE_BADGE: &str = "value badge negative";

pub const RED: &str = "var(--accent-red)";
pub const ORANGE: &str = "orange";
pub const GREEN: &str = "var(--accent-green)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    High,
    Medium,
    Other,
}

impl RiskLevel {
    /// Exact, case-sensitive match; anything unrecognised is `Other`.
    pub fn parse(level: &str) -> Self {
        match level {
            "High" => RiskLevel::High,
            "Medium" => RiskLevel::Medium,
            _ => RiskLevel::Other,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            RiskLevel::High => RED,
            RiskLevel::Medium => ORANGE,
            RiskLevel::Other => GREEN,
        }
    }
}

pub fn badge_class(negative: bool) -> &'static str {
    if negative {
        NEGATIVE_BADGE
    } else {
        POSITIVE_BADGE
    }
}

/// `73.0` renders as `73%`, `73.5` as `73.5%`.
pub fn percent(score: f64) -> String {
    format!("{}%", score)
}

pub fn ai_detection_patches(ai: &AiDetection) -> Vec<ViewPatch> {
    let score = percent(ai.confidence_score);
    vec![
        ViewPatch::SetText {
            target: Target::AiVerdict,
            text: if ai.is_ai_generated { "YES" } else { "NO" }.to_string(),
        },
        ViewPatch::SetClassName {
            target: Target::AiVerdict,
            class_name: badge_class(ai.is_ai_generated).to_string(),
        },
        ViewPatch::SetText {
            target: Target::AiScore,
            text: score.clone(),
        },
        ViewPatch::SetStyle {
            target: Target::AiConfidenceBar,
            property: StyleProperty::Width,
            value: score,
        },
        ViewPatch::SetText {
            target: Target::AiReasoning,
            text: ai.reasoning.clone(),
        },
    ]
}

pub fn misuse_check_patches(check: &MisuseCheck) -> Vec<ViewPatch> {
    vec![
        ViewPatch::SetText {
            target: Target::MisuseVerdict,
            text: if check.misuse_detected { "DETECTED" } else { "CLEAR" }.to_string(),
        },
        ViewPatch::SetClassName {
            target: Target::MisuseVerdict,
            class_name: badge_class(check.misuse_detected).to_string(),
        },
        ViewPatch::SetText {
            target: Target::MisuseRisk,
            text: check.risk_level.clone(),
        },
        ViewPatch::SetStyle {
            target: Target::MisuseRisk,
            property: StyleProperty::Color,
            value: RiskLevel::parse(&check.risk_level).color().to_string(),
        },
        ViewPatch::SetText {
            target: Target::MisuseDetails,
            text: check.details.clone(),
        },
    ]
}

/// Blanks a panel the server did not return, so no stale values linger.
fn cleared_panel_patches(verdict: Target, texts: &[Target]) -> Vec<ViewPatch> {
    let mut patches = vec![ViewPatch::SetClassName {
        target: verdict,
        class_name: "value badge".to_string(),
    }];
    patches.extend(texts.iter().map(|t| ViewPatch::SetText {
        target: *t,
        text: String::new(),
    }));
    patches
}

/// Reveals the results section and fills each panel independently.
pub fn result_patches(result: &AnalysisResult) -> Vec<ViewPatch> {
    let mut patches = vec![ViewPatch::SetHidden {
        target: Target::Results,
        hidden: false,
    }];

    match &result.ai_detection {
        Some(ai) => patches.extend(ai_detection_patches(ai)),
        None => {
            patches.extend(cleared_panel_patches(
                Target::AiVerdict,
                &[Target::AiVerdict, Target::AiScore, Target::AiReasoning],
            ));
            patches.push(ViewPatch::SetStyle {
                target: Target::AiConfidenceBar,
                property: StyleProperty::Width,
                value: percent(0.0),
            });
        }
    }

    match &result.misuse_check {
        Some(check) => patches.extend(misuse_check_patches(check)),
        None => patches.extend(cleared_panel_patches(
            Target::MisuseVerdict,
            &[Target::MisuseVerdict, Target::MisuseRisk, Target::MisuseDetails],
        )),
    }
    patches
}
