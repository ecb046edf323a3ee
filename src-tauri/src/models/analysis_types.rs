use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of a successful `POST /analyze`.
///
/// The server relays model output, so each panel is parsed on its own: a
/// panel that is missing or not an object is `None` and the other one still
/// renders.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct AnalysisResult {
    #[serde(default, deserialize_with = "lenient_panel")]
    pub ai_detection: Option<AiDetection>,
    #[serde(default, deserialize_with = "lenient_panel")]
    pub misuse_check: Option<MisuseCheck>,
}

impl AnalysisResult {
    pub fn is_empty(&self) -> bool {
        self.ai_detection.is_none() && self.misuse_check.is_none()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct AiDetection {
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_ai_generated: bool,
    /// 0-100, rendered verbatim as a percentage.
    #[serde(default, deserialize_with = "lenient_score")]
    pub confidence_score: f64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub reasoning: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct MisuseCheck {
    #[serde(default, deserialize_with = "lenient_bool")]
    pub misuse_detected: bool,
    #[serde(default, deserialize_with = "lenient_text")]
    pub risk_level: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub details: String,
}

/// Body of a non-2xx `POST /analyze`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ErrorBody {
    pub error: Option<String>,
}

fn lenient_panel<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

/// `true`, `"true"`, `"True"` and non-zero numbers are true.
fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        _ => false,
    })
}

/// Numbers pass through; strings such as `"85"` or `"85%"` are parsed.
fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}
