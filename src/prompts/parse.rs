use serde_json::Value;
use tracing::warn;

use crate::error::{EapoError, Result};
use crate::models::{Dimension, PromptConfig, DIMENSION_NAMES};

fn assign<D: Dimension>(slot: &mut D, value: &str) -> Result<()> {
    *slot = D::parse(value)?;
    Ok(())
}

/// Parse a prompt configuration JSON object, e.g.
/// `{"style": "concise", "brevity": "1sent"}`.
///
/// Absent dimensions stay unset. Non-string values are ignored, as are keys
/// that are not dimension names (with a warning). Unknown string values for
/// a known dimension are rejected.
pub fn parse_prompt_config(json: &str) -> Result<PromptConfig> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| EapoError::InvalidPrompt(format!("malformed JSON: {}", e)))?;

    let Value::Object(map) = value else {
        return Err(EapoError::InvalidPrompt(
            "expected a JSON object of dimension values".to_string(),
        ));
    };

    let mut cfg = PromptConfig::default();
    for (key, value) in &map {
        let Some(text) = value.as_str() else {
            continue;
        };
        match key.as_str() {
            "style" => assign(&mut cfg.style, text)?,
            "reasoning" => assign(&mut cfg.reasoning, text)?,
            "format" => assign(&mut cfg.format, text)?,
            "brevity" => assign(&mut cfg.brevity, text)?,
            other => warn!(
                key = other,
                expected = ?DIMENSION_NAMES,
                "ignoring unknown prompt dimension"
            ),
        }
    }

    Ok(cfg)
}
