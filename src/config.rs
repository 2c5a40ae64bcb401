use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::backend::PowerUnit;
use crate::error::{EapoError, Result};
use crate::search::PromptSpace;

/// Default generation length, matching the model wrapper's default.
pub const DEFAULT_MAX_NEW_TOKENS: usize = 50;

/// Which part of the model's returned sequence counts as "generated".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenAccounting {
    /// Count and decode the whole returned sequence, prompt prefix included.
    #[default]
    FullSequence,
    /// Count and decode only the ids appended after the input.
    NewTokens,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: usize,

    /// Upper bound on a single `generate` call. `None` waits forever.
    #[serde(default)]
    pub timeout_secs: Option<f64>,

    #[serde(default)]
    pub token_accounting: TokenAccounting,
}

fn default_max_new_tokens() -> usize {
    DEFAULT_MAX_NEW_TOKENS
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
            timeout_secs: None,
            token_accounting: TokenAccounting::default(),
        }
    }
}

impl GenerationConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs_f64)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// File holding the instantaneous power draw. Absent means no telemetry.
    #[serde(default)]
    pub power_path: Option<PathBuf>,

    #[serde(default)]
    pub unit: PowerUnit,
}

/// Run configuration, loaded once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub model_path: PathBuf,
    pub tokenizer_path: PathBuf,
    pub dataset_path: PathBuf,
    pub results_dir: PathBuf,
    pub num_trials: usize,
    pub prompt_space: PromptSpace,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl Config {
    /// Load and validate a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| EapoError::config(path, format!("unable to open config file: {}", e)))?;
        Self::from_json(&content, path)
    }

    /// Parse configuration text; `origin` names the source in error messages.
    pub fn from_json(content: &str, origin: &Path) -> Result<Self> {
        let raw: Value = serde_json::from_str(content)
            .map_err(|e| EapoError::config(origin, format!("malformed JSON: {}", e)))?;

        if let Some(field) = missing_field(&raw) {
            return Err(EapoError::config(origin, format!("missing field '{}'", field)));
        }

        let config: Config = serde_json::from_value(raw)
            .map_err(|e| EapoError::config(origin, e.to_string()))?;
        config.validate(origin)?;
        Ok(config)
    }

    fn validate(&self, origin: &Path) -> Result<()> {
        self.prompt_space
            .validate()
            .map_err(|message| EapoError::config(origin, format!("prompt_space: {}", message)))?;

        if self.generation.max_new_tokens == 0 {
            return Err(EapoError::config(
                origin,
                "generation.max_new_tokens must be at least 1",
            ));
        }

        if let Some(secs) = self.generation.timeout_secs {
            if !(secs.is_finite() && secs > 0.0) {
                return Err(EapoError::config(
                    origin,
                    format!("generation.timeout_secs must be a positive number, got {}", secs),
                ));
            }
        }

        Ok(())
    }

    pub fn per_example_csv_path(&self) -> PathBuf {
        self.results_dir.join("eval_per_example.csv")
    }

    pub fn summary_json_path(&self) -> PathBuf {
        self.results_dir.join("summary.json")
    }

    pub fn trials_csv_path(&self) -> PathBuf {
        self.results_dir.join("trials.csv")
    }

    pub fn pareto_json_path(&self) -> PathBuf {
        self.results_dir.join("pareto.json")
    }
}

const REQUIRED_FIELDS: [&str; 6] = [
    "model_path",
    "tokenizer_path",
    "dataset_path",
    "results_dir",
    "num_trials",
    "prompt_space",
];

fn missing_field(raw: &Value) -> Option<&'static str> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .find(|field| raw.get(field).is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Brevity, Style};

    const SAMPLE: &str = r#"{
        "model_path": "models/lead.json",
        "tokenizer_path": "models/vocab.txt",
        "dataset_path": "data/dev.jsonl",
        "results_dir": "results",
        "num_trials": 12,
        "prompt_space": {
            "style": ["concise", "role"],
            "reasoning": [""],
            "format": ["", "bullets"],
            "brevity": ["1sent", "word50", "token50"]
        }
    }"#;

    fn parse(text: &str) -> Result<Config> {
        Config::from_json(text, Path::new("config.json"))
    }

    #[test]
    fn test_load_sample() {
        let config = parse(SAMPLE).unwrap();
        assert_eq!(config.num_trials, 12);
        assert_eq!(config.prompt_space.style, vec![Style::Concise, Style::Role]);
        assert_eq!(config.prompt_space.brevity[2], Brevity::Tokens50);
        assert_eq!(config.generation.max_new_tokens, DEFAULT_MAX_NEW_TOKENS);
        assert_eq!(config.generation.token_accounting, TokenAccounting::FullSequence);
        assert!(config.telemetry.power_path.is_none());
        assert_eq!(config.trials_csv_path(), Path::new("results/trials.csv"));
    }

    #[test]
    fn test_optional_sections() {
        let text = SAMPLE.replacen(
            "\"num_trials\": 12,",
            r#""num_trials": 12,
               "generation": {"max_new_tokens": 20, "timeout_secs": 2.5, "token_accounting": "new_tokens"},
               "telemetry": {"power_path": "/sys/class/power_supply/BAT0/power_now", "unit": "microwatts"},"#,
            1,
        );
        let config = parse(&text).unwrap();
        assert_eq!(config.generation.max_new_tokens, 20);
        assert_eq!(config.generation.timeout(), Some(Duration::from_millis(2500)));
        assert_eq!(config.generation.token_accounting, TokenAccounting::NewTokens);
        assert_eq!(config.telemetry.unit, PowerUnit::Microwatts);
    }

    #[test]
    fn test_missing_field_is_named() {
        let text = SAMPLE.replace("\"results_dir\": \"results\",", "");
        let err = parse(&text).unwrap_err();
        assert!(err.to_string().contains("missing field 'results_dir'"), "{}", err);
    }

    #[test]
    fn test_negative_trials_rejected() {
        let text = SAMPLE.replace("\"num_trials\": 12", "\"num_trials\": -1");
        assert!(matches!(parse(&text), Err(EapoError::Config { .. })));
    }

    #[test]
    fn test_unknown_dimension_value_rejected() {
        let text = SAMPLE.replace("\"bullets\"", "\"bulets\"");
        let err = parse(&text).unwrap_err();
        assert!(err.to_string().contains("did you mean 'bullets'"), "{}", err);
    }

    #[test]
    fn test_empty_candidate_list_rejected() {
        let text = SAMPLE.replace("\"reasoning\": [\"\"]", "\"reasoning\": []");
        let err = parse(&text).unwrap_err();
        assert!(err.to_string().contains("reasoning"), "{}", err);
    }

    #[test]
    fn test_missing_dimension_rejected() {
        let text = SAMPLE.replace("\"reasoning\": [\"\"],", "");
        assert!(matches!(parse(&text), Err(EapoError::Config { .. })));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse("{ not json"), Err(EapoError::Config { .. })));
    }

    #[test]
    fn test_unreadable_file() {
        let err = Config::load("/nonexistent/config.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/config.json"));
    }
}
