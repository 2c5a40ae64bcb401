use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strsim::jaro_winkler;

use crate::error::{EapoError, Result};

/// Dimension names in rendering and enumeration order.
pub const DIMENSION_NAMES: [&str; 4] = ["style", "reasoning", "format", "brevity"];

/// Minimum similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// A closed set of values for one prompt dimension.
///
/// Every dimension has an `Unset` variant whose wire form is the empty string.
pub trait Dimension: Copy + Eq + fmt::Debug + 'static {
    /// Key used in configuration files and CSV headers.
    const NAME: &'static str;

    /// All variants, `Unset` first.
    const VALUES: &'static [Self];

    /// Wire string for this value.
    fn as_str(self) -> &'static str;

    fn is_unset(self) -> bool {
        self.as_str().is_empty()
    }

    /// Parse a wire string, rejecting unknown values.
    fn parse(value: &str) -> Result<Self> {
        if let Some(found) = Self::VALUES.iter().find(|v| v.as_str() == value) {
            return Ok(*found);
        }

        let suggestion = Self::VALUES
            .iter()
            .filter(|v| !v.is_unset())
            .map(|v| (v.as_str(), jaro_winkler(v.as_str(), &value.to_lowercase())))
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let known: Vec<&str> = Self::VALUES
            .iter()
            .filter(|v| !v.is_unset())
            .map(|v| v.as_str())
            .collect();

        let message = match suggestion {
            Some((name, _)) => format!(
                "unknown {} value '{}' (did you mean '{}'?)",
                Self::NAME,
                value,
                name
            ),
            None => format!(
                "unknown {} value '{}' (expected one of: {})",
                Self::NAME,
                value,
                known.join(", ")
            ),
        };
        Err(EapoError::InvalidPrompt(message))
    }
}

macro_rules! dimension {
    (
        $(#[$meta:meta])*
        $name:ident = $key:literal {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub enum $name {
            #[default]
            Unset,
            $($variant),+
        }

        impl Dimension for $name {
            const NAME: &'static str = $key;
            const VALUES: &'static [Self] = &[$name::Unset, $($name::$variant),+];

            fn as_str(self) -> &'static str {
                match self {
                    $name::Unset => "",
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = EapoError;

            fn from_str(s: &str) -> Result<Self> {
                <$name as Dimension>::parse(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                <$name as Dimension>::parse(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

dimension! {
    /// Overall instruction style.
    Style = "style" {
        Concise => "concise",
        Role => "role",
        Stepwise => "stepwise",
        FewShot => "few-shot",
        ChainOfThought => "chain-of-thought",
    }
}

dimension! {
    /// How much rationale the model is asked to give.
    Reasoning = "reasoning" {
        Brief => "brief",
        Bounded => "bounded",
        Detailed => "detailed",
    }
}

dimension! {
    /// Output layout directive.
    Format = "format" {
        Bullets => "bullets",
        Json => "json",
        Table => "table",
    }
}

dimension! {
    /// Length constraint on the summary.
    Brevity = "brevity" {
        OneSentence => "1sent",
        ThreeSentences => "3sent",
        Words50 => "word50",
        Tokens50 => "token50",
    }
}

/// One concrete choice per rendering dimension.
///
/// Two configurations are equal iff all four dimension values match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PromptConfig {
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub reasoning: Reasoning,
    #[serde(default)]
    pub format: Format,
    #[serde(default)]
    pub brevity: Brevity,
}

impl PromptConfig {
    pub fn new(style: Style, reasoning: Reasoning, format: Format, brevity: Brevity) -> Self {
        Self {
            style,
            reasoning,
            format,
            brevity,
        }
    }

    /// Wire values in dimension order.
    pub fn values(&self) -> [&'static str; 4] {
        [
            self.style.as_str(),
            self.reasoning.as_str(),
            self.format.as_str(),
            self.brevity.as_str(),
        ]
    }

    /// Compact `style/reasoning/format/brevity` label, `-` for unset.
    pub fn display(&self) -> String {
        self.values()
            .iter()
            .map(|v| if v.is_empty() { "-" } else { v })
            .collect::<Vec<_>>()
            .join("/")
    }
}
