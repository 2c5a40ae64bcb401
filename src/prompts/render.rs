//! Deterministic prompt rendering.
//!
//! The instruction prefix is built from one fragment per set dimension, in
//! the fixed order style, reasoning, format, brevity. The `\n\nInput: ` and
//! `\nOutput:` framing is what the model expects and must not change.

use crate::models::{Brevity, Format, PromptConfig, Reasoning, Style};

pub fn style_fragment(style: Style) -> Option<&'static str> {
    match style {
        Style::Unset => None,
        Style::Concise => Some("Please summarize the following text."),
        Style::Role => Some("You are a summarization expert. Please summarize."),
        Style::Stepwise => Some("Summarize step by step:"),
        Style::FewShot => {
            Some("Example:\nText: ... Summary: ...\nNow you: summarize the following text.")
        }
        Style::ChainOfThought => Some("Think step by step, then summarize:"),
    }
}

pub fn reasoning_fragment(reasoning: Reasoning) -> Option<&'static str> {
    match reasoning {
        Reasoning::Unset => None,
        Reasoning::Brief => Some("Provide a brief rationale."),
        Reasoning::Bounded => Some("Explain concisely why you chose this summary."),
        Reasoning::Detailed => Some("Provide a detailed explanation of your reasoning."),
    }
}

pub fn format_fragment(format: Format) -> Option<&'static str> {
    match format {
        Format::Unset => None,
        Format::Bullets => Some("Use bullet points."),
        Format::Json => Some("Output in valid JSON format."),
        Format::Table => Some("Present results in a table."),
    }
}

pub fn brevity_fragment(brevity: Brevity) -> Option<&'static str> {
    match brevity {
        Brevity::Unset => None,
        Brevity::OneSentence => Some("Limit your summary to exactly one sentence."),
        Brevity::ThreeSentences => Some("Limit your summary to up to three sentences."),
        Brevity::Words50 => Some("Limit your summary to 50 words or fewer."),
        Brevity::Tokens50 => Some("Limit your summary to 50 tokens or fewer."),
    }
}

/// Render the full prompt for `doc` under `cfg`.
pub fn render_prompt(doc: &str, cfg: &PromptConfig) -> String {
    let fragments: Vec<&str> = [
        style_fragment(cfg.style),
        reasoning_fragment(cfg.reasoning),
        format_fragment(cfg.format),
        brevity_fragment(cfg.brevity),
    ]
    .into_iter()
    .flatten()
    .collect();

    format!("{}\n\nInput: {}\nOutput:", fragments.join(" "), doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Dimension;

    #[test]
    fn test_concise_one_sentence() {
        let cfg = PromptConfig::new(Style::Concise, Reasoning::Unset, Format::Unset, Brevity::OneSentence);
        assert_eq!(
            render_prompt("The cat sat.", &cfg),
            "Please summarize the following text. Limit your summary to exactly one sentence.\n\nInput: The cat sat.\nOutput:"
        );
    }

    #[test]
    fn test_empty_config_has_empty_prefix() {
        assert_eq!(
            render_prompt("doc", &PromptConfig::default()),
            "\n\nInput: doc\nOutput:"
        );
    }

    #[test]
    fn test_fragments_follow_dimension_order() {
        let cfg = PromptConfig::new(Style::Stepwise, Reasoning::Brief, Format::Table, Brevity::Words50);
        let prompt = render_prompt("x", &cfg);
        assert_eq!(
            prompt,
            "Summarize step by step: Provide a brief rationale. Present results in a table. \
             Limit your summary to 50 words or fewer.\n\nInput: x\nOutput:"
        );
    }

    #[test]
    fn test_few_shot_keeps_embedded_newlines() {
        let cfg = PromptConfig {
            style: Style::FewShot,
            format: Format::Json,
            ..Default::default()
        };
        assert!(render_prompt("d", &cfg).starts_with(
            "Example:\nText: ... Summary: ...\nNow you: summarize the following text. Output in valid JSON format.\n\n"
        ));
    }

    #[test]
    fn test_every_set_value_has_a_fragment() {
        for v in Style::VALUES {
            assert_eq!(style_fragment(*v).is_none(), v.is_unset());
        }
        for v in Reasoning::VALUES {
            assert_eq!(reasoning_fragment(*v).is_none(), v.is_unset());
        }
        for v in Format::VALUES {
            assert_eq!(format_fragment(*v).is_none(), v.is_unset());
        }
        for v in Brevity::VALUES {
            assert_eq!(brevity_fragment(*v).is_none(), v.is_unset());
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let cfg = PromptConfig::new(Style::Role, Reasoning::Detailed, Format::Bullets, Brevity::Tokens50);
        assert_eq!(render_prompt("same", &cfg), render_prompt("same", &cfg));
    }
}
