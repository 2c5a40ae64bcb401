use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::backend::{Generator, TokenId, Tokenizer};
use crate::error::{EapoError, Result};

/// Descriptor for the built-in extractive baseline, stored at `model_path`.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelCard {
    /// Token that precedes the source document in a rendered prompt.
    #[serde(default = "default_cue")]
    pub cue: String,

    /// Token that ends the document and asks for the answer.
    #[serde(default = "default_stop")]
    pub stop: String,
}

fn default_cue() -> String {
    "Input:".to_string()
}

fn default_stop() -> String {
    "Output:".to_string()
}

impl Default for ModelCard {
    fn default() -> Self {
        Self {
            cue: default_cue(),
            stop: default_stop(),
        }
    }
}

impl ModelCard {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| EapoError::config(path, format!("cannot read model card: {}", e)))?;
        serde_json::from_str(&content)
            .map_err(|e| EapoError::config(path, format!("malformed model card: {}", e)))
    }
}

/// "Lead-N" summarizer: continues the prompt with the first tokens of the
/// document, i.e. the ids after the last cue token up to the stop token.
///
/// Without a cue in the input the copy starts at the beginning.
#[derive(Debug, Clone)]
pub struct LeadModel {
    cue: TokenId,
    stop: TokenId,
}

impl LeadModel {
    pub fn new(cue: TokenId, stop: TokenId) -> Self {
        Self { cue, stop }
    }

    /// Resolve the card's cue and stop words to single token ids.
    pub fn from_card(card: &ModelCard, tokenizer: &dyn Tokenizer) -> Result<Self> {
        let single = |word: &str, field: &str| -> Result<TokenId> {
            match tokenizer.encode(word)?.as_slice() {
                [id] => Ok(*id),
                other => Err(EapoError::external(
                    "generator",
                    format!("model card {} '{}' encodes to {} tokens, expected 1", field, word, other.len()),
                )),
            }
        };
        Ok(Self::new(single(&card.cue, "cue")?, single(&card.stop, "stop")?))
    }
}

impl Generator for LeadModel {
    fn generate(&self, input: &[TokenId], max_new_tokens: usize) -> Result<Vec<TokenId>> {
        let start = input
            .iter()
            .rposition(|&id| id == self.cue)
            .map(|pos| pos + 1)
            .unwrap_or(0);

        let continuation: Vec<TokenId> = input[start..]
            .iter()
            .copied()
            .take_while(|&id| id != self.stop)
            .take(max_new_tokens)
            .collect();

        let mut output = Vec::with_capacity(input.len() + continuation.len());
        output.extend_from_slice(input);
        output.extend(continuation);
        Ok(output)
    }
}
