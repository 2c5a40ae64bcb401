use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::RwLock;

use crate::backend::{TokenId, Tokenizer};
use crate::error::{EapoError, Result};

const COMPONENT: &str = "tokenizer";

#[derive(Debug, Default)]
struct Vocab {
    tokens: Vec<String>,
    ids: HashMap<String, TokenId>,
}

impl Vocab {
    fn insert(&mut self, token: &str) -> Result<TokenId> {
        if let Some(&id) = self.ids.get(token) {
            return Ok(id);
        }
        let id = TokenId::try_from(self.tokens.len())
            .map_err(|_| EapoError::external(COMPONENT, "vocabulary exhausted the id space"))?;
        self.tokens.push(token.to_string());
        self.ids.insert(token.to_string(), id);
        Ok(id)
    }
}

/// Whitespace tokenizer over an open vocabulary.
///
/// The vocabulary file holds one token per line; a token's id is its line
/// index. Words not in the file are appended on first sight, so encoding
/// never fails and decoding reproduces the whitespace-normalized text.
#[derive(Debug, Default)]
pub struct VocabTokenizer {
    vocab: RwLock<Vocab>,
}

impl VocabTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a vocabulary file. Blank lines are skipped; duplicates keep the
    /// first id.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            EapoError::config(path, format!("cannot read tokenizer vocabulary: {}", e))
        })?;
        Self::from_tokens(content.lines().map(str::trim).filter(|t| !t.is_empty()))
    }

    pub fn from_tokens<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut vocab = Vocab::default();
        for token in tokens {
            vocab.insert(token)?;
        }
        Ok(Self {
            vocab: RwLock::new(vocab),
        })
    }

    pub fn len(&self) -> usize {
        self.vocab.read().map(|v| v.tokens.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned() -> EapoError {
        EapoError::external(COMPONENT, "vocabulary lock poisoned")
    }
}

impl Tokenizer for VocabTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<TokenId>> {
        let mut ids = Vec::new();
        let mut missing = Vec::new();

        {
            let vocab = self.vocab.read().map_err(|_| Self::poisoned())?;
            for word in text.split_whitespace() {
                match vocab.ids.get(word) {
                    Some(&id) => ids.push(Some(id)),
                    None => {
                        ids.push(None);
                        missing.push(word);
                    }
                }
            }
        }

        if missing.is_empty() {
            return Ok(ids.into_iter().flatten().collect());
        }

        let mut vocab = self.vocab.write().map_err(|_| Self::poisoned())?;
        let mut missing = missing.into_iter();
        ids.into_iter()
            .map(|slot| match slot {
                Some(id) => Ok(id),
                None => {
                    let word = missing
                        .next()
                        .ok_or_else(|| EapoError::external(COMPONENT, "token bookkeeping mismatch"))?;
                    vocab.insert(word)
                }
            })
            .collect()
    }

    fn decode(&self, ids: &[TokenId]) -> Result<String> {
        let vocab = self.vocab.read().map_err(|_| Self::poisoned())?;
        let words = ids
            .iter()
            .map(|&id| {
                vocab
                    .tokens
                    .get(id as usize)
                    .map(String::as_str)
                    .ok_or_else(|| EapoError::external(COMPONENT, format!("unknown token id {}", id)))
            })
            .collect::<Result<Vec<&str>>>()?;
        Ok(words.join(" "))
    }
}
