use serde::{Deserialize, Serialize};

use crate::models::{Brevity, Dimension, Format, PromptConfig, Reasoning, Style};
use crate::search::grid::TrialEnumerator;

/// Candidate values per dimension, in enumeration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PromptSpace {
    pub style: Vec<Style>,
    pub reasoning: Vec<Reasoning>,
    pub format: Vec<Format>,
    pub brevity: Vec<Brevity>,
}

fn check_candidates<D: Dimension>(values: &[D]) -> Result<(), String> {
    if values.is_empty() {
        return Err(format!("{} has no candidate values", D::NAME));
    }
    for (i, value) in values.iter().enumerate() {
        if values[..i].contains(value) {
            return Err(format!("{} lists '{}' more than once", D::NAME, value.as_str()));
        }
    }
    Ok(())
}

impl PromptSpace {
    /// Every dimension needs at least one candidate and no repeats.
    pub fn validate(&self) -> Result<(), String> {
        check_candidates(&self.style)?;
        check_candidates(&self.reasoning)?;
        check_candidates(&self.format)?;
        check_candidates(&self.brevity)?;
        Ok(())
    }

    /// Candidate counts in nesting order, outermost first.
    pub fn radices(&self) -> [usize; 4] {
        [
            self.style.len(),
            self.reasoning.len(),
            self.format.len(),
            self.brevity.len(),
        ]
    }

    /// Size of the full Cartesian product (saturating).
    pub fn size(&self) -> usize {
        self.radices()
            .iter()
            .fold(1usize, |acc, &n| acc.saturating_mul(n))
    }

    /// Configuration at a flat position of the product.
    ///
    /// Positions count in lexicographic order with brevity varying fastest.
    pub fn config_at(&self, index: usize) -> Option<PromptConfig> {
        if index >= self.size() {
            return None;
        }
        let [_, nr, nf, nb] = self.radices();
        let brevity = index % nb;
        let format = (index / nb) % nf;
        let reasoning = (index / (nb * nf)) % nr;
        let style = index / (nb * nf * nr);

        Some(PromptConfig::new(
            self.style[style],
            self.reasoning[reasoning],
            self.format[format],
            self.brevity[brevity],
        ))
    }

    /// Lazily enumerate at most `budget` configurations.
    pub fn trials(&self, budget: usize) -> TrialEnumerator<'_> {
        TrialEnumerator::new(self, budget)
    }
}
