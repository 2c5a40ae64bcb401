use crate::models::PromptConfig;
use crate::search::space::PromptSpace;

/// Budget-truncated grid over a [`PromptSpace`].
///
/// Yields the Cartesian product in the fixed nesting order
/// `style ⊃ reasoning ⊃ format ⊃ brevity` (brevity varies fastest) and stops
/// after the first `budget` configurations. When the budget is smaller than
/// the product, early style values are over-represented.
///
/// A clone resumes from the same position.
#[derive(Debug, Clone)]
pub struct TrialEnumerator<'a> {
    space: &'a PromptSpace,
    next: usize,
    end: usize,
}

impl<'a> TrialEnumerator<'a> {
    pub fn new(space: &'a PromptSpace, budget: usize) -> Self {
        Self {
            space,
            next: 0,
            end: budget.min(space.size()),
        }
    }
}

impl Iterator for TrialEnumerator<'_> {
    type Item = PromptConfig;

    fn next(&mut self) -> Option<PromptConfig> {
        if self.next >= self.end {
            return None;
        }
        let cfg = self.space.config_at(self.next);
        self.next += 1;
        cfg
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TrialEnumerator<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Brevity, Dimension, Format, Reasoning, Style};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn small_space() -> PromptSpace {
        PromptSpace {
            style: vec![Style::Concise, Style::Role],
            reasoning: vec![Reasoning::Brief],
            format: vec![Format::Bullets],
            brevity: vec![Brevity::OneSentence, Brevity::ThreeSentences],
        }
    }

    #[test]
    fn test_budget_three_order() {
        let space = small_space();
        let trials: Vec<PromptConfig> = space.trials(3).collect();

        assert_eq!(
            trials,
            vec![
                PromptConfig::new(Style::Concise, Reasoning::Brief, Format::Bullets, Brevity::OneSentence),
                PromptConfig::new(Style::Concise, Reasoning::Brief, Format::Bullets, Brevity::ThreeSentences),
                PromptConfig::new(Style::Role, Reasoning::Brief, Format::Bullets, Brevity::OneSentence),
            ]
        );
    }

    #[test]
    fn test_budget_zero_yields_nothing() {
        assert_eq!(small_space().trials(0).count(), 0);
    }

    #[test]
    fn test_budget_larger_than_product() {
        let space = small_space();
        let trials = space.trials(100);
        assert_eq!(trials.len(), 4);
        assert_eq!(trials.count(), 4);
    }

    #[test]
    fn test_clone_restarts_from_position() {
        let space = small_space();
        let mut trials = space.trials(4);
        trials.next();

        let saved = trials.clone();
        let rest: Vec<_> = trials.collect();
        let replay: Vec<_> = saved.collect();
        assert_eq!(rest, replay);
        assert_eq!(rest.len(), 3);
    }

    #[test]
    fn test_restartable_from_space() {
        let space = small_space();
        let first: Vec<_> = space.trials(3).collect();
        let second: Vec<_> = space.trials(3).collect();
        assert_eq!(first, second);
    }

    /// Nested loops that break out of every level once the budget is hit.
    fn nested_break(space: &PromptSpace, budget: usize) -> Vec<PromptConfig> {
        let mut out = Vec::new();
        'outer: for &style in &space.style {
            for &reasoning in &space.reasoning {
                for &format in &space.format {
                    for &brevity in &space.brevity {
                        out.push(PromptConfig::new(style, reasoning, format, brevity));
                        if out.len() >= budget {
                            break 'outer;
                        }
                    }
                }
            }
        }
        out
    }

    fn arb_space() -> impl Strategy<Value = PromptSpace> {
        (
            proptest::sample::subsequence(Style::VALUES.to_vec(), 1..=6),
            proptest::sample::subsequence(Reasoning::VALUES.to_vec(), 1..=4),
            proptest::sample::subsequence(Format::VALUES.to_vec(), 1..=4),
            proptest::sample::subsequence(Brevity::VALUES.to_vec(), 1..=5),
        )
            .prop_map(|(style, reasoning, format, brevity)| PromptSpace {
                style,
                reasoning,
                format,
                brevity,
            })
    }

    proptest! {
        #[test]
        fn prop_length_and_uniqueness(space in arb_space(), budget in 0usize..300) {
            let trials: Vec<PromptConfig> = space.trials(budget).collect();
            prop_assert!(trials.len() <= budget);
            prop_assert_eq!(trials.len(), budget.min(space.size()));

            let unique: HashSet<PromptConfig> = trials.iter().copied().collect();
            prop_assert_eq!(unique.len(), trials.len());
        }

        #[test]
        fn prop_prefix_of_full_product(space in arb_space(), budget in 0usize..300) {
            let full: Vec<PromptConfig> = space.trials(usize::MAX).collect();
            let truncated: Vec<PromptConfig> = space.trials(budget).collect();
            prop_assert_eq!(&full[..truncated.len()], truncated.as_slice());
        }

        #[test]
        fn prop_matches_nested_break_for_positive_budget(space in arb_space(), budget in 1usize..300) {
            let trials: Vec<PromptConfig> = space.trials(budget).collect();
            prop_assert_eq!(trials, nested_break(&space, budget));
        }
    }
}
