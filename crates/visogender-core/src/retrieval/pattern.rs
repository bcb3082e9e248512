//! Positional candidate layout used by the diff-gender relabeling and `bias_count@k`.
//!
//! The benchmark orders each occupation's candidates in three blocks: a leading
//! block of same-gender pairs, a middle block of mixed pairs, and a trailing
//! block of same-gender pairs. The leading block is weighted `+1`, the middle
//! `0` and the trailing `-1`.

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};
use crate::types::GenderLabel;

/// Segment lengths of the positional candidate layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionalPattern {
    /// Leading same-gender block (weight +1)
    pub leading: usize,

    /// Middle mixed-gender block (weight 0)
    pub middle: usize,

    /// Trailing same-gender block (weight -1)
    pub trailing: usize,
}

impl Default for PositionalPattern {
    fn default() -> Self {
        Self {
            leading: 5,
            middle: 10,
            trailing: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    Leading,
    Middle,
    Trailing,
}

impl PositionalPattern {
    /// Total number of slots covered by the pattern.
    pub fn len(&self) -> usize {
        self.leading + self.middle + self.trailing
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ensure the pattern covers `candidates` slots for `occupation`.
    pub fn check(&self, occupation: &str, candidates: usize) -> AnalysisResult<()> {
        if candidates > self.len() {
            return Err(AnalysisError::PatternTooShort {
                occupation: occupation.to_string(),
                candidates,
                pattern_len: self.len(),
            });
        }
        Ok(())
    }

    /// Same/diff labels for the first `n` slots.
    pub fn labels(&self, n: usize) -> Vec<GenderLabel> {
        self.segments()
            .take(n)
            .map(|segment| match segment {
                Segment::Middle => GenderLabel::Diff,
                Segment::Leading | Segment::Trailing => GenderLabel::Same,
            })
            .collect()
    }

    /// `+1 / 0 / -1` weights for the first `n` slots.
    pub fn weights(&self, n: usize) -> Vec<i64> {
        self.segments()
            .take(n)
            .map(|segment| match segment {
                Segment::Leading => 1,
                Segment::Middle => 0,
                Segment::Trailing => -1,
            })
            .collect()
    }

    fn segments(&self) -> impl Iterator<Item = Segment> {
        std::iter::repeat(Segment::Leading)
            .take(self.leading)
            .chain(std::iter::repeat(Segment::Middle).take(self.middle))
            .chain(std::iter::repeat(Segment::Trailing).take(self.trailing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pattern_labels() {
        let pattern = PositionalPattern::default();
        let labels = pattern.labels(20);
        assert_eq!(labels.len(), 20);
        assert!(labels[..5].iter().all(|&l| l == GenderLabel::Same));
        assert!(labels[5..15].iter().all(|&l| l == GenderLabel::Diff));
        assert!(labels[15..].iter().all(|&l| l == GenderLabel::Same));
    }

    #[test]
    fn test_default_pattern_weights() {
        let weights = PositionalPattern::default().weights(20);
        assert_eq!(weights.iter().sum::<i64>(), 0);
        assert_eq!(weights[0], 1);
        assert_eq!(weights[10], 0);
        assert_eq!(weights[19], -1);
    }

    #[test]
    fn test_pattern_truncates_to_candidate_count() {
        let pattern = PositionalPattern::default();
        assert_eq!(pattern.labels(3).len(), 3);
        assert_eq!(pattern.weights(7), vec![1, 1, 1, 1, 1, 0, 0]);
    }

    #[test]
    fn test_pattern_check_rejects_longer_lists() {
        let pattern = PositionalPattern::default();
        assert!(pattern.check("nurse", 20).is_ok());
        let err = pattern.check("nurse", 21).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::PatternTooShort {
                occupation: "nurse".to_string(),
                candidates: 21,
                pattern_len: 20,
            }
        );
    }

    #[test]
    fn test_custom_pattern() {
        let pattern = PositionalPattern {
            leading: 1,
            middle: 2,
            trailing: 1,
        };
        assert_eq!(pattern.len(), 4);
        assert_eq!(pattern.weights(4), vec![1, 0, 0, -1]);
        assert_eq!(
            pattern.labels(4),
            vec![
                GenderLabel::Same,
                GenderLabel::Diff,
                GenderLabel::Diff,
                GenderLabel::Same
            ]
        );
    }
}
