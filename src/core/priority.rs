//! Priority scores and the calculator boundary.
//!
//! The classifier scores each priority phrase with a vector of class
//! confidences. A [`PriorityCalculator`] reduces that vector to a
//! [`PriorityScore`]; topics are scored with the mean of their messages.

use serde::{Deserialize, Serialize};

/// Ordinal importance of a topic. Higher is more important.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriorityScore(u8);

impl PriorityScore {
    /// Lowest level.
    pub const LOW: Self = Self(0);
    /// Level used when no classifier score is available.
    pub const NORMAL: Self = Self(1);
    /// Elevated level.
    pub const HIGH: Self = Self(2);
    /// Highest level.
    pub const CRITICAL: Self = Self(3);
    /// Upper bound of the range.
    pub const MAX: Self = Self::CRITICAL;
    /// Deterministic fallback for unscored phrases.
    pub const DEFAULT: Self = Self::NORMAL;

    /// Build a score, clamping to the supported range.
    pub fn new(level: u8) -> Self {
        Self(level.min(Self::MAX.0))
    }

    /// Raw ordinal level.
    pub const fn level(self) -> u8 {
        self.0
    }

    /// Mean of the given scores, rounded half-up. `None` for an empty input.
    pub fn mean<I>(scores: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        let (sum, count) = scores
            .into_iter()
            .fold((0_u32, 0_u32), |(sum, count), s| (sum + u32::from(s.0), count + 1));
        if count == 0 {
            return None;
        }
        // Integer half-up rounding of sum / count.
        let rounded = (2 * sum + count) / (2 * count);
        Some(Self::new(u8::try_from(rounded).unwrap_or(u8::MAX)))
    }
}

impl Default for PriorityScore {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A phrase scored by the external classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPhrase {
    /// The phrase exactly as submitted.
    pub text: String,
    /// Per-class confidences; index is the priority level.
    pub scores: Vec<f64>,
}

/// Reduces classifier output for a phrase to a single score.
pub trait PriorityCalculator: Send + Sync {
    /// Score `phrase` using `scored_phrases`. Must return a deterministic
    /// default when `phrase` is absent.
    fn calculate(&self, phrase: &str, scored_phrases: &[ScoredPhrase]) -> PriorityScore;
}

/// Picks the class with the highest confidence. Ties go to the lower class.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgmaxCalculator;

impl PriorityCalculator for ArgmaxCalculator {
    fn calculate(&self, phrase: &str, scored_phrases: &[ScoredPhrase]) -> PriorityScore {
        let Some(scored) = scored_phrases.iter().find(|p| p.text == phrase) else {
            return PriorityScore::DEFAULT;
        };
        scored
            .scores
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_finite())
            .fold(None::<(usize, f64)>, |best, (idx, &score)| match best {
                Some((_, best_score)) if best_score >= score => best,
                _ => Some((idx, score)),
            })
            .map_or(PriorityScore::DEFAULT, |(idx, _)| {
                PriorityScore::new(u8::try_from(idx).unwrap_or(u8::MAX))
            })
    }
}
