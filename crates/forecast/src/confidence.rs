//! Confidence bands for projected months.

use serde::{Deserialize, Serialize};

use crate::result::Confidence;

/// Band widening per forecast step (fraction of one standard deviation).
const WIDENING_PER_STEP: f64 = 0.1;

/// Score lost per forecast step.
const SCORE_DECAY_PER_STEP: u32 = 5;

const HIGH_SCORE: u32 = 80;
const MEDIUM_SCORE: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBand {
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub score: u32,
    pub confidence: Confidence,
}

/// Band around `predicted` for forecast step `step` (1-based).
///
/// `sigma` is the population standard deviation of the history.
pub fn estimate(predicted: f64, sigma: f64, step: usize) -> ConfidenceBand {
    let spread = sigma * (1.0 + step as f64 * WIDENING_PER_STEP);
    let score = confidence_score(step);

    ConfidenceBand {
        lower_bound: (predicted - spread).max(0.0),
        upper_bound: predicted + spread,
        score,
        confidence: label_for(score),
    }
}

/// `max(0, 100 - 5 * step)`.
pub fn confidence_score(step: usize) -> u32 {
    let step = u32::try_from(step).unwrap_or(u32::MAX);
    100u32.saturating_sub(step.saturating_mul(SCORE_DECAY_PER_STEP))
}

pub fn label_for(score: u32) -> Confidence {
    if score >= HIGH_SCORE {
        Confidence::High
    } else if score >= MEDIUM_SCORE {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}
